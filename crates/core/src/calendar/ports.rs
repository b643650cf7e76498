//! Port interfaces for calendar feed ingestion.

use async_trait::async_trait;
use staysync_domain::{BookingDraft, FeedEvent, ParsedFeed, Result};

/// Trait for retrieving raw feed text from a source URL.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the feed body. Non-2xx responses and timeouts are errors the
    /// orchestrator isolates per source.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Per-platform parsing and mapping capability.
///
/// One implementation per supported listing platform; new platforms register
/// a new implementation rather than branching inside shared code.
pub trait PlatformAdapter: Send + Sync {
    /// Platform tag this adapter handles, matching `CalendarSource.platform`.
    fn platform(&self) -> &'static str;

    /// Parse raw feed text into structured events.
    fn parse(&self, raw: &str) -> Result<ParsedFeed>;

    /// Keep only genuine bookings and map them into reservation-shaped
    /// drafts; blackout entries pass through with their synthetic id.
    fn map(&self, events: Vec<FeedEvent>) -> Vec<BookingDraft>;
}

//! Platform adapter implementations and the registry that dispatches on a
//! source's platform tag.

use std::collections::HashMap;
use std::sync::Arc;

use staysync_domain::constants::{
    AIRBNB_NOT_AVAILABLE_SUMMARY, AIRBNB_PLATFORM, AIRBNB_RESERVED_SUMMARY, FEED_DEFAULT_GUEST_COUNT,
    FEED_DEFAULT_PRICE,
};
use staysync_domain::utils::feed_parser::parse_feed;
use staysync_domain::{BookingDraft, FeedEvent, ParsedFeed, ReservationKind, Result};

use super::ports::PlatformAdapter;

/// Adapter for Airbnb-published iCal feeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct AirbnbAdapter;

impl PlatformAdapter for AirbnbAdapter {
    fn platform(&self) -> &'static str {
        AIRBNB_PLATFORM
    }

    fn parse(&self, raw: &str) -> Result<ParsedFeed> {
        parse_feed(raw, AIRBNB_NOT_AVAILABLE_SUMMARY)
    }

    fn map(&self, events: Vec<FeedEvent>) -> Vec<BookingDraft> {
        events
            .into_iter()
            .filter(|event| event.is_blackout || event.summary == AIRBNB_RESERVED_SUMMARY)
            .map(|event| BookingDraft {
                external_id: event.external_id,
                start: event.start,
                end: event.end,
                // Feeds carry neither price nor traveler count.
                price: FEED_DEFAULT_PRICE,
                guest_count: FEED_DEFAULT_GUEST_COUNT,
                kind: if event.is_blackout {
                    ReservationKind::ManualBlockDate
                } else {
                    ReservationKind::Reservation
                },
            })
            .collect()
    }
}

/// Registry of platform adapters keyed by platform tag.
#[derive(Clone, Default)]
pub struct PlatformRegistry {
    adapters: HashMap<&'static str, Arc<dyn PlatformAdapter>>,
}

impl PlatformRegistry {
    /// Registry with all built-in platforms registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(Arc::new(AirbnbAdapter));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        self.adapters.insert(adapter.platform(), adapter);
    }

    pub fn get(&self, platform: &str) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters.get(platform).cloned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn event(summary: &str, external_id: &str, is_blackout: bool) -> FeedEvent {
        FeedEvent {
            uid: format!("{external_id}@airbnb.com"),
            start: Utc.with_ymd_and_hms(2025, 12, 21, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 12, 22, 0, 0, 0).unwrap(),
            summary: summary.to_string(),
            description: String::new(),
            dtstamp: None,
            reservation_url: None,
            phone_last_digits: None,
            external_id: external_id.to_string(),
            is_blackout,
        }
    }

    #[test]
    fn keeps_reserved_entries_and_blackouts_only() {
        let adapter = AirbnbAdapter;
        let events = vec![
            event("Reserved", "HMPSS2HE58", false),
            event("Airbnb (Not available)", "MANUAL_BLOCK_abc123", true),
            event("Pending request", "HMZZZZ9999", false),
        ];

        let drafts = adapter.map(events);

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].kind, ReservationKind::Reservation);
        assert_eq!(drafts[1].kind, ReservationKind::ManualBlockDate);
    }

    #[test]
    fn blackout_drafts_default_price_and_guest_count() {
        let adapter = AirbnbAdapter;
        let drafts = adapter.map(vec![event("Airbnb (Not available)", "MANUAL_BLOCK_x", true)]);

        assert_eq!(drafts[0].price, 0.0);
        assert_eq!(drafts[0].guest_count, 1);
    }

    #[test]
    fn registry_dispatches_on_platform_tag() {
        let registry = PlatformRegistry::with_defaults();

        assert!(registry.get("airbnb").is_some());
        assert!(registry.get("booking.com").is_none());
    }
}

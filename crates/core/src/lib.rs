//! # StaySync Core
//!
//! Core business logic for the ingestion-and-reconciliation pipeline.
//!
//! This crate contains:
//! - Port traits for repositories, the feed fetcher, and the mail store
//! - The calendar sync service (reconciliation engine + orchestrator)
//! - The mailbox sync service (poll, parse, deduplicate)
//! - The event processing service (status state machine)
//!
//! ## Architecture
//! - Depends only on `staysync-domain`
//! - Contains no I/O; infrastructure implements the port traits

pub mod calendar;
pub mod events;
pub mod mailbox;
pub mod reservations;

// Re-export commonly used items
pub use calendar::platforms::{AirbnbAdapter, PlatformRegistry};
pub use calendar::ports::{FeedFetcher, PlatformAdapter};
pub use calendar::service::CalendarSyncService;
pub use events::service::EventProcessingService;
pub use mailbox::ports::MailStore;
pub use mailbox::service::MailboxSyncService;
pub use reservations::ports::{
    CalendarSourceRepository, NotificationEventRepository, ReservationRepository,
};

//! # StaySync Domain
//!
//! Business domain types and models for StaySync.
//!
//! This crate contains:
//! - Domain data types (Reservation, CalendarSource, NotificationEvent)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and the pure feed/notification parsers
//!
//! ## Architecture
//! - No dependencies on other StaySync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export the feed and notification parsers
pub use utils::feed_parser::{parse_feed, FeedEvent, ParsedFeed};
pub use utils::notification_parser::{parse_notification, ParsedNotification};

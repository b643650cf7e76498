//! Shared test support: in-memory mock implementations of the core ports.

#![allow(dead_code)]

pub mod calendar;
pub mod mailbox;
pub mod repositories;

pub use calendar::MockFeedFetcher;
pub use mailbox::MockMailStore;
pub use repositories::{
    MockCalendarSourceRepository, MockNotificationEventRepository, MockReservationRepository,
};

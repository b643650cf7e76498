//! SQLite-backed implementations of the store ports.

pub mod calendar_source_repository;
pub mod manager;
pub mod notification_event_repository;
pub mod reservation_repository;

pub use calendar_source_repository::SqliteCalendarSourceRepository;
pub use manager::{DbManager, SqlitePool};
pub use notification_event_repository::SqliteNotificationEventRepository;
pub use reservation_repository::SqliteReservationRepository;

//! Port interfaces for the reservation and event stores
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use staysync_domain::{
    CalendarSource, NewCalendarSource, NewNotificationEvent, NewReservation, NotificationEvent,
    Reservation, ReservationPatch, Result,
};

/// Trait for the canonical reservation store.
///
/// Both ingestion flows upsert by external id; nothing ever deletes.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Look up a reservation by the platform's booking id.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Reservation>>;

    /// Create a reservation. Fails on a duplicate external id.
    async fn create(&self, reservation: NewReservation) -> Result<Reservation>;

    /// Apply a partial update. `updated_at` moves only when the patch is
    /// non-empty.
    async fn update(&self, id: &str, patch: ReservationPatch) -> Result<()>;

    /// All reservations, for the read-side collaborators.
    async fn find_all(&self) -> Result<Vec<Reservation>>;
}

/// Trait for reading registered calendar sources.
#[async_trait]
pub trait CalendarSourceRepository: Send + Sync {
    /// Register a new source (admin surface and tests).
    async fn create(&self, source: NewCalendarSource) -> Result<CalendarSource>;

    /// Sources the sync orchestrator should process.
    async fn find_active(&self) -> Result<Vec<CalendarSource>>;

    async fn find_all(&self) -> Result<Vec<CalendarSource>>;
}

/// Trait for the notification event store.
#[async_trait]
pub trait NotificationEventRepository: Send + Sync {
    async fn insert(&self, event: NewNotificationEvent) -> Result<NotificationEvent>;

    /// Every event recorded for one booking id, consumed or not. Used by the
    /// deduplicator.
    async fn find_by_booking_id(&self, booking_id: &str) -> Result<Vec<NotificationEvent>>;

    /// Events not yet applied to a reservation, in no particular order.
    async fn find_unconsumed(&self) -> Result<Vec<NotificationEvent>>;

    async fn mark_consumed(&self, id: &str) -> Result<()>;
}

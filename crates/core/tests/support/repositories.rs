//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core repository ports, enabling
//! deterministic unit tests without database dependencies.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use staysync_core::reservations::ports::{
    CalendarSourceRepository, NotificationEventRepository, ReservationRepository,
};
use staysync_domain::{
    CalendarSource, NewCalendarSource, NewNotificationEvent, NewReservation, NotificationEvent,
    Reservation, ReservationPatch, Result as DomainResult, StaySyncError,
};
use uuid::Uuid;

/// In-memory mock for `ReservationRepository`.
#[derive(Default, Clone)]
pub struct MockReservationRepository {
    reservations: Arc<Mutex<Vec<Reservation>>>,
}

impl MockReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored reservations, for assertions.
    pub fn all(&self) -> Vec<Reservation> {
        self.reservations.lock().unwrap().clone()
    }

    /// Convenience helper for seeding a reservation directly.
    pub fn with_reservation(self, reservation: Reservation) -> Self {
        self.reservations.lock().unwrap().push(reservation);
        self
    }
}

#[async_trait]
impl ReservationRepository for MockReservationRepository {
    async fn find_by_external_id(&self, external_id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.external_id == external_id)
            .cloned())
    }

    async fn create(&self, reservation: NewReservation) -> DomainResult<Reservation> {
        let mut guard = self.reservations.lock().unwrap();

        if guard.iter().any(|r| r.external_id == reservation.external_id) {
            return Err(StaySyncError::Database(format!(
                "unique constraint violation: external id {}",
                reservation.external_id
            )));
        }

        let now = Utc::now();
        let stored = Reservation {
            id: Uuid::now_v7().to_string(),
            external_id: reservation.external_id,
            start: reservation.start,
            end: reservation.end,
            price: reservation.price,
            guest_count: reservation.guest_count,
            kind: reservation.kind,
            status: reservation.status,
            source_id: reservation.source_id,
            created_at: now,
            updated_at: now,
        };
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: ReservationPatch) -> DomainResult<()> {
        let mut guard = self.reservations.lock().unwrap();
        let reservation = guard
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StaySyncError::NotFound(format!("reservation {id}")))?;

        if patch.is_empty() {
            return Ok(());
        }

        if let Some(start) = patch.start {
            reservation.start = start;
        }
        if let Some(end) = patch.end {
            reservation.end = end;
        }
        if let Some(price) = patch.price {
            reservation.price = price;
        }
        if let Some(guest_count) = patch.guest_count {
            reservation.guest_count = guest_count;
        }
        if let Some(kind) = patch.kind {
            reservation.kind = kind;
        }
        if let Some(status) = patch.status {
            reservation.status = status;
        }
        if let Some(source_id) = patch.source_id {
            reservation.source_id = Some(source_id);
        }
        reservation.updated_at = Utc::now();

        Ok(())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.reservations.lock().unwrap().clone())
    }
}

/// In-memory mock for `CalendarSourceRepository`.
#[derive(Default, Clone)]
pub struct MockCalendarSourceRepository {
    sources: Arc<Mutex<Vec<CalendarSource>>>,
}

impl MockCalendarSourceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CalendarSourceRepository for MockCalendarSourceRepository {
    async fn create(&self, source: NewCalendarSource) -> DomainResult<CalendarSource> {
        let now = Utc::now();
        let stored = CalendarSource {
            id: Uuid::now_v7().to_string(),
            url: source.url,
            platform: source.platform,
            active: source.active,
            created_at: now,
            updated_at: now,
        };
        self.sources.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_active(&self) -> DomainResult<Vec<CalendarSource>> {
        Ok(self.sources.lock().unwrap().iter().filter(|s| s.active).cloned().collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<CalendarSource>> {
        Ok(self.sources.lock().unwrap().clone())
    }
}

/// In-memory mock for `NotificationEventRepository`.
#[derive(Default, Clone)]
pub struct MockNotificationEventRepository {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl MockNotificationEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn with_event(self, event: NotificationEvent) -> Self {
        self.events.lock().unwrap().push(event);
        self
    }
}

#[async_trait]
impl NotificationEventRepository for MockNotificationEventRepository {
    async fn insert(&self, event: NewNotificationEvent) -> DomainResult<NotificationEvent> {
        let stored = NotificationEvent {
            id: Uuid::now_v7().to_string(),
            booking_id: event.booking_id,
            received_at: event.received_at,
            kind: event.kind,
            price: event.price,
            consumed: false,
            created_at: Utc::now(),
        };
        self.events.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_booking_id(&self, booking_id: &str) -> DomainResult<Vec<NotificationEvent>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.booking_id == booking_id)
            .cloned()
            .collect())
    }

    async fn find_unconsumed(&self) -> DomainResult<Vec<NotificationEvent>> {
        Ok(self.events.lock().unwrap().iter().filter(|e| !e.consumed).cloned().collect())
    }

    async fn mark_consumed(&self, id: &str) -> DomainResult<()> {
        let mut guard = self.events.lock().unwrap();
        let event = guard
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StaySyncError::NotFound(format!("notification event {id}")))?;
        event.consumed = true;
        Ok(())
    }
}

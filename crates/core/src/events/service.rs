//! Event processing service
//!
//! Consumes not-yet-applied notification events in any order, resolves the
//! matching reservation by external id, applies the status/price transition,
//! and marks the event consumed.
//!
//! The status lifecycle is deliberately loose: a later event can still
//! overwrite an earlier status, so out-of-order arrival needs no transition
//! table. Events without a matching reservation are consumed anyway to stop
//! them from being reprocessed forever; they stay in the store for audit.

use std::sync::Arc;

use staysync_domain::{
    NotificationEvent, NotificationKind, ProcessReport, ReservationPatch, ReservationStatus,
    Result,
};
use tracing::{debug, info, warn};

use crate::reservations::ports::{NotificationEventRepository, ReservationRepository};

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Reservation,
    Orphaned,
}

/// Event processing service
pub struct EventProcessingService {
    events: Arc<dyn NotificationEventRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl EventProcessingService {
    pub fn new(
        events: Arc<dyn NotificationEventRepository>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self { events, reservations }
    }

    /// Apply every unconsumed event. Per-event failures are caught, counted,
    /// and leave the event unconsumed for the next run.
    pub async fn process_pending(&self) -> Result<ProcessReport> {
        let pending = self.events.find_unconsumed().await?;
        info!(pending = pending.len(), "processing notification events");

        let mut report = ProcessReport::default();

        for event in &pending {
            match self.apply(event).await {
                Ok(Applied::Reservation) => report.applied += 1,
                Ok(Applied::Orphaned) => report.orphaned += 1,
                Err(err) => {
                    report.errors += 1;
                    warn!(event_id = %event.id, error = %err, "failed to apply event");
                }
            }
        }

        info!(
            applied = report.applied,
            orphaned = report.orphaned,
            errors = report.errors,
            "event processing completed"
        );

        Ok(report)
    }

    async fn apply(&self, event: &NotificationEvent) -> Result<Applied> {
        let Some(reservation) =
            self.reservations.find_by_external_id(&event.booking_id).await?
        else {
            warn!(
                event_id = %event.id,
                booking_id = %event.booking_id,
                "no reservation matches event booking id; consuming anyway"
            );
            self.events.mark_consumed(&event.id).await?;
            return Ok(Applied::Orphaned);
        };

        let mut patch = ReservationPatch {
            status: Some(match event.kind {
                NotificationKind::Payout => ReservationStatus::Paid,
                NotificationKind::Creation => ReservationStatus::Confirmed,
                NotificationKind::Cancellation => ReservationStatus::Canceled,
            }),
            ..ReservationPatch::default()
        };
        // Price 0 is a meaningful update: full refunds arrive as 0.
        if let Some(price) = event.price {
            patch.price = Some(price);
        }

        self.reservations.update(&reservation.id, patch).await?;
        self.events.mark_consumed(&event.id).await?;

        debug!(
            event_id = %event.id,
            booking_id = %event.booking_id,
            kind = event.kind.as_str(),
            "event applied to reservation"
        );

        Ok(Applied::Reservation)
    }
}

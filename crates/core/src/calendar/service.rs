//! Calendar sync service
//!
//! Orchestrates synchronization of booking feeds: fetch each active source,
//! parse and map the feed through its platform adapter, then reconcile the
//! mapped bookings against the reservation store with idempotent
//! create/update decisions.

use std::sync::Arc;

use staysync_domain::{
    BookingDraft, CalendarSource, NewReservation, Reservation, ReservationPatch,
    ReservationStatus, Result, StaySyncError, SyncReport,
};
use tracing::{debug, info, warn};

use super::platforms::PlatformRegistry;
use super::ports::FeedFetcher;
use crate::reservations::ports::{CalendarSourceRepository, ReservationRepository};

/// Outcome of reconciling one mapped booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reconciliation {
    Created,
    Updated,
    Unchanged,
}

/// Per-source totals folded into the run report.
#[derive(Debug, Clone, Copy, Default)]
struct SourceOutcome {
    created: usize,
    updated: usize,
}

/// Calendar sync service
pub struct CalendarSyncService {
    fetcher: Arc<dyn FeedFetcher>,
    adapters: PlatformRegistry,
    sources: Arc<dyn CalendarSourceRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl CalendarSyncService {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        adapters: PlatformRegistry,
        sources: Arc<dyn CalendarSourceRepository>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self { fetcher, adapters, sources, reservations }
    }

    /// Synchronize every active calendar source.
    ///
    /// A failure at any stage for one source is caught, logged, and counted;
    /// the remaining sources are still processed. Backs both the scheduled
    /// run and the on-demand trigger.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        let sources = self.sources.find_active().await?;
        info!(source_count = sources.len(), "starting calendar sync");

        let mut report = SyncReport::default();

        for source in &sources {
            match self.sync_source(source).await {
                Ok(outcome) => {
                    report.created += outcome.created;
                    report.updated += outcome.updated;
                    debug!(
                        source_id = %source.id,
                        created = outcome.created,
                        updated = outcome.updated,
                        "source synced"
                    );
                }
                Err(err) => {
                    report.errors += 1;
                    warn!(source_id = %source.id, error = %err, "calendar source sync failed");
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            errors = report.errors,
            "calendar sync completed"
        );

        Ok(report)
    }

    /// Fetch, parse, map, and reconcile one source.
    async fn sync_source(&self, source: &CalendarSource) -> Result<SourceOutcome> {
        let adapter = self.adapters.get(&source.platform).ok_or_else(|| {
            StaySyncError::InvalidInput(format!("no adapter for platform '{}'", source.platform))
        })?;

        let raw = self.fetcher.fetch(&source.url).await?;
        let parsed = adapter.parse(&raw)?;

        if parsed.skipped > 0 {
            debug!(
                source_id = %source.id,
                skipped = parsed.skipped,
                "feed entries without dates were skipped"
            );
        }

        let drafts = adapter.map(parsed.events);
        let mut outcome = SourceOutcome::default();

        for draft in drafts {
            match self.reconcile(source, &draft).await? {
                Reconciliation::Created => outcome.created += 1,
                Reconciliation::Updated => outcome.updated += 1,
                Reconciliation::Unchanged => {}
            }
        }

        Ok(outcome)
    }

    /// Decide create vs. update vs. no-op for one mapped booking.
    ///
    /// Bookings that disappeared from the feed are left untouched: the feed
    /// carries no signal distinguishing a cancellation from an entry simply
    /// aging out of the published window.
    async fn reconcile(
        &self,
        source: &CalendarSource,
        draft: &BookingDraft,
    ) -> Result<Reconciliation> {
        let existing = self.reservations.find_by_external_id(&draft.external_id).await?;

        let Some(existing) = existing else {
            self.reservations
                .create(NewReservation {
                    external_id: draft.external_id.clone(),
                    start: draft.start,
                    end: draft.end,
                    price: draft.price,
                    guest_count: draft.guest_count,
                    kind: draft.kind,
                    status: ReservationStatus::Confirmed,
                    source_id: Some(source.id.clone()),
                })
                .await?;
            return Ok(Reconciliation::Created);
        };

        let patch = diff_reservation(&existing, draft, &source.id);
        if patch.is_empty() {
            return Ok(Reconciliation::Unchanged);
        }

        self.reservations.update(&existing.id, patch).await?;
        Ok(Reconciliation::Updated)
    }
}

/// Build the minimal patch that brings `existing` in line with `draft`.
///
/// Dates compare by instant. A 0 draft price is "feed carries no price" and
/// never overwrites a price a notification event already set.
fn diff_reservation(
    existing: &Reservation,
    draft: &BookingDraft,
    source_id: &str,
) -> ReservationPatch {
    let mut patch = ReservationPatch::default();

    if existing.start != draft.start {
        patch.start = Some(draft.start);
    }
    if existing.end != draft.end {
        patch.end = Some(draft.end);
    }
    if draft.price != existing.price && !(draft.price == 0.0 && existing.price > 0.0) {
        patch.price = Some(draft.price);
    }
    if existing.guest_count != draft.guest_count {
        patch.guest_count = Some(draft.guest_count);
    }
    if existing.kind != draft.kind {
        patch.kind = Some(draft.kind);
    }
    if existing.source_id.as_deref() != Some(source_id) {
        patch.source_id = Some(source_id.to_string());
    }

    patch
}

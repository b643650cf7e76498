//! Manual "run now" triggers for the three periodic jobs.
//!
//! Each trigger funnels through the same service method the scheduled job
//! calls and holds the same per-job guard, so a manual run and a scheduled
//! run serialize instead of double-processing.

use std::time::Instant;

use staysync_domain::{MailboxReport, ProcessReport, Result, SyncReport};
use tracing::info;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Synchronize all active calendar sources now.
pub async fn sync_all_calendars(ctx: &AppContext) -> Result<SyncReport> {
    let _guard = ctx.calendar_guard.lock().await;
    let start = Instant::now();
    info!(command = "sync::sync_all_calendars", "manual calendar sync triggered");

    let result = ctx.calendar_sync.sync_all().await;
    log_command_execution("sync::sync_all_calendars", start.elapsed(), result.is_ok());

    result
}

/// Poll the mailbox for notification emails now.
pub async fn sync_emails(ctx: &AppContext) -> Result<MailboxReport> {
    let _guard = ctx.mailbox_guard.lock().await;
    let start = Instant::now();
    info!(command = "sync::sync_emails", "manual mailbox poll triggered");

    let result = ctx.mailbox_sync.poll().await;
    log_command_execution("sync::sync_emails", start.elapsed(), result.is_ok());

    result
}

/// Apply all pending notification events now.
pub async fn process_events(ctx: &AppContext) -> Result<ProcessReport> {
    let _guard = ctx.events_guard.lock().await;
    let start = Instant::now();
    info!(command = "sync::process_events", "manual event processing triggered");

    let result = ctx.event_processing.process_pending().await;
    log_command_execution("sync::process_events", start.elapsed(), result.is_ok());

    result
}

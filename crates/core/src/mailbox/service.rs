//! Mailbox sync service
//!
//! Polls the mailbox for unread forwarded notification emails, extracts
//! structured events, deduplicates them against previously recorded events,
//! and stores the survivors for the event processor.
//!
//! Delivery is at-least-once by design: a message is only marked read after
//! it was handled (parsed and stored, or classified as irrelevant), so a
//! fetch or store failure re-offers the message on the next poll. The
//! deduplicator makes the resulting redelivery safe.

use std::sync::Arc;

use chrono::Utc;
use staysync_domain::utils::notification_parser::{parse_notification, ParsedNotification};
use staysync_domain::{MailMessage, MailboxReport, NewNotificationEvent, Result};
use tracing::{debug, info, warn};

use super::ports::MailStore;
use crate::reservations::ports::NotificationEventRepository;

/// How one message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handling {
    Stored,
    Duplicate,
    Ignored,
}

/// Mailbox sync service
pub struct MailboxSyncService {
    store: Arc<dyn MailStore>,
    events: Arc<dyn NotificationEventRepository>,
    /// Email-domain marker identifying messages forwarded from the platform.
    platform_domain: String,
}

impl MailboxSyncService {
    pub fn new(
        store: Arc<dyn MailStore>,
        events: Arc<dyn NotificationEventRepository>,
        platform_domain: impl Into<String>,
    ) -> Self {
        Self { store, events, platform_domain: platform_domain.into() }
    }

    /// Poll unread messages once.
    ///
    /// Failure to list the mailbox aborts the run; per-message failures are
    /// counted and leave the message unread for the next poll.
    pub async fn poll(&self) -> Result<MailboxReport> {
        let uids = self.store.list_unread().await?;
        info!(unread = uids.len(), "polling mailbox");

        let mut report = MailboxReport::default();

        for uid in uids {
            match self.handle_message(uid).await {
                Ok(Handling::Stored) => report.stored += 1,
                Ok(Handling::Duplicate) => report.duplicates += 1,
                Ok(Handling::Ignored) => report.ignored += 1,
                Err(err) => {
                    report.errors += 1;
                    warn!(uid, error = %err, "message left unread for retry");
                }
            }
        }

        info!(
            stored = report.stored,
            duplicates = report.duplicates,
            ignored = report.ignored,
            errors = report.errors,
            "mailbox poll completed"
        );

        Ok(report)
    }

    /// Fetch, classify, and store one message, marking it read only once it
    /// was handled.
    async fn handle_message(&self, uid: u32) -> Result<Handling> {
        let message = self.store.fetch(uid).await?;

        if !self.is_relevant(&message) {
            debug!(uid, sender = %message.sender, "message not from the platform, ignoring");
            self.store.mark_seen(uid).await?;
            return Ok(Handling::Ignored);
        }

        let Some(parsed) =
            parse_notification(&message.subject, &message.raw_body, &message.decoded_body)
        else {
            debug!(uid, subject = %message.subject, "message not classifiable, ignoring");
            self.store.mark_seen(uid).await?;
            return Ok(Handling::Ignored);
        };

        let received_at = message.date.unwrap_or_else(Utc::now);
        let handling = if self.is_duplicate(&parsed, received_at).await? {
            debug!(
                uid,
                booking_id = %parsed.booking_id,
                kind = parsed.kind.as_str(),
                "duplicate event for the same calendar day, dropping"
            );
            Handling::Duplicate
        } else {
            self.events
                .insert(NewNotificationEvent {
                    booking_id: parsed.booking_id.clone(),
                    received_at,
                    kind: parsed.kind,
                    price: parsed.price,
                })
                .await?;
            debug!(
                uid,
                booking_id = %parsed.booking_id,
                kind = parsed.kind.as_str(),
                "notification event stored"
            );
            Handling::Stored
        };

        self.store.mark_seen(uid).await?;
        Ok(handling)
    }

    /// Messages arrive forwarded from a personal mailbox, so the original
    /// platform address can show up in either the envelope or the body.
    fn is_relevant(&self, message: &MailMessage) -> bool {
        message.sender.contains(&self.platform_domain)
            || message.raw_body.contains(&self.platform_domain)
            || message.decoded_body.contains(&self.platform_domain)
    }

    /// An event is a duplicate when one already exists for the same booking
    /// id with the same kind on the same UTC calendar day.
    async fn is_duplicate(
        &self,
        parsed: &ParsedNotification,
        received_at: chrono::DateTime<Utc>,
    ) -> Result<bool> {
        let recorded = self.events.find_by_booking_id(&parsed.booking_id).await?;
        let day = received_at.date_naive();

        Ok(recorded
            .iter()
            .any(|event| event.kind == parsed.kind && event.received_at.date_naive() == day))
    }
}

//! Mock mail store with controllable fetch failures.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use staysync_core::mailbox::ports::MailStore;
use staysync_domain::{MailMessage, Result as DomainResult, StaySyncError};

/// In-memory mock for `MailStore`.
///
/// Seeded with messages; `fail_fetch` simulates a body that cannot be
/// buffered or decoded, which must leave the message unread.
#[derive(Default, Clone)]
pub struct MockMailStore {
    messages: Arc<Mutex<Vec<MailMessage>>>,
    seen: Arc<Mutex<HashSet<u32>>>,
    fail_fetch: Arc<Mutex<HashSet<u32>>>,
}

impl MockMailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(self, message: MailMessage) -> Self {
        self.messages.lock().unwrap().push(message);
        self
    }

    pub fn fail_fetch_for(&self, uid: u32) {
        self.fail_fetch.lock().unwrap().insert(uid);
    }

    pub fn clear_fetch_failures(&self) {
        self.fail_fetch.lock().unwrap().clear();
    }

    pub fn seen_uids(&self) -> HashSet<u32> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailStore for MockMailStore {
    async fn list_unread(&self) -> DomainResult<Vec<u32>> {
        let seen = self.seen.lock().unwrap();
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.uid)
            .filter(|uid| !seen.contains(uid))
            .collect())
    }

    async fn fetch(&self, uid: u32) -> DomainResult<MailMessage> {
        if self.fail_fetch.lock().unwrap().contains(&uid) {
            return Err(StaySyncError::Mailbox(format!("failed to buffer body of message {uid}")));
        }

        self.messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.uid == uid)
            .cloned()
            .ok_or_else(|| StaySyncError::NotFound(format!("message {uid}")))
    }

    async fn mark_seen(&self, uid: u32) -> DomainResult<()> {
        self.seen.lock().unwrap().insert(uid);
        Ok(())
    }
}

/// Build a forwarded platform notification message.
pub fn platform_message(
    uid: u32,
    subject: &str,
    body: &str,
    date: Option<DateTime<Utc>>,
) -> MailMessage {
    MailMessage {
        uid,
        subject: subject.to_string(),
        sender: "host.forwarder@gmail.com".to_string(),
        date,
        raw_body: format!("{body}\n---------- Forwarded from automated@airbnb.com ----------\n"),
        decoded_body: format!("{body}\n---------- Forwarded from automated@airbnb.com ----------\n"),
    }
}

/// Build a message unrelated to the platform.
pub fn unrelated_message(uid: u32) -> MailMessage {
    MailMessage {
        uid,
        subject: "Lunch on Friday?".to_string(),
        sender: "friend@example.org".to_string(),
        date: None,
        raw_body: "See you then!".to_string(),
        decoded_body: "See you then!".to_string(),
    }
}

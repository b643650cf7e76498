//! IMAP implementation of the MailStore port.
//!
//! Maintains one blocking IMAP session behind a mutex and drives every
//! operation through `spawn_blocking` with an outer timeout. A failed
//! operation drops the session so the next call reconnects. Messages are
//! fetched as full RFC822 bodies and decoded with `mailparse`; both the raw
//! (possibly still quoted-printable) text and the decoded text are handed to
//! the parser layer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use mailparse::{parse_mail, MailHeaderMap, ParsedMail};
use staysync_core::mailbox::ports::MailStore;
use staysync_domain::{MailMessage, MailboxConfig, Result, StaySyncError};
use tracing::debug;

use crate::errors::InfraError;

type NativeSession = imap::Session<Box<dyn imap::ImapConnection>>;

/// IMAP-backed mail store.
pub struct ImapMailStore {
    config: MailboxConfig,
    timeout: Duration,
    session: Arc<Mutex<Option<NativeSession>>>,
}

impl ImapMailStore {
    pub fn new(config: MailboxConfig) -> Self {
        let timeout = Duration::from_secs(config.connect_timeout_seconds.max(1));
        Self { config, timeout, session: Arc::new(Mutex::new(None)) }
    }

    /// Run one session operation on the blocking pool, reconnecting when no
    /// live session exists and dropping the session on failure.
    async fn with_session<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut NativeSession) -> std::result::Result<T, InfraError> + Send + 'static,
    {
        let slot = Arc::clone(&self.session);
        let config = self.config.clone();

        let task = tokio::task::spawn_blocking(move || -> Result<T> {
            let mut guard = slot
                .lock()
                .map_err(|_| StaySyncError::Internal("mailbox session lock poisoned".into()))?;

            let mut session = match guard.take() {
                Some(session) => session,
                None => connect(&config)?,
            };

            match op(&mut session) {
                Ok(value) => {
                    *guard = Some(session);
                    Ok(value)
                }
                // Session state is unknown after a failure; reconnect next call.
                Err(err) => Err(err.into()),
            }
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => joined
                .map_err(|err| StaySyncError::Internal(format!("mailbox task failed: {err}")))?,
            Err(_) => Err(StaySyncError::Mailbox(format!(
                "mailbox operation timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl MailStore for ImapMailStore {
    async fn list_unread(&self) -> Result<Vec<u32>> {
        let uids = self
            .with_session(|session| {
                let found = session.uid_search("UNSEEN").map_err(InfraError::from)?;
                Ok(found)
            })
            .await?;

        let mut sorted: Vec<u32> = uids.into_iter().collect();
        sorted.sort_unstable();

        debug!(unread = sorted.len(), "unread messages listed");
        Ok(sorted)
    }

    async fn fetch(&self, uid: u32) -> Result<MailMessage> {
        self.with_session(move |session| {
            let fetches =
                session.uid_fetch(uid.to_string(), "RFC822").map_err(InfraError::from)?;

            let fetch = fetches.iter().next().ok_or_else(|| {
                InfraError(StaySyncError::NotFound(format!("message {uid} not on server")))
            })?;
            let raw = fetch.body().ok_or_else(|| {
                InfraError(StaySyncError::Mailbox(format!("message {uid} has no body")))
            })?;

            parse_message(uid, raw)
        })
        .await
    }

    async fn mark_seen(&self, uid: u32) -> Result<()> {
        self.with_session(move |session| {
            session.uid_store(uid.to_string(), "+FLAGS (\\Seen)").map_err(InfraError::from)?;
            Ok(())
        })
        .await?;

        debug!(uid, "message marked seen");
        Ok(())
    }
}

/// Connect, authenticate, and select the inbox.
fn connect(config: &MailboxConfig) -> Result<NativeSession> {
    debug!(host = %config.host, port = config.port, "connecting to mailbox");

    let client = imap::ClientBuilder::new(&config.host, config.port)
        .connect()
        .map_err(InfraError::from)?;

    let mut session = client
        .login(&config.username, &config.password)
        .map_err(|(err, _client)| InfraError::from(err))?;

    session.select("INBOX").map_err(InfraError::from)?;

    Ok(session)
}

/// Buffer one raw RFC822 message into the transport-neutral shape.
fn parse_message(uid: u32, raw: &[u8]) -> std::result::Result<MailMessage, InfraError> {
    let parsed = parse_mail(raw)?;

    let subject = parsed.headers.get_first_value("Subject").unwrap_or_default();
    let sender = parsed.headers.get_first_value("From").unwrap_or_default();
    let date = parsed
        .headers
        .get_first_value("Date")
        .and_then(|value| mailparse::dateparse(&value).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    let decoded_body = extract_text(&parsed)?;
    let raw_body = String::from_utf8_lossy(raw).into_owned();

    Ok(MailMessage { uid, subject, sender, date, raw_body, decoded_body })
}

/// Concatenate the decoded text parts of a possibly multipart message.
fn extract_text(part: &ParsedMail<'_>) -> std::result::Result<String, InfraError> {
    if part.subparts.is_empty() {
        if part.ctype.mimetype.starts_with("text/") {
            return Ok(part.get_body()?);
        }
        return Ok(String::new());
    }

    let mut text = String::new();
    for sub in &part.subparts {
        text.push_str(&extract_text(sub)?);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QP_MESSAGE: &[u8] = b"From: Airbnb <automated@airbnb.com>\r\n\
Subject: Reservation confirmed\r\n\
Date: Sat, 10 Jan 2026 09:30:00 +0000\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
Content-Transfer-Encoding: quoted-printable\r\n\
\r\n\
Reservation HMPSS2HE58 confirmed.\r\n\
YOU EARN 580,00 =E2=82=AC\r\n";

    #[test]
    fn parse_message_decodes_quoted_printable_body() {
        let message = parse_message(7, QP_MESSAGE).unwrap();

        assert_eq!(message.uid, 7);
        assert_eq!(message.subject, "Reservation confirmed");
        assert!(message.sender.contains("airbnb.com"));
        // Raw form keeps the encoded euro sign, decoded form resolves it.
        assert!(message.raw_body.contains("=E2=82=AC"));
        assert!(message.decoded_body.contains("580,00 €"));
    }

    #[test]
    fn parse_message_extracts_date_header() {
        let message = parse_message(7, QP_MESSAGE).unwrap();

        let date = message.date.unwrap();
        assert_eq!(date.to_rfc3339(), "2026-01-10T09:30:00+00:00");
    }

    #[test]
    fn message_without_subject_yields_empty_subject() {
        let raw = b"From: someone@example.org\r\n\r\nhello\r\n";

        let message = parse_message(1, raw).unwrap();

        assert!(message.subject.is_empty());
    }
}

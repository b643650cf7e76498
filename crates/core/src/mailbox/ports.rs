//! Port interface for the mailbox.

use async_trait::async_trait;
use staysync_domain::{MailMessage, Result};

/// Trait for any store exposing "select unread", "fetch full body", and
/// "mark read" by message id.
#[async_trait]
pub trait MailStore: Send + Sync {
    /// Uids of messages not yet marked read. Failure here aborts the whole
    /// poll run.
    async fn list_unread(&self) -> Result<Vec<u32>>;

    /// Buffer and decode one full message. A failure leaves the message
    /// unread so the next poll retries it.
    async fn fetch(&self, uid: u32) -> Result<MailMessage>;

    async fn mark_seen(&self, uid: u32) -> Result<()>;
}

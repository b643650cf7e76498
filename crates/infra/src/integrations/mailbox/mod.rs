//! Mailbox access over IMAP.

pub mod imap_store;

pub use imap_store::ImapMailStore;

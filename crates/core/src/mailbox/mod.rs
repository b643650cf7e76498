//! Mailbox ingestion: mail store port and the poll/parse/deduplicate
//! service.

pub mod ports;
pub mod service;

//! Calendar feed ingestion: fetcher/adapter ports, per-platform adapters,
//! and the reconciliation service.

pub mod platforms;
pub mod ports;
pub mod service;

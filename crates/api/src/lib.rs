//! # StaySync App
//!
//! Composition root: wires configuration, the database, repositories,
//! services, and the job scheduler together, and exposes the "run now"
//! trigger commands consumed by the CLI/HTTP collaborator.

pub mod commands;
pub mod context;
pub mod utils;

pub use commands::{health_check, process_events, sync_all_calendars, sync_emails};
pub use context::AppContext;
pub use utils::logging::init_tracing;

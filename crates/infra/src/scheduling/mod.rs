//! Scheduling infrastructure for the periodic ingestion jobs.
//!
//! One process-wide job table hosts all periodic jobs (calendar sync,
//! mailbox poll, event processing). Every job owns a run-in-progress guard
//! shared with its on-demand trigger, so a scheduled run and a manual run
//! never overlap, and every job body is wrapped in a timeout.

pub mod error;
pub mod jobs;

pub use error::{SchedulerError, SchedulerResult};
pub use jobs::{JobDefinition, JobScheduler, JobSchedulerConfig};

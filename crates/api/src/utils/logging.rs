//! Structured logging bootstrap and command execution logging.

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Uniform completion log line for trigger commands.
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let elapsed_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, elapsed_ms, "command completed");
    } else {
        warn!(command, elapsed_ms, "command failed");
    }
}

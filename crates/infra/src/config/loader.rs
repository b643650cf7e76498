//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variables are missing, falls back to loading from file
//! 3. Probes a small set of paths for TOML config files
//!
//! ## Environment Variables
//! - `STAYSYNC_DB_PATH`: Database file path (required for env loading)
//! - `STAYSYNC_DB_POOL_SIZE`: Connection pool size
//! - `STAYSYNC_CALENDAR_SCHEDULE`: Cron expression for calendar sync
//! - `STAYSYNC_CALENDAR_FETCH_TIMEOUT`: Feed fetch timeout in seconds
//! - `STAYSYNC_CALENDAR_ENABLED`: Whether calendar sync runs (true/false)
//! - `STAYSYNC_MAILBOX_HOST` / `_PORT` / `_USERNAME` / `_PASSWORD`
//! - `STAYSYNC_MAILBOX_SCHEDULE`: Cron expression for mailbox polling
//! - `STAYSYNC_MAILBOX_CONNECT_TIMEOUT`: Mailbox connect timeout in seconds
//! - `STAYSYNC_MAILBOX_ENABLED`: Whether polling runs (defaults to whether a
//!   host is configured)
//! - `STAYSYNC_EVENTS_SCHEDULE`: Cron expression for event processing
//! - `STAYSYNC_EVENTS_ENABLED`: Whether event processing runs (true/false)
//!
//! ## File Locations
//! The loader probes `./config.toml`, `./staysync.toml`, `../config.toml`,
//! and `../staysync.toml`, in that order.

use std::path::{Path, PathBuf};

use staysync_domain::{Config, Result, StaySyncError};

/// Load configuration with automatic fallback strategy.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(err) => {
            tracing::debug!(error = ?err, "environment config incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// `STAYSYNC_DB_PATH` must be present; everything else falls back to the
/// defaults in [`Config`].
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("STAYSYNC_DB_PATH")?;
    if let Some(pool_size) = env_parse::<u32>("STAYSYNC_DB_POOL_SIZE")? {
        config.database.pool_size = pool_size;
    }

    if let Ok(schedule) = std::env::var("STAYSYNC_CALENDAR_SCHEDULE") {
        config.calendar.schedule = schedule;
    }
    if let Some(timeout) = env_parse::<u64>("STAYSYNC_CALENDAR_FETCH_TIMEOUT")? {
        config.calendar.fetch_timeout_seconds = timeout;
    }
    config.calendar.enabled = env_bool("STAYSYNC_CALENDAR_ENABLED", config.calendar.enabled);

    if let Ok(host) = std::env::var("STAYSYNC_MAILBOX_HOST") {
        config.mailbox.host = host;
    }
    if let Some(port) = env_parse::<u16>("STAYSYNC_MAILBOX_PORT")? {
        config.mailbox.port = port;
    }
    if let Ok(username) = std::env::var("STAYSYNC_MAILBOX_USERNAME") {
        config.mailbox.username = username;
    }
    if let Ok(password) = std::env::var("STAYSYNC_MAILBOX_PASSWORD") {
        config.mailbox.password = password;
    }
    if let Ok(schedule) = std::env::var("STAYSYNC_MAILBOX_SCHEDULE") {
        config.mailbox.schedule = schedule;
    }
    if let Some(timeout) = env_parse::<u64>("STAYSYNC_MAILBOX_CONNECT_TIMEOUT")? {
        config.mailbox.connect_timeout_seconds = timeout;
    }
    // Without a host there is nothing to poll.
    config.mailbox.enabled =
        env_bool("STAYSYNC_MAILBOX_ENABLED", !config.mailbox.host.is_empty());

    if let Ok(schedule) = std::env::var("STAYSYNC_EVENTS_SCHEDULE") {
        config.events.schedule = schedule;
    }
    config.events.enabled = env_bool("STAYSYNC_EVENTS_ENABLED", config.events.enabled);

    Ok(config)
}

/// Load configuration from a TOML file, probing default paths when none is
/// given.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => probe_config_paths().ok_or_else(|| {
            StaySyncError::Config(
                "no configuration found: set STAYSYNC_DB_PATH or provide config.toml".into(),
            )
        })?,
    };

    let raw = std::fs::read_to_string(&path).map_err(|err| {
        StaySyncError::Config(format!("failed to read {}: {err}", path.display()))
    })?;

    let config: Config = toml::from_str(&raw).map_err(|err| {
        StaySyncError::Config(format!("invalid config file {}: {err}", path.display()))
    })?;

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    const CANDIDATES: [&str; 4] =
        ["config.toml", "staysync.toml", "../config.toml", "../staysync.toml"];

    CANDIDATES.into_iter().map(PathBuf::from).find(|p| p.is_file())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| StaySyncError::Config(format!("missing environment variable {name}")))
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|err| StaySyncError::Config(format!("invalid {name}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

//! Configuration management

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub calendar: CalendarConfig,
    pub mailbox: MailboxConfig,
    pub events: EventsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Calendar sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Cron expression for the periodic sync job.
    pub schedule: String,
    /// Timeout applied to a single feed fetch, in seconds.
    pub fetch_timeout_seconds: u64,
    pub enabled: bool,
}

/// Mailbox polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Cron expression for the periodic poll job.
    pub schedule: String,
    /// Timeout applied to connecting and selecting the inbox, in seconds.
    pub connect_timeout_seconds: u64,
    pub enabled: bool,
}

/// Event processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Cron expression for the periodic processing job.
    pub schedule: String,
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig { path: "staysync.db".to_string(), pool_size: 8 },
            calendar: CalendarConfig {
                schedule: "0 0 * * * *".to_string(),
                fetch_timeout_seconds: 10,
                enabled: true,
            },
            mailbox: MailboxConfig {
                host: String::new(),
                port: 993,
                username: String::new(),
                password: String::new(),
                schedule: "0 */5 * * * *".to_string(),
                connect_timeout_seconds: 30,
                enabled: true,
            },
            events: EventsConfig { schedule: "0 */5 * * * *".to_string(), enabled: true },
        }
    }
}

//! SQLite-backed implementation of the CalendarSourceRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Row};
use staysync_core::reservations::ports::CalendarSourceRepository;
use staysync_domain::{CalendarSource, NewCalendarSource, Result};
use tracing::debug;
use uuid::Uuid;

use super::manager::SqlitePool;
use super::reservation_repository::timestamp_column;
use crate::errors::InfraError;

const SELECT_COLUMNS: &str = "id, url, platform, active, created_at, updated_at";

/// SQLite implementation of CalendarSourceRepository
pub struct SqliteCalendarSourceRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteCalendarSourceRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CalendarSourceRepository for SqliteCalendarSourceRepository {
    async fn create(&self, source: NewCalendarSource) -> Result<CalendarSource> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let now = Utc::now();
        let id = Uuid::now_v7().to_string();

        conn.execute(
            "INSERT INTO calendar_sources (id, url, platform, active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                source.url,
                source.platform,
                source.active,
                now.timestamp(),
                now.timestamp()
            ],
        )
        .map_err(InfraError::from)?;

        debug!(source_id = %id, platform = %source.platform, "calendar source registered");

        Ok(CalendarSource {
            id,
            url: source.url,
            platform: source.platform,
            active: source.active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_active(&self) -> Result<Vec<CalendarSource>> {
        self.query(&format!(
            "SELECT {SELECT_COLUMNS} FROM calendar_sources WHERE active = 1 ORDER BY created_at"
        ))
    }

    async fn find_all(&self) -> Result<Vec<CalendarSource>> {
        self.query(&format!("SELECT {SELECT_COLUMNS} FROM calendar_sources ORDER BY created_at"))
    }
}

impl SqliteCalendarSourceRepository {
    fn query(&self, sql: &str) -> Result<Vec<CalendarSource>> {
        let conn = self.pool.get().map_err(InfraError::from)?;

        let mut stmt = conn.prepare(sql).map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params![], map_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<CalendarSource> {
    Ok(CalendarSource {
        id: row.get(0)?,
        url: row.get(1)?,
        platform: row.get(2)?,
        active: row.get(3)?,
        created_at: timestamp_column(row.get(4)?, 4)?,
        updated_at: timestamp_column(row.get(5)?, 5)?,
    })
}

//! SQLite-backed implementation of the NotificationEventRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Row};
use staysync_core::reservations::ports::NotificationEventRepository;
use staysync_domain::{
    NewNotificationEvent, NotificationEvent, NotificationKind, Result, StaySyncError,
};
use tracing::debug;
use uuid::Uuid;

use super::manager::SqlitePool;
use super::reservation_repository::{text_column_error, timestamp_column};
use crate::errors::InfraError;

const SELECT_COLUMNS: &str = "id, booking_id, received_at, kind, price, consumed, created_at";

/// SQLite implementation of NotificationEventRepository
pub struct SqliteNotificationEventRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteNotificationEventRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    fn query(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<NotificationEvent>> {
        let conn = self.pool.get().map_err(InfraError::from)?;

        let mut stmt = conn.prepare(sql).map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params, map_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }
}

#[async_trait]
impl NotificationEventRepository for SqliteNotificationEventRepository {
    async fn insert(&self, event: NewNotificationEvent) -> Result<NotificationEvent> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let now = Utc::now();
        let id = Uuid::now_v7().to_string();

        conn.execute(
            "INSERT INTO notification_events
                 (id, booking_id, received_at, kind, price, consumed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                id,
                event.booking_id,
                event.received_at.timestamp(),
                event.kind.as_str(),
                event.price,
                now.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        debug!(
            event_id = %id,
            booking_id = %event.booking_id,
            kind = event.kind.as_str(),
            "notification event stored"
        );

        Ok(NotificationEvent {
            id,
            booking_id: event.booking_id,
            received_at: event.received_at,
            kind: event.kind,
            price: event.price,
            consumed: false,
            created_at: now,
        })
    }

    async fn find_by_booking_id(&self, booking_id: &str) -> Result<Vec<NotificationEvent>> {
        self.query(
            &format!(
                "SELECT {SELECT_COLUMNS} FROM notification_events
                 WHERE booking_id = ?1 ORDER BY received_at"
            ),
            &[&booking_id as &dyn rusqlite::ToSql],
        )
    }

    async fn find_unconsumed(&self) -> Result<Vec<NotificationEvent>> {
        self.query(
            &format!(
                "SELECT {SELECT_COLUMNS} FROM notification_events
                 WHERE consumed = 0 ORDER BY received_at"
            ),
            &[],
        )
    }

    async fn mark_consumed(&self, id: &str) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;

        let changed = conn
            .execute("UPDATE notification_events SET consumed = 1 WHERE id = ?1", params![id])
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(StaySyncError::NotFound(format!("notification event {id}")));
        }

        Ok(())
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<NotificationEvent> {
    let kind_raw: String = row.get(3)?;

    Ok(NotificationEvent {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        received_at: timestamp_column(row.get(2)?, 2)?,
        kind: NotificationKind::parse(&kind_raw)
            .ok_or_else(|| text_column_error(3, format!("unknown event kind '{kind_raw}'")))?,
        price: row.get(4)?,
        consumed: row.get(5)?,
        created_at: timestamp_column(row.get(6)?, 6)?,
    })
}

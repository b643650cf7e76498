//! SQLite-backed implementation of the ReservationRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use staysync_core::reservations::ports::ReservationRepository;
use staysync_domain::{
    NewReservation, Reservation, ReservationKind, ReservationPatch, ReservationStatus, Result,
};
use tracing::debug;
use uuid::Uuid;

use super::manager::SqlitePool;
use crate::errors::InfraError;

const SELECT_COLUMNS: &str = "id, external_id, start_ts, end_ts, price, guest_count, kind, \
                              status, source_id, created_at, updated_at";

/// SQLite implementation of ReservationRepository
pub struct SqliteReservationRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteReservationRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepository {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Reservation>> {
        let conn = self.pool.get().map_err(InfraError::from)?;

        let found = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM reservations WHERE external_id = ?1"),
                params![external_id],
                map_row,
            )
            .optional()
            .map_err(InfraError::from)?;

        Ok(found)
    }

    async fn create(&self, reservation: NewReservation) -> Result<Reservation> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let now = Utc::now();
        let id = Uuid::now_v7().to_string();

        conn.execute(
            "INSERT INTO reservations (
                id, external_id, start_ts, end_ts, price, guest_count,
                kind, status, source_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                reservation.external_id,
                reservation.start.timestamp(),
                reservation.end.timestamp(),
                reservation.price,
                reservation.guest_count,
                reservation.kind.as_str(),
                reservation.status.as_str(),
                reservation.source_id,
                now.timestamp(),
                now.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        debug!(external_id = %reservation.external_id, "reservation created");

        Ok(Reservation {
            id,
            external_id: reservation.external_id,
            start: reservation.start,
            end: reservation.end,
            price: reservation.price,
            guest_count: reservation.guest_count,
            kind: reservation.kind,
            status: reservation.status,
            source_id: reservation.source_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: &str, patch: ReservationPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get().map_err(InfraError::from)?;
        // One transaction per upsert so overlapping writers never observe a
        // partially applied multi-field update.
        let tx = conn.transaction().map_err(InfraError::from)?;

        let existing = tx
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM reservations WHERE id = ?1"),
                params![id],
                map_row,
            )
            .map_err(InfraError::from)?;

        let start = patch.start.unwrap_or(existing.start);
        let end = patch.end.unwrap_or(existing.end);
        let price = patch.price.unwrap_or(existing.price);
        let guest_count = patch.guest_count.unwrap_or(existing.guest_count);
        let kind = patch.kind.unwrap_or(existing.kind);
        let status = patch.status.unwrap_or(existing.status);
        let source_id = patch.source_id.or(existing.source_id);

        tx.execute(
            "UPDATE reservations
                 SET start_ts = ?1, end_ts = ?2, price = ?3, guest_count = ?4,
                     kind = ?5, status = ?6, source_id = ?7, updated_at = ?8
                 WHERE id = ?9",
            params![
                start.timestamp(),
                end.timestamp(),
                price,
                guest_count,
                kind.as_str(),
                status.as_str(),
                source_id,
                Utc::now().timestamp(),
                id,
            ],
        )
        .map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;

        debug!(reservation_id = %id, "reservation updated");
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Reservation>> {
        let conn = self.pool.get().map_err(InfraError::from)?;

        let mut stmt = conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM reservations ORDER BY start_ts ASC"))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![], map_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    let kind_raw: String = row.get(6)?;
    let status_raw: String = row.get(7)?;

    Ok(Reservation {
        id: row.get(0)?,
        external_id: row.get(1)?,
        start: timestamp_column(row.get(2)?, 2)?,
        end: timestamp_column(row.get(3)?, 3)?,
        price: row.get(4)?,
        guest_count: row.get(5)?,
        kind: ReservationKind::parse(&kind_raw)
            .ok_or_else(|| text_column_error(6, format!("unknown kind '{kind_raw}'")))?,
        status: ReservationStatus::parse(&status_raw)
            .ok_or_else(|| text_column_error(7, format!("unknown status '{status_raw}'")))?,
        source_id: row.get(8)?,
        created_at: timestamp_column(row.get(9)?, 9)?,
        updated_at: timestamp_column(row.get(10)?, 10)?,
    })
}

pub(crate) fn timestamp_column(secs: i64, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            format!("timestamp {secs} out of range").into(),
        )
    })
}

pub(crate) fn text_column_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

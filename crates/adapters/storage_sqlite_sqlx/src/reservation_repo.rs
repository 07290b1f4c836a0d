//! `SQLite` implementation of [`ReservationRepository`].
//!
//! Booking and cancelling touch both `reservations` and `schedules`; each runs
//! in one transaction, and booking only succeeds if the conditional status
//! flip matched a row.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use wellbook_app::ports::{ReservationFilter, ReservationRepository};
use wellbook_domain::error::{ConflictError, WellbookError};
use wellbook_domain::id::{ReservationId, ScheduleId};
use wellbook_domain::reservation::Reservation;
use wellbook_domain::time::Timestamp;

use crate::codec::{count, parse, parse_timestamp, timestamp};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Reservation`].
struct Wrapper(Reservation);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Reservation> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let client_id: String = row.try_get("client_id")?;
        let service_variant_id: String = row.try_get("service_variant_id")?;
        let schedule_id: String = row.try_get("schedule_id")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Reservation {
            id: parse(&id)?,
            client_id: parse(&client_id)?,
            service_variant_id: parse(&service_variant_id)?,
            schedule_id: parse(&schedule_id)?,
            notes: row.try_get("notes")?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const CLAIM_SLOT: &str =
    "UPDATE schedules SET status = 'BOOKED' WHERE id = ? AND status = 'AVAILABLE'";
const RELEASE_SLOT: &str = "UPDATE schedules SET status = 'AVAILABLE' WHERE id = ?";
const INSERT: &str = r"
    INSERT INTO reservations (id, client_id, service_variant_id, schedule_id, notes, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM reservations WHERE id = ?";
const SELECT_BY_SCHEDULE: &str = "SELECT * FROM reservations WHERE schedule_id = ?";
const SELECT_FILTERED: &str = r"
    SELECT r.* FROM reservations r
    JOIN schedules s ON s.id = r.schedule_id
    WHERE (?1 IS NULL OR r.client_id = ?1)
      AND (?2 IS NULL OR s.start_time >= ?2)
    ORDER BY r.created_at DESC
";
const SELECT_RECENT: &str = "SELECT * FROM reservations ORDER BY created_at DESC LIMIT ?";
const DELETE_BY_ID: &str = "DELETE FROM reservations WHERE id = ? RETURNING schedule_id";
const COUNT_UPCOMING: &str = r"
    SELECT COUNT(*) FROM reservations r
    JOIN schedules s ON s.id = r.schedule_id
    WHERE s.start_time >= ?
";

/// `SQLite`-backed reservation repository.
#[derive(Clone)]
pub struct SqliteReservationRepository {
    pool: SqlitePool,
}

impl SqliteReservationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReservationRepository for SqliteReservationRepository {
    async fn book(&self, reservation: Reservation) -> Result<Reservation, WellbookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let claimed = sqlx::query(CLAIM_SLOT)
            .bind(reservation.schedule_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        if claimed.rows_affected() == 0 {
            return Err(ConflictError::SlotUnavailable.into());
        }

        sqlx::query(INSERT)
            .bind(reservation.id.to_string())
            .bind(reservation.client_id.to_string())
            .bind(reservation.service_variant_id.to_string())
            .bind(reservation.schedule_id.to_string())
            .bind(&reservation.notes)
            .bind(timestamp(reservation.created_at))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(reservation)
    }

    async fn get_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<Reservation>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_SCHEDULE)
            .bind(schedule_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find(&self, filter: ReservationFilter) -> Result<Vec<Reservation>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FILTERED)
            .bind(filter.client_id.map(|id| id.to_string()))
            .bind(filter.starts_after.map(timestamp))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Reservation>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn cancel(&self, id: ReservationId) -> Result<(), WellbookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let schedule_id: Option<String> = sqlx::query_scalar(DELETE_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        if let Some(schedule_id) = schedule_id {
            sqlx::query(RELEASE_SLOT)
                .bind(schedule_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn count_upcoming(&self, from: Timestamp) -> Result<u64, WellbookError> {
        let total: i64 = sqlx::query_scalar(COUNT_UPCOMING)
            .bind(timestamp(from))
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(count(total))
    }
}

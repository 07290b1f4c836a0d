//! `SQLite` implementation of [`ScheduleRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use wellbook_app::ports::{ScheduleFilter, ScheduleRepository, SlotWindow};
use wellbook_domain::error::WellbookError;
use wellbook_domain::id::ScheduleId;
use wellbook_domain::schedule::Schedule;

use crate::codec::{count, parse, parse_opt, parse_timestamp, timestamp};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Schedule`].
struct Wrapper(Schedule);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Schedule> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let provider_id: String = row.try_get("provider_id")?;
        let cabinet_id: Option<String> = row.try_get("cabinet_id")?;
        let date: String = row.try_get("date")?;
        let start_time: String = row.try_get("start_time")?;
        let end_time: String = row.try_get("end_time")?;
        let status: String = row.try_get("status")?;

        Ok(Self(Schedule {
            id: parse(&id)?,
            provider_id: parse(&provider_id)?,
            cabinet_id: parse_opt(cabinet_id)?,
            date: parse(&date)?,
            start_time: parse_timestamp(&start_time)?,
            end_time: parse_timestamp(&end_time)?,
            status: parse(&status)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO schedules (id, provider_id, cabinet_id, date, start_time, end_time, status)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM schedules WHERE id = ?";
const SELECT_FILTERED: &str = r"
    SELECT * FROM schedules
    WHERE (?1 IS NULL OR provider_id = ?1)
      AND (?2 IS NULL OR cabinet_id = ?2)
      AND (?3 IS NULL OR date = ?3)
    ORDER BY start_time
";
const SELECT_COLLIDING: &str = r"
    SELECT * FROM schedules
    WHERE start_time < ?1 AND ?2 < end_time
      AND (?3 IS NULL OR id != ?3)
      AND (provider_id = ?4 OR (?5 IS NOT NULL AND cabinet_id = ?5))
    ORDER BY start_time
";
const UPDATE: &str = r"
    UPDATE schedules
    SET provider_id = ?, cabinet_id = ?, date = ?, start_time = ?, end_time = ?, status = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM schedules WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM schedules";

/// `SQLite`-backed schedule repository.
#[derive(Clone)]
pub struct SqliteScheduleRepository {
    pool: SqlitePool,
}

impl SqliteScheduleRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScheduleRepository for SqliteScheduleRepository {
    async fn create(&self, schedule: Schedule) -> Result<Schedule, WellbookError> {
        sqlx::query(INSERT)
            .bind(schedule.id.to_string())
            .bind(schedule.provider_id.to_string())
            .bind(schedule.cabinet_id.map(|id| id.to_string()))
            .bind(schedule.date.to_string())
            .bind(timestamp(schedule.start_time))
            .bind(timestamp(schedule.end_time))
            .bind(schedule.status.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(schedule)
    }

    async fn get_by_id(&self, id: ScheduleId) -> Result<Option<Schedule>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find(&self, filter: ScheduleFilter) -> Result<Vec<Schedule>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FILTERED)
            .bind(filter.provider_id.map(|id| id.to_string()))
            .bind(filter.cabinet_id.map(|id| id.to_string()))
            .bind(filter.date.map(|d| d.to_string()))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_colliding(&self, window: SlotWindow) -> Result<Vec<Schedule>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_COLLIDING)
            .bind(timestamp(window.end))
            .bind(timestamp(window.start))
            .bind(window.exclude.map(|id| id.to_string()))
            .bind(window.provider_id.to_string())
            .bind(window.cabinet_id.map(|id| id.to_string()))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, schedule: Schedule) -> Result<Schedule, WellbookError> {
        sqlx::query(UPDATE)
            .bind(schedule.provider_id.to_string())
            .bind(schedule.cabinet_id.map(|id| id.to_string()))
            .bind(schedule.date.to_string())
            .bind(timestamp(schedule.start_time))
            .bind(timestamp(schedule.end_time))
            .bind(schedule.status.to_string())
            .bind(schedule.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(schedule)
    }

    async fn delete(&self, id: ScheduleId) -> Result<(), WellbookError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn count(&self) -> Result<u64, WellbookError> {
        let total: i64 = sqlx::query_scalar(COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(count(total))
    }
}

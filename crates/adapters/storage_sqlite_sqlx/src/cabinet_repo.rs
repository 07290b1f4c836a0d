//! `SQLite` implementation of [`CabinetRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use wellbook_app::ports::CabinetRepository;
use wellbook_domain::cabinet::Cabinet;
use wellbook_domain::error::WellbookError;
use wellbook_domain::id::CabinetId;

use crate::codec::{count, parse};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Cabinet`].
struct Wrapper(Cabinet);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Cabinet> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;

        Ok(Self(Cabinet {
            id: parse(&id)?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            description: row.try_get("description")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO cabinets (id, name, address, description) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM cabinets WHERE id = ?";
const SELECT_BY_NAME: &str = "SELECT * FROM cabinets WHERE name = ?";
const SELECT_ALL: &str = "SELECT * FROM cabinets ORDER BY name";
const UPDATE: &str = "UPDATE cabinets SET name = ?, address = ?, description = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM cabinets WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM cabinets";

/// `SQLite`-backed cabinet repository.
#[derive(Clone)]
pub struct SqliteCabinetRepository {
    pool: SqlitePool,
}

impl SqliteCabinetRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CabinetRepository for SqliteCabinetRepository {
    async fn create(&self, cabinet: Cabinet) -> Result<Cabinet, WellbookError> {
        sqlx::query(INSERT)
            .bind(cabinet.id.to_string())
            .bind(&cabinet.name)
            .bind(&cabinet.address)
            .bind(&cabinet.description)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(cabinet)
    }

    async fn get_by_id(&self, id: CabinetId) -> Result<Option<Cabinet>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Cabinet>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Cabinet>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, cabinet: Cabinet) -> Result<Cabinet, WellbookError> {
        sqlx::query(UPDATE)
            .bind(&cabinet.name)
            .bind(&cabinet.address)
            .bind(&cabinet.description)
            .bind(cabinet.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(cabinet)
    }

    async fn delete(&self, id: CabinetId) -> Result<(), WellbookError> {
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

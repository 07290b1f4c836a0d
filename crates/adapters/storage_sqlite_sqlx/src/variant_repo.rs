//! `SQLite` implementation of [`VariantRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use wellbook_app::ports::VariantRepository;
use wellbook_domain::error::WellbookError;
use wellbook_domain::id::{ServiceId, VariantId};
use wellbook_domain::variant::ServiceVariant;

use crate::codec::parse;
use crate::error::StorageError;

struct Wrapper(ServiceVariant);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ServiceVariant> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let service_id: String = row.try_get("service_id")?;
        let duration_minutes: i64 = row.try_get("duration_minutes")?;

        Ok(Self(ServiceVariant {
            id: parse(&id)?,
            service_id: parse(&service_id)?,
            duration_minutes: u32::try_from(duration_minutes)
                .map_err(|err| sqlx::Error::Decode(Box::new(err)))?,
            price: row.try_get("price")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO service_variants (id, service_id, duration_minutes, price)
    VALUES (?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM service_variants WHERE id = ?";
const SELECT_BY_SERVICE: &str =
    "SELECT * FROM service_variants WHERE service_id = ? ORDER BY duration_minutes, price";
const UPDATE: &str = "UPDATE service_variants SET duration_minutes = ?, price = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM service_variants WHERE id = ?";

/// `SQLite`-backed service variant repository.
#[derive(Clone)]
pub struct SqliteVariantRepository {
    pool: SqlitePool,
}

impl SqliteVariantRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl VariantRepository for SqliteVariantRepository {
    async fn create(&self, variant: ServiceVariant) -> Result<ServiceVariant, WellbookError> {
        sqlx::query(INSERT)
            .bind(variant.id.to_string())
            .bind(variant.service_id.to_string())
            .bind(i64::from(variant.duration_minutes))
            .bind(variant.price)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(variant)
    }

    async fn get_by_id(&self, id: VariantId) -> Result<Option<ServiceVariant>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_service(
        &self,
        service_id: ServiceId,
    ) -> Result<Vec<ServiceVariant>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_SERVICE)
            .bind(service_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, variant: ServiceVariant) -> Result<ServiceVariant, WellbookError> {
        sqlx::query(UPDATE)
            .bind(i64::from(variant.duration_minutes))
            .bind(variant.price)
            .bind(variant.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(variant)
    }

    async fn delete(&self, id: VariantId) -> Result<(), WellbookError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

//! `SQLite` implementation of [`ServiceRepository`].
//!
//! Provider assignments live in the `service_providers` join table and are
//! written in the same transaction as the service row.

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, Sqlite, SqlitePool, Transaction};

use wellbook_app::ports::ServiceRepository;
use wellbook_domain::error::WellbookError;
use wellbook_domain::id::{ServiceId, UserId};
use wellbook_domain::service::Service;

use crate::codec::{count, parse, parse_timestamp, timestamp};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Service`].
///
/// Rows carry no assignments; they are attached afterwards.
struct Wrapper(Service);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Service {
            id: parse(&id)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            provider_ids: Vec::new(),
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

/// One `service_providers` row.
struct Assignment {
    service_id: ServiceId,
    provider_id: UserId,
}

impl<'r> FromRow<'r, SqliteRow> for Assignment {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let service_id: String = row.try_get("service_id")?;
        let provider_id: String = row.try_get("provider_id")?;
        Ok(Self {
            service_id: parse(&service_id)?,
            provider_id: parse(&provider_id)?,
        })
    }
}

const INSERT: &str = r"
    INSERT INTO services (id, name, description, image_url, created_at)
    VALUES (?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM services WHERE id = ?";
const SELECT_BY_NAME: &str = "SELECT * FROM services WHERE name = ?";
const SELECT_ALL: &str = "SELECT * FROM services ORDER BY name";
const SELECT_BY_PROVIDER: &str = r"
    SELECT s.* FROM services s
    JOIN service_providers sp ON sp.service_id = s.id
    WHERE sp.provider_id = ?
    ORDER BY s.name
";
const UPDATE: &str = "UPDATE services SET name = ?, description = ?, image_url = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM services WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM services";

const INSERT_ASSIGNMENT: &str = "INSERT OR IGNORE INTO service_providers (service_id, provider_id) VALUES (?, ?)";
const SELECT_ASSIGNMENTS: &str = "SELECT service_id, provider_id FROM service_providers ORDER BY rowid";
const DELETE_SERVICE_ASSIGNMENTS: &str = "DELETE FROM service_providers WHERE service_id = ?";
const DELETE_PROVIDER_ASSIGNMENTS: &str = "DELETE FROM service_providers WHERE provider_id = ?";

/// `SQLite`-backed service repository.
#[derive(Clone)]
pub struct SqliteServiceRepository {
    pool: SqlitePool,
}

impl SqliteServiceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn with_providers(&self, rows: Vec<Wrapper>) -> Result<Vec<Service>, WellbookError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let assignments: Vec<Assignment> = sqlx::query_as(SELECT_ASSIGNMENTS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let mut by_service: HashMap<ServiceId, Vec<UserId>> = HashMap::new();
        for assignment in assignments {
            by_service
                .entry(assignment.service_id)
                .or_default()
                .push(assignment.provider_id);
        }

        Ok(rows
            .into_iter()
            .map(|Wrapper(mut service)| {
                service.provider_ids = by_service.remove(&service.id).unwrap_or_default();
                service
            })
            .collect())
    }

    async fn fetch_one(&self, query: &str, value: &str) -> Result<Option<Service>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(self
            .with_providers(row.into_iter().collect())
            .await?
            .pop())
    }
}

async fn insert_assignments(
    tx: &mut Transaction<'_, Sqlite>,
    service_id: ServiceId,
    provider_ids: &[UserId],
) -> Result<(), StorageError> {
    for provider_id in provider_ids {
        sqlx::query(INSERT_ASSIGNMENT)
            .bind(service_id.to_string())
            .bind(provider_id.to_string())
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

impl ServiceRepository for SqliteServiceRepository {
    async fn create(&self, service: Service) -> Result<Service, WellbookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(INSERT)
            .bind(service.id.to_string())
            .bind(&service.name)
            .bind(&service.description)
            .bind(&service.image_url)
            .bind(timestamp(service.created_at))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        insert_assignments(&mut tx, service.id, &service.provider_ids).await?;
        tx.commit().await.map_err(StorageError::from)?;

        Ok(service)
    }

    async fn get_by_id(&self, id: ServiceId) -> Result<Option<Service>, WellbookError> {
        self.fetch_one(SELECT_BY_ID, &id.to_string()).await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Service>, WellbookError> {
        self.fetch_one(SELECT_BY_NAME, name).await
    }

    async fn get_all(&self) -> Result<Vec<Service>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        self.with_providers(rows).await
    }

    async fn find_by_provider(&self, provider_id: UserId) -> Result<Vec<Service>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_PROVIDER)
            .bind(provider_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        self.with_providers(rows).await
    }

    async fn update(&self, service: Service) -> Result<Service, WellbookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(UPDATE)
            .bind(&service.name)
            .bind(&service.description)
            .bind(&service.image_url)
            .bind(service.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        sqlx::query(DELETE_SERVICE_ASSIGNMENTS)
            .bind(service.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        insert_assignments(&mut tx, service.id, &service.provider_ids).await?;
        tx.commit().await.map_err(StorageError::from)?;

        Ok(service)
    }

    async fn assign_provider(
        &self,
        provider_id: UserId,
        service_ids: &[ServiceId],
    ) -> Result<(), WellbookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(DELETE_PROVIDER_ASSIGNMENTS)
            .bind(provider_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        for service_id in service_ids {
            insert_assignments(&mut tx, *service_id, &[provider_id]).await?;
        }
        tx.commit().await.map_err(StorageError::from)?;

        Ok(())
    }

    async fn delete(&self, id: ServiceId) -> Result<(), WellbookError> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{setup, user};
    use wellbook_app::ports::{ReservationRepository, UserRepository, VariantRepository};
    use wellbook_domain::error::ConflictError;
    use wellbook_domain::reservation::Reservation;
    use wellbook_domain::user::Role;
    use wellbook_domain::variant::ServiceVariant;

    fn yoga(providers: &[UserId]) -> Service {
        Service::builder()
            .name("Yoga")
            .description("Gentle stretching")
            .image_url("https://images.example.com/yoga.jpg")
            .providers(providers.iter().copied())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_service_with_providers() {
        let repos = setup().await;
        let anna = user(&repos, "anna@example.com", Role::Provider).await;
        let service = repos.services.create(yoga(&[anna.id])).await.unwrap();

        let fetched = repos.services.get_by_id(service.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Yoga");
        assert_eq!(fetched.provider_ids, vec![anna.id]);
        assert_eq!(
            fetched.image_url.as_deref(),
            Some("https://images.example.com/yoga.jpg")
        );

        let by_name = repos.services.get_by_name("Yoga").await.unwrap().unwrap();
        assert_eq!(by_name.id, service.id);
    }

    #[tokio::test]
    async fn should_replace_assignments_on_update() {
        let repos = setup().await;
        let anna = user(&repos, "anna@example.com", Role::Provider).await;
        let bob = user(&repos, "bob@example.com", Role::Provider).await;
        let mut service = repos.services.create(yoga(&[anna.id])).await.unwrap();

        service.provider_ids = vec![bob.id];
        service.name = "Hot Yoga".to_string();
        repos.services.update(service.clone()).await.unwrap();

        let fetched = repos.services.get_by_id(service.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Hot Yoga");
        assert_eq!(fetched.provider_ids, vec![bob.id]);
        assert!(repos.services.find_by_provider(anna.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reassign_provider_across_services() {
        let repos = setup().await;
        let anna = user(&repos, "anna@example.com", Role::Provider).await;
        let yoga = repos.services.create(yoga(&[anna.id])).await.unwrap();
        let spa = repos
            .services
            .create(Service::builder().name("Spa").build().unwrap())
            .await
            .unwrap();

        repos
            .services
            .assign_provider(anna.id, &[spa.id])
            .await
            .unwrap();

        let offered = repos.services.find_by_provider(anna.id).await.unwrap();
        assert_eq!(offered.len(), 1);
        assert_eq!(offered[0].id, spa.id);
        let yoga = repos.services.get_by_id(yoga.id).await.unwrap().unwrap();
        assert!(yoga.provider_ids.is_empty());
    }

    #[tokio::test]
    async fn should_drop_assignments_when_provider_is_deleted() {
        let repos = setup().await;
        let anna = user(&repos, "anna@example.com", Role::Provider).await;
        let service = repos.services.create(yoga(&[anna.id])).await.unwrap();

        repos.users.delete(anna.id).await.unwrap();

        let fetched = repos.services.get_by_id(service.id).await.unwrap().unwrap();
        assert!(fetched.provider_ids.is_empty());
    }

    #[tokio::test]
    async fn should_reject_duplicate_name() {
        let repos = setup().await;
        repos.services.create(yoga(&[])).await.unwrap();
        let result = repos.services.create(yoga(&[])).await;
        assert!(matches!(
            result,
            Err(WellbookError::Conflict(ConflictError::Duplicate { .. }))
        ));
    }

    #[tokio::test]
    async fn should_cascade_variants_on_delete() {
        let repos = setup().await;
        let service = repos.services.create(yoga(&[])).await.unwrap();
        let variant = repos
            .variants
            .create(ServiceVariant::new(service.id, 60, 40.0).unwrap())
            .await
            .unwrap();

        repos.services.delete(service.id).await.unwrap();

        assert!(repos.services.get_by_id(service.id).await.unwrap().is_none());
        assert!(repos.variants.get_by_id(variant.id).await.unwrap().is_none());
        assert_eq!(repos.services.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn should_refuse_delete_while_a_variant_is_reserved() {
        let repos = setup().await;
        let anna = user(&repos, "anna@example.com", Role::Provider).await;
        let client = user(&repos, "c@example.com", Role::Client).await;
        let service = repos.services.create(yoga(&[anna.id])).await.unwrap();
        let variant = repos
            .variants
            .create(ServiceVariant::new(service.id, 60, 40.0).unwrap())
            .await
            .unwrap();
        let slot = crate::testing::slot(&repos, anna.id, crate::testing::at(9)).await;
        repos
            .reservations
            .book(Reservation::new(client.id, variant.id, slot.id, None))
            .await
            .unwrap();

        let result = repos.services.delete(service.id).await;
        assert!(matches!(
            result,
            Err(WellbookError::Conflict(ConflictError::InUse))
        ));
    }
}

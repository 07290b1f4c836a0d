//! `SQLite` implementation of [`UserRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use wellbook_app::ports::UserRepository;
use wellbook_domain::error::WellbookError;
use wellbook_domain::id::UserId;
use wellbook_domain::user::{Role, User};

use crate::codec::{count, parse, parse_opt, parse_timestamp, timestamp};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`User`].
struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let role: String = row.try_get("role")?;
        let date_of_birth: Option<String> = row.try_get("date_of_birth")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(User {
            id: parse(&id)?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            name: row.try_get("name")?,
            role: parse(&role)?,
            phone: row.try_get("phone")?,
            date_of_birth: parse_opt(date_of_birth)?,
            gender: row.try_get("gender")?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (id, email, password_hash, name, role, phone, date_of_birth, gender, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM users WHERE email = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY created_at DESC";
const SELECT_BY_ROLE: &str = "SELECT * FROM users WHERE role = ? ORDER BY name";
const UPDATE: &str = r"
    UPDATE users
    SET email = ?, password_hash = ?, name = ?, role = ?, phone = ?, date_of_birth = ?, gender = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM users";
const COUNT_BY_ROLE: &str = "SELECT COUNT(*) FROM users WHERE role = ?";

/// `SQLite`-backed user repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: User) -> Result<User, WellbookError> {
        sqlx::query(INSERT)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.role.to_string())
            .bind(&user.phone)
            .bind(user.date_of_birth.map(|d| d.to_string()))
            .bind(&user.gender)
            .bind(timestamp(user.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, WellbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<User>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>, WellbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ROLE)
            .bind(role.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, user: User) -> Result<User, WellbookError> {
        sqlx::query(UPDATE)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.role.to_string())
            .bind(&user.phone)
            .bind(user.date_of_birth.map(|d| d.to_string()))
            .bind(&user.gender)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), WellbookError> {
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

    async fn count_by_role(&self, role: Role) -> Result<u64, WellbookError> {
        let total: i64 = sqlx::query_scalar(COUNT_BY_ROLE)
            .bind(role.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(count(total))
    }
}

//! `SQLite` connection pool setup and migration runner.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;
use crate::{
    SqliteCabinetRepository, SqliteReservationRepository, SqliteScheduleRepository,
    SqliteServiceRepository, SqliteUserRepository, SqliteVariantRepository,
};

/// Configuration for the `SQLite` storage adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:wellbook.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and runs all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self.database_url).await
    }
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    async fn initialize(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(database_url, "database ready");

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every repository over this pool.
    #[must_use]
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: SqliteUserRepository::new(self.pool.clone()),
            services: SqliteServiceRepository::new(self.pool.clone()),
            variants: SqliteVariantRepository::new(self.pool.clone()),
            cabinets: SqliteCabinetRepository::new(self.pool.clone()),
            schedules: SqliteScheduleRepository::new(self.pool.clone()),
            reservations: SqliteReservationRepository::new(self.pool.clone()),
        }
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// One handle per repository port, all sharing the same pool.
#[derive(Clone)]
pub struct Repositories {
    pub users: SqliteUserRepository,
    pub services: SqliteServiceRepository,
    pub variants: SqliteVariantRepository,
    pub cabinets: SqliteCabinetRepository,
    pub schedules: SqliteScheduleRepository,
    pub reservations: SqliteReservationRepository,
}

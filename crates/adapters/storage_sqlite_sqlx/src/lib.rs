//! # wellbook-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `wellbook-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `wellbook-app` (for port traits) and `wellbook-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod codec;
pub mod error;
pub mod pool;

mod cabinet_repo;
mod reservation_repo;
mod schedule_repo;
mod service_repo;
mod user_repo;
mod variant_repo;

pub use cabinet_repo::SqliteCabinetRepository;
pub use reservation_repo::SqliteReservationRepository;
pub use schedule_repo::SqliteScheduleRepository;
pub use service_repo::SqliteServiceRepository;
pub use user_repo::SqliteUserRepository;
pub use variant_repo::SqliteVariantRepository;

#[cfg(test)]
mod testing;

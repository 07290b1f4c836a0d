//! # wellbookd
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Seed the reference data on first start
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router and serve it until SIGTERM/SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

pub mod config;
pub mod seed;

use chrono::Duration;
use wellbook_adapter_auth_jwt::{BcryptHasher, JwtTokenIssuer};
use wellbook_adapter_http_axum::state::{Adapters, AppState, Backend};
use wellbook_adapter_storage_sqlite_sqlx::pool::Repositories;
use wellbook_adapter_storage_sqlite_sqlx::{
    SqliteCabinetRepository, SqliteReservationRepository, SqliteScheduleRepository,
    SqliteServiceRepository, SqliteUserRepository, SqliteVariantRepository,
};

use crate::config::AuthConfig;

/// Production backend: `SQLite` repositories, bcrypt hashes and HS256 tokens.
pub struct SqliteBackend;

impl Backend for SqliteBackend {
    type Users = SqliteUserRepository;
    type Services = SqliteServiceRepository;
    type Variants = SqliteVariantRepository;
    type Cabinets = SqliteCabinetRepository;
    type Schedules = SqliteScheduleRepository;
    type Reservations = SqliteReservationRepository;
    type Hasher = BcryptHasher;
    type Tokens = JwtTokenIssuer;
}

/// Build the password hasher described by `auth`.
#[must_use]
pub fn hasher(auth: &AuthConfig) -> BcryptHasher {
    BcryptHasher::new(auth.bcrypt_cost)
}

/// Assemble the HTTP application state over a set of repositories.
#[must_use]
pub fn app_state(repos: Repositories, auth: &AuthConfig) -> AppState<SqliteBackend> {
    AppState::new(Adapters {
        users: repos.users,
        services: repos.services,
        variants: repos.variants,
        cabinets: repos.cabinets,
        schedules: repos.schedules,
        reservations: repos.reservations,
        hasher: hasher(auth),
        tokens: JwtTokenIssuer::new(
            &auth.jwt_secret,
            Duration::minutes(i64::from(auth.token_ttl_minutes)),
        ),
    })
}

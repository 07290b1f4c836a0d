//! # wellbook-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository`, `ServiceRepository`, `VariantRepository`,
//!     `CabinetRepository`, `ScheduleRepository`, `ReservationRepository`
//!   - `PasswordHasher` and `TokenIssuer` for credentials
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AuthService`: register, login, authenticate bearer tokens
//!   - `CatalogService`, `CabinetService`, `ProviderService`: admin CRUD
//!   - `ScheduleService`, `ReservationService`: slot consistency and booking
//!   - `StatisticsService`: admin dashboard counters
//! - Assemble **read models** (`views`) that join several aggregates
//!
//! ## Dependency rule
//! Depends on `wellbook-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod auth_service;
pub mod cabinet_service;
pub mod catalog_service;
pub mod provider_service;
pub mod reservation_service;
pub mod schedule_service;
pub mod statistics_service;
pub mod user_service;

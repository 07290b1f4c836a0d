//! # wellbook-domain
//!
//! Pure domain model for the wellbook wellness-booking system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Users** (admins, providers and clients) and their roles
//! - Define the **catalog**: Services and their priced Variants
//! - Define **Cabinets** (rooms where sessions happen)
//! - Define **Schedules** (provider time slots) and **Reservations**
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod cabinet;
pub mod reservation;
pub mod schedule;
pub mod service;
pub mod session;
pub mod user;
pub mod variant;

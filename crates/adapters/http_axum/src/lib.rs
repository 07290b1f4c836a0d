//! # wellbook-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON REST API** consumed by the booking frontend
//!   (`/auth/*`, `/services`, `/client/*`, `/admin/*`)
//! - Authenticate bearer tokens and gate routes by role
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into JSON responses
//!
//! ## Dependency rule
//! Depends on `wellbook-app` (for port traits and services) and `wellbook-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod auth;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;

//! # wellbook-adapter-auth-jwt
//!
//! Credential adapter built on [bcrypt](https://docs.rs/bcrypt) and
//! [jsonwebtoken](https://docs.rs/jsonwebtoken).
//!
//! ## Responsibilities
//! - Implement [`PasswordHasher`](wellbook_app::ports::PasswordHasher) with bcrypt
//! - Implement [`TokenIssuer`](wellbook_app::ports::TokenIssuer) with HS256-signed JWTs
//!
//! ## Dependency rule
//! Depends on `wellbook-app` (for port traits) and `wellbook-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;

mod hasher;
mod jwt;

pub use hasher::BcryptHasher;
pub use jwt::JwtTokenIssuer;

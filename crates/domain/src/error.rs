//! Common error types used across the workspace.
//!
//! Every layer defines its own typed errors and converts into
//! [`WellbookError`] via `#[from]`; there are no stringly-typed variants
//! at this level.

/// Top-level error returned by domain logic, services and ports.
#[derive(Debug, thiserror::Error)]
pub enum WellbookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Opaque failure from a persistence adapter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Opaque failure from any other adapter (hashing, token signing).
    #[error("internal error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// An input breaks a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,

    #[error("email is invalid")]
    InvalidEmail,

    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("image url must be an absolute http(s) url")]
    InvalidImageUrl,

    #[error("duration must be at least one minute")]
    InvalidDuration,

    #[error("price must be a non-negative amount")]
    InvalidPrice,

    #[error("start time must be before end time")]
    InvalidTimeRange,

    #[error("invalid provider")]
    InvalidProvider,

    #[error("invalid cabinet")]
    InvalidCabinet,

    #[error("invalid client")]
    InvalidClient,

    #[error("provider does not offer this service")]
    ServiceNotOffered,

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A write collides with existing data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("{entity} already exists")]
    Duplicate { entity: &'static str },

    #[error("schedule overlaps an existing slot")]
    SlotOverlap,

    #[error("schedule slot is not available")]
    SlotUnavailable,

    #[error("schedule slot holds a reservation")]
    SlotReserved,

    #[error("schedule slot has already started")]
    SlotStarted,

    #[error("resource is still referenced")]
    InUse,
}

/// Authentication or authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no token provided")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("forbidden: insufficient role")]
    Forbidden,
}

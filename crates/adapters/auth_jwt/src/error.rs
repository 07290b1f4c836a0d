//! Credential-specific error type wrapping bcrypt, tokio task and jsonwebtoken errors.

use wellbook_domain::error::WellbookError;

/// Errors originating from hashing or token signing.
#[derive(Debug, thiserror::Error)]
pub enum AuthAdapterError {
    /// bcrypt failed to hash, or a stored hash is malformed.
    #[error("password hashing error")]
    Bcrypt(#[from] bcrypt::BcryptError),

    /// The blocking hashing task panicked or was cancelled.
    #[error("password hashing task failed")]
    Task(#[from] tokio::task::JoinError),

    /// A token could not be signed.
    #[error("token signing error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<AuthAdapterError> for WellbookError {
    fn from(err: AuthAdapterError) -> Self {
        tracing::error!(error = ?err, "credential failure");
        Self::Internal(Box::new(err))
    }
}

//! Credential ports: password hashing and bearer-token issuance.
//!
//! Hashing is async so adapters can move the CPU-bound work off the
//! executor. Token signing is cheap and stays synchronous.

use wellbook_domain::error::WellbookError;
use wellbook_domain::session::Session;
use wellbook_domain::time::Timestamp;
use wellbook_domain::user::User;

/// One-way password hashing.
pub trait PasswordHasher {
    /// Hash a clear-text password for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying algorithm fails.
    fn hash(&self, password: &str)
    -> impl Future<Output = Result<String, WellbookError>> + Send;

    /// Check a clear-text password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored hash is malformed.
    fn verify(
        &self,
        password: &str,
        hash: &str,
    ) -> impl Future<Output = Result<bool, WellbookError>> + Send;
}

/// A freshly signed bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Issues and verifies bearer tokens.
pub trait TokenIssuer {
    /// Sign a token for `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    fn issue(&self, user: &User) -> Result<IssuedToken, WellbookError>;

    /// Verify a token and return the session it carries.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`](wellbook_domain::error::AuthError::InvalidToken)
    /// or [`AuthError::TokenExpired`](wellbook_domain::error::AuthError::TokenExpired).
    fn verify(&self, token: &str) -> Result<Session, WellbookError>;
}

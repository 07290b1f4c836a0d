//! Auth service: registration, login and bearer-token authentication.

use serde::{Deserialize, Serialize};

use wellbook_domain::error::{AuthError, ConflictError, WellbookError};
use wellbook_domain::session::Session;
use wellbook_domain::time::Timestamp;
use wellbook_domain::user::{Role, User, check_password, normalize_email};

use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

/// Self-service sign-up payload.
#[derive(Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
}

/// A signed token together with the user it was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: Timestamp,
    pub user: User,
}

/// Application service for credentials and sessions.
pub struct AuthService<U, H, T> {
    users: U,
    hasher: H,
    tokens: T,
}

impl<U, H, T> AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    /// Create a new service from its ports.
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a client or provider account.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Forbidden`] when asking for the `ADMIN` role
    /// - [`WellbookError::Validation`] for a malformed e-mail or short password
    /// - [`ConflictError::Duplicate`] when the e-mail is taken
    #[tracing::instrument(skip(self, account), fields(email = %account.email))]
    pub async fn register(&self, account: NewAccount) -> Result<User, WellbookError> {
        let role = account.role.unwrap_or(Role::Client);
        if role == Role::Admin {
            return Err(AuthError::Forbidden.into());
        }
        check_password(&account.password)?;

        let mut builder = User::builder().email(&account.email).role(role);
        if let Some(name) = account.name {
            builder = builder.name(name);
        }
        if let Some(phone) = account.phone.filter(|p| !p.trim().is_empty()) {
            builder = builder.phone(phone);
        }
        let mut user = builder.build()?;

        if self.users.get_by_email(&user.email).await?.is_some() {
            return Err(ConflictError::Duplicate { entity: "User" }.into());
        }
        user.password_hash = self.hasher.hash(&account.password).await?;
        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "account registered");
        Ok(user)
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown e-mail or a
    /// wrong password; both look the same to the caller.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken, WellbookError> {
        let Some(user) = self.users.get_by_email(&normalize_email(email)).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };
        if !self.hasher.verify(password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }
        let issued = self.tokens.issue(&user)?;
        Ok(AuthToken {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    /// Verify a bearer token and check its user still exists.
    ///
    /// The returned session carries the role currently stored, not the one
    /// baked into the token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] or [`AuthError::TokenExpired`].
    pub async fn authenticate(&self, token: &str) -> Result<Session, WellbookError> {
        let session = self.tokens.verify(token)?;
        let user = self
            .users
            .get_by_id(session.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        Ok(Session {
            user_id: user.id,
            role: user.role,
            expires_at: session.expires_at,
        })
    }

    /// Load the profile behind a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the user has since been deleted.
    pub async fn me(&self, session: &Session) -> Result<User, WellbookError> {
        self.users
            .get_by_id(session.user_id)
            .await?
            .ok_or_else(|| AuthError::InvalidToken.into())
    }
}

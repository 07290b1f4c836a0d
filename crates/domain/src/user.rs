//! User: anyone holding credentials: admins, providers and clients.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WellbookError};
use crate::id::UserId;
use crate::time::{Date, Timestamp, now};

/// Minimum accepted length for a clear-text password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Access level attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Provider,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("ADMIN"),
            Self::Provider => f.write_str("PROVIDER"),
            Self::Client => f.write_str("CLIENT"),
        }
    }
}

/// Returned when a stored role string is not one of the known roles.
#[derive(Debug, thiserror::Error)]
#[error("unknown role {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "PROVIDER" => Ok(Self::Provider),
            "CLIENT" => Ok(Self::Client),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A user account.
///
/// The password hash never leaves the process: it is skipped by serde so a
/// `User` can be returned from the API as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub name: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub created_at: Timestamp,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] when:
    /// - `email` is not shaped like an address ([`ValidationError::InvalidEmail`])
    /// - `name` is present but blank ([`ValidationError::EmptyName`])
    pub fn validate(&self) -> Result<(), WellbookError> {
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// The small projection of a user embedded in other resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
}

/// Canonical form of an e-mail address: trimmed and lowercased.
///
/// Addresses are stored and looked up in this form, so `Jane@Example.com`
/// and `jane@example.com` name the same account.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Loose `local@domain.tld` check; deliverability is not our concern.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

/// Check a clear-text password against the minimum length policy.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordTooShort`] when the password is too short.
pub fn check_password(password: &str) -> Result<(), WellbookError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        }
        .into());
    }
    Ok(())
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    email: Option<String>,
    password_hash: Option<String>,
    name: Option<String>,
    role: Option<Role>,
    phone: Option<String>,
    date_of_birth: Option<Date>,
    gender: Option<String>,
    created_at: Option<Timestamp>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl AsRef<str>) -> Self {
        self.email = Some(normalize_email(email.as_ref()));
        self
    }

    #[must_use]
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn date_of_birth(mut self, date: Date) -> Self {
        self.date_of_birth = Some(date);
        self
    }

    #[must_use]
    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// The role defaults to [`Role::Client`].
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] if the e-mail is missing or malformed,
    /// or if a blank name was given.
    pub fn build(self) -> Result<User, WellbookError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password_hash: self.password_hash.unwrap_or_default(),
            name: self.name,
            role: self.role.unwrap_or(Role::Client),
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            created_at: self.created_at.unwrap_or_else(now),
        };
        user.validate()?;
        Ok(user)
    }
}

//! User service: read access to accounts for administrators.

use wellbook_domain::error::{NotFoundError, ValidationError, WellbookError};
use wellbook_domain::id::UserId;
use wellbook_domain::user::{Role, User};

use crate::ports::UserRepository;

/// Application service for user look-ups.
pub struct UserService<U> {
    users: U,
}

impl<U: UserRepository> UserService<U> {
    /// Create a new service backed by the given repository.
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// List every account, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_users(&self) -> Result<Vec<User>, WellbookError> {
        let mut users = self.users.get_all().await?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    /// Look up any account by id.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when no user with `id` exists.
    pub async fn get_user(&self, id: UserId) -> Result<User, WellbookError> {
        self.users.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Look up an account that must hold the `CLIENT` role.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidClient`] when the user is missing or
    /// is not a client.
    pub async fn get_client(&self, id: UserId) -> Result<User, WellbookError> {
        match self.users.get_by_id(id).await? {
            Some(user) if user.role == Role::Client => Ok(user),
            _ => Err(ValidationError::InvalidClient.into()),
        }
    }
}

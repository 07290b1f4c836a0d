//! Session: the identity carried by a verified bearer token.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, WellbookError};
use crate::id::UserId;
use crate::time::Timestamp;
use crate::user::Role;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: Timestamp,
}

impl Session {
    /// Ensure the caller holds one of `roles`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] otherwise.
    pub fn require_any(&self, roles: &[Role]) -> Result<(), WellbookError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_allow_listed_role_and_forbid_others() {
        let session = Session {
            user_id: UserId::new(),
            role: Role::Provider,
            expires_at: now(),
        };
        assert!(session.require_any(&[Role::Admin, Role::Provider]).is_ok());
        assert!(matches!(
            session.require_any(&[Role::Admin]),
            Err(WellbookError::Auth(AuthError::Forbidden))
        ));
    }
}

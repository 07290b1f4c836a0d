//! bcrypt implementation of [`PasswordHasher`].
//!
//! bcrypt is deliberately slow, so every call runs on tokio's blocking pool
//! instead of an executor thread.

use wellbook_app::ports::PasswordHasher;
use wellbook_domain::error::WellbookError;

use crate::error::AuthAdapterError;

/// Hashes passwords with bcrypt at a fixed cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the given work factor (4..=31).
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> Result<String, WellbookError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(AuthAdapterError::from)?
            .map_err(AuthAdapterError::from)?;
        Ok(hashed)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, WellbookError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(AuthAdapterError::from)?
            .map_err(AuthAdapterError::from)?;
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[tokio::test]
    async fn should_verify_matching_password_only() {
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("secret123").await.unwrap();

        assert!(hash.starts_with("$2"));
        assert_ne!(hash, "secret123");
        assert!(hasher.verify("secret123", &hash).await.unwrap());
        assert!(!hasher.verify("secret124", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn should_salt_each_hash() {
        let hasher = BcryptHasher::new(4);
        assert_ne!(
            hasher.hash("secret123").await.unwrap(),
            hasher.hash("secret123").await.unwrap()
        );
    }

    #[tokio::test]
    async fn should_fail_on_malformed_hash() {
        let result = BcryptHasher::new(4).verify("secret123", "not-a-hash").await;
        assert!(matches!(result, Err(WellbookError::Internal(_))));
    }

    #[tokio::test]
    async fn should_fail_on_out_of_range_cost() {
        let result = BcryptHasher::new(99).hash("secret123").await;
        assert!(matches!(result, Err(WellbookError::Internal(_))));
    }

    #[tokio::test]
    async fn should_leave_executor_free_while_hashing() {
        let hasher = BcryptHasher::new(10);
        let order = RefCell::new(Vec::new());

        tokio::join!(
            async {
                hasher.hash("secret123").await.unwrap();
                order.borrow_mut().push("hashed");
            },
            async {
                order.borrow_mut().push("other task");
            },
        );

        assert_eq!(order.into_inner(), vec!["other task", "hashed"]);
    }
}

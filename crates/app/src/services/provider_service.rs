//! Provider service: staff accounts and the services they deliver.

use std::fmt;

use serde::Deserialize;

use wellbook_domain::error::{ConflictError, NotFoundError, ValidationError, WellbookError};
use wellbook_domain::id::{ServiceId, UserId};
use wellbook_domain::service::ServiceSummary;
use wellbook_domain::user::{Role, User, check_password};

use crate::ports::{PasswordHasher, ServiceRepository, UserRepository};
use crate::views::ProviderDetail;

/// Body of a provider create or update.
#[derive(Clone, Deserialize)]
pub struct ProviderInput {
    pub email: String,
    /// Required on create; on update, `None` keeps the current password.
    pub password: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    /// On update, `None` keeps the current assignments.
    pub service_ids: Option<Vec<ServiceId>>,
}

impl fmt::Debug for ProviderInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderInput")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("service_ids", &self.service_ids)
            .finish_non_exhaustive()
    }
}

/// Application service for provider administration.
pub struct ProviderService<U, S, H> {
    users: U,
    services: S,
    hasher: H,
}

impl<U, S, H> ProviderService<U, S, H>
where
    U: UserRepository,
    S: ServiceRepository,
    H: PasswordHasher,
{
    /// Create a new service from its ports.
    pub fn new(users: U, services: S, hasher: H) -> Self {
        Self {
            users,
            services,
            hasher,
        }
    }

    /// Create a provider account and assign it to services.
    ///
    /// # Errors
    ///
    /// - [`WellbookError::Validation`] for a blank name, a malformed e-mail,
    ///   a missing or short password, or an unknown service id
    /// - [`ConflictError::Duplicate`] when the e-mail is taken
    ///
    /// The account is removed again when its services cannot be assigned.
    #[tracing::instrument(skip(self))]
    pub async fn create_provider(&self, input: ProviderInput) -> Result<ProviderDetail, WellbookError> {
        let password = input.password.as_deref().unwrap_or_default();
        check_password(password)?;
        let mut user = build(UserId::new(), &input)?;
        let service_ids = input.service_ids.unwrap_or_default();
        self.check_services(&service_ids).await?;

        if self.users.get_by_email(&user.email).await?.is_some() {
            return Err(ConflictError::Duplicate { entity: "User" }.into());
        }
        user.password_hash = self.hasher.hash(password).await?;
        let user = self.users.create(user).await?;
        if let Err(err) = self.services.assign_provider(user.id, &service_ids).await {
            tracing::warn!(provider_id = %user.id, error = %err, "service assignment failed, removing provider");
            if let Err(cleanup) = self.users.delete(user.id).await {
                tracing::error!(provider_id = %user.id, error = %cleanup, "failed to remove orphan provider");
            }
            return Err(err);
        }
        tracing::info!(provider_id = %user.id, "provider created");
        self.detail(user).await
    }

    /// Look up a provider with its services.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when `id` is not a provider.
    pub async fn get_provider(&self, id: UserId) -> Result<ProviderDetail, WellbookError> {
        let user = self.find_provider(id).await?;
        self.detail(user).await
    }

    /// List every provider with its services, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn list_providers(&self) -> Result<Vec<ProviderDetail>, WellbookError> {
        let mut providers = self.users.find_by_role(Role::Provider).await?;
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        let mut details = Vec::with_capacity(providers.len());
        for provider in providers {
            details.push(self.detail(provider).await?);
        }
        Ok(details)
    }

    /// Update a provider's profile, and optionally its password and services.
    ///
    /// # Errors
    ///
    /// Same as [`create_provider`](Self::create_provider), plus
    /// [`WellbookError::NotFound`] when `id` is not a provider.
    #[tracing::instrument(skip(self))]
    pub async fn update_provider(
        &self,
        id: UserId,
        input: ProviderInput,
    ) -> Result<ProviderDetail, WellbookError> {
        let current = self.find_provider(id).await?;
        let mut user = build(id, &input)?;
        user.created_at = current.created_at;
        user.date_of_birth = current.date_of_birth;
        user.gender = current.gender;
        user.password_hash = match input.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => {
                check_password(password)?;
                self.hasher.hash(password).await?
            }
            None => current.password_hash,
        };
        if let Some(ids) = &input.service_ids {
            self.check_services(ids).await?;
        }
        if let Some(other) = self.users.get_by_email(&user.email).await? {
            if other.id != id {
                return Err(ConflictError::Duplicate { entity: "User" }.into());
            }
        }

        let user = self.users.update(user).await?;
        if let Some(ids) = &input.service_ids {
            self.services.assign_provider(id, ids).await?;
        }
        self.detail(user).await
    }

    /// Delete a provider account.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when `id` is not a provider, or
    /// [`ConflictError::InUse`] while slots still belong to it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_provider(&self, id: UserId) -> Result<(), WellbookError> {
        self.find_provider(id).await?;
        self.users.delete(id).await
    }

    async fn find_provider(&self, id: UserId) -> Result<User, WellbookError> {
        match self.users.get_by_id(id).await? {
            Some(user) if user.role == Role::Provider => Ok(user),
            _ => Err(NotFoundError {
                entity: "Provider",
                id: id.to_string(),
            }
            .into()),
        }
    }

    async fn check_services(&self, ids: &[ServiceId]) -> Result<(), WellbookError> {
        for id in ids {
            if self.services.get_by_id(*id).await?.is_none() {
                return Err(ValidationError::InvalidIdentifier(id.to_string()).into());
            }
        }
        Ok(())
    }

    async fn detail(&self, provider: User) -> Result<ProviderDetail, WellbookError> {
        let services = self
            .services
            .find_by_provider(provider.id)
            .await?
            .iter()
            .map(ServiceSummary::from)
            .collect();
        Ok(ProviderDetail { provider, services })
    }
}

fn build(id: UserId, input: &ProviderInput) -> Result<User, WellbookError> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    let mut builder = User::builder()
        .id(id)
        .email(&input.email)
        .name(input.name.trim())
        .role(Role::Provider);
    if let Some(phone) = input.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        builder = builder.phone(phone);
    }
    builder.build()
}

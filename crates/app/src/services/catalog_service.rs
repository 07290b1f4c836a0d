//! Catalog service: services, their variants and provider assignments.

use serde::Deserialize;

use wellbook_domain::error::{ConflictError, NotFoundError, ValidationError, WellbookError};
use wellbook_domain::id::{ServiceId, UserId, VariantId};
use wellbook_domain::service::Service;
use wellbook_domain::user::Role;
use wellbook_domain::variant::ServiceVariant;

use crate::ports::{ServiceRepository, UserRepository, VariantRepository};
use crate::views::{ServiceDetail, service_detail};

/// Body of a service create or update.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// On update, `None` keeps the current assignments.
    pub provider_ids: Option<Vec<UserId>>,
}

/// Body of a variant create or update.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VariantInput {
    pub duration_minutes: u32,
    pub price: f64,
}

/// Application service for the public catalog and its administration.
pub struct CatalogService<S, V, U> {
    services: S,
    variants: V,
    users: U,
}

impl<S, V, U> CatalogService<S, V, U>
where
    S: ServiceRepository,
    V: VariantRepository,
    U: UserRepository,
{
    /// Create a new service from its repositories.
    pub fn new(services: S, variants: V, users: U) -> Self {
        Self {
            services,
            variants,
            users,
        }
    }

    /// Create a service with its initial provider assignments.
    ///
    /// # Errors
    ///
    /// - [`WellbookError::Validation`] for a blank name, a bad image url, or an
    ///   id that is not a provider ([`ValidationError::InvalidProvider`])
    /// - [`ConflictError::Duplicate`] when the name is taken
    #[tracing::instrument(skip(self))]
    pub async fn create_service(&self, input: ServiceInput) -> Result<ServiceDetail, WellbookError> {
        let mut builder = Service::builder().name(input.name.trim());
        if let Some(description) = input.description {
            builder = builder.description(description);
        }
        if let Some(url) = input.image_url {
            builder = builder.image_url(url);
        }
        let providers = input.provider_ids.unwrap_or_default();
        self.check_providers(&providers).await?;
        let service = builder.providers(providers).build()?;

        if self.services.get_by_name(&service.name).await?.is_some() {
            return Err(ConflictError::Duplicate { entity: "Service" }.into());
        }
        let service = self.services.create(service).await?;
        tracing::info!(service_id = %service.id, "service created");
        service_detail(&self.users, &self.variants, service).await
    }

    /// Look up a service with its providers and variants.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when no service with `id` exists.
    pub async fn get_service(&self, id: ServiceId) -> Result<ServiceDetail, WellbookError> {
        let service = self.find_service(id).await?;
        service_detail(&self.users, &self.variants, service).await
    }

    /// List the whole catalog, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn list_services(&self) -> Result<Vec<ServiceDetail>, WellbookError> {
        let mut services = self.services.get_all().await?;
        services.sort_by(|a, b| a.name.cmp(&b.name));
        let mut details = Vec::with_capacity(services.len());
        for service in services {
            details.push(service_detail(&self.users, &self.variants, service).await?);
        }
        Ok(details)
    }

    /// Replace a service's fields; assignments change only when given.
    ///
    /// # Errors
    ///
    /// Same as [`create_service`](Self::create_service), plus
    /// [`WellbookError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn update_service(
        &self,
        id: ServiceId,
        input: ServiceInput,
    ) -> Result<ServiceDetail, WellbookError> {
        let current = self.find_service(id).await?;
        let providers = match input.provider_ids {
            Some(ids) => {
                self.check_providers(&ids).await?;
                ids
            }
            None => current.provider_ids,
        };
        let mut builder = Service::builder()
            .id(id)
            .name(input.name.trim())
            .providers(providers)
            .created_at(current.created_at);
        if let Some(description) = input.description {
            builder = builder.description(description);
        }
        if let Some(url) = input.image_url {
            builder = builder.image_url(url);
        }
        let service = builder.build()?;

        if let Some(other) = self.services.get_by_name(&service.name).await? {
            if other.id != id {
                return Err(ConflictError::Duplicate { entity: "Service" }.into());
            }
        }
        let service = self.services.update(service).await?;
        service_detail(&self.users, &self.variants, service).await
    }

    /// Delete a service and its variants.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] for an unknown id, or
    /// [`ConflictError::InUse`] while reservations still point at a variant.
    #[tracing::instrument(skip(self))]
    pub async fn delete_service(&self, id: ServiceId) -> Result<(), WellbookError> {
        self.find_service(id).await?;
        self.services.delete(id).await
    }

    /// Add a priced duration to a service.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] for an unknown service, or
    /// [`WellbookError::Validation`] for a zero duration or a bad price.
    #[tracing::instrument(skip(self))]
    pub async fn create_variant(
        &self,
        service_id: ServiceId,
        input: VariantInput,
    ) -> Result<ServiceVariant, WellbookError> {
        self.find_service(service_id).await?;
        let variant = ServiceVariant::new(service_id, input.duration_minutes, input.price)?;
        self.variants.create(variant).await
    }

    /// List the variants of a service, shortest first.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] for an unknown service.
    pub async fn list_variants(
        &self,
        service_id: ServiceId,
    ) -> Result<Vec<ServiceVariant>, WellbookError> {
        self.find_service(service_id).await?;
        self.variants.find_by_service(service_id).await
    }

    /// Change a variant's duration and price.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when the variant does not belong
    /// to `service_id`, or [`WellbookError::Validation`] for bad values.
    #[tracing::instrument(skip(self))]
    pub async fn update_variant(
        &self,
        service_id: ServiceId,
        variant_id: VariantId,
        input: VariantInput,
    ) -> Result<ServiceVariant, WellbookError> {
        let mut variant = self.find_variant(service_id, variant_id).await?;
        variant.duration_minutes = input.duration_minutes;
        variant.price = input.price;
        variant.validate()?;
        self.variants.update(variant).await
    }

    /// Remove a variant from a service.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when the variant does not belong
    /// to `service_id`, or [`ConflictError::InUse`] while it is reserved.
    #[tracing::instrument(skip(self))]
    pub async fn delete_variant(
        &self,
        service_id: ServiceId,
        variant_id: VariantId,
    ) -> Result<(), WellbookError> {
        self.find_variant(service_id, variant_id).await?;
        self.variants.delete(variant_id).await
    }

    async fn find_service(&self, id: ServiceId) -> Result<Service, WellbookError> {
        self.services.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Service",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn find_variant(
        &self,
        service_id: ServiceId,
        variant_id: VariantId,
    ) -> Result<ServiceVariant, WellbookError> {
        self.variants
            .get_by_id(variant_id)
            .await?
            .filter(|v| v.service_id == service_id)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Service variant",
                    id: variant_id.to_string(),
                }
                .into()
            })
    }

    async fn check_providers(&self, ids: &[UserId]) -> Result<(), WellbookError> {
        for id in ids {
            match self.users.get_by_id(*id).await? {
                Some(user) if user.role == Role::Provider => {}
                _ => return Err(ValidationError::InvalidProvider.into()),
            }
        }
        Ok(())
    }
}

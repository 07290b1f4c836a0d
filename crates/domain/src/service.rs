//! Service: a bookable treatment category, offered in one or more variants.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WellbookError};
use crate::id::{ServiceId, UserId};
use crate::time::{Timestamp, now};

/// A treatment category such as "Aromatherapy" and the providers delivering it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub provider_ids: Vec<UserId>,
    pub created_at: Timestamp,
}

impl Service {
    /// Create a builder for constructing a [`Service`].
    #[must_use]
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] when:
    /// - `name` is blank ([`ValidationError::EmptyName`])
    /// - `image_url` is set but not an http(s) url ([`ValidationError::InvalidImageUrl`])
    pub fn validate(&self) -> Result<(), WellbookError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if let Some(url) = self.image_url.as_deref() {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidImageUrl.into());
            }
        }
        Ok(())
    }

    /// Whether `provider` is assigned to deliver this service.
    #[must_use]
    pub fn is_offered_by(&self, provider: UserId) -> bool {
        self.provider_ids.contains(&provider)
    }
}

fn is_http_url(url: &str) -> bool {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .and_then(|rest| rest.split(['/', '?', '#']).next())
        .is_some_and(|host| !host.is_empty() && !host.contains(char::is_whitespace))
}

/// Just enough of a service to label it inside other resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: ServiceId,
    pub name: String,
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
        }
    }
}

/// Step-by-step builder for [`Service`].
#[derive(Debug, Default)]
pub struct ServiceBuilder {
    id: Option<ServiceId>,
    name: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    provider_ids: Vec<UserId>,
    created_at: Option<Timestamp>,
}

impl ServiceBuilder {
    #[must_use]
    pub fn id(mut self, id: ServiceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    #[must_use]
    pub fn provider(mut self, provider_id: UserId) -> Self {
        if !self.provider_ids.contains(&provider_id) {
            self.provider_ids.push(provider_id);
        }
        self
    }

    #[must_use]
    pub fn providers(self, provider_ids: impl IntoIterator<Item = UserId>) -> Self {
        provider_ids.into_iter().fold(self, Self::provider)
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return a [`Service`].
    ///
    /// Empty description or image url strings are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] if `name` is missing or blank, or
    /// if the image url is malformed.
    pub fn build(self) -> Result<Service, WellbookError> {
        let service = Service {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.filter(|s| !s.is_empty()),
            image_url: self.image_url.filter(|s| !s.is_empty()),
            provider_ids: self.provider_ids,
            created_at: self.created_at.unwrap_or_else(now),
        };
        service.validate()?;
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_service_when_name_provided() {
        let service = Service::builder()
            .name("Aromatherapie")
            .description("Aromatherapy session")
            .image_url("https://example.com/aroma.jpg")
            .build()
            .unwrap();
        assert_eq!(service.name, "Aromatherapie");
        assert!(service.provider_ids.is_empty());
    }

    #[test]
    fn should_return_validation_error_when_name_is_missing() {
        let result = Service::builder().build();
        assert!(matches!(
            result,
            Err(WellbookError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_treat_empty_image_url_as_absent() {
        let service = Service::builder().name("Presso").image_url("").build().unwrap();
        assert!(service.image_url.is_none());
    }

    #[test]
    fn should_reject_relative_image_url() {
        let result = Service::builder()
            .name("Presso")
            .image_url("/images/presso.jpg")
            .build();
        assert!(matches!(
            result,
            Err(WellbookError::Validation(ValidationError::InvalidImageUrl))
        ));
    }

    #[test]
    fn should_deduplicate_assigned_providers() {
        let provider = UserId::new();
        let service = Service::builder()
            .name("Anti-Stress")
            .providers([provider, provider])
            .build()
            .unwrap();
        assert_eq!(service.provider_ids, vec![provider]);
        assert!(service.is_offered_by(provider));
        assert!(!service.is_offered_by(UserId::new()));
    }
}

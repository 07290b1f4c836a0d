//! Cabinet: a physical room where schedule slots take place.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WellbookError};
use crate::id::CabinetId;

/// A treatment room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cabinet {
    pub id: CabinetId,
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
}

impl Cabinet {
    /// Create a builder for constructing a [`Cabinet`].
    #[must_use]
    pub fn builder() -> CabinetBuilder {
        CabinetBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] when `name` is blank.
    pub fn validate(&self) -> Result<(), WellbookError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Cabinet`].
#[derive(Debug, Default)]
pub struct CabinetBuilder {
    id: Option<CabinetId>,
    name: Option<String>,
    address: Option<String>,
    description: Option<String>,
}

impl CabinetBuilder {
    #[must_use]
    pub fn id(mut self, id: CabinetId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Consume the builder, validate, and return a [`Cabinet`].
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] if `name` is missing or blank.
    pub fn build(self) -> Result<Cabinet, WellbookError> {
        let cabinet = Cabinet {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            address: self.address.filter(|s| !s.is_empty()),
            description: self.description.filter(|s| !s.is_empty()),
        };
        cabinet.validate()?;
        Ok(cabinet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_cabinet_when_name_provided() {
        let cabinet = Cabinet::builder()
            .name("Main Cabinet")
            .address("123 Wellbeing St")
            .build()
            .unwrap();
        assert_eq!(cabinet.name, "Main Cabinet");
        assert_eq!(cabinet.address.as_deref(), Some("123 Wellbeing St"));
        assert!(cabinet.description.is_none());
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Cabinet::builder().name("").build();
        assert!(matches!(
            result,
            Err(WellbookError::Validation(ValidationError::EmptyName))
        ));
    }
}

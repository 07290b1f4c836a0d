//! Service variant: a (duration, price) option under a service.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WellbookError};
use crate::id::{ServiceId, VariantId};

/// A priced duration for a [`Service`](crate::service::Service), e.g. 60 minutes for 50.00.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceVariant {
    pub id: VariantId,
    pub service_id: ServiceId,
    pub duration_minutes: u32,
    pub price: f64,
}

impl ServiceVariant {
    /// Create a new variant with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] if the duration or price is invalid.
    pub fn new(
        service_id: ServiceId,
        duration_minutes: u32,
        price: f64,
    ) -> Result<Self, WellbookError> {
        let variant = Self {
            id: VariantId::new(),
            service_id,
            duration_minutes,
            price,
        };
        variant.validate()?;
        Ok(variant)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] when:
    /// - `duration_minutes` is zero ([`ValidationError::InvalidDuration`])
    /// - `price` is negative or not finite ([`ValidationError::InvalidPrice`])
    pub fn validate(&self) -> Result<(), WellbookError> {
        if self.duration_minutes == 0 {
            return Err(ValidationError::InvalidDuration.into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::InvalidPrice.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_variant_when_valid() {
        let service_id = ServiceId::new();
        let variant = ServiceVariant::new(service_id, 60, 50.0).unwrap();
        assert_eq!(variant.service_id, service_id);
        assert_eq!(variant.duration_minutes, 60);
    }

    #[test]
    fn should_accept_free_variant() {
        assert!(ServiceVariant::new(ServiceId::new(), 15, 0.0).is_ok());
    }

    #[test]
    fn should_reject_zero_duration() {
        let result = ServiceVariant::new(ServiceId::new(), 0, 10.0);
        assert!(matches!(
            result,
            Err(WellbookError::Validation(ValidationError::InvalidDuration))
        ));
    }

    #[test]
    fn should_reject_negative_or_nan_price() {
        for price in [-0.01, f64::NAN, f64::INFINITY] {
            let result = ServiceVariant::new(ServiceId::new(), 30, price);
            assert!(matches!(
                result,
                Err(WellbookError::Validation(ValidationError::InvalidPrice))
            ));
        }
    }
}

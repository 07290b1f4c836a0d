//! Reservation: a client's booking of a service variant on a schedule slot.

use serde::{Deserialize, Serialize};

use crate::id::{ReservationId, ScheduleId, UserId, VariantId};
use crate::time::{Timestamp, now};

/// A booked slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub client_id: UserId,
    pub service_variant_id: VariantId,
    pub schedule_id: ScheduleId,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

impl Reservation {
    /// Create a new reservation stamped with the current time.
    ///
    /// Blank notes are dropped.
    #[must_use]
    pub fn new(
        client_id: UserId,
        service_variant_id: VariantId,
        schedule_id: ScheduleId,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: ReservationId::new(),
            client_id,
            service_variant_id,
            schedule_id,
            notes: notes.filter(|n| !n.trim().is_empty()),
            created_at: now(),
        }
    }
}

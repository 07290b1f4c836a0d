//! Schedule: a provider's time slot, optionally pinned to a cabinet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WellbookError};
use crate::id::{CabinetId, ScheduleId, UserId};
use crate::time::{Date, Timestamp};

/// What a slot is currently used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScheduleStatus {
    #[default]
    Available,
    Booked,
    Off,
    Break,
}

impl ScheduleStatus {
    /// Only [`Available`](Self::Available) slots accept a new reservation.
    #[must_use]
    pub fn is_bookable(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("AVAILABLE"),
            Self::Booked => f.write_str("BOOKED"),
            Self::Off => f.write_str("OFF"),
            Self::Break => f.write_str("BREAK"),
        }
    }
}

/// Returned when a stored status string is not a known status.
#[derive(Debug, thiserror::Error)]
#[error("unknown schedule status {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ScheduleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "BOOKED" => Ok(Self::Booked),
            "OFF" => Ok(Self::Off),
            "BREAK" => Ok(Self::Break),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A provider time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub provider_id: UserId,
    pub cabinet_id: Option<CabinetId>,
    pub date: Date,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub status: ScheduleStatus,
}

impl Schedule {
    /// Create a builder for constructing a [`Schedule`].
    #[must_use]
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] when `start_time` is not strictly
    /// before `end_time`.
    pub fn validate(&self) -> Result<(), WellbookError> {
        if self.start_time >= self.end_time {
            return Err(ValidationError::InvalidTimeRange.into());
        }
        Ok(())
    }

    /// Half-open interval intersection: touching slots do not overlap.
    #[must_use]
    pub fn overlaps(&self, start: Timestamp, end: Timestamp) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Length of the slot in whole minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Step-by-step builder for [`Schedule`].
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    id: Option<ScheduleId>,
    provider_id: Option<UserId>,
    cabinet_id: Option<CabinetId>,
    date: Option<Date>,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
    status: ScheduleStatus,
}

impl ScheduleBuilder {
    #[must_use]
    pub fn id(mut self, id: ScheduleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn provider_id(mut self, provider_id: UserId) -> Self {
        self.provider_id = Some(provider_id);
        self
    }

    #[must_use]
    pub fn cabinet_id(mut self, cabinet_id: CabinetId) -> Self {
        self.cabinet_id = Some(cabinet_id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Set both slot boundaries at once.
    #[must_use]
    pub fn between(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    #[must_use]
    pub fn status(mut self, status: ScheduleStatus) -> Self {
        self.status = status;
        self
    }

    /// Consume the builder, validate, and return a [`Schedule`].
    ///
    /// When no date is given, the calendar day of `start_time` is used.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] if the provider or the slot
    /// boundaries are missing, or if the time range is empty.
    pub fn build(self) -> Result<Schedule, WellbookError> {
        let provider_id = self.provider_id.ok_or(ValidationError::InvalidProvider)?;
        let (Some(start_time), Some(end_time)) = (self.start_time, self.end_time) else {
            return Err(ValidationError::InvalidTimeRange.into());
        };
        let schedule = Schedule {
            id: self.id.unwrap_or_default(),
            provider_id,
            cabinet_id: self.cabinet_id,
            date: self.date.unwrap_or_else(|| start_time.date_naive()),
            start_time,
            end_time,
            status: self.status,
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

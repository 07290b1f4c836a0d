//! Schedule service: provider slots and their consistency rules.
//!
//! A slot never overlaps another slot of the same provider, nor another slot
//! in the same cabinet. A slot holding a reservation stays `BOOKED` and
//! cannot be deleted until the reservation is cancelled.

use serde::Deserialize;

use wellbook_domain::error::{ConflictError, NotFoundError, ValidationError, WellbookError};
use wellbook_domain::id::{CabinetId, ScheduleId, UserId};
use wellbook_domain::schedule::{Schedule, ScheduleStatus};
use wellbook_domain::time::{Date, Timestamp};
use wellbook_domain::user::Role;

use crate::ports::{
    CabinetRepository, ReservationRepository, ScheduleFilter, ScheduleRepository, SlotWindow,
    UserRepository,
};
use crate::views::{ScheduleDetail, schedule_detail};

/// Body of a slot create or update.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleInput {
    pub provider_id: UserId,
    pub cabinet_id: Option<CabinetId>,
    /// Defaults to the calendar day of `start_time`.
    pub date: Option<Date>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Defaults to `AVAILABLE` on create and to the current status on update.
    pub status: Option<ScheduleStatus>,
}

/// Application service for schedule slots.
pub struct ScheduleService<SC, U, C, R> {
    schedules: SC,
    users: U,
    cabinets: C,
    reservations: R,
}

impl<SC, U, C, R> ScheduleService<SC, U, C, R>
where
    SC: ScheduleRepository,
    U: UserRepository,
    C: CabinetRepository,
    R: ReservationRepository,
{
    /// Create a new service from its repositories.
    pub fn new(schedules: SC, users: U, cabinets: C, reservations: R) -> Self {
        Self {
            schedules,
            users,
            cabinets,
            reservations,
        }
    }

    /// Open a new slot.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidProvider`] / [`ValidationError::InvalidCabinet`]
    ///   for unknown references
    /// - [`ValidationError::InvalidTimeRange`] unless `start_time < end_time`
    /// - [`ConflictError::SlotOverlap`] when the provider or cabinet is busy
    #[tracing::instrument(skip(self))]
    pub async fn create_schedule(&self, input: ScheduleInput) -> Result<ScheduleDetail, WellbookError> {
        let schedule = build(ScheduleId::new(), input, ScheduleStatus::default())?;
        self.check(&schedule, None).await?;
        let schedule = self.schedules.create(schedule).await?;
        tracing::info!(schedule_id = %schedule.id, provider_id = %schedule.provider_id, "slot created");
        schedule_detail(&self.users, &self.cabinets, schedule).await
    }

    /// Look up a slot with its provider and cabinet.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when no slot with `id` exists.
    pub async fn get_schedule(&self, id: ScheduleId) -> Result<ScheduleDetail, WellbookError> {
        let schedule = self.find_schedule(id).await?;
        schedule_detail(&self.users, &self.cabinets, schedule).await
    }

    /// List slots matching `filter`, earliest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn list_schedules(
        &self,
        filter: ScheduleFilter,
    ) -> Result<Vec<ScheduleDetail>, WellbookError> {
        let slots = self.schedules.find(filter).await?;
        let mut details = Vec::with_capacity(slots.len());
        for slot in slots {
            details.push(schedule_detail(&self.users, &self.cabinets, slot).await?);
        }
        Ok(details)
    }

    /// Replace a slot's fields.
    ///
    /// # Errors
    ///
    /// Same as [`create_schedule`](Self::create_schedule), plus
    /// [`WellbookError::NotFound`] for an unknown id and
    /// [`ConflictError::SlotReserved`] when a reserved slot would leave `BOOKED`
    /// or change provider.
    #[tracing::instrument(skip(self))]
    pub async fn update_schedule(
        &self,
        id: ScheduleId,
        input: ScheduleInput,
    ) -> Result<ScheduleDetail, WellbookError> {
        let current = self.find_schedule(id).await?;
        let reserved = self.reservations.get_by_schedule(id).await?.is_some();
        let schedule = build(id, input, current.status)?;
        if reserved
            && (schedule.status != ScheduleStatus::Booked
                || schedule.provider_id != current.provider_id)
        {
            return Err(ConflictError::SlotReserved.into());
        }
        self.check(&schedule, Some(id)).await?;
        let schedule = self.schedules.update(schedule).await?;
        schedule_detail(&self.users, &self.cabinets, schedule).await
    }

    /// Delete a slot that holds no reservation.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] for an unknown id, or
    /// [`ConflictError::SlotReserved`] while a reservation holds it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_schedule(&self, id: ScheduleId) -> Result<(), WellbookError> {
        self.find_schedule(id).await?;
        if self.reservations.get_by_schedule(id).await?.is_some() {
            return Err(ConflictError::SlotReserved.into());
        }
        self.schedules.delete(id).await
    }

    async fn find_schedule(&self, id: ScheduleId) -> Result<Schedule, WellbookError> {
        self.schedules.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Schedule",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn check(
        &self,
        schedule: &Schedule,
        exclude: Option<ScheduleId>,
    ) -> Result<(), WellbookError> {
        match self.users.get_by_id(schedule.provider_id).await? {
            Some(user) if user.role == Role::Provider => {}
            _ => return Err(ValidationError::InvalidProvider.into()),
        }
        if let Some(cabinet_id) = schedule.cabinet_id {
            if self.cabinets.get_by_id(cabinet_id).await?.is_none() {
                return Err(ValidationError::InvalidCabinet.into());
            }
        }
        let window = SlotWindow {
            provider_id: schedule.provider_id,
            cabinet_id: schedule.cabinet_id,
            start: schedule.start_time,
            end: schedule.end_time,
            exclude,
        };
        if !self.schedules.find_colliding(window).await?.is_empty() {
            return Err(ConflictError::SlotOverlap.into());
        }
        Ok(())
    }
}

fn build(
    id: ScheduleId,
    input: ScheduleInput,
    status: ScheduleStatus,
) -> Result<Schedule, WellbookError> {
    let mut builder = Schedule::builder()
        .id(id)
        .provider_id(input.provider_id)
        .between(input.start_time, input.end_time)
        .status(input.status.unwrap_or(status));
    if let Some(cabinet_id) = input.cabinet_id {
        builder = builder.cabinet_id(cabinet_id);
    }
    if let Some(date) = input.date {
        builder = builder.date(date);
    }
    builder.build()
}

//! Storage port: repository traits for persistence.

use std::future::Future;

use wellbook_domain::cabinet::Cabinet;
use wellbook_domain::error::WellbookError;
use wellbook_domain::id::{CabinetId, ReservationId, ScheduleId, ServiceId, UserId, VariantId};
use wellbook_domain::reservation::Reservation;
use wellbook_domain::schedule::Schedule;
use wellbook_domain::service::Service;
use wellbook_domain::time::{Date, Timestamp};
use wellbook_domain::user::{Role, User};
use wellbook_domain::variant::ServiceVariant;

/// Repository for persisting and querying [`User`]s.
pub trait UserRepository {
    /// Create a new user in storage.
    fn create(&self, user: User) -> impl Future<Output = Result<User, WellbookError>> + Send;

    /// Get a user by its unique identifier.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, WellbookError>> + Send;

    /// Get a user by e-mail, ignoring ASCII case.
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, WellbookError>> + Send;

    /// Get all users.
    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, WellbookError>> + Send;

    /// Get all users holding `role`.
    fn find_by_role(
        &self,
        role: Role,
    ) -> impl Future<Output = Result<Vec<User>, WellbookError>> + Send;

    /// Update an existing user, including its password hash.
    fn update(&self, user: User) -> impl Future<Output = Result<User, WellbookError>> + Send;

    /// Delete a user by its unique identifier.
    fn delete(&self, id: UserId) -> impl Future<Output = Result<(), WellbookError>> + Send;

    /// Count all users.
    fn count(&self) -> impl Future<Output = Result<u64, WellbookError>> + Send;

    /// Count users holding `role`.
    fn count_by_role(&self, role: Role) -> impl Future<Output = Result<u64, WellbookError>> + Send;
}

/// Repository for [`Service`]s and their provider assignments.
pub trait ServiceRepository {
    /// Create a new service together with its provider assignments.
    fn create(
        &self,
        service: Service,
    ) -> impl Future<Output = Result<Service, WellbookError>> + Send;

    /// Get a service by its unique identifier.
    fn get_by_id(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<Service>, WellbookError>> + Send;

    /// Get a service by its exact name.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Service>, WellbookError>> + Send;

    /// Get all services.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Service>, WellbookError>> + Send;

    /// Get the services a provider is assigned to.
    fn find_by_provider(
        &self,
        provider_id: UserId,
    ) -> impl Future<Output = Result<Vec<Service>, WellbookError>> + Send;

    /// Update a service; its provider assignments are replaced.
    fn update(
        &self,
        service: Service,
    ) -> impl Future<Output = Result<Service, WellbookError>> + Send;

    /// Replace the set of services a provider is assigned to.
    fn assign_provider(
        &self,
        provider_id: UserId,
        service_ids: &[ServiceId],
    ) -> impl Future<Output = Result<(), WellbookError>> + Send;

    /// Delete a service and its variants.
    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<(), WellbookError>> + Send;

    /// Count all services.
    fn count(&self) -> impl Future<Output = Result<u64, WellbookError>> + Send;
}

/// Repository for [`ServiceVariant`]s.
pub trait VariantRepository {
    /// Create a new variant.
    fn create(
        &self,
        variant: ServiceVariant,
    ) -> impl Future<Output = Result<ServiceVariant, WellbookError>> + Send;

    /// Get a variant by its unique identifier.
    fn get_by_id(
        &self,
        id: VariantId,
    ) -> impl Future<Output = Result<Option<ServiceVariant>, WellbookError>> + Send;

    /// Get all variants of a service, shortest first.
    fn find_by_service(
        &self,
        service_id: ServiceId,
    ) -> impl Future<Output = Result<Vec<ServiceVariant>, WellbookError>> + Send;

    /// Update an existing variant.
    fn update(
        &self,
        variant: ServiceVariant,
    ) -> impl Future<Output = Result<ServiceVariant, WellbookError>> + Send;

    /// Delete a variant by its unique identifier.
    fn delete(&self, id: VariantId) -> impl Future<Output = Result<(), WellbookError>> + Send;
}

/// Repository for [`Cabinet`]s.
pub trait CabinetRepository {
    /// Create a new cabinet.
    fn create(
        &self,
        cabinet: Cabinet,
    ) -> impl Future<Output = Result<Cabinet, WellbookError>> + Send;

    /// Get a cabinet by its unique identifier.
    fn get_by_id(
        &self,
        id: CabinetId,
    ) -> impl Future<Output = Result<Option<Cabinet>, WellbookError>> + Send;

    /// Get a cabinet by its exact name.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Cabinet>, WellbookError>> + Send;

    /// Get all cabinets.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Cabinet>, WellbookError>> + Send;

    /// Update an existing cabinet.
    fn update(
        &self,
        cabinet: Cabinet,
    ) -> impl Future<Output = Result<Cabinet, WellbookError>> + Send;

    /// Delete a cabinet; its schedules keep existing without a cabinet.
    fn delete(&self, id: CabinetId) -> impl Future<Output = Result<(), WellbookError>> + Send;

    /// Count all cabinets.
    fn count(&self) -> impl Future<Output = Result<u64, WellbookError>> + Send;
}

/// Optional criteria for listing schedules. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub provider_id: Option<UserId>,
    pub cabinet_id: Option<CabinetId>,
    pub date: Option<Date>,
}

impl ScheduleFilter {
    /// Whether `schedule` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, schedule: &Schedule) -> bool {
        self.provider_id.is_none_or(|id| schedule.provider_id == id)
            && self
                .cabinet_id
                .is_none_or(|id| schedule.cabinet_id == Some(id))
            && self.date.is_none_or(|date| schedule.date == date)
    }
}

/// The time window a new or edited slot wants to occupy.
#[derive(Debug, Clone, Copy)]
pub struct SlotWindow {
    pub provider_id: UserId,
    pub cabinet_id: Option<CabinetId>,
    pub start: Timestamp,
    pub end: Timestamp,
    /// The slot being edited, which never collides with itself.
    pub exclude: Option<ScheduleId>,
}

impl SlotWindow {
    /// Whether `schedule` competes with this window for the provider or the cabinet.
    #[must_use]
    pub fn collides_with(&self, schedule: &Schedule) -> bool {
        if self.exclude == Some(schedule.id) || !schedule.overlaps(self.start, self.end) {
            return false;
        }
        schedule.provider_id == self.provider_id
            || (self.cabinet_id.is_some() && schedule.cabinet_id == self.cabinet_id)
    }
}

/// Repository for [`Schedule`] slots.
pub trait ScheduleRepository {
    /// Create a new slot.
    fn create(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, WellbookError>> + Send;

    /// Get a slot by its unique identifier.
    fn get_by_id(
        &self,
        id: ScheduleId,
    ) -> impl Future<Output = Result<Option<Schedule>, WellbookError>> + Send;

    /// Get slots matching `filter`, ordered by start time.
    fn find(
        &self,
        filter: ScheduleFilter,
    ) -> impl Future<Output = Result<Vec<Schedule>, WellbookError>> + Send;

    /// Get the slots colliding with `window` (see [`SlotWindow::collides_with`]).
    fn find_colliding(
        &self,
        window: SlotWindow,
    ) -> impl Future<Output = Result<Vec<Schedule>, WellbookError>> + Send;

    /// Update an existing slot.
    fn update(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, WellbookError>> + Send;

    /// Delete a slot by its unique identifier.
    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), WellbookError>> + Send;

    /// Count all slots.
    fn count(&self) -> impl Future<Output = Result<u64, WellbookError>> + Send;
}

/// Optional criteria for listing reservations. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub client_id: Option<UserId>,
    /// Only reservations whose slot starts at or after this instant.
    pub starts_after: Option<Timestamp>,
}

/// Repository for [`Reservation`]s.
///
/// Booking and cancelling also move the slot status, so implementations
/// must apply both writes atomically.
pub trait ReservationRepository {
    /// Insert `reservation` and flip its slot from `AVAILABLE` to `BOOKED`.
    ///
    /// Fails with [`ConflictError::SlotUnavailable`](wellbook_domain::error::ConflictError::SlotUnavailable)
    /// when the slot is no longer available, leaving storage untouched.
    fn book(
        &self,
        reservation: Reservation,
    ) -> impl Future<Output = Result<Reservation, WellbookError>> + Send;

    /// Get a reservation by its unique identifier.
    fn get_by_id(
        &self,
        id: ReservationId,
    ) -> impl Future<Output = Result<Option<Reservation>, WellbookError>> + Send;

    /// Get the reservation holding a slot, if any.
    fn get_by_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> impl Future<Output = Result<Option<Reservation>, WellbookError>> + Send;

    /// Get reservations matching `filter`, newest first.
    fn find(
        &self,
        filter: ReservationFilter,
    ) -> impl Future<Output = Result<Vec<Reservation>, WellbookError>> + Send;

    /// Get the `limit` most recently created reservations.
    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Reservation>, WellbookError>> + Send;

    /// Delete a reservation and release its slot back to `AVAILABLE`.
    fn cancel(&self, id: ReservationId) -> impl Future<Output = Result<(), WellbookError>> + Send;

    /// Count reservations whose slot starts at or after `from`.
    fn count_upcoming(
        &self,
        from: Timestamp,
    ) -> impl Future<Output = Result<u64, WellbookError>> + Send;
}

//! Reservation service: booking and cancelling slots.

use serde::Deserialize;

use wellbook_domain::error::{ConflictError, ValidationError, WellbookError};
use wellbook_domain::id::{ReservationId, ScheduleId, UserId, VariantId};
use wellbook_domain::reservation::Reservation;
use wellbook_domain::time::{Timestamp, now};
use wellbook_domain::user::Role;

use crate::ports::{
    ReservationFilter, ReservationRepository, ScheduleRepository, ServiceRepository,
    UserRepository, VariantRepository,
};
use crate::views::{ClientDashboard, ReservationDetail, missing, reservation_detail};

/// A booking request on behalf of `client_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationInput {
    pub client_id: UserId,
    pub service_variant_id: VariantId,
    pub schedule_id: ScheduleId,
    pub notes: Option<String>,
}

/// Application service for reservations.
pub struct ReservationService<R, SC, V, S, U> {
    reservations: R,
    schedules: SC,
    variants: V,
    services: S,
    users: U,
}

impl<R, SC, V, S, U> ReservationService<R, SC, V, S, U>
where
    R: ReservationRepository,
    SC: ScheduleRepository,
    V: VariantRepository,
    S: ServiceRepository,
    U: UserRepository,
{
    /// Create a new service from its repositories.
    pub fn new(reservations: R, schedules: SC, variants: V, services: S, users: U) -> Self {
        Self {
            reservations,
            schedules,
            variants,
            services,
            users,
        }
    }

    /// Book an available slot for a client.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidClient`] unless the client holds the `CLIENT` role
    /// - [`WellbookError::NotFound`] for an unknown variant or slot
    /// - [`ValidationError::ServiceNotOffered`] when the slot's provider does
    ///   not deliver the variant's service
    /// - [`ConflictError::SlotUnavailable`] unless the slot is `AVAILABLE`,
    ///   including when a concurrent booking wins the race
    #[tracing::instrument(skip(self))]
    pub async fn create_reservation(
        &self,
        input: ReservationInput,
    ) -> Result<ReservationDetail, WellbookError> {
        self.reserve(input, None).await
    }

    /// Book a slot from the client's own account.
    ///
    /// Unlike [`create_reservation`](Self::create_reservation), which lets
    /// administrators record past visits, the slot must not have started yet.
    ///
    /// # Errors
    ///
    /// Same as [`create_reservation`](Self::create_reservation), plus
    /// [`ConflictError::SlotStarted`] when the slot's start time has passed.
    #[tracing::instrument(skip(self))]
    pub async fn book_for_client(
        &self,
        input: ReservationInput,
    ) -> Result<ReservationDetail, WellbookError> {
        self.reserve(input, Some(now())).await
    }

    async fn reserve(
        &self,
        input: ReservationInput,
        not_before: Option<Timestamp>,
    ) -> Result<ReservationDetail, WellbookError> {
        match self.users.get_by_id(input.client_id).await? {
            Some(user) if user.role == Role::Client => {}
            _ => return Err(ValidationError::InvalidClient.into()),
        }
        let variant = self
            .variants
            .get_by_id(input.service_variant_id)
            .await?
            .ok_or_else(|| missing("Service variant", input.service_variant_id))?;
        let schedule = self
            .schedules
            .get_by_id(input.schedule_id)
            .await?
            .ok_or_else(|| missing("Schedule", input.schedule_id))?;
        let offered = self
            .services
            .get_by_id(variant.service_id)
            .await?
            .is_some_and(|service| service.is_offered_by(schedule.provider_id));
        if !offered {
            return Err(ValidationError::ServiceNotOffered.into());
        }
        if not_before.is_some_and(|limit| schedule.start_time < limit) {
            return Err(ConflictError::SlotStarted.into());
        }
        if !schedule.status.is_bookable() {
            return Err(ConflictError::SlotUnavailable.into());
        }

        let reservation = Reservation::new(
            input.client_id,
            input.service_variant_id,
            input.schedule_id,
            input.notes,
        );
        let reservation = self.reservations.book(reservation).await?;
        tracing::info!(
            reservation_id = %reservation.id,
            schedule_id = %reservation.schedule_id,
            "slot booked"
        );
        self.detail(reservation).await
    }

    /// Look up a reservation with everything it references.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when no reservation with `id` exists.
    pub async fn get_reservation(&self, id: ReservationId) -> Result<ReservationDetail, WellbookError> {
        let reservation = self.find_reservation(id).await?;
        self.detail(reservation).await
    }

    /// List reservations matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> Result<Vec<ReservationDetail>, WellbookError> {
        let reservations = self.reservations.find(filter).await?;
        self.details(reservations).await
    }

    /// Cancel a reservation and free its slot.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when no reservation with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_reservation(&self, id: ReservationId) -> Result<(), WellbookError> {
        self.find_reservation(id).await?;
        self.reservations.cancel(id).await?;
        tracing::info!(reservation_id = %id, "reservation cancelled");
        Ok(())
    }

    /// Cancel a reservation on behalf of the client who made it.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when the reservation does not exist
    /// or belongs to another client.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_own(
        &self,
        client_id: UserId,
        id: ReservationId,
    ) -> Result<(), WellbookError> {
        let reservation = self.find_reservation(id).await?;
        if reservation.client_id != client_id {
            return Err(missing("Reservation", id));
        }
        self.reservations.cancel(id).await
    }

    /// Assemble a client's profile with their upcoming and past reservations.
    ///
    /// Upcoming reservations are sorted soonest first, past ones most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidClient`] unless `client_id` is a client.
    pub async fn client_dashboard(&self, client_id: UserId) -> Result<ClientDashboard, WellbookError> {
        let profile = match self.users.get_by_id(client_id).await? {
            Some(user) if user.role == Role::Client => user,
            _ => return Err(ValidationError::InvalidClient.into()),
        };
        let reservations = self
            .reservations
            .find(ReservationFilter {
                client_id: Some(client_id),
                starts_after: None,
            })
            .await?;
        let now = now();
        let (mut upcoming, mut past): (Vec<_>, Vec<_>) = self
            .details(reservations)
            .await?
            .into_iter()
            .partition(|d| d.schedule.start_time >= now);
        upcoming.sort_by_key(|d| d.schedule.start_time);
        past.sort_by_key(|d| std::cmp::Reverse(d.schedule.start_time));
        Ok(ClientDashboard {
            profile,
            upcoming,
            past,
        })
    }

    async fn find_reservation(&self, id: ReservationId) -> Result<Reservation, WellbookError> {
        self.reservations
            .get_by_id(id)
            .await?
            .ok_or_else(|| missing("Reservation", id))
    }

    async fn detail(&self, reservation: Reservation) -> Result<ReservationDetail, WellbookError> {
        reservation_detail(
            &self.users,
            &self.schedules,
            &self.variants,
            &self.services,
            reservation,
        )
        .await
    }

    async fn details(
        &self,
        reservations: Vec<Reservation>,
    ) -> Result<Vec<ReservationDetail>, WellbookError> {
        let mut details = Vec::with_capacity(reservations.len());
        for reservation in reservations {
            details.push(self.detail(reservation).await?);
        }
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryStore, user};
    use chrono::{Duration, TimeZone, Utc};
    use wellbook_domain::schedule::{Schedule, ScheduleStatus};
    use wellbook_domain::service::Service;
    use wellbook_domain::variant::ServiceVariant;

    type Svc =
        ReservationService<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>;

    struct Fixture {
        svc: Svc,
        store: InMemoryStore,
        client: UserId,
        provider: UserId,
        variant: VariantId,
    }

    fn fixture() -> Fixture {
        let store = InMemoryStore::default();
        let client = store.insert_user(user("c@example.com", Role::Client)).id;
        let provider = store.insert_user(user("pro@example.com", Role::Provider)).id;
        let service = store.insert_service(
            Service::builder()
                .name("Yoga")
                .provider(provider)
                .build()
                .unwrap(),
        );
        let variant = store
            .insert_variant(ServiceVariant::new(service.id, 60, 40.0).unwrap())
            .id;
        Fixture {
            svc: ReservationService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            ),
            store,
            client,
            provider,
            variant,
        }
    }

    fn slot(store: &InMemoryStore, provider: UserId, start: Timestamp) -> ScheduleId {
        store
            .insert_schedule(
                Schedule::builder()
                    .provider_id(provider)
                    .between(start, start + Duration::hours(1))
                    .build()
                    .unwrap(),
            )
            .id
    }

    fn future() -> Timestamp {
        Utc.with_ymd_and_hms(2099, 1, 7, 9, 0, 0).unwrap()
    }

    fn input(f: &Fixture, schedule_id: ScheduleId) -> ReservationInput {
        ReservationInput {
            client_id: f.client,
            service_variant_id: f.variant,
            schedule_id,
            notes: Some("First visit".to_string()),
        }
    }

    #[tokio::test]
    async fn should_book_available_slot() {
        let f = fixture();
        let slot_id = slot(&f.store, f.provider, future());

        let detail = f.svc.create_reservation(input(&f, slot_id)).await.unwrap();

        assert_eq!(detail.service_name, "Yoga");
        assert_eq!(detail.client.id, f.client);
        assert_eq!(detail.provider.id, f.provider);
        assert_eq!(detail.reservation.notes.as_deref(), Some("First visit"));
        assert_eq!(
            f.store.schedule(slot_id).unwrap().status,
            ScheduleStatus::Booked
        );
    }

    #[tokio::test]
    async fn should_refuse_to_double_book() {
        let f = fixture();
        let slot_id = slot(&f.store, f.provider, future());
        f.svc.create_reservation(input(&f, slot_id)).await.unwrap();

        let result = f.svc.create_reservation(input(&f, slot_id)).await;
        assert!(matches!(
            result,
            Err(WellbookError::Conflict(ConflictError::SlotUnavailable))
        ));
    }

    #[tokio::test]
    async fn should_refuse_slots_on_break() {
        let f = fixture();
        let slot_id = f
            .store
            .insert_schedule(
                Schedule::builder()
                    .provider_id(f.provider)
                    .between(future(), future() + Duration::hours(1))
                    .status(ScheduleStatus::Break)
                    .build()
                    .unwrap(),
            )
            .id;

        let result = f.svc.create_reservation(input(&f, slot_id)).await;
        assert!(matches!(
            result,
            Err(WellbookError::Conflict(ConflictError::SlotUnavailable))
        ));
    }

    #[tokio::test]
    async fn should_refuse_client_booking_of_started_slot() {
        let f = fixture();
        let started = slot(&f.store, f.provider, now() - Duration::minutes(5));

        let result = f.svc.book_for_client(input(&f, started)).await;
        assert!(matches!(
            result,
            Err(WellbookError::Conflict(ConflictError::SlotStarted))
        ));
        assert_eq!(
            f.store.schedule(started).unwrap().status,
            ScheduleStatus::Available
        );

        let upcoming = slot(&f.store, f.provider, future());
        let detail = f.svc.book_for_client(input(&f, upcoming)).await.unwrap();
        assert_eq!(detail.schedule.id, upcoming);
    }

    #[tokio::test]
    async fn should_reject_non_client_booker() {
        let f = fixture();
        let slot_id = slot(&f.store, f.provider, future());
        let mut by_provider = input(&f, slot_id);
        by_provider.client_id = f.provider;

        let result = f.svc.create_reservation(by_provider).await;
        assert!(matches!(
            result,
            Err(WellbookError::Validation(ValidationError::InvalidClient))
        ));
    }

    #[tokio::test]
    async fn should_reject_service_not_offered_by_slot_provider() {
        let f = fixture();
        let other = f
            .store
            .insert_user(user("other@example.com", Role::Provider))
            .id;
        let slot_id = slot(&f.store, other, future());

        let result = f.svc.create_reservation(input(&f, slot_id)).await;
        assert!(matches!(
            result,
            Err(WellbookError::Validation(ValidationError::ServiceNotOffered))
        ));
        assert_eq!(
            f.store.schedule(slot_id).unwrap().status,
            ScheduleStatus::Available
        );
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_slot() {
        let f = fixture();
        let result = f.svc.create_reservation(input(&f, ScheduleId::new())).await;
        assert!(matches!(result, Err(WellbookError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_release_slot_on_cancel() {
        let f = fixture();
        let slot_id = slot(&f.store, f.provider, future());
        let detail = f.svc.create_reservation(input(&f, slot_id)).await.unwrap();

        f.svc
            .cancel_reservation(detail.reservation.id)
            .await
            .unwrap();

        assert_eq!(
            f.store.schedule(slot_id).unwrap().status,
            ScheduleStatus::Available
        );
        assert!(matches!(
            f.svc.get_reservation(detail.reservation.id).await,
            Err(WellbookError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_not_cancel_someone_elses_reservation() {
        let f = fixture();
        let slot_id = slot(&f.store, f.provider, future());
        let detail = f.svc.create_reservation(input(&f, slot_id)).await.unwrap();

        let result = f.svc.cancel_own(UserId::new(), detail.reservation.id).await;
        assert!(matches!(result, Err(WellbookError::NotFound(_))));

        f.svc
            .cancel_own(f.client, detail.reservation.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn should_split_dashboard_into_upcoming_and_past() {
        let f = fixture();
        let past_slot = slot(&f.store, f.provider, now() - Duration::days(2));
        let soon_slot = slot(&f.store, f.provider, future());
        f.svc.create_reservation(input(&f, past_slot)).await.unwrap();
        f.svc.create_reservation(input(&f, soon_slot)).await.unwrap();

        let dashboard = f.svc.client_dashboard(f.client).await.unwrap();

        assert_eq!(dashboard.profile.id, f.client);
        assert_eq!(dashboard.upcoming.len(), 1);
        assert_eq!(dashboard.upcoming[0].schedule.id, soon_slot);
        assert_eq!(dashboard.past.len(), 1);
        assert_eq!(dashboard.past[0].schedule.id, past_slot);
    }

    #[tokio::test]
    async fn should_filter_upcoming_reservations() {
        let f = fixture();
        let past_slot = slot(&f.store, f.provider, now() - Duration::days(2));
        let soon_slot = slot(&f.store, f.provider, future());
        f.svc.create_reservation(input(&f, past_slot)).await.unwrap();
        f.svc.create_reservation(input(&f, soon_slot)).await.unwrap();

        let all = f
            .svc
            .list_reservations(ReservationFilter::default())
            .await
            .unwrap();
        let upcoming = f
            .svc
            .list_reservations(ReservationFilter {
                client_id: None,
                starts_after: Some(now()),
            })
            .await
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].schedule.id, soon_slot);
    }
}

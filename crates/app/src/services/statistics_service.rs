//! Statistics service: admin dashboard counters.

use wellbook_domain::error::WellbookError;
use wellbook_domain::time::now;
use wellbook_domain::user::Role;

use crate::ports::{
    CabinetRepository, ReservationRepository, ScheduleRepository, ServiceRepository,
    UserRepository, VariantRepository,
};
use crate::views::{Statistics, reservation_detail};

/// How many reservations the dashboard shows.
pub const RECENT_RESERVATIONS: usize = 10;

/// Read-only service aggregating counts over every repository.
pub struct StatisticsService<U, S, V, C, SC, R> {
    users: U,
    services: S,
    variants: V,
    cabinets: C,
    schedules: SC,
    reservations: R,
}

impl<U, S, V, C, SC, R> StatisticsService<U, S, V, C, SC, R>
where
    U: UserRepository,
    S: ServiceRepository,
    V: VariantRepository,
    C: CabinetRepository,
    SC: ScheduleRepository,
    R: ReservationRepository,
{
    /// Create a new service from its repositories.
    pub fn new(users: U, services: S, variants: V, cabinets: C, schedules: SC, reservations: R) -> Self {
        Self {
            users,
            services,
            variants,
            cabinets,
            schedules,
            reservations,
        }
    }

    /// Gather the dashboard counters and the latest reservations.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn statistics(&self) -> Result<Statistics, WellbookError> {
        let recent = self.reservations.recent(RECENT_RESERVATIONS).await?;
        let mut recent_reservations = Vec::with_capacity(recent.len());
        for reservation in recent {
            recent_reservations.push(
                reservation_detail(
                    &self.users,
                    &self.schedules,
                    &self.variants,
                    &self.services,
                    reservation,
                )
                .await?,
            );
        }

        Ok(Statistics {
            users: self.users.count().await?,
            services: self.services.count().await?,
            cabinets: self.cabinets.count().await?,
            providers: self.users.count_by_role(Role::Provider).await?,
            schedules: self.schedules.count().await?,
            upcoming_reservations: self.reservations.count_upcoming(now()).await?,
            recent_reservations,
        })
    }
}

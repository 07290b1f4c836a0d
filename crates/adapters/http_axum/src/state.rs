//! Shared application state for axum handlers.

use std::sync::Arc;

use wellbook_app::ports::{
    CabinetRepository, PasswordHasher, ReservationRepository, ScheduleRepository,
    ServiceRepository, TokenIssuer, UserRepository, VariantRepository,
};
use wellbook_app::services::auth_service::AuthService;
use wellbook_app::services::cabinet_service::CabinetService;
use wellbook_app::services::catalog_service::CatalogService;
use wellbook_app::services::provider_service::ProviderService;
use wellbook_app::services::reservation_service::ReservationService;
use wellbook_app::services::schedule_service::ScheduleService;
use wellbook_app::services::statistics_service::StatisticsService;
use wellbook_app::services::user_service::UserService;

/// The set of adapter types the HTTP layer runs on.
///
/// Grouping them behind associated types keeps handler signatures to a
/// single generic parameter. Repositories are cloned into every service that
/// needs them, so they must be cheap handles (e.g. over a connection pool).
pub trait Backend: Send + Sync + 'static {
    type Users: UserRepository + Clone + Send + Sync + 'static;
    type Services: ServiceRepository + Clone + Send + Sync + 'static;
    type Variants: VariantRepository + Clone + Send + Sync + 'static;
    type Cabinets: CabinetRepository + Clone + Send + Sync + 'static;
    type Schedules: ScheduleRepository + Clone + Send + Sync + 'static;
    type Reservations: ReservationRepository + Clone + Send + Sync + 'static;
    type Hasher: PasswordHasher + Clone + Send + Sync + 'static;
    type Tokens: TokenIssuer + Send + Sync + 'static;
}

/// Concrete adapter instances used to assemble an [`AppState`].
pub struct Adapters<B: Backend> {
    pub users: B::Users,
    pub services: B::Services,
    pub variants: B::Variants,
    pub cabinets: B::Cabinets,
    pub schedules: B::Schedules,
    pub reservations: B::Reservations,
    pub hasher: B::Hasher,
    pub tokens: B::Tokens,
}

pub type Auth<B> = AuthService<<B as Backend>::Users, <B as Backend>::Hasher, <B as Backend>::Tokens>;
pub type Catalog<B> =
    CatalogService<<B as Backend>::Services, <B as Backend>::Variants, <B as Backend>::Users>;
pub type Cabinets<B> =
    CabinetService<<B as Backend>::Cabinets, <B as Backend>::Schedules, <B as Backend>::Users>;
pub type Providers<B> =
    ProviderService<<B as Backend>::Users, <B as Backend>::Services, <B as Backend>::Hasher>;
pub type Schedules<B> = ScheduleService<
    <B as Backend>::Schedules,
    <B as Backend>::Users,
    <B as Backend>::Cabinets,
    <B as Backend>::Reservations,
>;
pub type Reservations<B> = ReservationService<
    <B as Backend>::Reservations,
    <B as Backend>::Schedules,
    <B as Backend>::Variants,
    <B as Backend>::Services,
    <B as Backend>::Users,
>;
pub type Statistics<B> = StatisticsService<
    <B as Backend>::Users,
    <B as Backend>::Services,
    <B as Backend>::Variants,
    <B as Backend>::Cabinets,
    <B as Backend>::Schedules,
    <B as Backend>::Reservations,
>;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the backend types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<B: Backend> {
    pub auth_service: Arc<Auth<B>>,
    pub user_service: Arc<UserService<B::Users>>,
    pub catalog_service: Arc<Catalog<B>>,
    pub cabinet_service: Arc<Cabinets<B>>,
    pub provider_service: Arc<Providers<B>>,
    pub schedule_service: Arc<Schedules<B>>,
    pub reservation_service: Arc<Reservations<B>>,
    pub statistics_service: Arc<Statistics<B>>,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            user_service: Arc::clone(&self.user_service),
            catalog_service: Arc::clone(&self.catalog_service),
            cabinet_service: Arc::clone(&self.cabinet_service),
            provider_service: Arc::clone(&self.provider_service),
            schedule_service: Arc::clone(&self.schedule_service),
            reservation_service: Arc::clone(&self.reservation_service),
            statistics_service: Arc::clone(&self.statistics_service),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Wire every application service from one set of adapters.
    pub fn new(adapters: Adapters<B>) -> Self {
        let Adapters {
            users,
            services,
            variants,
            cabinets,
            schedules,
            reservations,
            hasher,
            tokens,
        } = adapters;

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), hasher.clone(), tokens)),
            user_service: Arc::new(UserService::new(users.clone())),
            catalog_service: Arc::new(CatalogService::new(
                services.clone(),
                variants.clone(),
                users.clone(),
            )),
            cabinet_service: Arc::new(CabinetService::new(
                cabinets.clone(),
                schedules.clone(),
                users.clone(),
            )),
            provider_service: Arc::new(ProviderService::new(
                users.clone(),
                services.clone(),
                hasher,
            )),
            schedule_service: Arc::new(ScheduleService::new(
                schedules.clone(),
                users.clone(),
                cabinets.clone(),
                reservations.clone(),
            )),
            reservation_service: Arc::new(ReservationService::new(
                reservations.clone(),
                schedules.clone(),
                variants.clone(),
                services.clone(),
                users.clone(),
            )),
            statistics_service: Arc::new(StatisticsService::new(
                users,
                services,
                variants,
                cabinets,
                schedules,
                reservations,
            )),
        }
    }
}

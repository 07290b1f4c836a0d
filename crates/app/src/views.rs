//! Read models: aggregates joined together for API responses.

use serde::Serialize;

use wellbook_domain::cabinet::Cabinet;
use wellbook_domain::error::{NotFoundError, WellbookError};
use wellbook_domain::reservation::Reservation;
use wellbook_domain::schedule::Schedule;
use wellbook_domain::service::{Service, ServiceSummary};
use wellbook_domain::user::{User, UserSummary};
use wellbook_domain::variant::ServiceVariant;

use crate::ports::{CabinetRepository, ServiceRepository, UserRepository, VariantRepository};

/// A service with its assigned providers and variants.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: Service,
    pub providers: Vec<UserSummary>,
    pub variants: Vec<ServiceVariant>,
}

/// A provider account with the services it delivers.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDetail {
    #[serde(flatten)]
    pub provider: User,
    pub services: Vec<ServiceSummary>,
}

/// A schedule slot with its provider and cabinet resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDetail {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub provider: UserSummary,
    pub cabinet: Option<Cabinet>,
}

/// A cabinet with every slot taking place in it.
#[derive(Debug, Clone, Serialize)]
pub struct CabinetDetail {
    #[serde(flatten)]
    pub cabinet: Cabinet,
    pub schedules: Vec<ScheduleDetail>,
}

/// A reservation with the client, slot, variant and service name resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub client: UserSummary,
    pub schedule: Schedule,
    pub provider: UserSummary,
    pub variant: ServiceVariant,
    pub service_name: String,
}

/// What a logged-in client sees on their dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDashboard {
    pub profile: User,
    pub upcoming: Vec<ReservationDetail>,
    pub past: Vec<ReservationDetail>,
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub users: u64,
    pub services: u64,
    pub cabinets: u64,
    pub providers: u64,
    pub schedules: u64,
    pub upcoming_reservations: u64,
    pub recent_reservations: Vec<ReservationDetail>,
}

pub(crate) fn missing(entity: &'static str, id: impl ToString) -> WellbookError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

pub(crate) async fn service_detail<U, V>(
    users: &U,
    variants: &V,
    service: Service,
) -> Result<ServiceDetail, WellbookError>
where
    U: UserRepository,
    V: VariantRepository,
{
    let mut providers = Vec::with_capacity(service.provider_ids.len());
    for id in &service.provider_ids {
        if let Some(user) = users.get_by_id(*id).await? {
            providers.push(user.summary());
        }
    }
    let variants = variants.find_by_service(service.id).await?;
    Ok(ServiceDetail {
        service,
        providers,
        variants,
    })
}

pub(crate) async fn schedule_detail<U, C>(
    users: &U,
    cabinets: &C,
    schedule: Schedule,
) -> Result<ScheduleDetail, WellbookError>
where
    U: UserRepository,
    C: CabinetRepository,
{
    let provider = users
        .get_by_id(schedule.provider_id)
        .await?
        .ok_or_else(|| missing("Provider", schedule.provider_id))?
        .summary();
    let cabinet = match schedule.cabinet_id {
        Some(id) => cabinets.get_by_id(id).await?,
        None => None,
    };
    Ok(ScheduleDetail {
        schedule,
        provider,
        cabinet,
    })
}

pub(crate) async fn reservation_detail<U, SC, V, S>(
    users: &U,
    schedules: &SC,
    variants: &V,
    services: &S,
    reservation: Reservation,
) -> Result<ReservationDetail, WellbookError>
where
    U: UserRepository,
    SC: crate::ports::ScheduleRepository,
    V: VariantRepository,
    S: ServiceRepository,
{
    let client = users
        .get_by_id(reservation.client_id)
        .await?
        .ok_or_else(|| missing("Client", reservation.client_id))?
        .summary();
    let schedule = schedules
        .get_by_id(reservation.schedule_id)
        .await?
        .ok_or_else(|| missing("Schedule", reservation.schedule_id))?;
    let provider = users
        .get_by_id(schedule.provider_id)
        .await?
        .ok_or_else(|| missing("Provider", schedule.provider_id))?
        .summary();
    let variant = variants
        .get_by_id(reservation.service_variant_id)
        .await?
        .ok_or_else(|| missing("Service variant", reservation.service_variant_id))?;
    let service_name = services
        .get_by_id(variant.service_id)
        .await?
        .map(|service| service.name)
        .ok_or_else(|| missing("Service", variant.service_id))?;
    Ok(ReservationDetail {
        reservation,
        client,
        schedule,
        provider,
        variant,
        service_name,
    })
}

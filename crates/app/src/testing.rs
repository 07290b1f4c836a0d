//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;

use wellbook_domain::cabinet::Cabinet;
use wellbook_domain::error::{AuthError, ConflictError, WellbookError};
use wellbook_domain::id::{CabinetId, ReservationId, ScheduleId, ServiceId, UserId, VariantId};
use wellbook_domain::reservation::Reservation;
use wellbook_domain::schedule::{Schedule, ScheduleStatus};
use wellbook_domain::service::Service;
use wellbook_domain::session::Session;
use wellbook_domain::time::{Timestamp, now};
use wellbook_domain::user::{Role, User};
use wellbook_domain::variant::ServiceVariant;

use crate::ports::{
    CabinetRepository, IssuedToken, PasswordHasher, ReservationFilter, ReservationRepository,
    ScheduleFilter, ScheduleRepository, ServiceRepository, SlotWindow, TokenIssuer,
    UserRepository, VariantRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    services: HashMap<ServiceId, Service>,
    variants: HashMap<VariantId, ServiceVariant>,
    cabinets: HashMap<CabinetId, Cabinet>,
    schedules: HashMap<ScheduleId, Schedule>,
    reservations: HashMap<ReservationId, Reservation>,
    broken_assignments: bool,
}

/// One shared set of tables; every clone sees the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn insert_user(&self, user: User) -> User {
        self.lock().users.insert(user.id, user.clone());
        user
    }

    pub fn insert_service(&self, service: Service) -> Service {
        self.lock().services.insert(service.id, service.clone());
        service
    }

    pub fn insert_variant(&self, variant: ServiceVariant) -> ServiceVariant {
        self.lock().variants.insert(variant.id, variant.clone());
        variant
    }

    pub fn insert_cabinet(&self, cabinet: Cabinet) -> Cabinet {
        self.lock().cabinets.insert(cabinet.id, cabinet.clone());
        cabinet
    }

    pub fn insert_schedule(&self, schedule: Schedule) -> Schedule {
        self.lock().schedules.insert(schedule.id, schedule.clone());
        schedule
    }

    pub fn schedule(&self, id: ScheduleId) -> Option<Schedule> {
        self.lock().schedules.get(&id).cloned()
    }

    /// Make every later `assign_provider` call fail with a storage error.
    pub fn break_assignments(&self) {
        self.lock().broken_assignments = true;
    }
}

fn count<T>(items: impl Iterator<Item = T>) -> u64 {
    u64::try_from(items.count()).unwrap()
}

impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, WellbookError> {
        Ok(self.insert_user(user))
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, WellbookError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, WellbookError> {
        Ok(self.lock().users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>, WellbookError> {
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>, WellbookError> {
        Ok(self
            .lock()
            .users
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn update(&self, user: User) -> Result<User, WellbookError> {
        Ok(self.insert_user(user))
    }

    async fn delete(&self, id: UserId) -> Result<(), WellbookError> {
        self.lock().users.remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, WellbookError> {
        Ok(count(self.lock().users.values()))
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, WellbookError> {
        Ok(count(self.lock().users.values().filter(|u| u.role == role)))
    }
}

impl ServiceRepository for InMemoryStore {
    async fn create(&self, service: Service) -> Result<Service, WellbookError> {
        Ok(self.insert_service(service))
    }

    async fn get_by_id(&self, id: ServiceId) -> Result<Option<Service>, WellbookError> {
        Ok(self.lock().services.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Service>, WellbookError> {
        Ok(self.lock().services.values().find(|s| s.name == name).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Service>, WellbookError> {
        Ok(self.lock().services.values().cloned().collect())
    }

    async fn find_by_provider(&self, provider_id: UserId) -> Result<Vec<Service>, WellbookError> {
        Ok(self
            .lock()
            .services
            .values()
            .filter(|s| s.is_offered_by(provider_id))
            .cloned()
            .collect())
    }

    async fn update(&self, service: Service) -> Result<Service, WellbookError> {
        Ok(self.insert_service(service))
    }

    async fn assign_provider(
        &self,
        provider_id: UserId,
        service_ids: &[ServiceId],
    ) -> Result<(), WellbookError> {
        let mut tables = self.lock();
        if tables.broken_assignments {
            return Err(WellbookError::Storage("service_providers unavailable".into()));
        }
        for service in tables.services.values_mut() {
            service.provider_ids.retain(|id| *id != provider_id);
            if service_ids.contains(&service.id) {
                service.provider_ids.push(provider_id);
            }
        }
        Ok(())
    }

    async fn delete(&self, id: ServiceId) -> Result<(), WellbookError> {
        let mut tables = self.lock();
        tables.services.remove(&id);
        tables.variants.retain(|_, v| v.service_id != id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, WellbookError> {
        Ok(count(self.lock().services.values()))
    }
}

impl VariantRepository for InMemoryStore {
    async fn create(&self, variant: ServiceVariant) -> Result<ServiceVariant, WellbookError> {
        Ok(self.insert_variant(variant))
    }

    async fn get_by_id(&self, id: VariantId) -> Result<Option<ServiceVariant>, WellbookError> {
        Ok(self.lock().variants.get(&id).cloned())
    }

    async fn find_by_service(
        &self,
        service_id: ServiceId,
    ) -> Result<Vec<ServiceVariant>, WellbookError> {
        let mut variants: Vec<_> = self
            .lock()
            .variants
            .values()
            .filter(|v| v.service_id == service_id)
            .cloned()
            .collect();
        variants.sort_by_key(|v| v.duration_minutes);
        Ok(variants)
    }

    async fn update(&self, variant: ServiceVariant) -> Result<ServiceVariant, WellbookError> {
        Ok(self.insert_variant(variant))
    }

    async fn delete(&self, id: VariantId) -> Result<(), WellbookError> {
        self.lock().variants.remove(&id);
        Ok(())
    }
}

impl CabinetRepository for InMemoryStore {
    async fn create(&self, cabinet: Cabinet) -> Result<Cabinet, WellbookError> {
        Ok(self.insert_cabinet(cabinet))
    }

    async fn get_by_id(&self, id: CabinetId) -> Result<Option<Cabinet>, WellbookError> {
        Ok(self.lock().cabinets.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Cabinet>, WellbookError> {
        Ok(self.lock().cabinets.values().find(|c| c.name == name).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Cabinet>, WellbookError> {
        Ok(self.lock().cabinets.values().cloned().collect())
    }

    async fn update(&self, cabinet: Cabinet) -> Result<Cabinet, WellbookError> {
        Ok(self.insert_cabinet(cabinet))
    }

    async fn delete(&self, id: CabinetId) -> Result<(), WellbookError> {
        let mut tables = self.lock();
        tables.cabinets.remove(&id);
        for schedule in tables.schedules.values_mut() {
            if schedule.cabinet_id == Some(id) {
                schedule.cabinet_id = None;
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, WellbookError> {
        Ok(count(self.lock().cabinets.values()))
    }
}

impl ScheduleRepository for InMemoryStore {
    async fn create(&self, schedule: Schedule) -> Result<Schedule, WellbookError> {
        Ok(self.insert_schedule(schedule))
    }

    async fn get_by_id(&self, id: ScheduleId) -> Result<Option<Schedule>, WellbookError> {
        Ok(self.schedule(id))
    }

    async fn find(&self, filter: ScheduleFilter) -> Result<Vec<Schedule>, WellbookError> {
        let mut found: Vec<_> = self
            .lock()
            .schedules
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        found.sort_by_key(|s| s.start_time);
        Ok(found)
    }

    async fn find_colliding(&self, window: SlotWindow) -> Result<Vec<Schedule>, WellbookError> {
        Ok(self
            .lock()
            .schedules
            .values()
            .filter(|s| window.collides_with(s))
            .cloned()
            .collect())
    }

    async fn update(&self, schedule: Schedule) -> Result<Schedule, WellbookError> {
        Ok(self.insert_schedule(schedule))
    }

    async fn delete(&self, id: ScheduleId) -> Result<(), WellbookError> {
        self.lock().schedules.remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, WellbookError> {
        Ok(count(self.lock().schedules.values()))
    }
}

impl ReservationRepository for InMemoryStore {
    async fn book(&self, reservation: Reservation) -> Result<Reservation, WellbookError> {
        let mut tables = self.lock();
        let slot = tables
            .schedules
            .get_mut(&reservation.schedule_id)
            .filter(|s| s.status.is_bookable())
            .ok_or(ConflictError::SlotUnavailable)?;
        slot.status = ScheduleStatus::Booked;
        tables
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn get_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, WellbookError> {
        Ok(self.lock().reservations.get(&id).cloned())
    }

    async fn get_by_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<Reservation>, WellbookError> {
        Ok(self
            .lock()
            .reservations
            .values()
            .find(|r| r.schedule_id == schedule_id)
            .cloned())
    }

    async fn find(&self, filter: ReservationFilter) -> Result<Vec<Reservation>, WellbookError> {
        let tables = self.lock();
        let mut found: Vec<_> = tables
            .reservations
            .values()
            .filter(|r| filter.client_id.is_none_or(|id| r.client_id == id))
            .filter(|r| {
                filter.starts_after.is_none_or(|from| {
                    tables
                        .schedules
                        .get(&r.schedule_id)
                        .is_some_and(|s| s.start_time >= from)
                })
            })
            .cloned()
            .collect();
        found.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(found)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Reservation>, WellbookError> {
        let mut all = ReservationRepository::find(self, ReservationFilter::default()).await?;
        all.truncate(limit);
        Ok(all)
    }

    async fn cancel(&self, id: ReservationId) -> Result<(), WellbookError> {
        let mut tables = self.lock();
        if let Some(reservation) = tables.reservations.remove(&id) {
            if let Some(slot) = tables.schedules.get_mut(&reservation.schedule_id) {
                slot.status = ScheduleStatus::Available;
            }
        }
        Ok(())
    }

    async fn count_upcoming(&self, from: Timestamp) -> Result<u64, WellbookError> {
        let filter = ReservationFilter {
            client_id: None,
            starts_after: Some(from),
        };
        let upcoming = ReservationRepository::find(self, filter).await?;
        Ok(count(upcoming.iter()))
    }
}

/// Reversible "hash" so tests stay fast.
#[derive(Clone, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, WellbookError> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, WellbookError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Unsigned `token:<user id>:<role>` tokens.
#[derive(Clone, Default)]
pub struct PlainTokens;

impl TokenIssuer for PlainTokens {
    fn issue(&self, user: &User) -> Result<IssuedToken, WellbookError> {
        Ok(IssuedToken {
            token: format!("token:{}:{}", user.id, user.role),
            expires_at: now() + Duration::hours(1),
        })
    }

    fn verify(&self, token: &str) -> Result<Session, WellbookError> {
        let mut parts = token.split(':');
        let (Some("token"), Some(id), Some(role), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::InvalidToken.into());
        };
        Ok(Session {
            user_id: id.parse().map_err(|_| AuthError::InvalidToken)?,
            role: role.parse().map_err(|_| AuthError::InvalidToken)?,
            expires_at: now() + Duration::hours(1),
        })
    }
}

/// Build a user with the given role and a `hashed:secret123` password.
pub fn user(email: &str, role: Role) -> User {
    User::builder()
        .email(email)
        .name(email.split('@').next().unwrap_or_default())
        .role(role)
        .password_hash("hashed:secret123")
        .build()
        .unwrap()
}

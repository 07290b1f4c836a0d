//! Fixtures shared by the repository tests.

use chrono::{Duration, TimeZone, Utc};

use wellbook_app::ports::{ScheduleRepository, UserRepository};
use wellbook_domain::id::UserId;
use wellbook_domain::schedule::Schedule;
use wellbook_domain::time::Timestamp;
use wellbook_domain::user::{Role, User};

use crate::pool::{Config, Repositories};

pub(crate) async fn setup() -> Repositories {
    Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .unwrap()
    .repositories()
}

pub(crate) async fn user(repos: &Repositories, email: &str, role: Role) -> User {
    let user = User::builder()
        .email(email)
        .name("Test")
        .role(role)
        .password_hash("$2b$04$hash")
        .build()
        .unwrap();
    repos.users.create(user).await.unwrap()
}

pub(crate) fn at(hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2030, 1, 7, hour, 0, 0).unwrap()
}

pub(crate) async fn slot(repos: &Repositories, provider: UserId, start: Timestamp) -> Schedule {
    let schedule = Schedule::builder()
        .provider_id(provider)
        .between(start, start + Duration::hours(1))
        .build()
        .unwrap();
    repos.schedules.create(schedule).await.unwrap()
}

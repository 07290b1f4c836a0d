//! Reference data inserted on startup.
//!
//! Every record is looked up by its natural key first (e-mail or name), so
//! running the seed against an already populated database changes nothing.

use wellbook_adapter_storage_sqlite_sqlx::pool::Repositories;
use wellbook_app::ports::{
    CabinetRepository, PasswordHasher, ServiceRepository, UserRepository, VariantRepository,
};
use wellbook_domain::cabinet::Cabinet;
use wellbook_domain::error::WellbookError;
use wellbook_domain::id::ServiceId;
use wellbook_domain::service::Service;
use wellbook_domain::user::{Role, User};
use wellbook_domain::variant::ServiceVariant;

use crate::config::SeedConfig;

const SECOND_ADMIN_EMAIL: &str = "admin2@example.com";
const PROVIDER_EMAIL: &str = "provider@example.com";

struct CatalogEntry {
    name: &'static str,
    description: &'static str,
    image: &'static str,
    duration_minutes: u32,
    price: f64,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Soins Generaux",
        description: "General wellbeing care",
        image: "soins.jpg",
        duration_minutes: 60,
        price: 50.0,
    },
    CatalogEntry {
        name: "Pressotherapie",
        description: "Pressotherapy for lymphatic drainage",
        image: "presso.jpg",
        duration_minutes: 45,
        price: 40.0,
    },
    CatalogEntry {
        name: "Anti-Stress",
        description: "Stress relief therapy",
        image: "antistress.jpg",
        duration_minutes: 90,
        price: 70.0,
    },
    CatalogEntry {
        name: "Lumino Visage & Corps",
        description: "Lumino therapy for face and body",
        image: "lumino.jpg",
        duration_minutes: 75,
        price: 60.0,
    },
    CatalogEntry {
        name: "Aromatherapie",
        description: "Aromatherapy session",
        image: "aroma.jpg",
        duration_minutes: 60,
        price: 55.0,
    },
    CatalogEntry {
        name: "Soins Lumino Visage",
        description: "Lumino facial care",
        image: "lumino-visage.jpg",
        duration_minutes: 50,
        price: 45.0,
    },
];

/// What a seed run actually inserted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub services: usize,
    pub cabinets: usize,
}

impl SeedReport {
    /// Whether the run left the database untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users == 0 && self.services == 0 && self.cabinets == 0
    }
}

/// Insert the admins, the catalog, the main cabinet and the default provider
/// when they are missing.
///
/// # Errors
///
/// Returns the first repository or hashing failure.
pub async fn run<H: PasswordHasher>(
    repos: &Repositories,
    hasher: &H,
    settings: &SeedConfig,
) -> Result<SeedReport, WellbookError> {
    let mut report = SeedReport::default();
    let password_hash = hasher.hash(&settings.admin_password).await?;

    for (email, name) in [
        (settings.admin_email.as_str(), "Admin User"),
        (SECOND_ADMIN_EMAIL, "Admin Two"),
    ] {
        if ensure_user(repos, email, name, Role::Admin, &password_hash).await? {
            report.users += 1;
        }
    }

    let mut service_ids: Vec<ServiceId> = Vec::with_capacity(CATALOG.len());
    for entry in CATALOG {
        if let Some(existing) = repos.services.get_by_name(entry.name).await? {
            service_ids.push(existing.id);
            continue;
        }
        let service = repos
            .services
            .create(
                Service::builder()
                    .name(entry.name)
                    .description(entry.description)
                    .image_url(format!("https://example.com/{}", entry.image))
                    .build()?,
            )
            .await?;
        repos
            .variants
            .create(ServiceVariant::new(
                service.id,
                entry.duration_minutes,
                entry.price,
            )?)
            .await?;
        service_ids.push(service.id);
        report.services += 1;
    }

    if repos.cabinets.get_by_name("Main Cabinet").await?.is_none() {
        repos
            .cabinets
            .create(
                Cabinet::builder()
                    .name("Main Cabinet")
                    .address("123 Wellbeing St")
                    .description("Fully equipped with therapy tools and relaxing ambiance")
                    .build()?,
            )
            .await?;
        report.cabinets += 1;
    }

    if repos.users.get_by_email(PROVIDER_EMAIL).await?.is_none() {
        let provider = repos
            .users
            .create(
                User::builder()
                    .email(PROVIDER_EMAIL)
                    .name("Provider One")
                    .phone("+1234567890")
                    .role(Role::Provider)
                    .password_hash(password_hash.as_str())
                    .build()?,
            )
            .await?;
        repos
            .services
            .assign_provider(provider.id, &service_ids)
            .await?;
        report.users += 1;
    }

    tracing::info!(
        users = report.users,
        services = report.services,
        cabinets = report.cabinets,
        "seed complete"
    );
    Ok(report)
}

async fn ensure_user(
    repos: &Repositories,
    email: &str,
    name: &str,
    role: Role,
    password_hash: &str,
) -> Result<bool, WellbookError> {
    if repos.users.get_by_email(email).await?.is_some() {
        return Ok(false);
    }
    repos
        .users
        .create(
            User::builder()
                .email(email)
                .name(name)
                .role(role)
                .password_hash(password_hash)
                .build()?,
        )
        .await?;
    Ok(true)
}

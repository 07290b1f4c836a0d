//! Cabinet service: use-cases for managing treatment rooms.

use serde::Deserialize;

use wellbook_domain::cabinet::Cabinet;
use wellbook_domain::error::{ConflictError, NotFoundError, WellbookError};
use wellbook_domain::id::CabinetId;

use crate::ports::{CabinetRepository, ScheduleFilter, ScheduleRepository, UserRepository};
use crate::views::{CabinetDetail, schedule_detail};

/// Body of a cabinet create or update.
#[derive(Debug, Clone, Deserialize)]
pub struct CabinetInput {
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// Application service for cabinet CRUD operations.
pub struct CabinetService<C, SC, U> {
    cabinets: C,
    schedules: SC,
    users: U,
}

impl<C, SC, U> CabinetService<C, SC, U>
where
    C: CabinetRepository,
    SC: ScheduleRepository,
    U: UserRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(cabinets: C, schedules: SC, users: U) -> Self {
        Self {
            cabinets,
            schedules,
            users,
        }
    }

    /// Create a new cabinet after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::Validation`] if the name is blank, or
    /// [`ConflictError::Duplicate`] if it is taken.
    #[tracing::instrument(skip(self))]
    pub async fn create_cabinet(&self, input: CabinetInput) -> Result<Cabinet, WellbookError> {
        let cabinet = build(CabinetId::new(), input)?;
        if self.cabinets.get_by_name(&cabinet.name).await?.is_some() {
            return Err(ConflictError::Duplicate { entity: "Cabinet" }.into());
        }
        self.cabinets.create(cabinet).await
    }

    /// Look up a cabinet with the slots taking place in it.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] when no cabinet with `id` exists.
    pub async fn get_cabinet(&self, id: CabinetId) -> Result<CabinetDetail, WellbookError> {
        let cabinet = self.find_cabinet(id).await?;
        self.detail(cabinet).await
    }

    /// List all cabinets with their slots, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn list_cabinets(&self) -> Result<Vec<CabinetDetail>, WellbookError> {
        let mut cabinets = self.cabinets.get_all().await?;
        cabinets.sort_by(|a, b| a.name.cmp(&b.name));
        let mut details = Vec::with_capacity(cabinets.len());
        for cabinet in cabinets {
            details.push(self.detail(cabinet).await?);
        }
        Ok(details)
    }

    /// Replace a cabinet's fields.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] for an unknown id,
    /// [`WellbookError::Validation`] for a blank name, or
    /// [`ConflictError::Duplicate`] when another cabinet has the name.
    #[tracing::instrument(skip(self))]
    pub async fn update_cabinet(
        &self,
        id: CabinetId,
        input: CabinetInput,
    ) -> Result<Cabinet, WellbookError> {
        self.find_cabinet(id).await?;
        let cabinet = build(id, input)?;
        if let Some(other) = self.cabinets.get_by_name(&cabinet.name).await? {
            if other.id != id {
                return Err(ConflictError::Duplicate { entity: "Cabinet" }.into());
            }
        }
        self.cabinets.update(cabinet).await
    }

    /// Delete a cabinet; its slots stay, detached from any cabinet.
    ///
    /// # Errors
    ///
    /// Returns [`WellbookError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn delete_cabinet(&self, id: CabinetId) -> Result<(), WellbookError> {
        self.find_cabinet(id).await?;
        self.cabinets.delete(id).await
    }

    async fn find_cabinet(&self, id: CabinetId) -> Result<Cabinet, WellbookError> {
        self.cabinets.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Cabinet",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn detail(&self, cabinet: Cabinet) -> Result<CabinetDetail, WellbookError> {
        let slots = self
            .schedules
            .find(ScheduleFilter {
                cabinet_id: Some(cabinet.id),
                ..ScheduleFilter::default()
            })
            .await?;
        let mut schedules = Vec::with_capacity(slots.len());
        for slot in slots {
            schedules.push(schedule_detail(&self.users, &self.cabinets, slot).await?);
        }
        Ok(CabinetDetail { cabinet, schedules })
    }
}

fn build(id: CabinetId, input: CabinetInput) -> Result<Cabinet, WellbookError> {
    let mut builder = Cabinet::builder().id(id).name(input.name.trim());
    if let Some(address) = input.address {
        builder = builder.address(address);
    }
    if let Some(description) = input.description {
        builder = builder.description(description);
    }
    builder.build()
}

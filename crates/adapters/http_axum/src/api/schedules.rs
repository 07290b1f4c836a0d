//! Schedule slot administration.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use wellbook_app::ports::ScheduleFilter;
use wellbook_app::services::schedule_service::ScheduleInput;
use wellbook_app::views::ScheduleDetail;
use wellbook_domain::error::{ValidationError, WellbookError};
use wellbook_domain::id::ScheduleId;
use wellbook_domain::time::Date;

use crate::api::{DeleteResponse, JsonResponse, parse_id};
use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::{AppState, Backend};

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub provider_id: Option<String>,
    pub cabinet_id: Option<String>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<ScheduleFilter, ApiError> {
        let date = self
            .date
            .map(|raw| {
                raw.parse::<Date>()
                    .map_err(|_| WellbookError::from(ValidationError::InvalidDate(raw.clone())))
            })
            .transpose()?;
        Ok(ScheduleFilter {
            provider_id: self.provider_id.as_deref().map(parse_id).transpose()?,
            cabinet_id: self.cabinet_id.as_deref().map(parse_id).transpose()?,
            date,
        })
    }
}

/// `GET /admin/schedules`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<JsonResponse<Vec<ScheduleDetail>>, ApiError> {
    let filter = query.into_filter()?;
    let schedules = state.schedule_service.list_schedules(filter).await?;
    Ok(JsonResponse::Ok(Json(schedules)))
}

/// `GET /admin/schedules/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<ScheduleDetail>, ApiError> {
    let schedule_id: ScheduleId = parse_id(&id)?;
    let schedule = state.schedule_service.get_schedule(schedule_id).await?;
    Ok(JsonResponse::Ok(Json(schedule)))
}

/// `POST /admin/schedules`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    JsonBody(input): JsonBody<ScheduleInput>,
) -> Result<JsonResponse<ScheduleDetail>, ApiError> {
    let created = state.schedule_service.create_schedule(input).await?;
    Ok(JsonResponse::Created(Json(created)))
}

/// `PUT /admin/schedules/{id}`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ScheduleInput>,
) -> Result<JsonResponse<ScheduleDetail>, ApiError> {
    let schedule_id: ScheduleId = parse_id(&id)?;
    let updated = state
        .schedule_service
        .update_schedule(schedule_id, input)
        .await?;
    Ok(JsonResponse::Ok(Json(updated)))
}

/// `DELETE /admin/schedules/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let schedule_id: ScheduleId = parse_id(&id)?;
    state.schedule_service.delete_schedule(schedule_id).await?;
    Ok(DeleteResponse::NoContent)
}

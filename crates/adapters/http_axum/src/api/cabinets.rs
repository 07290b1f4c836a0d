//! Cabinet administration.

use axum::Json;
use axum::extract::{Path, State};

use wellbook_app::services::cabinet_service::CabinetInput;
use wellbook_app::views::CabinetDetail;
use wellbook_domain::cabinet::Cabinet;
use wellbook_domain::id::CabinetId;

use crate::api::{DeleteResponse, JsonResponse, parse_id};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Backend};

/// `GET /admin/cabinets`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<JsonResponse<Vec<CabinetDetail>>, ApiError> {
    let cabinets = state.cabinet_service.list_cabinets().await?;
    Ok(JsonResponse::Ok(Json(cabinets)))
}

/// `GET /admin/cabinets/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<CabinetDetail>, ApiError> {
    let cabinet_id: CabinetId = parse_id(&id)?;
    let cabinet = state.cabinet_service.get_cabinet(cabinet_id).await?;
    Ok(JsonResponse::Ok(Json(cabinet)))
}

/// `POST /admin/cabinets`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    JsonBody(input): JsonBody<CabinetInput>,
) -> Result<JsonResponse<Cabinet>, ApiError> {
    let created = state.cabinet_service.create_cabinet(input).await?;
    Ok(JsonResponse::Created(Json(created)))
}

/// `PUT /admin/cabinets/{id}`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<CabinetInput>,
) -> Result<JsonResponse<Cabinet>, ApiError> {
    let cabinet_id: CabinetId = parse_id(&id)?;
    let updated = state.cabinet_service.update_cabinet(cabinet_id, input).await?;
    Ok(JsonResponse::Ok(Json(updated)))
}

/// `DELETE /admin/cabinets/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let cabinet_id: CabinetId = parse_id(&id)?;
    state.cabinet_service.delete_cabinet(cabinet_id).await?;
    Ok(DeleteResponse::NoContent)
}

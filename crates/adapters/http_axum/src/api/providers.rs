//! Provider administration.

use axum::Json;
use axum::extract::{Path, State};

use wellbook_app::services::provider_service::ProviderInput;
use wellbook_app::views::ProviderDetail;
use wellbook_domain::id::UserId;

use crate::api::{DeleteResponse, JsonResponse, parse_id};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Backend};

/// `GET /admin/providers`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<JsonResponse<Vec<ProviderDetail>>, ApiError> {
    let providers = state.provider_service.list_providers().await?;
    Ok(JsonResponse::Ok(Json(providers)))
}

/// `GET /admin/providers/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<ProviderDetail>, ApiError> {
    let provider_id: UserId = parse_id(&id)?;
    let provider = state.provider_service.get_provider(provider_id).await?;
    Ok(JsonResponse::Ok(Json(provider)))
}

/// `POST /admin/providers`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    JsonBody(input): JsonBody<ProviderInput>,
) -> Result<JsonResponse<ProviderDetail>, ApiError> {
    let created = state.provider_service.create_provider(input).await?;
    Ok(JsonResponse::Created(Json(created)))
}

/// `PUT /admin/providers/{id}`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ProviderInput>,
) -> Result<JsonResponse<ProviderDetail>, ApiError> {
    let provider_id: UserId = parse_id(&id)?;
    let updated = state
        .provider_service
        .update_provider(provider_id, input)
        .await?;
    Ok(JsonResponse::Ok(Json(updated)))
}

/// `DELETE /admin/providers/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let provider_id: UserId = parse_id(&id)?;
    state.provider_service.delete_provider(provider_id).await?;
    Ok(DeleteResponse::NoContent)
}

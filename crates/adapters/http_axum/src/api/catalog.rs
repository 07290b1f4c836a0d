//! Services and their variants: the public catalog and its administration.

use axum::Json;
use axum::extract::{Path, State};

use wellbook_app::services::catalog_service::{ServiceInput, VariantInput};
use wellbook_app::views::ServiceDetail;
use wellbook_domain::id::{ServiceId, VariantId};
use wellbook_domain::variant::ServiceVariant;

use crate::api::{DeleteResponse, JsonResponse, parse_id};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Backend};

/// `GET /services` and `GET /admin/services`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<JsonResponse<Vec<ServiceDetail>>, ApiError> {
    let services = state.catalog_service.list_services().await?;
    Ok(JsonResponse::Ok(Json(services)))
}

/// `GET /admin/services/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<ServiceDetail>, ApiError> {
    let service_id: ServiceId = parse_id(&id)?;
    let service = state.catalog_service.get_service(service_id).await?;
    Ok(JsonResponse::Ok(Json(service)))
}

/// `POST /admin/services`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    JsonBody(input): JsonBody<ServiceInput>,
) -> Result<JsonResponse<ServiceDetail>, ApiError> {
    let created = state.catalog_service.create_service(input).await?;
    Ok(JsonResponse::Created(Json(created)))
}

/// `PUT /admin/services/{id}`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ServiceInput>,
) -> Result<JsonResponse<ServiceDetail>, ApiError> {
    let service_id: ServiceId = parse_id(&id)?;
    let updated = state.catalog_service.update_service(service_id, input).await?;
    Ok(JsonResponse::Ok(Json(updated)))
}

/// `DELETE /admin/services/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let service_id: ServiceId = parse_id(&id)?;
    state.catalog_service.delete_service(service_id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /admin/services/{id}/variants`
pub async fn list_variants<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<Vec<ServiceVariant>>, ApiError> {
    let service_id: ServiceId = parse_id(&id)?;
    let variants = state.catalog_service.list_variants(service_id).await?;
    Ok(JsonResponse::Ok(Json(variants)))
}

/// `POST /admin/services/{id}/variants`
pub async fn create_variant<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<VariantInput>,
) -> Result<JsonResponse<ServiceVariant>, ApiError> {
    let service_id: ServiceId = parse_id(&id)?;
    let created = state.catalog_service.create_variant(service_id, input).await?;
    Ok(JsonResponse::Created(Json(created)))
}

/// `PUT /admin/services/{id}/variants/{variant_id}`
pub async fn update_variant<B: Backend>(
    State(state): State<AppState<B>>,
    Path((id, variant_id)): Path<(String, String)>,
    JsonBody(input): JsonBody<VariantInput>,
) -> Result<JsonResponse<ServiceVariant>, ApiError> {
    let service_id: ServiceId = parse_id(&id)?;
    let variant_id: VariantId = parse_id(&variant_id)?;
    let updated = state
        .catalog_service
        .update_variant(service_id, variant_id, input)
        .await?;
    Ok(JsonResponse::Ok(Json(updated)))
}

/// `DELETE /admin/services/{id}/variants/{variant_id}`
pub async fn delete_variant<B: Backend>(
    State(state): State<AppState<B>>,
    Path((id, variant_id)): Path<(String, String)>,
) -> Result<DeleteResponse, ApiError> {
    let service_id: ServiceId = parse_id(&id)?;
    let variant_id: VariantId = parse_id(&variant_id)?;
    state
        .catalog_service
        .delete_variant(service_id, variant_id)
        .await?;
    Ok(DeleteResponse::NoContent)
}

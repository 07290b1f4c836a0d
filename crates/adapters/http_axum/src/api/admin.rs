//! Admin dashboard counters and user look-ups.

use axum::Json;
use axum::extract::{Path, State};

use wellbook_app::views::Statistics;
use wellbook_domain::id::UserId;
use wellbook_domain::user::User;

use crate::api::{JsonResponse, parse_id};
use crate::error::ApiError;
use crate::state::{AppState, Backend};

/// `GET /admin/statistics`
pub async fn statistics<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<JsonResponse<Statistics>, ApiError> {
    let statistics = state.statistics_service.statistics().await?;
    Ok(JsonResponse::Ok(Json(statistics)))
}

/// `GET /admin/users`
pub async fn list_users<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<JsonResponse<Vec<User>>, ApiError> {
    let users = state.user_service.list_users().await?;
    Ok(JsonResponse::Ok(Json(users)))
}

/// `GET /admin/users/{id}`
pub async fn get_user<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<User>, ApiError> {
    let user_id: UserId = parse_id(&id)?;
    let user = state.user_service.get_user(user_id).await?;
    Ok(JsonResponse::Ok(Json(user)))
}

/// `GET /admin/clients/{id}`
pub async fn get_client<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<User>, ApiError> {
    let user_id: UserId = parse_id(&id)?;
    let client = state.user_service.get_client(user_id).await?;
    Ok(JsonResponse::Ok(Json(client)))
}

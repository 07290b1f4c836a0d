//! Registration, login and the current-user endpoint.

use axum::Json;
use axum::extract::{Extension, State};
use serde::Deserialize;

use wellbook_app::services::auth_service::{AuthToken, NewAccount};
use wellbook_domain::session::Session;
use wellbook_domain::user::User;

use crate::api::JsonResponse;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Backend};

/// Request body for logging in.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register`
pub async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    JsonBody(account): JsonBody<NewAccount>,
) -> Result<JsonResponse<User>, ApiError> {
    let user = state.auth_service.register(account).await?;
    Ok(JsonResponse::Created(Json(user)))
}

/// `POST /auth/login`
pub async fn login<B: Backend>(
    State(state): State<AppState<B>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<JsonResponse<AuthToken>, ApiError> {
    let token = state.auth_service.login(&req.email, &req.password).await?;
    Ok(JsonResponse::Ok(Json(token)))
}

/// `GET /auth/me`
pub async fn me<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(session): Extension<Session>,
) -> Result<JsonResponse<User>, ApiError> {
    let user = state.auth_service.me(&session).await?;
    Ok(JsonResponse::Ok(Json(user)))
}

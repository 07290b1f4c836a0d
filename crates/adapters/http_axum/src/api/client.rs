//! Endpoints a logged-in client uses for themself.

use axum::Json;
use axum::extract::{Extension, Path, State};
use serde::Deserialize;

use wellbook_app::services::reservation_service::ReservationInput;
use wellbook_app::views::{ClientDashboard, ReservationDetail};
use wellbook_domain::id::{ReservationId, ScheduleId, VariantId};
use wellbook_domain::session::Session;

use crate::api::{DeleteResponse, JsonResponse, parse_id};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Backend};

/// Request body for booking a slot; the client is the caller.
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub service_variant_id: VariantId,
    pub schedule_id: ScheduleId,
    pub notes: Option<String>,
}

/// `GET /client/dashboard`
pub async fn dashboard<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(session): Extension<Session>,
) -> Result<JsonResponse<ClientDashboard>, ApiError> {
    let dashboard = state
        .reservation_service
        .client_dashboard(session.user_id)
        .await?;
    Ok(JsonResponse::Ok(Json(dashboard)))
}

/// `POST /client/reservations`
pub async fn book<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(session): Extension<Session>,
    JsonBody(req): JsonBody<BookingRequest>,
) -> Result<JsonResponse<ReservationDetail>, ApiError> {
    let input = ReservationInput {
        client_id: session.user_id,
        service_variant_id: req.service_variant_id,
        schedule_id: req.schedule_id,
        notes: req.notes,
    };
    let created = state.reservation_service.book_for_client(input).await?;
    Ok(JsonResponse::Created(Json(created)))
}

/// `DELETE /client/reservations/{id}`
pub async fn cancel<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let reservation_id: ReservationId = parse_id(&id)?;
    state
        .reservation_service
        .cancel_own(session.user_id, reservation_id)
        .await?;
    Ok(DeleteResponse::NoContent)
}

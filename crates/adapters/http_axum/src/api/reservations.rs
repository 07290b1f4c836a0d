//! Reservation administration.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use wellbook_app::ports::ReservationFilter;
use wellbook_app::services::reservation_service::ReservationInput;
use wellbook_app::views::ReservationDetail;
use wellbook_domain::id::ReservationId;
use wellbook_domain::time::now;

use crate::api::{DeleteResponse, JsonResponse, parse_id};
use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::{AppState, Backend};

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only reservations whose slot has not started yet.
    #[serde(default)]
    pub upcoming: bool,
    pub client_id: Option<String>,
}

/// `GET /admin/reservations`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<JsonResponse<Vec<ReservationDetail>>, ApiError> {
    let filter = ReservationFilter {
        client_id: query.client_id.as_deref().map(parse_id).transpose()?,
        starts_after: query.upcoming.then(now),
    };
    let reservations = state.reservation_service.list_reservations(filter).await?;
    Ok(JsonResponse::Ok(Json(reservations)))
}

/// `GET /admin/reservations/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<ReservationDetail>, ApiError> {
    let reservation_id: ReservationId = parse_id(&id)?;
    let reservation = state
        .reservation_service
        .get_reservation(reservation_id)
        .await?;
    Ok(JsonResponse::Ok(Json(reservation)))
}

/// `POST /admin/reservations`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    JsonBody(input): JsonBody<ReservationInput>,
) -> Result<JsonResponse<ReservationDetail>, ApiError> {
    let created = state.reservation_service.create_reservation(input).await?;
    Ok(JsonResponse::Created(Json(created)))
}

/// `DELETE /admin/reservations/{id}`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let reservation_id: ReservationId = parse_id(&id)?;
    state
        .reservation_service
        .cancel_reservation(reservation_id)
        .await?;
    Ok(DeleteResponse::NoContent)
}

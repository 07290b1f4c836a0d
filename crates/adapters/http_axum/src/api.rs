//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod admin;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod cabinets;
#[allow(clippy::missing_errors_doc)]
pub mod catalog;
#[allow(clippy::missing_errors_doc)]
pub mod client;
#[allow(clippy::missing_errors_doc)]
pub mod providers;
#[allow(clippy::missing_errors_doc)]
pub mod reservations;
#[allow(clippy::missing_errors_doc)]
pub mod schedules;

use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use wellbook_domain::error::{ValidationError, WellbookError};

use crate::error::ApiError;

/// Possible successful responses from a JSON endpoint.
pub enum JsonResponse<T> {
    Ok(Json<T>),
    Created(Json<T>),
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from a delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Parse an identifier taken from the path or the query string.
pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| WellbookError::from(ValidationError::InvalidIdentifier(raw.to_string())).into())
}

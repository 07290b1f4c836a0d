//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use wellbook_domain::error::{AuthError, WellbookError};

/// JSON error body returned by every endpoint.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps failures to an HTTP response with the appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    /// An error raised by the application layer.
    Domain(WellbookError),
    /// The request body or query string could not be decoded.
    Rejected(String),
}

impl From<WellbookError> for ApiError {
    fn from(err: WellbookError) -> Self {
        Self::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Forbidden => StatusCode::FORBIDDEN,
        AuthError::InvalidCredentials
        | AuthError::MissingToken
        | AuthError::InvalidToken
        | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Rejected(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Domain(WellbookError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(WellbookError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(WellbookError::Conflict(err)) => (StatusCode::CONFLICT, err.to_string()),
            Self::Domain(WellbookError::Auth(err)) => (auth_status(err), err.to_string()),
            Self::Domain(err @ (WellbookError::Storage(_) | WellbookError::Internal(_))) => {
                tracing::error!(error = ?err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

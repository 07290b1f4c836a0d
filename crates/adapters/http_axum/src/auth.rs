//! Bearer-token authentication and role gates.
//!
//! [`authenticate`] verifies the token and stores the resulting [`Session`]
//! in the request extensions; the role gates read it back from there, so
//! they must be layered inside `authenticate`.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use wellbook_domain::error::AuthError;
use wellbook_domain::session::Session;
use wellbook_domain::user::Role;

use crate::error::ApiError;
use crate::state::{AppState, Backend};

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject requests without a valid bearer token.
pub async fn authenticate<B: Backend>(
    State(state): State<AppState<B>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or(AuthError::MissingToken)?
        .to_owned();
    let session = state.auth_service.authenticate(&token).await?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

async fn require(role: Role, request: Request, next: Next) -> Result<Response, ApiError> {
    let session = request
        .extensions()
        .get::<Session>()
        .ok_or(AuthError::MissingToken)?;
    session.require_any(&[role])?;
    Ok(next.run(request).await)
}

/// Only let `ADMIN` sessions through.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require(Role::Admin, request, next).await
}

/// Only let `CLIENT` sessions through.
pub async fn require_client(request: Request, next: Next) -> Result<Response, ApiError> {
    require(Role::Client, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn should_extract_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn should_ignore_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("abc.def")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}

//! Axum router assembly.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::{admin, auth, cabinets, catalog, client, providers, reservations, schedules};
use crate::state::{AppState, Backend};

/// Build the top-level axum [`Router`].
///
/// Public routes sit at the root; `/auth/me`, `/client/*` and `/admin/*`
/// require a bearer token, the latter two also a matching role. When
/// `cors_origin` is set, browsers served from that origin may call the API.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<B: Backend>(state: AppState<B>, cors_origin: Option<HeaderValue>) -> Router {
    let authenticate = middleware::from_fn_with_state(state.clone(), crate::auth::authenticate::<B>);

    let router = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/services", get(catalog::list::<B>))
        .route("/auth/register", post(auth::register::<B>))
        .route("/auth/login", post(auth::login::<B>))
        .route(
            "/auth/me",
            get(auth::me::<B>).route_layer(authenticate.clone()),
        )
        .nest(
            "/client",
            client_routes::<B>()
                .route_layer(middleware::from_fn(crate::auth::require_client))
                .route_layer(authenticate.clone()),
        )
        .nest(
            "/admin",
            admin_routes::<B>()
                .route_layer(middleware::from_fn(crate::auth::require_admin))
                .route_layer(authenticate),
        )
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors_origin {
        Some(origin) => router.layer(cors(origin)),
        None => router,
    }
}

fn cors(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

fn client_routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        .route("/dashboard", get(client::dashboard::<B>))
        .route("/reservations", post(client::book::<B>))
        .route(
            "/reservations/{id}",
            axum::routing::delete(client::cancel::<B>),
        )
}

fn admin_routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        .route("/statistics", get(admin::statistics::<B>))
        .route("/users", get(admin::list_users::<B>))
        .route("/users/{id}", get(admin::get_user::<B>))
        .route("/clients/{id}", get(admin::get_client::<B>))
        // Catalog
        .route(
            "/services",
            get(catalog::list::<B>).post(catalog::create::<B>),
        )
        .route(
            "/services/{id}",
            get(catalog::get::<B>)
                .put(catalog::update::<B>)
                .delete(catalog::delete::<B>),
        )
        .route(
            "/services/{id}/variants",
            get(catalog::list_variants::<B>).post(catalog::create_variant::<B>),
        )
        .route(
            "/services/{id}/variants/{variant_id}",
            axum::routing::put(catalog::update_variant::<B>).delete(catalog::delete_variant::<B>),
        )
        // Cabinets
        .route(
            "/cabinets",
            get(cabinets::list::<B>).post(cabinets::create::<B>),
        )
        .route(
            "/cabinets/{id}",
            get(cabinets::get::<B>)
                .put(cabinets::update::<B>)
                .delete(cabinets::delete::<B>),
        )
        // Providers
        .route(
            "/providers",
            get(providers::list::<B>).post(providers::create::<B>),
        )
        .route(
            "/providers/{id}",
            get(providers::get::<B>)
                .put(providers::update::<B>)
                .delete(providers::delete::<B>),
        )
        // Schedules
        .route(
            "/schedules",
            get(schedules::list::<B>).post(schedules::create::<B>),
        )
        .route(
            "/schedules/{id}",
            get(schedules::get::<B>)
                .put(schedules::update::<B>)
                .delete(schedules::delete::<B>),
        )
        // Reservations
        .route(
            "/reservations",
            get(reservations::list::<B>).post(reservations::create::<B>),
        )
        .route(
            "/reservations/{id}",
            get(reservations::get::<B>).delete(reservations::delete::<B>),
        )
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the wellbook reservations API" }))
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Adapters;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Duration;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wellbook_adapter_auth_jwt::{BcryptHasher, JwtTokenIssuer};
    use wellbook_adapter_storage_sqlite_sqlx::pool::{Config, Repositories};
    use wellbook_adapter_storage_sqlite_sqlx::{
        SqliteCabinetRepository, SqliteReservationRepository, SqliteScheduleRepository,
        SqliteServiceRepository, SqliteUserRepository, SqliteVariantRepository,
    };
    use wellbook_app::ports::{PasswordHasher, UserRepository};
    use wellbook_domain::user::{Role, User};

    struct TestBackend;

    impl Backend for TestBackend {
        type Users = SqliteUserRepository;
        type Services = SqliteServiceRepository;
        type Variants = SqliteVariantRepository;
        type Cabinets = SqliteCabinetRepository;
        type Schedules = SqliteScheduleRepository;
        type Reservations = SqliteReservationRepository;
        type Hasher = BcryptHasher;
        type Tokens = JwtTokenIssuer;
    }

    async fn test_app() -> Router {
        let repos: Repositories = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
        .repositories();
        let hasher = BcryptHasher::new(4);
        let admin = User::builder()
            .email("admin@example.com")
            .name("Admin")
            .role(Role::Admin)
            .password_hash(hasher.hash("admin123").await.unwrap())
            .build()
            .unwrap();
        repos.users.create(admin).await.unwrap();

        let state = AppState::<TestBackend>::new(Adapters {
            users: repos.users,
            services: repos.services,
            variants: repos.variants,
            cabinets: repos.cabinets,
            schedules: repos.schedules,
            reservations: repos.reservations,
            hasher,
            tokens: JwtTokenIssuer::new("test_secret", Duration::minutes(60)),
        });
        build(state, Some(HeaderValue::from_static("http://localhost:3000")))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn login(app: &Router, email: &str, password: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn register_client(app: &Router, email: &str) -> String {
        let (status, _) = send(
            app,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": email, "password": "secret123", "name": "Jane" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        login(app, email, "secret123").await
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn should_welcome_and_serve_public_catalog() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("wellbook"));

        let (status, body) = send(&app, Method::GET, "/services", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn should_answer_cors_preflight_for_frontend_origin() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/admin/services")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn should_reject_missing_and_bad_tokens() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/admin/statistics", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "no token provided" }));

        let (status, body) =
            send(&app, Method::GET, "/auth/me", Some("not.a.token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "invalid token" }));
    }

    #[tokio::test]
    async fn should_gate_routes_by_role() {
        let app = test_app().await;
        let client = register_client(&app, "jane@example.com").await;
        let admin = login(&app, "admin@example.com", "admin123").await;

        let (status, body) = send(&app, Method::GET, "/admin/users", Some(&client), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "forbidden: insufficient role" }));

        let (status, _) = send(&app, Method::GET, "/client/dashboard", Some(&admin), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, Method::GET, "/admin/users", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert!(body[0].get("password_hash").is_none());

        let (status, body) = send(&app, Method::GET, "/auth/me", Some(&client), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "jane@example.com");
        assert_eq!(body["role"], "CLIENT");
    }

    #[tokio::test]
    async fn should_refuse_admin_self_registration_and_duplicates() {
        let app = test_app().await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "eve@example.com", "password": "secret123", "role": "ADMIN" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "admin@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "User already exists" }));

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "wrong-one" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "invalid credentials" }));
    }

    #[tokio::test]
    async fn should_report_malformed_input_as_json_bad_request() {
        let app = test_app().await;
        let admin = login(&app, "admin@example.com", "admin123").await;

        let (status, body) =
            send(&app, Method::GET, "/admin/cabinets/42", Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "invalid identifier: 42" }));

        let (status, body) = send(
            &app,
            Method::POST,
            "/admin/cabinets",
            Some(&admin),
            Some(json!({ "address": "no name" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("name"));

        let (status, body) = send(
            &app,
            Method::GET,
            "/admin/schedules?date=tomorrow",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "invalid date: tomorrow" }));
    }

    #[tokio::test]
    async fn should_book_and_cancel_through_the_api() {
        let app = test_app().await;
        let admin = login(&app, "admin@example.com", "admin123").await;
        let client = register_client(&app, "jane@example.com").await;

        let (status, provider) = send(
            &app,
            Method::POST,
            "/admin/providers",
            Some(&admin),
            Some(json!({ "email": "anna@example.com", "password": "secret123", "name": "Anna" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{provider}");
        let provider_id = provider["id"].as_str().unwrap();

        let (status, service) = send(
            &app,
            Method::POST,
            "/admin/services",
            Some(&admin),
            Some(json!({ "name": "Massage", "provider_ids": [provider_id] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{service}");
        let service_id = service["id"].as_str().unwrap();

        let (status, variant) = send(
            &app,
            Method::POST,
            &format!("/admin/services/{service_id}/variants"),
            Some(&admin),
            Some(json!({ "duration_minutes": 60, "price": 50.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{variant}");
        let variant_id = variant["id"].as_str().unwrap();

        let (status, cabinet) = send(
            &app,
            Method::POST,
            "/admin/cabinets",
            Some(&admin),
            Some(json!({ "name": "Main Cabinet" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let cabinet_id = cabinet["id"].as_str().unwrap();

        let (status, slot) = send(
            &app,
            Method::POST,
            "/admin/schedules",
            Some(&admin),
            Some(json!({
                "provider_id": provider_id,
                "cabinet_id": cabinet_id,
                "start_time": "2030-01-07T09:00:00Z",
                "end_time": "2030-01-07T10:00:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{slot}");
        assert_eq!(slot["status"], "AVAILABLE");
        assert_eq!(slot["date"], "2030-01-07");
        let schedule_id = slot["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            Method::POST,
            "/admin/schedules",
            Some(&admin),
            Some(json!({
                "provider_id": provider_id,
                "start_time": "2030-01-07T09:30:00Z",
                "end_time": "2030-01-07T10:30:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let booking = json!({ "service_variant_id": variant_id, "schedule_id": schedule_id });
        let (status, reservation) = send(
            &app,
            Method::POST,
            "/client/reservations",
            Some(&client),
            Some(booking.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{reservation}");
        assert_eq!(reservation["service_name"], "Massage");
        let reservation_id = reservation["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            "/client/reservations",
            Some(&client),
            Some(booking),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "schedule slot is not available" }));

        let (status, dashboard) =
            send(&app, Method::GET, "/client/dashboard", Some(&client), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["upcoming"].as_array().unwrap().len(), 1);
        assert_eq!(dashboard["past"], json!([]));

        let (status, upcoming) = send(
            &app,
            Method::GET,
            "/admin/reservations?upcoming=true",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(upcoming.as_array().unwrap().len(), 1);

        let (status, stats) =
            send(&app, Method::GET, "/admin/statistics", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["upcoming_reservations"], 1);
        assert_eq!(stats["providers"], 1);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/client/reservations/{reservation_id}"),
            Some(&client),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, slot) = send(
            &app,
            Method::GET,
            &format!("/admin/schedules/{schedule_id}"),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(slot["status"], "AVAILABLE");
    }
}

//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::booking::BerthLocks;
use crate::application::{BerthService, ReservationService, UserService};
use crate::domain::{IntervalRule, RepositoryProvider};
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{require_session, SessionConfig};

use super::modules::{
    auth, berths, dashboard, health, metrics, request_id::request_id_middleware, reservations,
    users,
};

/// Everything the handlers need, built once at startup.
/// Axum extracts each handler's own state via `FromRef`.
#[derive(Clone)]
pub struct ServerContext {
    pub berths: Arc<BerthService>,
    pub reservations: Arc<ReservationService>,
    pub users: Arc<UserService>,
    pub session: SessionConfig,
    /// Public origin for absolute links
    pub base_url: String,
    /// `None` on the in-memory store
    pub db: Option<DatabaseConnection>,
    pub metrics: PrometheusHandle,
    pub started_at: Arc<Instant>,
}

impl ServerContext {
    /// Build the services over `repos`, sharing one set of berth locks
    /// between berth and reservation writes.
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        rule: IntervalRule,
        session: SessionConfig,
        base_url: String,
        db: Option<DatabaseConnection>,
        metrics: PrometheusHandle,
    ) -> Self {
        let locks = Arc::new(BerthLocks::new());
        Self {
            berths: Arc::new(BerthService::new(repos.clone(), locks.clone())),
            reservations: Arc::new(ReservationService::new(repos.clone(), locks, rule)),
            users: Arc::new(UserService::new(repos)),
            session,
            base_url,
            db,
            metrics,
            started_at: Arc::new(Instant::now()),
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ServerContext> for berths::BerthHandlerState {
    fn from_ref(s: &ServerContext) -> Self {
        Self {
            service: Arc::clone(&s.berths),
        }
    }
}

impl FromRef<ServerContext> for reservations::ReservationHandlerState {
    fn from_ref(s: &ServerContext) -> Self {
        Self {
            service: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<ServerContext> for users::UserHandlerState {
    fn from_ref(s: &ServerContext) -> Self {
        Self {
            service: Arc::clone(&s.users),
        }
    }
}

impl FromRef<ServerContext> for auth::AuthHandlerState {
    fn from_ref(s: &ServerContext) -> Self {
        Self {
            session: s.session.clone(),
        }
    }
}

impl FromRef<ServerContext> for dashboard::DashboardState {
    fn from_ref(s: &ServerContext) -> Self {
        Self {
            reservations: Arc::clone(&s.reservations),
            base_url: s.base_url.clone(),
        }
    }
}

impl FromRef<ServerContext> for health::HealthState {
    fn from_ref(s: &ServerContext) -> Self {
        Self {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<ServerContext> for metrics::MetricsState {
    fn from_ref(s: &ServerContext) -> Self {
        Self {
            handle: s.metrics.clone(),
        }
    }
}

impl FromRef<ServerContext> for SessionConfig {
    fn from_ref(s: &ServerContext) -> Self {
        s.session.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::logout,
        // Dashboard
        dashboard::dashboard,
        // Berths
        berths::list_berths,
        berths::get_berth,
        berths::create_berth,
        berths::update_berth,
        berths::delete_berth,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
        reservations::check_availability,
        reservations::list_berth_reservations,
        reservations::get_berth_reservation,
        reservations::create_berth_reservation,
        reservations::update_berth_reservation,
        reservations::delete_berth_reservation,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::LogoutResponse,
            dashboard::DashboardResponse,
            dashboard::DashboardLinks,
            berths::BerthDto,
            berths::CreateBerthRequest,
            berths::UpdateBerthRequest,
            berths::DeletedBerthResponse,
            reservations::ReservationDto,
            reservations::CreateReservationRequest,
            reservations::UpdateReservationRequest,
            reservations::AvailabilityDto,
            reservations::DeletedReservationResponse,
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::DeletedUserResponse,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Demo cookie login and logout"),
        (name = "Dashboard", description = "Occupancy summary for signed-in staff"),
        (name = "Berths", description = "Berth (catway) management"),
        (name = "Reservations", description = "Berth reservations with overlap checking"),
        (name = "Users", description = "Harbour staff directory"),
    ),
    info(
        title = "Marina Berth Reservation API",
        version = "1.0.0",
        description = "REST API for managing marina berths and their reservations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ServerContext) -> Router {
    let session = ctx.session.clone();

    // Reservations addressed directly and as children of a berth share handlers.
    let berth_routes = Router::new()
        .route("/", get(berths::list_berths).post(berths::create_berth))
        .route(
            "/{number}",
            get(berths::get_berth)
                .put(berths::update_berth)
                .delete(berths::delete_berth),
        )
        .route(
            "/{number}/reservations",
            get(reservations::list_berth_reservations)
                .post(reservations::create_berth_reservation),
        )
        .route(
            "/{number}/reservations/{id}",
            get(reservations::get_berth_reservation)
                .put(reservations::update_berth_reservation)
                .delete(reservations::delete_berth_reservation),
        );

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/availability", get(reservations::check_availability))
        .route(
            "/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        );

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    // Only the dashboard is session-gated; the JSON API stays public.
    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route_layer(middleware::from_fn_with_state(session, require_session));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/healthz", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(dashboard_routes)
        .nest("/api/v1/berths", berth_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/users", user_routes)
        .with_state(ctx);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(app)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::DEFAULT_INTERVAL_RULE;
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn app() -> Router {
        let ctx = ServerContext::new(
            Arc::new(InMemoryRepositoryProvider::new()),
            DEFAULT_INTERVAL_RULE,
            SessionConfig::default(),
            "http://marina.test".to_string(),
            None,
            PrometheusBuilder::new().build_recorder().handle(),
        );
        create_api_router(ctx)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(req).await.unwrap()
    }

    async fn json_body(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn seed_berth(app: &Router, number: i64) {
        let resp = send(
            app,
            "POST",
            "/api/v1/berths",
            Some(json!({"number": number, "kind": "long", "state": "ok"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    async fn book(app: &Router, berth: i64, start: &str, end: &str) -> Response<Body> {
        send(
            app,
            "POST",
            "/api/v1/reservations",
            Some(json!({
                "berth_number": berth,
                "client_name": "Jeanne Leroy",
                "boat_name": "Mistral",
                "start_date": start,
                "end_date": end,
            })),
        )
        .await
    }

    #[tokio::test]
    async fn healthz_reports_memory_store() {
        let app = app();
        let resp = send(&app, "GET", "/healthz", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        let body = json_body(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["database"], "memory");
    }

    #[tokio::test]
    async fn overlapping_booking_is_409_and_touching_days_collide() {
        let app = app();
        seed_berth(&app, 1).await;

        let first = book(&app, 1, "2025-10-10", "2025-10-15").await;
        assert_eq!(first.status(), StatusCode::CREATED);

        // Shares the boundary day 15th.
        let second = book(&app, 1, "2025-10-15", "2025-10-20").await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = json_body(second).await;
        assert_eq!(body["success"], false);

        seed_berth(&app, 2).await;
        let other_berth = book(&app, 2, "2025-10-12", "2025-10-14").await;
        assert_eq!(other_berth.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn reversed_dates_are_422_and_unknown_berth_is_404() {
        let app = app();
        seed_berth(&app, 1).await;

        let reversed = book(&app, 1, "2025-10-20", "2025-10-10").await;
        assert_eq!(reversed.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bad_date = book(&app, 1, "tomorrow", "2025-10-10").await;
        assert_eq!(bad_date.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing = book(&app, 9, "2025-10-10", "2025-10-12").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_excludes_itself_from_the_check() {
        let app = app();
        seed_berth(&app, 1).await;
        let created = json_body(book(&app, 1, "2025-10-10", "2025-10-15").await).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let resp = send(
            &app,
            "PUT",
            &format!("/api/v1/reservations/{id}"),
            Some(json!({"end_date": "2025-10-16"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["end_date"], "2025-10-16T00:00:00Z");
    }

    #[tokio::test]
    async fn nested_routes_guard_the_berth() {
        let app = app();
        seed_berth(&app, 1).await;
        seed_berth(&app, 2).await;
        let created = json_body(book(&app, 1, "2025-10-10", "2025-10-15").await).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let right = send(&app, "GET", &format!("/api/v1/berths/1/reservations/{id}"), None).await;
        assert_eq!(right.status(), StatusCode::OK);

        let wrong = send(&app, "GET", &format!("/api/v1/berths/2/reservations/{id}"), None).await;
        assert_eq!(wrong.status(), StatusCode::NOT_FOUND);

        let listed = json_body(send(&app, "GET", "/api/v1/berths/2/reservations", None).await).await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 0);

        let deleted = send(&app, "DELETE", &format!("/api/v1/berths/1/reservations/{id}"), None).await;
        assert_eq!(deleted.status(), StatusCode::OK);
        let body = json_body(deleted).await;
        assert_eq!(body["data"]["deleted"]["id"], id.as_str());
    }

    #[tokio::test]
    async fn nested_create_takes_berth_from_path() {
        let app = app();
        seed_berth(&app, 3).await;
        let resp = send(
            &app,
            "POST",
            "/api/v1/berths/3/reservations",
            Some(json!({
                "catwayNumber": 99,
                "clientName": "Paul Martin",
                "boatName": "Zéphyr",
                "startDate": "2025-11-01",
                "endDate": "2025-11-03",
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["berth_number"], 3);
    }

    #[tokio::test]
    async fn availability_reflects_existing_stays() {
        let app = app();
        seed_berth(&app, 1).await;
        book(&app, 1, "2025-10-10", "2025-10-15").await;

        let taken = json_body(
            send(
                &app,
                "GET",
                "/api/v1/reservations/availability?berth_number=1&start=2025-10-14&end=2025-10-18",
                None,
            )
            .await,
        )
        .await;
        assert_eq!(taken["data"]["available"], false);

        let free = json_body(
            send(
                &app,
                "GET",
                "/api/v1/reservations/availability?berth_number=1&start=2025-10-16&end=2025-10-18",
                None,
            )
            .await,
        )
        .await;
        assert_eq!(free["data"]["available"], true);
    }

    #[tokio::test]
    async fn malformed_reservation_id_is_rejected() {
        let app = app();
        let resp = send(&app, "GET", "/api/v1/reservations/not-a-uuid", None).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn bad_query_and_path_parameters_are_422_envelopes() {
        let app = app();
        seed_berth(&app, 1).await;

        for (method, uri) in [
            ("GET", "/api/v1/reservations/availability?berth_number=abc&start=2025-10-10&end=2025-10-12"),
            ("GET", "/api/v1/reservations/availability?berth_number=1&end=2025-10-12"),
            ("GET", "/api/v1/reservations/availability?berth_number=1&start=&end=2025-10-12"),
            ("GET", "/api/v1/berths/abc"),
            ("DELETE", "/api/v1/berths/abc"),
            ("GET", "/api/v1/berths/abc/reservations"),
            ("GET", "/api/v1/berths/1.5/reservations/00000000-0000-0000-0000-000000000000"),
            ("DELETE", "/api/v1/berths/x/reservations/00000000-0000-0000-0000-000000000000"),
        ] {
            let resp = send(&app, method, uri, None).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{method} {uri}");
            let body = json_body(resp).await;
            assert_eq!(body["success"], false, "{method} {uri}");
            assert!(body["error"].is_string(), "{method} {uri}");
        }

        let nested_post = send(
            &app,
            "POST",
            "/api/v1/berths/abc/reservations",
            Some(json!({
                "client_name": "Paul Martin",
                "boat_name": "Zéphyr",
                "start_date": "2025-11-01",
                "end_date": "2025-11-03",
            })),
        )
        .await;
        assert_eq!(nested_post.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let legacy_name = send(
            &app,
            "GET",
            "/api/v1/reservations/availability?catwayNumber=1&start=2025-10-10&end=2025-10-12",
            None,
        )
        .await;
        assert_eq!(legacy_name.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn berth_with_reservations_cannot_be_deleted() {
        let app = app();
        seed_berth(&app, 1).await;
        book(&app, 1, "2025-10-10", "2025-10-15").await;
        let resp = send(&app, "DELETE", "/api/v1/berths/1", None).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn duplicate_user_email_is_409() {
        let app = app();
        let user = json!({"name": "Capitainerie", "email": "port@marina.fr"});
        let first = send(&app, "POST", "/api/v1/users", Some(user.clone())).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let second = send(&app, "POST", "/api/v1/users", Some(user)).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_sets_cookies_and_unlocks_dashboard() {
        let app = app();

        let locked = send(&app, "GET", "/dashboard", None).await;
        assert_eq!(locked.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(locked).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Unauthorized: Login required");

        let login = send(
            &app,
            "POST",
            "/login",
            Some(json!({"email": "port@marina.fr", "password": "x"})),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);
        let cookies: Vec<_> = login
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("tokenDemo=ok"));

        let req = Request::get("/dashboard")
            .header(header::COOKIE, "tokenDemo=ok; userEmail=port@marina.fr")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["user_email"], "port@marina.fr");
        assert_eq!(body["data"]["in_progress_count"], 0);
        assert_eq!(body["data"]["links"]["berths"], "http://marina.test/api/v1/berths");
    }

    #[tokio::test]
    async fn empty_login_is_422() {
        let app = app();
        let resp = send(&app, "POST", "/login", Some(json!({"email": "", "password": ""}))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app();
        let resp = send(&app, "GET", "/api-doc/openapi.json", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let doc = json_body(resp).await;
        assert!(doc["paths"]["/api/v1/reservations/availability"].is_object());
    }
}

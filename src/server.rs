use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::{
    course_ownership_middleware, jwt_auth_middleware, require_admin, require_analytics,
    require_instructor, require_student, validate_user_middleware,
};
use crate::state::AppState;

/// Full application router with global middleware applied
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected
        .merge(authenticated(auth_routes(), &state))
        .merge(authenticated(admin_routes(), &state))
        .merge(authenticated(instructor_routes(&state), &state))
        .merge(authenticated(student_routes(), &state))
        .merge(authenticated(analytics_routes(), &state))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&state.config.security) {
        router = router.layer(cors);
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

/// JWT validation then user validation, outermost first
fn authenticated(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn auth_routes() -> Router<AppState> {
    use handlers::protected::auth;

    Router::new().route("/api/auth/whoami", get(auth::whoami_get))
}

fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/admin/users", post(admin::user_post))
        .route("/admin/courses", post(admin::course_post))
        .route("/admin/courses/:id/instructors", post(admin::instructor_post))
        .route(
            "/admin/courses/:id/instructors/:instructor_id",
            delete(admin::instructor_delete),
        )
        .route_layer(from_fn(require_admin))
}

fn instructor_routes(state: &AppState) -> Router<AppState> {
    use handlers::instructor;

    // Everything under a specific course passes the ownership gate
    let owned_course = Router::new()
        .route(
            "/instructor/courses/:id/modules",
            get(instructor::modules_get).post(instructor::modules_post),
        )
        .route("/instructor/courses/:id/modules/swap", post(instructor::modules_swap))
        .route(
            "/instructor/courses/:id/modules/:num",
            put(instructor::module_put).delete(instructor::module_delete),
        )
        .route(
            "/instructor/courses/:id/modules/:num/content",
            get(instructor::content_get).post(instructor::content_post),
        )
        .route(
            "/instructor/courses/:id/modules/:num/content/swap",
            post(instructor::content_swap),
        )
        .route(
            "/instructor/courses/:id/modules/:num/content/:content_id",
            put(instructor::content_put).delete(instructor::content_delete),
        )
        .route_layer(from_fn_with_state(state.clone(), course_ownership_middleware));

    Router::new()
        .route("/instructor/courses", get(instructor::courses_get))
        .route("/instructor/enrollments/:id/grade", put(instructor::grade_put))
        .merge(owned_course)
        .route_layer(from_fn(require_instructor))
}

fn student_routes() -> Router<AppState> {
    use handlers::student;

    Router::new()
        .route("/student/courses/:id/enroll", post(student::enroll_post))
        .route("/student/courses/:id/progress", get(student::progress_get))
        .route(
            "/student/courses/:id/modules/:num/content/:content_id/complete",
            post(student::complete_post),
        )
        .route_layer(from_fn(require_student))
}

fn analytics_routes() -> Router<AppState> {
    use handlers::analytics;

    Router::new()
        .route("/analytics/courses/:id/summary", get(analytics::summary_get))
        .route_layer(from_fn(require_analytics))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Course API",
        "version": version,
        "description": "Course platform backend: curriculum ordering, enrollment and grading",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "public_auth": "/auth/register, /auth/login (public - token acquisition)",
            "auth": "/api/auth/whoami (protected)",
            "admin": "/admin/users, /admin/courses[/:id/instructors] (admin)",
            "instructor": "/instructor/courses[/:id/modules[/:num/content]], /instructor/enrollments/:id/grade (instructor)",
            "student": "/student/courses/:id/enroll, /student/courses/:id/progress, /student/courses/:id/modules/:num/content/:content_id/complete (student)",
            "analytics": "/analytics/courses/:id/summary (analyst, admin)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    use crate::database::models::ModuleDraft;
    use crate::database::CourseStore;
    use crate::testing::Fixture;

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    #[tokio::test]
    async fn health_reports_store() {
        let fx = Fixture::new().await;
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let (status, body) = call(app(fx.state()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "ok");
    }

    #[tokio::test]
    async fn instructor_routes_require_a_token() {
        let fx = Fixture::new().await;
        let uri = format!("/instructor/courses/{}/modules", fx.course_id);
        let request = Request::get(uri).body(Body::empty()).unwrap();

        let (status, body) = call(app(fx.state()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn ownership_gate_runs_before_swap() {
        let fx = Fixture::new().await;
        for (number, name) in [(1, "Intro"), (2, "Advanced")] {
            fx.store
                .insert_module(fx.course_id, ModuleDraft { module_number: number, name: name.into(), duration_weeks: 1 })
                .await
                .unwrap();
        }
        let uri = format!("/instructor/courses/{}/modules/swap", fx.course_id);
        let swap = |bearer: String| {
            Request::builder()
                .method(Method::POST)
                .uri(uri.clone())
                .header(header::AUTHORIZATION, bearer)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"num1":1,"num2":2}"#))
                .unwrap()
        };

        let (status, _) = call(app(fx.state()), swap(fx.bearer(&fx.other_instructor).await)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(fx.store.list_modules(fx.course_id).await.unwrap()[0].name, "Intro");

        let (status, body) = call(app(fx.state()), swap(fx.bearer(&fx.instructor).await)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["modules"][0]["name"], "Advanced");
        assert_eq!(body["modules"][0]["module_number"], 1);
    }
}

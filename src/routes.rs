use crate::handlers::{
    create_student, delete_student, edit_student_form, list_students, method_not_allowed,
    new_student_form, show_student, unknown_route, update_student,
};
use crate::observability::{health_handler, metrics_handler, track_requests, AppMetrics};
use crate::store::StudentStore;
use axum::{
    extract::{Query, Request},
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// Shared by every handler. Built once at startup.
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub metrics: AppMetrics,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self {
            store,
            metrics: AppMetrics::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MethodOverride {
    #[serde(rename = "_method")]
    method: Option<String>,
}

/// Target method for a tunneled POST. The `_method` query field wins over the
/// header; only PUT, PATCH and DELETE are honored.
fn override_target(request: &Request) -> Option<Method> {
    let from_query = Query::<MethodOverride>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(o)| o.method);
    let from_header = request
        .headers()
        .get(METHOD_OVERRIDE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    match from_query.or(from_header)?.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

/// Rewrites `POST ...?_method=PUT` into `PUT ...` before routing.
pub async fn method_override(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        if let Some(method) = override_target(&request) {
            debug!("Method override: POST -> {} {}", method, request.uri().path());
            *request.method_mut() = method;
        }
    }
    next.run(request).await
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/new", get(new_student_form))
        .route(
            "/students/{id}",
            get(show_student).put(update_student).delete(delete_student),
        )
        .route("/students/{id}/edit", get(edit_student_form))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state);

    // Middleware on `routes` would run after the route is chosen, so the
    // override lives on an outer router that forwards everything.
    Router::new().fallback_service(routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(method_override)),
    )
}

pub mod api;
mod middleware;

pub use api::{ApiState, build_api_router};
pub use middleware::REQUEST_ID_HEADER;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Router, middleware as axum_middleware, routing::get};

use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;

use middleware::{assign_request_id, log_responses};

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

async fn health(State(state): State<ApiState>) -> Response {
    db_health_response(state.health.ping().await)
}

/// Full application router: health check plus the versioned API, wrapped in
/// request-id and response-logging middleware.
pub fn build_router(state: ApiState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health))
        .with_state(state.clone());

    Router::new()
        .merge(health_routes)
        .merge(build_api_router(state))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(assign_request_id))
}

use std::time::Instant;

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::{accounts::CallerIdentity, error::ErrorReport};

/// Correlation header, honoured when the client supplies a UUID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, Copy)]
struct RequestId(Uuid);

pub async fn assign_request_id(mut request: Request<Body>, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .unwrap_or_else(Uuid::new_v4);
    request.extensions_mut().insert(RequestId(id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// One log line per response: `debug` on success, `warn` for 4xx, `error` for 5xx.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.to_string())
        .unwrap_or_default();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    // The caller layer runs inside this one and echoes the identity on the response.
    let caller_id = response
        .extensions()
        .get::<CallerIdentity>()
        .map(|caller| caller.user_id.to_string())
        .unwrap_or_default();

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        if response.status().is_server_error() {
            error!(
                target: "caltrade::http",
                status,
                %method,
                %path,
                elapsed_ms,
                %request_id,
                "Request failed without report"
            );
        } else {
            debug!(
                target: "caltrade::http",
                status,
                %method,
                %path,
                elapsed_ms,
                %request_id,
                %caller_id,
                "Request completed"
            );
        }
        return response;
    };

    let detail = report.messages.first().map(String::as_str).unwrap_or("");
    if response.status().is_server_error() {
        error!(
            target: "caltrade::http",
            status,
            %method,
            %path,
            elapsed_ms,
            %request_id,
            %caller_id,
            source = report.source,
            detail,
            chain = ?report.messages,
            "Request failed"
        );
    } else {
        warn!(
            target: "caltrade::http",
            status,
            %method,
            %path,
            elapsed_ms,
            %request_id,
            %caller_id,
            source = report.source,
            detail,
            "Request rejected"
        );
    }

    response
}

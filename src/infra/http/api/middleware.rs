use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::application::accounts::CallerIdentity;

use super::error::ApiError;
use super::state::ApiState;

/// Header carrying the user id established by the upstream authentication layer.
pub const CALLER_HEADER: &str = "x-caltrade-user";

/// Resolve the forwarded caller, if any, and attach it to the request.
///
/// Requests without the header pass through anonymously; routes that need a
/// caller reject them through the [`Caller`] extractor.
pub async fn resolve_caller(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(raw) = request.headers().get(CALLER_HEADER) else {
        return next.run(request).await;
    };
    let Ok(raw) = raw.to_str() else {
        return ApiError::unauthorized().into_response();
    };

    let caller = match state.accounts.authenticate(raw).await {
        Ok(caller) => caller,
        Err(err) => {
            debug!(error = %err, "Rejected forwarded caller");
            return ApiError::from(err).into_response();
        }
    };

    request.extensions_mut().insert(caller.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(caller);
    response
}

/// Extractor for handlers that require an authenticated caller.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerIdentity);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .map(Caller)
            .ok_or_else(ApiError::unauthorized)
    }
}

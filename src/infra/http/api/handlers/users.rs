//! Account handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::ApiJson;
use crate::infra::http::api::middleware::Caller;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

pub async fn register_user(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<UserRegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn current_user(
    State(state): State<ApiState>,
    Caller(caller): Caller,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.find(caller.user_id).await?;
    Ok(Json(user))
}

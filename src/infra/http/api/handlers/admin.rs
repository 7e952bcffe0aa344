//! Moderation and administration handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::extract::{ApiJson, ApiQuery};
use crate::infra::http::api::middleware::Caller;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

pub async fn admin_list_users(
    State(state): State<ApiState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.accounts.list(&caller, &query.into()).await?;
    Ok(Json(UserListResponse { users }))
}

pub async fn admin_set_user_status(
    State(state): State<ApiState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UserStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .accounts
        .set_status(&caller, id, payload.status)
        .await?;
    Ok(Json(user))
}

pub async fn admin_set_user_role(
    State(state): State<ApiState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UserRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.set_role(&caller, id, payload.role).await?;
    Ok(Json(user))
}

pub async fn admin_delete_listing(
    State(state): State<ApiState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.listings.moderate_delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_stats(
    State(state): State<ApiState>,
    Caller(caller): Caller,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.accounts.dashboard_stats(&caller).await?;
    Ok(Json(stats))
}

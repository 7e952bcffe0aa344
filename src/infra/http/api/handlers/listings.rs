//! Listing handlers

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

pub async fn list_listings(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<ListingListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.into_filter()?;
    let listings = state.listings.list(filter).await?;
    Ok(Json(ListingListResponse { listings }))
}

pub async fn get_listing(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.listings.get(id).await?;
    Ok(Json(listing))
}

pub async fn create_listing(
    State(state): State<ApiState>,
    Caller(caller): Caller,
    ApiJson(payload): ApiJson<ListingCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.listings.create(&caller, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

pub async fn update_listing(
    State(state): State<ApiState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<ListingUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.listings.update(&caller, id, payload.into()).await?;
    Ok(Json(listing))
}

pub async fn delete_listing(
    State(state): State<ApiState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.listings.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_owner_listings(
    State(state): State<ApiState>,
    Path(owner_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state.listings.owner_listings(owner_id).await?;
    Ok(Json(ListingListResponse { listings }))
}

use serde::{Deserialize, Serialize};

use crate::application::accounts::RegisterUserCommand;
use crate::application::listings::{CreateListingCommand, ListingPatch};
use crate::application::repos::{ListingQueryFilter, UserQueryFilter};
use crate::domain::entities::{ListingRecord, UserRecord};
use crate::domain::price::Price;
use crate::domain::types::{ListingCondition, UserRole, UserStatus};

use super::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ListingListQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub condition: Option<String>,
    pub search: Option<String>,
}

impl ListingListQuery {
    pub fn into_filter(self) -> Result<ListingQueryFilter, ApiError> {
        let condition = match self.condition.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<ListingCondition>().map_err(|err| {
                ApiError::invalid_input("Invalid listing filter", err.to_string())
            })?),
        };

        Ok(ListingQueryFilter {
            category: self.category,
            min_price: parse_price(self.min_price, "min_price")?,
            max_price: parse_price(self.max_price, "max_price")?,
            condition,
            search: self.search,
        })
    }
}

fn parse_price(value: Option<f64>, field: &str) -> Result<Option<Price>, ApiError> {
    value
        .map(Price::from_major)
        .transpose()
        .map_err(|err| ApiError::invalid_input("Invalid listing filter", format!("{field}: {err}")))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ListingCreateRequest {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub condition: ListingCondition,
    pub location: String,
}

impl From<ListingCreateRequest> for CreateListingCommand {
    fn from(request: ListingCreateRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            price: request.price,
            currency: request.currency,
            image_url: request.image_url,
            category: request.category,
            condition: request.condition,
            location: request.location,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListingUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub condition: Option<ListingCondition>,
    pub location: Option<String>,
}

impl From<ListingUpdateRequest> for ListingPatch {
    fn from(request: ListingUpdateRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            price: request.price,
            currency: request.currency,
            image_url: request.image_url,
            category: request.category,
            condition: request.condition,
            location: request.location,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingListResponse {
    pub listings: Vec<ListingRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserRegisterRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub display_name: String,
}

impl From<UserRegisterRequest> for RegisterUserCommand {
    fn from(request: UserRegisterRequest) -> Self {
        Self {
            email: request.email,
            phone: request.phone,
            display_name: request.display_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub status: Option<UserStatus>,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

impl From<UserListQuery> for UserQueryFilter {
    fn from(query: UserListQuery) -> Self {
        Self {
            status: query.status,
            role: query.role,
            search: query.search,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserStatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserRoleRequest {
    pub role: UserRole,
}

//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{ListingRecord, UserRecord};
use crate::domain::price::Price;
use crate::domain::types::{ListingCondition, UserRole, UserStatus};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Optional listing predicates, combined with AND. Missing fields impose no
/// constraint, so the default filter matches every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQueryFilter {
    pub category: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub condition: Option<ListingCondition>,
    pub search: Option<String>,
}

impl ListingQueryFilter {
    /// Drop blank text fields so that `?category=` behaves like no category.
    pub fn normalized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.and_then(|v| {
                let trimmed = v.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
        }

        Self {
            category: non_blank(self.category),
            search: non_blank(self.search),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.condition.is_none()
            && self.search.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserQueryFilter {
    pub status: Option<UserStatus>,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateListingParams {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub currency: String,
    pub image_url: Option<String>,
    pub category: String,
    pub condition: ListingCondition,
    pub location: String,
    pub owner_id: Uuid,
    pub owner_name: String,
}

/// Full replacement of the mutable listing fields; merging happens upstream.
#[derive(Debug, Clone)]
pub struct UpdateListingParams {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub currency: String,
    pub image_url: Option<String>,
    pub category: String,
    pub condition: ListingCondition,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub display_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStatusCount {
    pub status: UserStatus,
    pub count: u64,
}

#[async_trait]
pub trait ListingsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ListingRecord>, RepoError>;

    /// Matching listings, most recently created first.
    async fn list_listings(
        &self,
        filter: &ListingQueryFilter,
    ) -> Result<Vec<ListingRecord>, RepoError>;

    async fn list_ids_by_owner(&self, owner_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    async fn count_listings(&self) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait ListingsWriteRepo: Send + Sync {
    async fn create_listing(&self, params: CreateListingParams)
    -> Result<ListingRecord, RepoError>;

    async fn update_listing(&self, params: UpdateListingParams)
    -> Result<ListingRecord, RepoError>;

    async fn delete_listing(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;

    async fn list_users(&self, filter: &UserQueryFilter) -> Result<Vec<UserRecord>, RepoError>;

    async fn count_by_status(&self) -> Result<Vec<UserStatusCount>, RepoError>;
}

#[async_trait]
pub trait UsersWriteRepo: Send + Sync {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;

    async fn update_status(&self, id: Uuid, status: UserStatus) -> Result<UserRecord, RepoError>;

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<UserRecord, RepoError>;
}

/// Connectivity check for the relational store.
#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}

//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::price::Price;
use crate::domain::types::{ListingCondition, UserRole, UserStatus, VerificationLevel};

/// A classified listing. Owned by exactly one user; the id never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: Uuid,
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
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub display_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub verification: VerificationLevel,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserRecord {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

//! Shared domain enumerations aligned with persisted database enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_condition")]
pub enum ListingCondition {
    #[serde(rename = "New")]
    #[sqlx(rename = "New")]
    New,
    #[serde(rename = "Like New")]
    #[sqlx(rename = "Like New")]
    LikeNew,
    #[serde(rename = "Good")]
    #[sqlx(rename = "Good")]
    Good,
    #[serde(rename = "Fair")]
    #[sqlx(rename = "Fair")]
    Fair,
    #[serde(rename = "Poor")]
    #[sqlx(rename = "Poor")]
    Poor,
}

impl ListingCondition {
    pub const ALL: [ListingCondition; 5] = [
        ListingCondition::New,
        ListingCondition::LikeNew,
        ListingCondition::Good,
        ListingCondition::Fair,
        ListingCondition::Poor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingCondition::New => "New",
            ListingCondition::LikeNew => "Like New",
            ListingCondition::Good => "Good",
            ListingCondition::Fair => "Fair",
            ListingCondition::Poor => "Poor",
        }
    }
}

impl fmt::Display for ListingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCondition(pub String);

impl fmt::Display for UnknownCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown listing condition `{}`", self.0)
    }
}

impl std::error::Error for UnknownCondition {}

impl FromStr for ListingCondition {
    type Err = UnknownCondition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCondition(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    User,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        }
    }

    /// Moderators and admins may remove content they do not own.
    pub fn can_moderate(self) -> bool {
        matches!(self, UserRole::Moderator | UserRole::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
    Inactive,
}

impl UserStatus {
    pub const ALL: [UserStatus; 3] = [
        UserStatus::Active,
        UserStatus::Suspended,
        UserStatus::Inactive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "verification_level", rename_all = "snake_case")]
pub enum VerificationLevel {
    #[serde(rename = "none")]
    #[sqlx(rename = "none")]
    Unverified,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "full")]
    Full,
}

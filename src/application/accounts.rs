//! Account resolution, registration and admin moderation of users.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    CreateUserParams, ListingsRepo, RepoError, UserQueryFilter, UserStatusCount, UsersRepo,
    UsersWriteRepo,
};
use crate::domain::entities::UserRecord;
use crate::domain::listings::ensure_non_empty;
use crate::domain::types::{UserRole, UserStatus};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("user not found")]
    NotFound,
    #[error("action requires an administrator")]
    Forbidden,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("account already exists: {0}")]
    Conflict(String),
    #[error("account store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AccountError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AccountError::NotFound,
            RepoError::Duplicate { constraint } => AccountError::Conflict(constraint),
            RepoError::InvalidInput { message } => AccountError::Validation(message),
            RepoError::Unavailable(message) => AccountError::Unavailable(message),
            RepoError::Timeout => AccountError::Unavailable("database timeout".to_string()),
            other => AccountError::Repo(other),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing caller identity")]
    Missing,
    #[error("unknown caller identity")]
    Invalid,
    #[error("account suspended")]
    Suspended,
    #[error("account inactive")]
    Inactive,
    #[error("identity lookup failed: {0}")]
    Lookup(String),
}

/// The authenticated user a request acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub display_name: String,
    pub role: UserRole,
}

impl CallerIdentity {
    pub fn requires_admin(&self) -> Result<(), AccountError> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AccountError::Forbidden)
        }
    }
}

impl From<&UserRecord> for CallerIdentity {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub listings: u64,
    pub users: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: UserStatus,
    pub count: u64,
}

impl From<UserStatusCount> for StatusCount {
    fn from(value: UserStatusCount) -> Self {
        Self {
            status: value.status,
            count: value.count,
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    reader: Arc<dyn UsersRepo>,
    writer: Arc<dyn UsersWriteRepo>,
    listings: Arc<dyn ListingsRepo>,
}

impl AccountService {
    pub fn new(
        reader: Arc<dyn UsersRepo>,
        writer: Arc<dyn UsersWriteRepo>,
        listings: Arc<dyn ListingsRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            listings,
        }
    }

    /// Resolve the identity forwarded by the authentication layer.
    pub async fn authenticate(&self, raw_user_id: &str) -> Result<CallerIdentity, AuthError> {
        let trimmed = raw_user_id.trim();
        if trimmed.is_empty() {
            return Err(AuthError::Missing);
        }
        let id = Uuid::parse_str(trimmed).map_err(|_| AuthError::Invalid)?;

        let user = self
            .reader
            .find_by_id(id)
            .await
            .map_err(|err| AuthError::Lookup(err.to_string()))?
            .ok_or(AuthError::Invalid)?;

        match user.status {
            UserStatus::Active => Ok(CallerIdentity::from(&user)),
            UserStatus::Suspended => Err(AuthError::Suspended),
            UserStatus::Inactive => Err(AuthError::Inactive),
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<UserRecord, AccountError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    pub async fn list(
        &self,
        actor: &CallerIdentity,
        filter: &UserQueryFilter,
    ) -> Result<Vec<UserRecord>, AccountError> {
        actor.requires_admin()?;
        Ok(self.reader.list_users(filter).await?)
    }

    /// Create an account at sign-up or first login.
    pub async fn register(&self, command: RegisterUserCommand) -> Result<UserRecord, AccountError> {
        ensure_non_empty(&command.display_name, "display_name")
            .map_err(|err| AccountError::Validation(err.to_string()))?;

        let email = normalize_email(command.email)?;
        let phone = normalize_phone(command.phone)?;
        if email.is_none() && phone.is_none() {
            return Err(AccountError::Validation(
                "either email or phone is required".to_string(),
            ));
        }

        let user = self
            .writer
            .create_user(CreateUserParams {
                email,
                phone,
                display_name: command.display_name.trim().to_string(),
                role: UserRole::User,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    pub async fn set_status(
        &self,
        actor: &CallerIdentity,
        id: Uuid,
        status: UserStatus,
    ) -> Result<UserRecord, AccountError> {
        actor.requires_admin()?;
        if actor.user_id == id && status != UserStatus::Active {
            return Err(AccountError::Validation(
                "administrators cannot deactivate themselves".to_string(),
            ));
        }

        let user = self.writer.update_status(id, status).await?;
        info!(
            user_id = %id,
            actor_id = %actor.user_id,
            status = status.as_str(),
            "User status changed"
        );
        Ok(user)
    }

    pub async fn set_role(
        &self,
        actor: &CallerIdentity,
        id: Uuid,
        role: UserRole,
    ) -> Result<UserRecord, AccountError> {
        actor.requires_admin()?;
        if actor.user_id == id {
            return Err(AccountError::Validation(
                "administrators cannot change their own role".to_string(),
            ));
        }

        let user = self.writer.update_role(id, role).await?;
        info!(
            user_id = %id,
            actor_id = %actor.user_id,
            role = role.as_str(),
            "User role changed"
        );
        Ok(user)
    }

    pub async fn dashboard_stats(
        &self,
        actor: &CallerIdentity,
    ) -> Result<DashboardStats, AccountError> {
        if !actor.role.can_moderate() {
            return Err(AccountError::Forbidden);
        }

        let listings = self.listings.count_listings().await?;
        let counts = self.reader.count_by_status().await?;
        let users = UserStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: counts
                    .iter()
                    .find(|entry| entry.status == status)
                    .map_or(0, |entry| entry.count),
            })
            .collect();

        Ok(DashboardStats { listings, users })
    }
}

fn normalize_email(email: Option<String>) -> Result<Option<String>, AccountError> {
    let Some(email) = email else {
        return Ok(None);
    };
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AccountError::Validation(format!(
            "`{trimmed}` is not a valid email address"
        )));
    }
    Ok(Some(trimmed.to_ascii_lowercase()))
}

fn normalize_phone(phone: Option<String>) -> Result<Option<String>, AccountError> {
    let Some(phone) = phone else {
        return Ok(None);
    };
    let compact: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    if compact.is_empty() {
        return Ok(None);
    }

    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    if digits.len() < 7 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AccountError::Validation(format!(
            "`{}` is not a valid phone number",
            phone.trim()
        )));
    }
    Ok(Some(compact))
}

//! In-memory user store shared by the account and seed tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateUserParams, RepoError, UserQueryFilter, UserStatusCount, UsersRepo, UsersWriteRepo,
};
use crate::domain::entities::UserRecord;
use crate::domain::types::{UserRole, UserStatus, VerificationLevel};

#[derive(Default)]
pub(crate) struct InMemoryUsers {
    rows: Mutex<Vec<UserRecord>>,
}

impl InMemoryUsers {
    pub(crate) fn insert(
        &self,
        display_name: &str,
        role: UserRole,
        status: UserStatus,
    ) -> UserRecord {
        let now = OffsetDateTime::now_utc();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: Some(format!("{}@example.com", display_name.to_lowercase())),
            phone: None,
            display_name: display_name.to_string(),
            role,
            status,
            verification: VerificationLevel::Unverified,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(user.clone());
        user
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn modify(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut UserRecord),
    ) -> Result<UserRecord, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RepoError::NotFound)?;
        apply(row);
        Ok(row.clone())
    }
}

#[async_trait]
impl UsersRepo for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn list_users(&self, filter: &UserQueryFilter) -> Result<Vec<UserRecord>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| filter.status.is_none_or(|s| u.status == s))
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .cloned()
            .collect())
    }

    async fn count_by_status(&self) -> Result<Vec<UserStatusCount>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(UserStatus::ALL
            .into_iter()
            .map(|status| UserStatusCount {
                status,
                count: rows.iter().filter(|u| u.status == status).count() as u64,
            })
            .filter(|entry| entry.count > 0)
            .collect())
    }
}

#[async_trait]
impl UsersWriteRepo for InMemoryUsers {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if params.email.is_some() && rows.iter().any(|u| u.email == params.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }
        let now = OffsetDateTime::now_utc();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: params.email,
            phone: params.phone,
            display_name: params.display_name,
            role: params.role,
            status: UserStatus::Active,
            verification: VerificationLevel::Unverified,
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn update_status(&self, id: Uuid, status: UserStatus) -> Result<UserRecord, RepoError> {
        self.modify(id, |user| user.status = status)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<UserRecord, RepoError> {
        self.modify(id, |user| user.role = role)
    }
}

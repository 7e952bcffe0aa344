use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateUserParams, RepoError, UserQueryFilter, UserStatusCount, UsersRepo, UsersWriteRepo,
};
use crate::domain::entities::UserRecord;
use crate::domain::types::{UserRole, UserStatus, VerificationLevel};

use super::listings::filter::escape_like;
use super::{PostgresRepositories, map_sqlx_error};

const USER_COLUMNS: &str = "id, email, phone, display_name, role, status, verification, \
     created_at, updated_at";

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: Option<String>,
    phone: Option<String>,
    display_name: String,
    role: UserRole,
    status: UserStatus,
    verification: VerificationLevel,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            phone: row.phone,
            display_name: row.display_name,
            role: row.role,
            status: row.status,
            verification: row.verification,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct StatusCountRow {
    status: UserStatus,
    count: i64,
}

fn user_select() -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(USER_COLUMNS);
    qb.push(" FROM users WHERE 1=1");
    qb
}

#[async_trait]
impl UsersRepo for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        let mut qb = user_select();
        qb.push(" AND id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<UserRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(UserRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        let mut qb = user_select();
        qb.push(" AND lower(email) = lower(");
        qb.push_bind(email.to_string());
        qb.push(")");

        let row = qb
            .build_query_as::<UserRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(UserRecord::from))
    }

    async fn list_users(&self, filter: &UserQueryFilter) -> Result<Vec<UserRecord>, RepoError> {
        let mut qb = user_select();

        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
        if let Some(role) = filter.role {
            qb.push(" AND role = ");
            qb.push_bind(role);
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (display_name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR email ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb
            .build_query_as::<UserRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn count_by_status(&self) -> Result<Vec<UserStatusCount>, RepoError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status, COUNT(*) AS count FROM users GROUP BY status",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(UserStatusCount {
                    status: row.status,
                    count: Self::convert_count(row.count)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl UsersWriteRepo for PostgresRepositories {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let sql = format!(
            "INSERT INTO users (id, email, phone, display_name, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(params.email)
            .bind(params.phone)
            .bind(params.display_name)
            .bind(params.role)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_status(&self, id: Uuid, status: UserStatus) -> Result<UserRecord, RepoError> {
        let sql = format!(
            "UPDATE users SET status = $2, updated_at = now() WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;
        Ok(row.into())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<UserRecord, RepoError> {
        let sql = format!(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(role)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;
        Ok(row.into())
    }
}

//! Startup provisioning of configured accounts.

use std::sync::Arc;

use tracing::info;

use crate::application::accounts::AccountError;
use crate::application::repos::{CreateUserParams, UsersRepo, UsersWriteRepo};
use crate::domain::types::{UserRole, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
}

impl From<&crate::config::SeedAccountSettings> for SeedAccount {
    fn from(value: &crate::config::SeedAccountSettings) -> Self {
        Self {
            email: value.email.trim().to_ascii_lowercase(),
            display_name: value.display_name.trim().to_string(),
            role: value.role,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Upserts configured accounts keyed by email.
#[derive(Clone)]
pub struct AccountSeeder {
    reader: Arc<dyn UsersRepo>,
    writer: Arc<dyn UsersWriteRepo>,
}

impl AccountSeeder {
    pub fn new(reader: Arc<dyn UsersRepo>, writer: Arc<dyn UsersWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn apply(&self, accounts: &[SeedAccount]) -> Result<SeedReport, AccountError> {
        let mut report = SeedReport::default();

        for account in accounts {
            if account.email.is_empty() || account.display_name.is_empty() {
                return Err(AccountError::Validation(
                    "seed accounts need an email and a display name".to_string(),
                ));
            }

            let Some(existing) = self.reader.find_by_email(&account.email).await? else {
                let user = self
                    .writer
                    .create_user(CreateUserParams {
                        email: Some(account.email.clone()),
                        phone: None,
                        display_name: account.display_name.clone(),
                        role: account.role,
                    })
                    .await?;
                info!(user_id = %user.id, role = account.role.as_str(), "Seed account created");
                report.created += 1;
                continue;
            };

            let mut changed = false;
            if existing.role != account.role {
                self.writer.update_role(existing.id, account.role).await?;
                changed = true;
            }
            if existing.status != UserStatus::Active {
                self.writer
                    .update_status(existing.id, UserStatus::Active)
                    .await?;
                changed = true;
            }

            if changed {
                info!(user_id = %existing.id, role = account.role.as_str(), "Seed account updated");
                report.updated += 1;
            } else {
                report.unchanged += 1;
            }
        }

        Ok(report)
    }
}

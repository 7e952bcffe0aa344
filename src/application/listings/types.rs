use thiserror::Error;

use crate::application::accounts::CallerIdentity;
use crate::application::repos::{CreateListingParams, RepoError, UpdateListingParams};
use crate::domain::entities::ListingRecord;
use crate::domain::error::DomainError;
use crate::domain::listings::{
    MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS, ensure_max_chars, ensure_non_empty,
    normalize_currency, normalize_image_url,
};
use crate::domain::price::Price;
use crate::domain::types::ListingCondition;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("listing not found")]
    NotFound,
    #[error("caller does not own this listing")]
    Forbidden,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("listing store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ListingError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => ListingError::NotFound,
            RepoError::InvalidInput { message } => ListingError::Validation(message),
            RepoError::Unavailable(message) => ListingError::Unavailable(message),
            RepoError::Timeout => ListingError::Unavailable("database timeout".to_string()),
            other => ListingError::Repo(other),
        }
    }
}

impl From<DomainError> for ListingError {
    fn from(err: DomainError) -> Self {
        let DomainError::Validation { message } = err;
        ListingError::Validation(message)
    }
}

#[derive(Debug, Clone)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub condition: ListingCondition,
    pub location: String,
}

impl CreateListingCommand {
    pub(crate) fn into_params(
        self,
        owner: &CallerIdentity,
    ) -> Result<CreateListingParams, DomainError> {
        ensure_non_empty(&self.title, "title")?;
        ensure_non_empty(&self.description, "description")?;
        ensure_non_empty(&self.category, "category")?;
        ensure_non_empty(&self.location, "location")?;
        ensure_max_chars(&self.title, "title", MAX_TITLE_CHARS)?;
        ensure_max_chars(&self.description, "description", MAX_DESCRIPTION_CHARS)?;

        Ok(CreateListingParams {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price,
            currency: normalize_currency(self.currency.as_deref())?,
            image_url: normalize_image_url(self.image_url),
            category: self.category.trim().to_string(),
            condition: self.condition,
            location: self.location.trim().to_string(),
            owner_id: owner.user_id,
            owner_name: owner.display_name.clone(),
        })
    }
}

/// Partial update. Only `Some` fields change; a blank `image_url` clears the
/// image reference.
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub condition: Option<ListingCondition>,
    pub location: Option<String>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.currency.is_none()
            && self.image_url.is_none()
            && self.category.is_none()
            && self.condition.is_none()
            && self.location.is_none()
    }

    /// Merge onto `current`, validating only the supplied fields.
    pub(crate) fn apply(self, current: &ListingRecord) -> Result<UpdateListingParams, DomainError> {
        let title = merge_text(self.title, &current.title, "title")?;
        ensure_max_chars(&title, "title", MAX_TITLE_CHARS)?;
        let description = merge_text(self.description, &current.description, "description")?;
        ensure_max_chars(&description, "description", MAX_DESCRIPTION_CHARS)?;
        let category = merge_text(self.category, &current.category, "category")?;
        let location = merge_text(self.location, &current.location, "location")?;

        let currency = match self.currency {
            Some(code) => normalize_currency(Some(&code))?,
            None => current.currency.clone(),
        };
        let image_url = match self.image_url {
            Some(url) => normalize_image_url(Some(url)),
            None => current.image_url.clone(),
        };

        Ok(UpdateListingParams {
            id: current.id,
            title,
            description,
            price: self.price.unwrap_or(current.price),
            currency,
            image_url,
            category,
            condition: self.condition.unwrap_or(current.condition),
            location,
        })
    }
}

fn merge_text(
    value: Option<String>,
    current: &str,
    field: &'static str,
) -> Result<String, DomainError> {
    match value {
        Some(value) => {
            ensure_non_empty(&value, field)?;
            Ok(value.trim().to_string())
        }
        None => Ok(current.to_string()),
    }
}

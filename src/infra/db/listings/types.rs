use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::entities::ListingRecord;
use crate::domain::price::Price;
use crate::domain::types::ListingCondition;

#[derive(sqlx::FromRow)]
pub(crate) struct ListingRow {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) price_cents: i64,
    pub(crate) currency: String,
    pub(crate) image_url: Option<String>,
    pub(crate) category: String,
    pub(crate) condition: ListingCondition,
    pub(crate) location: String,
    pub(crate) owner_id: Uuid,
    pub(crate) owner_name: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl TryFrom<ListingRow> for ListingRecord {
    type Error = RepoError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let price = Price::from_cents(row.price_cents).map_err(|err| RepoError::Integrity {
            message: format!("listing {} has an invalid price: {err}", row.id),
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price,
            currency: row.currency,
            image_url: row.image_url,
            category: row.category,
            condition: row.condition,
            location: row.location,
            owner_id: row.owner_id,
            owner_name: row.owner_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn into_records(rows: Vec<ListingRow>) -> Result<Vec<ListingRecord>, RepoError> {
    rows.into_iter().map(ListingRecord::try_from).collect()
}

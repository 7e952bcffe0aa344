use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{
    CreateListingParams, ListingsWriteRepo, RepoError, UpdateListingParams,
};
use crate::domain::entities::ListingRecord;
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

use super::types::ListingRow;

const RETURNING: &str = "RETURNING id, title, description, price_cents, currency, image_url, \
     category, condition, location, owner_id, owner_name, created_at, updated_at";

#[async_trait]
impl ListingsWriteRepo for PostgresRepositories {
    async fn create_listing(
        &self,
        params: CreateListingParams,
    ) -> Result<ListingRecord, RepoError> {
        let sql = format!(
            "INSERT INTO listings (id, title, description, price_cents, currency, image_url, \
             category, condition, location, owner_id, owner_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) {RETURNING}"
        );

        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(params.title)
            .bind(params.description)
            .bind(params.price.cents())
            .bind(params.currency)
            .bind(params.image_url)
            .bind(params.category)
            .bind(params.condition)
            .bind(params.location)
            .bind(params.owner_id)
            .bind(params.owner_name)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        ListingRecord::try_from(row)
    }

    async fn update_listing(
        &self,
        params: UpdateListingParams,
    ) -> Result<ListingRecord, RepoError> {
        let sql = format!(
            "UPDATE listings SET title = $2, description = $3, price_cents = $4, currency = $5, \
             image_url = $6, category = $7, condition = $8, location = $9, updated_at = now() \
             WHERE id = $1 {RETURNING}"
        );

        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(params.id)
            .bind(params.title)
            .bind(params.description)
            .bind(params.price.cents())
            .bind(params.currency)
            .bind(params.image_url)
            .bind(params.category)
            .bind(params.condition)
            .bind(params.location)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        ListingRecord::try_from(row)
    }

    async fn delete_listing(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

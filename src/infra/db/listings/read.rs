use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{ListingQueryFilter, ListingsRepo, RepoError};
use crate::domain::entities::ListingRecord;
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

use super::filter::{LISTING_ORDER, listing_select, push_listing_filter};
use super::types::{ListingRow, into_records};

#[async_trait]
impl ListingsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ListingRecord>, RepoError> {
        let mut qb = listing_select();
        qb.push(" AND l.id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<ListingRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(ListingRecord::try_from).transpose()
    }

    async fn list_listings(
        &self,
        filter: &ListingQueryFilter,
    ) -> Result<Vec<ListingRecord>, RepoError> {
        let mut qb = listing_select();
        push_listing_filter(&mut qb, filter);
        qb.push(LISTING_ORDER);

        let rows = qb
            .build_query_as::<ListingRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        into_records(rows)
    }

    async fn list_ids_by_owner(&self, owner_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM listings WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_listings(&self) -> Result<u64, RepoError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM listings")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::convert_count(count)
    }
}

use tracing::debug;
use uuid::Uuid;

use crate::application::repos::ListingQueryFilter;
use crate::cache::CacheKey;
use crate::domain::entities::ListingRecord;

use super::service::ListingService;
use super::types::ListingError;

impl ListingService {
    /// Fetch one listing, serving from cache when a live entry exists.
    pub async fn get(&self, id: Uuid) -> Result<ListingRecord, ListingError> {
        let key = CacheKey::Listing(id);
        if let Some(listing) = self.cache.read::<ListingRecord>(&key).await {
            return Ok(listing);
        }

        let listing = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(ListingError::NotFound)?;
        self.cache.write(&key, &listing).await;
        Ok(listing)
    }

    /// List listings newest first.
    ///
    /// A filtered query always goes to the database; only the unfiltered feed
    /// is served from the aggregate cache entry.
    pub async fn list(
        &self,
        filter: ListingQueryFilter,
    ) -> Result<Vec<ListingRecord>, ListingError> {
        let filter = filter.normalized();
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(ListingError::Validation(format!(
                    "min_price {min} exceeds max_price {max}"
                )));
            }
        }

        if !filter.is_empty() {
            return Ok(self.reader.list_listings(&filter).await?);
        }

        let key = CacheKey::AllListings;
        if let Some(listings) = self.cache.read::<Vec<ListingRecord>>(&key).await {
            return Ok(listings);
        }

        let listings = self.reader.list_listings(&filter).await?;
        self.cache.write(&key, &listings).await;
        Ok(listings)
    }

    /// Ids of the listings `owner_id` currently owns.
    ///
    /// The cached id set is a hint that is rebuilt from the database whenever
    /// it is missing or expired.
    pub async fn owner_listing_ids(&self, owner_id: Uuid) -> Result<Vec<Uuid>, ListingError> {
        let key = CacheKey::OwnerListings(owner_id);
        if let Some(ids) = self.cache.read::<Vec<Uuid>>(&key).await {
            return Ok(ids);
        }

        let ids = self.reader.list_ids_by_owner(owner_id).await?;
        self.cache.write(&key, &ids).await;
        Ok(ids)
    }

    /// Resolve the owner's listings through the per-listing cache.
    pub async fn owner_listings(&self, owner_id: Uuid) -> Result<Vec<ListingRecord>, ListingError> {
        let ids = self.owner_listing_ids(owner_id).await?;
        let mut listings = Vec::with_capacity(ids.len());

        for id in ids {
            match self.get(id).await {
                Ok(listing) if listing.owner_id == owner_id => listings.push(listing),
                Ok(_) | Err(ListingError::NotFound) => {
                    debug!(%owner_id, listing_id = %id, "Skipping stale owner index entry");
                }
                Err(err) => return Err(err),
            }
        }

        listings.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(listings)
    }
}

use tracing::{info, warn};
use uuid::Uuid;

use crate::application::accounts::CallerIdentity;
use crate::cache::CacheKey;
use crate::domain::entities::ListingRecord;

use super::service::ListingService;
use super::types::{CreateListingCommand, ListingError, ListingPatch};

impl ListingService {
    pub async fn create(
        &self,
        owner: &CallerIdentity,
        command: CreateListingCommand,
    ) -> Result<ListingRecord, ListingError> {
        let params = command.into_params(owner)?;
        let listing = self.writer.create_listing(params).await?;

        self.cache.write(&CacheKey::Listing(listing.id), &listing).await;
        self.append_to_owner_index(listing.owner_id, listing.id).await;
        self.cache.invalidate(&CacheKey::AllListings).await;

        info!(
            listing_id = %listing.id,
            owner_id = %listing.owner_id,
            category = %listing.category,
            "Listing created"
        );
        Ok(listing)
    }

    pub async fn update(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
        patch: ListingPatch,
    ) -> Result<ListingRecord, ListingError> {
        let current = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(ListingError::NotFound)?;
        if current.owner_id != caller.user_id {
            warn!(listing_id = %id, caller_id = %caller.user_id, "Rejected update by non-owner");
            return Err(ListingError::Forbidden);
        }
        if patch.is_empty() {
            return Ok(current);
        }

        let params = patch.apply(&current)?;
        let listing = self.writer.update_listing(params).await?;

        self.cache.write(&CacheKey::Listing(id), &listing).await;
        self.cache.invalidate(&CacheKey::AllListings).await;

        info!(listing_id = %id, "Listing updated");
        Ok(listing)
    }

    /// Delete a listing on behalf of its owner.
    pub async fn delete(&self, caller: &CallerIdentity, id: Uuid) -> Result<(), ListingError> {
        let current = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(ListingError::NotFound)?;
        if current.owner_id != caller.user_id {
            warn!(listing_id = %id, caller_id = %caller.user_id, "Rejected delete by non-owner");
            return Err(ListingError::Forbidden);
        }

        self.remove(&current).await?;
        info!(listing_id = %id, "Listing deleted by owner");
        Ok(())
    }

    /// Remove any listing; restricted to moderators and admins.
    pub async fn moderate_delete(
        &self,
        moderator: &CallerIdentity,
        id: Uuid,
    ) -> Result<(), ListingError> {
        if !moderator.role.can_moderate() {
            return Err(ListingError::Forbidden);
        }
        let current = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(ListingError::NotFound)?;

        self.remove(&current).await?;
        info!(
            listing_id = %id,
            owner_id = %current.owner_id,
            moderator_id = %moderator.user_id,
            "Listing removed by moderator"
        );
        Ok(())
    }

    async fn remove(&self, listing: &ListingRecord) -> Result<(), ListingError> {
        self.writer.delete_listing(listing.id).await?;

        self.cache.invalidate(&CacheKey::Listing(listing.id)).await;
        self.remove_from_owner_index(listing.owner_id, listing.id)
            .await;
        self.cache.invalidate(&CacheKey::AllListings).await;
        Ok(())
    }

    // The owner index is only patched when it is already cached; a missing
    // entry is rebuilt from the database on next read. Read-modify-write is
    // not atomic, so concurrent writers for one owner may lose an update.
    async fn append_to_owner_index(&self, owner_id: Uuid, listing_id: Uuid) {
        let key = CacheKey::OwnerListings(owner_id);
        if let Some(mut ids) = self.cache.read::<Vec<Uuid>>(&key).await {
            if !ids.contains(&listing_id) {
                ids.push(listing_id);
            }
            self.cache.write(&key, &ids).await;
        }
    }

    async fn remove_from_owner_index(&self, owner_id: Uuid, listing_id: Uuid) {
        let key = CacheKey::OwnerListings(owner_id);
        if let Some(mut ids) = self.cache.read::<Vec<Uuid>>(&key).await {
            ids.retain(|id| *id != listing_id);
            self.cache.write(&key, &ids).await;
        }
    }
}

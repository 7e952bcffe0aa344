use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use time::macros::datetime;
use uuid::Uuid;

use super::*;
use crate::application::accounts::CallerIdentity;
use crate::application::repos::{
    CreateListingParams, ListingQueryFilter, ListingsRepo, ListingsWriteRepo, RepoError,
    UpdateListingParams,
};
use crate::cache::{CacheAside, CacheConfig, CacheError, KeyValueCache, MemoryCache};
use crate::domain::entities::ListingRecord;
use crate::domain::price::Price;
use crate::domain::types::{ListingCondition, UserRole};

#[derive(Default)]
struct InMemoryListings {
    rows: Mutex<Vec<ListingRecord>>,
    finds: AtomicUsize,
    lists: AtomicUsize,
    owner_scans: AtomicUsize,
    seq: AtomicUsize,
}

impl InMemoryListings {
    fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    fn owner_scans(&self) -> usize {
        self.owner_scans.load(Ordering::SeqCst)
    }

    fn matches(listing: &ListingRecord, filter: &ListingQueryFilter) -> bool {
        if let Some(category) = &filter.category {
            if &listing.category != category {
                return false;
            }
        }
        if filter.min_price.is_some_and(|min| listing.price < min) {
            return false;
        }
        if filter.max_price.is_some_and(|max| listing.price > max) {
            return false;
        }
        if filter.condition.is_some_and(|c| listing.condition != c) {
            return false;
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            if !listing.title.to_lowercase().contains(&needle)
                && !listing.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ListingsRepo for InMemoryListings {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ListingRecord>, RepoError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn list_listings(
        &self,
        filter: &ListingQueryFilter,
    ) -> Result<Vec<ListingRecord>, RepoError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<ListingRecord> = rows
            .iter()
            .filter(|row| Self::matches(row, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matched)
    }

    async fn list_ids_by_owner(&self, owner_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        self.owner_scans.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|row| row.owner_id == owner_id)
            .map(|row| row.id)
            .collect())
    }

    async fn count_listings(&self) -> Result<u64, RepoError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

#[async_trait]
impl ListingsWriteRepo for InMemoryListings {
    async fn create_listing(
        &self,
        params: CreateListingParams,
    ) -> Result<ListingRecord, RepoError> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) as i64;
        let created_at = datetime!(2024-03-01 12:00 UTC) + time::Duration::seconds(seq);
        let record = ListingRecord {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            price: params.price,
            currency: params.currency,
            image_url: params.image_url,
            category: params.category,
            condition: params.condition,
            location: params.location,
            owner_id: params.owner_id,
            owner_name: params.owner_name,
            created_at,
            updated_at: created_at,
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_listing(
        &self,
        params: UpdateListingParams,
    ) -> Result<ListingRecord, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == params.id)
            .ok_or(RepoError::NotFound)?;
        row.title = params.title;
        row.description = params.description;
        row.price = params.price;
        row.currency = params.currency;
        row.image_url = params.image_url;
        row.category = params.category;
        row.condition = params.condition;
        row.location = params.location;
        row.updated_at += time::Duration::seconds(1);
        Ok(row.clone())
    }

    async fn delete_listing(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

struct BrokenCache;

#[async_trait]
impl KeyValueCache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

fn service_with(
    repo: &Arc<InMemoryListings>,
    backend: Arc<dyn KeyValueCache>,
) -> ListingService {
    let cache = CacheAside::new(backend, &CacheConfig::default());
    ListingService::new(repo.clone(), repo.clone(), cache)
}

fn cached_service() -> (ListingService, Arc<InMemoryListings>) {
    let repo = Arc::new(InMemoryListings::default());
    let service = service_with(&repo, Arc::new(MemoryCache::new()));
    (service, repo)
}

fn caller(name: &str, role: UserRole) -> CallerIdentity {
    CallerIdentity {
        user_id: Uuid::new_v4(),
        display_name: name.to_string(),
        role,
    }
}

fn listing(title: &str, description: &str, price: i64) -> CreateListingCommand {
    CreateListingCommand {
        title: title.to_string(),
        description: description.to_string(),
        price: Price::whole(price).expect("price"),
        currency: None,
        image_url: None,
        category: "Electronics".to_string(),
        condition: ListingCondition::Good,
        location: "Berkeley".to_string(),
    }
}

#[tokio::test]
async fn get_populates_cache_after_first_read() {
    let (service, repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let created = service
        .create(&owner, listing("Desk lamp", "Warm light", 15))
        .await
        .expect("create");

    let first = service.get(created.id).await.expect("first get");
    let second = service.get(created.id).await.expect("second get");

    assert_eq!(first, created);
    assert_eq!(second, created);
    // The create wrote the entry through, so neither read touched the store.
    assert_eq!(repo.finds(), 0);
}

#[tokio::test]
async fn get_reads_through_on_miss_and_reports_missing() {
    let repo = Arc::new(InMemoryListings::default());
    let owner = caller("Ana", UserRole::User);
    let writer_only = service_with(&repo, Arc::new(crate::cache::NoopCache));
    let created = writer_only
        .create(&owner, listing("Bike", "Red", 90))
        .await
        .expect("create");

    let service = service_with(&repo, Arc::new(MemoryCache::new()));
    service.get(created.id).await.expect("miss then store");
    service.get(created.id).await.expect("hit");
    assert_eq!(repo.finds(), 1);

    let err = service.get(Uuid::new_v4()).await.expect_err("unknown id");
    assert!(matches!(err, ListingError::NotFound));
}

#[tokio::test]
async fn update_is_visible_and_non_owner_delete_is_rejected() {
    let (service, _repo) = cached_service();
    let user1 = caller("Ana", UserRole::User);
    let user2 = caller("Ben", UserRole::User);

    let created = service
        .create(&user1, listing("iPhone 14", "128GB, unlocked", 799))
        .await
        .expect("create");
    assert_eq!(created.price, Price::whole(799).expect("price"));

    let patch = ListingPatch {
        price: Some(Price::whole(750).expect("price")),
        ..Default::default()
    };
    service
        .update(&user1, created.id, patch)
        .await
        .expect("owner update");

    let err = service
        .delete(&user2, created.id)
        .await
        .expect_err("non-owner delete");
    assert!(matches!(err, ListingError::Forbidden));

    let current = service.get(created.id).await.expect("still present");
    assert_eq!(current.price, Price::whole(750).expect("price"));
    assert_eq!(current.title, "iPhone 14");
}

#[tokio::test]
async fn non_owner_update_is_rejected() {
    let (service, _repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let other = caller("Ben", UserRole::Admin);
    let created = service
        .create(&owner, listing("Chair", "Wooden", 30))
        .await
        .expect("create");

    let patch = ListingPatch {
        title: Some("Stolen chair".to_string()),
        ..Default::default()
    };
    let err = service
        .update(&other, created.id, patch)
        .await
        .expect_err("non-owner update");
    assert!(matches!(err, ListingError::Forbidden));
    assert_eq!(service.get(created.id).await.expect("get").title, "Chair");
}

#[tokio::test]
async fn empty_patch_returns_current_listing() {
    let (service, _repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let created = service
        .create(&owner, listing("Lamp", "Brass", 25))
        .await
        .expect("create");

    let unchanged = service
        .update(&owner, created.id, ListingPatch::default())
        .await
        .expect("empty patch");
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn update_and_delete_of_unknown_listing_are_not_found() {
    let (service, repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let missing = Uuid::new_v4();

    let patch = ListingPatch {
        title: Some("Ghost".to_string()),
        ..Default::default()
    };
    let err = service
        .update(&owner, missing, patch)
        .await
        .expect_err("update of unknown id");
    assert!(matches!(err, ListingError::NotFound));

    let err = service
        .delete(&owner, missing)
        .await
        .expect_err("delete of unknown id");
    assert!(matches!(err, ListingError::NotFound));
    assert!(repo.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn created_listing_reads_back_with_every_field() {
    let (service, _repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let command = CreateListingCommand {
        title: "Canon AE-1".to_string(),
        description: "35mm film camera with 50mm lens".to_string(),
        price: Price::from_cents(12_550).expect("price"),
        currency: Some("eur".to_string()),
        image_url: Some("https://img.caltrade.test/ae1.jpg".to_string()),
        category: "Cameras".to_string(),
        condition: ListingCondition::Fair,
        location: "Sacramento".to_string(),
    };

    let created = service
        .create(&owner, command.clone())
        .await
        .expect("create");
    let fetched = service.get(created.id).await.expect("get");

    let expected = ListingRecord {
        id: created.id,
        title: command.title,
        description: command.description,
        price: command.price,
        currency: "EUR".to_string(),
        image_url: command.image_url,
        category: command.category,
        condition: command.condition,
        location: command.location,
        owner_id: owner.user_id,
        owner_name: owner.display_name.clone(),
        created_at: created.created_at,
        updated_at: created.updated_at,
    };
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn price_range_filter_selects_matching_listings() {
    let (service, _repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    for price in [45, 350, 1800] {
        service
            .create(&owner, listing(&format!("Item {price}"), "Used", price))
            .await
            .expect("create");
    }

    let filter = ListingQueryFilter {
        min_price: Some(Price::whole(100).expect("price")),
        max_price: Some(Price::whole(1000).expect("price")),
        ..Default::default()
    };
    let matched = service.list(filter).await.expect("list");

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].price, Price::whole(350).expect("price"));
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let (service, _repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    service
        .create(&owner, listing("MacBook Pro", "M2, 16GB", 1400))
        .await
        .expect("create");
    service
        .create(&owner, listing("Desk", "Fits a macbook nicely", 60))
        .await
        .expect("create");
    service
        .create(&owner, listing("Toaster", "Two slots", 20))
        .await
        .expect("create");

    let filter = ListingQueryFilter {
        search: Some("macbook".to_string()),
        ..Default::default()
    };
    let matched = service.list(filter).await.expect("list");

    let titles: Vec<&str> = matched.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Desk", "MacBook Pro"]);
}

#[tokio::test]
async fn inverted_price_range_is_a_validation_error() {
    let (service, repo) = cached_service();
    let filter = ListingQueryFilter {
        min_price: Some(Price::whole(500).expect("price")),
        max_price: Some(Price::whole(100).expect("price")),
        ..Default::default()
    };

    let err = service.list(filter).await.expect_err("inverted range");
    assert!(matches!(err, ListingError::Validation(_)));
    assert_eq!(repo.lists(), 0);
}

#[tokio::test]
async fn unfiltered_list_is_cached_until_a_write() {
    let (service, repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    service
        .create(&owner, listing("Kettle", "Steel", 18))
        .await
        .expect("create");

    assert_eq!(service.list(Default::default()).await.expect("list").len(), 1);
    assert_eq!(service.list(Default::default()).await.expect("list").len(), 1);
    assert_eq!(repo.lists(), 1);

    service
        .create(&owner, listing("Mug", "Ceramic", 5))
        .await
        .expect("create");
    let all = service.list(Default::default()).await.expect("list");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Mug");
    assert_eq!(repo.lists(), 2);
}

#[tokio::test]
async fn filtered_list_bypasses_cache() {
    let (service, repo) = cached_service();
    let filter = ListingQueryFilter {
        category: Some("Electronics".to_string()),
        ..Default::default()
    };

    service.list(filter.clone()).await.expect("list");
    service.list(filter).await.expect("list");
    assert_eq!(repo.lists(), 2);
}

#[tokio::test]
async fn owner_index_tracks_creates_and_deletes() {
    let (service, repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let first = service
        .create(&owner, listing("Guitar", "Acoustic", 120))
        .await
        .expect("create");

    let ids = service.owner_listing_ids(owner.user_id).await.expect("ids");
    assert_eq!(ids, vec![first.id]);
    assert_eq!(repo.owner_scans(), 1);

    let second = service
        .create(&owner, listing("Amp", "15W", 60))
        .await
        .expect("create");
    let ids = service.owner_listing_ids(owner.user_id).await.expect("ids");
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
    assert_eq!(repo.owner_scans(), 1);

    service.delete(&owner, first.id).await.expect("delete");
    let ids = service.owner_listing_ids(owner.user_id).await.expect("ids");
    assert_eq!(ids, vec![second.id]);

    let err = service.get(first.id).await.expect_err("deleted");
    assert!(matches!(err, ListingError::NotFound));
}

#[tokio::test]
async fn owner_listings_skip_stale_ids_and_sort_newest_first() {
    let (service, repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let older = service
        .create(&owner, listing("Tent", "2 person", 80))
        .await
        .expect("create");
    let newer = service
        .create(&owner, listing("Stove", "Camping", 40))
        .await
        .expect("create");
    service.owner_listing_ids(owner.user_id).await.expect("prime index");

    // Removed behind the service's back: the index entry is now stale.
    repo.delete_listing(older.id).await.expect("raw delete");
    service
        .cache
        .invalidate(&crate::cache::CacheKey::Listing(older.id))
        .await;

    let listings = service.owner_listings(owner.user_id).await.expect("listings");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, newer.id);
}

#[tokio::test]
async fn moderators_can_remove_any_listing() {
    let (service, _repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let bystander = caller("Ben", UserRole::User);
    let moderator = caller("Mo", UserRole::Moderator);
    let created = service
        .create(&owner, listing("Scooter", "Electric", 300))
        .await
        .expect("create");

    let err = service
        .moderate_delete(&bystander, created.id)
        .await
        .expect_err("plain user");
    assert!(matches!(err, ListingError::Forbidden));

    service
        .moderate_delete(&moderator, created.id)
        .await
        .expect("moderator delete");
    assert!(matches!(
        service.get(created.id).await,
        Err(ListingError::NotFound)
    ));
    assert!(service
        .owner_listing_ids(owner.user_id)
        .await
        .expect("ids")
        .is_empty());
}

#[tokio::test]
async fn broken_cache_falls_back_to_store() {
    let repo = Arc::new(InMemoryListings::default());
    let service = service_with(&repo, Arc::new(BrokenCache));
    let owner = caller("Ana", UserRole::User);

    let created = service
        .create(&owner, listing("Drill", "Cordless", 70))
        .await
        .expect("create despite cache failure");
    let fetched = service.get(created.id).await.expect("get");

    assert_eq!(fetched, created);
    assert_eq!(repo.finds(), 1);
    assert_eq!(service.list(Default::default()).await.expect("list").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn expired_entries_are_reloaded() {
    let (service, repo) = cached_service();
    let owner = caller("Ana", UserRole::User);
    let created = service
        .create(&owner, listing("Sofa", "Grey", 200))
        .await
        .expect("create");

    service.get(created.id).await.expect("hit");
    assert_eq!(repo.finds(), 0);

    tokio::time::advance(CacheConfig::default().ttl + Duration::from_secs(1)).await;

    service.get(created.id).await.expect("reload");
    assert_eq!(repo.finds(), 1);
}

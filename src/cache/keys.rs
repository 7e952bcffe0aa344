//! Cache key definitions.
//!
//! Entity-scoped keys cache one listing; collection-scoped keys cache the
//! aggregate listing feed or one owner's listing ids.

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A single listing by id.
    Listing(Uuid),
    /// The unfiltered "all listings" aggregate.
    AllListings,
    /// Ids of the listings owned by a user.
    OwnerListings(Uuid),
}

impl CacheKey {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheKey::Listing(_) => "listing",
            CacheKey::AllListings => "listings_all",
            CacheKey::OwnerListings(_) => "listings_owner",
        }
    }

    /// Render the backend key under `namespace`.
    pub fn render(&self, namespace: &str) -> String {
        format!("{namespace}:{self}")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Listing(id) => write!(f, "listing:{id}"),
            CacheKey::AllListings => f.write_str("listings:all"),
            CacheKey::OwnerListings(owner) => write!(f, "listings:owner:{owner}"),
        }
    }
}

use std::sync::Arc;

use crate::application::repos::{ListingsRepo, ListingsWriteRepo};
use crate::cache::CacheAside;

/// Listing reads and writes with a cache-aside read path.
///
/// The relational store is always written first; cache entries are written or
/// invalidated afterwards on a best-effort basis.
#[derive(Clone)]
pub struct ListingService {
    pub(crate) reader: Arc<dyn ListingsRepo>,
    pub(crate) writer: Arc<dyn ListingsWriteRepo>,
    pub(crate) cache: CacheAside,
}

impl ListingService {
    pub fn new(
        reader: Arc<dyn ListingsRepo>,
        writer: Arc<dyn ListingsWriteRepo>,
        cache: CacheAside,
    ) -> Self {
        Self {
            reader,
            writer,
            cache,
        }
    }
}

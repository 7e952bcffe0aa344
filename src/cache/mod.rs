//! CalTrade cache layer
//!
//! The cache is an acceleration structure in front of the relational store,
//! never a source of truth:
//!
//! - **Backend**: any key-value store implementing [`KeyValueCache`]
//!   (`get` / `set` with TTL / `delete`). The in-process [`MemoryCache`] is the
//!   default; [`NoopCache`] is used when caching is disabled.
//! - **Cache-aside**: [`CacheAside`] wraps a backend with JSON encoding and
//!   best-effort semantics. Backend failures are logged and counted, then
//!   treated as misses.
//! - **Expiry**: entries are never served past their TTL. The
//!   [`CacheSweeper`] task reclaims expired entries from the memory backend.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_seconds = 300
//! sweep_interval_seconds = 60
//! namespace = "caltrade"
//! ```

mod aside;
mod config;
mod keys;
mod store;
mod sweeper;

pub use aside::CacheAside;
pub use config::CacheConfig;
pub use keys::CacheKey;
pub use store::{CacheError, KeyValueCache, MemoryCache, NoopCache};
pub use sweeper::CacheSweeper;

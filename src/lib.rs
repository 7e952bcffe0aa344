//! CalTrade marketplace core: listings with a cache-aside read path, owner
//! indexes, account moderation and the HTTP surface that exposes them.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;

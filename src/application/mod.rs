//! Application services: listings, accounts and startup seeding.

pub mod accounts;
pub mod error;
pub mod listings;
pub mod repos;
pub mod seed;

#[cfg(test)]
mod test_support;

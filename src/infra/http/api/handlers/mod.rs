//! API handlers organized by resource type.

mod admin;
mod listings;
mod users;

pub use admin::*;
pub use listings::*;
pub use users::*;

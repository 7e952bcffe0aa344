use std::sync::Arc;

use crate::application::accounts::AccountService;
use crate::application::listings::ListingService;
use crate::application::repos::HealthRepo;

#[derive(Clone)]
pub struct ApiState {
    pub listings: Arc<ListingService>,
    pub accounts: Arc<AccountService>,
    pub health: Arc<dyn HealthRepo>,
}

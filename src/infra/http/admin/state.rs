use std::sync::Arc;

use crate::application::{
    admin_auth::AdminAuthenticator, repos::StoreHealth, schedule::ScheduleService,
};

#[derive(Clone)]
pub struct AdminState {
    pub schedule: Arc<ScheduleService>,
    pub auth: Arc<AdminAuthenticator>,
    pub health: Arc<dyn StoreHealth>,
}

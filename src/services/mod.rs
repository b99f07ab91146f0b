use std::sync::Arc;

use actix_web::web;

mod resource;
pub mod short_name;

pub use resource::{ResourceService, ResourceServiceTrait};
pub use short_name::{allocate_short_name, search, SearchParameters};

use crate::{db::Database, repositories::ResourceRepository};

/// Service Register
pub fn register(db: Database, search: SearchParameters, cfg: &mut web::ServiceConfig) {
    let resource_repository = ResourceRepository::new(db);
    let resource_service = ResourceService::new(Arc::new(resource_repository), search);
    cfg.app_data(web::Data::new(resource_service));
}

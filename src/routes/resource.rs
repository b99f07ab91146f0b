use actix_web::web;

use crate::handlers::{
    create_handler, delete_handler, get_all_handler, get_by_id_handler, preview_short_name_handler,
    reassign_short_name_handler,
};

// Configure tenant resource routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tenants/{tenant_id}")
            .route("/resources", web::post().to(create_handler))
            .route("/resources", web::get().to(get_all_handler))
            .route("/resources/{id}", web::get().to(get_by_id_handler))
            .route("/resources/{id}", web::delete().to(delete_handler))
            .route(
                "/resources/{id}/short-name",
                web::post().to(reassign_short_name_handler),
            )
            .route(
                "/short-names/preview",
                web::get().to(preview_short_name_handler),
            ),
    );
}

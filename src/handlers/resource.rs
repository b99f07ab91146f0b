use actix_web::{web, HttpResponse, Responder};
use log::debug;
use serde_json::json;
use uuid::Uuid;

use crate::{
    models::{CreateResourceDto, ResourceQueryParams, ShortNamePreviewQuery},
    repositories::ResourceRepository,
    services::{ResourceService, ResourceServiceTrait},
    types::Result,
};

pub type ResourceServiceType = ResourceService<ResourceRepository>;

/// Create resource route handler
pub async fn create_handler(
    tenant_id: web::Path<String>,
    dto: web::Json<CreateResourceDto>,
    service: web::Data<ResourceServiceType>,
) -> Result<impl Responder> {
    let resource = service.create(&tenant_id, dto.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "data": resource,
        "message": "Successfully created resource",
    })))
}

/// List resources route handler
pub async fn get_all_handler(
    tenant_id: web::Path<String>,
    query: web::Query<ResourceQueryParams>,
    service: web::Data<ResourceServiceType>,
) -> Result<impl Responder> {
    let resources = service.get_all(&tenant_id, &query).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": resources,
        "message": "Successfully retrieved resources",
    })))
}

/// Get resource by ID route handler
pub async fn get_by_id_handler(
    path: web::Path<(String, Uuid)>,
    service: web::Data<ResourceServiceType>,
) -> Result<impl Responder> {
    let (tenant_id, id) = path.into_inner();
    let resource = service.get_by_id(&tenant_id, &id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": resource,
        "message": "Successfully retrieved resource",
    })))
}

/// Delete resource route handler
pub async fn delete_handler(
    path: web::Path<(String, Uuid)>,
    service: web::Data<ResourceServiceType>,
) -> Result<impl Responder> {
    let (tenant_id, id) = path.into_inner();
    service.delete(&tenant_id, &id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "deleted_id": &id,
        "message": format!("Successfully deleted resource with ID '{}'", id),
    })))
}

/// Reassign short name route handler
pub async fn reassign_short_name_handler(
    path: web::Path<(String, Uuid)>,
    service: web::Data<ResourceServiceType>,
) -> Result<impl Responder> {
    let (tenant_id, id) = path.into_inner();
    let resource = service.reassign_short_name(&tenant_id, &id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": resource,
        "message": "Successfully reassigned short name",
    })))
}

/// Preview short name route handler
pub async fn preview_short_name_handler(
    tenant_id: web::Path<String>,
    query: web::Query<ShortNamePreviewQuery>,
    service: web::Data<ResourceServiceType>,
) -> Result<impl Responder> {
    debug!("Short name preview requested for '{}'", query.name);
    let short_name = service.preview_short_name(&tenant_id, &query).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": { "short_name": short_name },
        "message": "Short name is currently available",
    })))
}

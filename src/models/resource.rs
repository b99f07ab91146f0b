// src/models/resource.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Attributed, Attributes};
use crate::validations::validate_short_name;

// DTO for registering a new tenant resource
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateResourceDto {
    #[validate(length(min = 1, max = 64, message = "Kind must be between 1 and 64 characters"))]
    pub kind: String,

    #[validate(length(min = 1, max = 253, message = "Name must be between 1 and 253 characters"))]
    pub name: String,

    // Caller-chosen short name, allocated automatically when absent
    #[validate(custom(function = "validate_short_name"))]
    pub short_name: Option<String>,

    pub attributes: Option<JsonValue>,
}

/// Query parameters for listing resources of a tenant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceQueryParams {
    pub kind: Option<String>,
    pub short_name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for previewing the next short name
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ShortNamePreviewQuery {
    #[validate(length(min = 1, max = 64, message = "Kind must be between 1 and 64 characters"))]
    pub kind: String,

    #[validate(length(min = 1, max = 253, message = "Name must be between 1 and 253 characters"))]
    pub name: String,

    #[validate(range(min = 1, max = 10, message = "Max size must be between 1 and 10"))]
    pub max_size: Option<usize>,
}

/// A tenant-scoped resource (cluster, registry, ...) with free-form attributes
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,

    /// Tenant owning the resource; short names are unique per tenant and kind
    pub tenant_id: String,

    /// Resource type, e.g. `cluster`
    pub kind: String,

    /// Full canonical name, often a long cloud-provider identifier
    pub name: String,

    /// JSON object holding the short name and any caller attributes
    pub attributes: JsonValue,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Set when the resource is soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(tenant_id: &str, kind: &str, name: &str, attributes: Option<JsonValue>) -> Self {
        let now = Utc::now();
        let attributes = match attributes {
            Some(JsonValue::Object(map)) => JsonValue::Object(map),
            _ => JsonValue::Object(Attributes::new()),
        };

        Self {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            attributes,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Attributed for Resource {
    fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_object()
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = JsonValue::Object(attributes);
    }
}

// DTO for response with resource details
#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceResponseDto {
    pub id: Uuid,
    pub kind: String,
    pub name: String,
    pub short_name: Option<String>,
    pub attributes: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponseDto {
    fn from(resource: Resource) -> Self {
        ResourceResponseDto {
            short_name: resource.short_name().map(str::to_string),
            id: resource.id,
            kind: resource.kind,
            name: resource.name,
            attributes: resource.attributes,
            created_at: resource.created_at,
            updated_at: resource.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_resource_ignores_non_object_attributes() {
        let resource = Resource::new("acme", "cluster", "prod", Some(json!(["x"])));
        assert_eq!(resource.attributes, json!({}));
        assert!(!resource.is_deleted());
    }

    #[test]
    fn test_response_exposes_short_name() {
        let mut resource = Resource::new(
            "acme",
            "cluster",
            "gke_elated-pottery",
            Some(json!({ "region": "us" })),
        );
        resource.set_short_name("POT");

        let dto = ResourceResponseDto::from(resource);
        assert_eq!(dto.short_name.as_deref(), Some("POT"));
        assert_eq!(dto.attributes["region"], "us");
    }

    #[test]
    fn test_create_dto_rejects_bad_short_name() {
        let dto = CreateResourceDto {
            kind: "cluster".into(),
            name: "prod".into(),
            short_name: Some("bad-alias".into()),
            attributes: None,
        };
        assert!(dto.validate().is_err());
    }
}

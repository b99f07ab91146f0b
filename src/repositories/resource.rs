// src/repositories/resource.rs - Data access
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::db::Database;
use crate::errors::RepositoryError;
use crate::models::{Resource, ResourceQueryParams, SHORT_NAME_ATTRIBUTE};

type Result<T> = std::result::Result<T, RepositoryError>;

const MAX_PAGE_SIZE: i64 = 500;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceRepositoryTrait: Send + Sync {
    /// Inserts a new resource and returns the stored row
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    /// * `RepositoryError::Conflict` - If a resource with the same ID exists
    async fn save(&self, resource: &Resource) -> Result<Resource>;

    /// Finds a live resource of a tenant by ID
    ///
    /// ### Returns
    /// * `Result<Option<Resource>>` - The resource, or `None` if missing or soft-deleted
    async fn find_by_id(&self, tenant_id: &str, id: &Uuid) -> Result<Option<Resource>>;

    /// Lists live resources of a tenant, filtered by kind and/or short name
    async fn find(&self, tenant_id: &str, params: &ResourceQueryParams) -> Result<Vec<Resource>>;

    /// Projects the short names already allocated to live resources of a
    /// tenant and kind
    ///
    /// ### Returns
    /// * `Result<HashSet<String>>` - The collision set for the next allocation
    async fn find_short_names(&self, tenant_id: &str, kind: &str) -> Result<HashSet<String>>;

    /// Replaces the attributes of a resource and stamps `updated_at`
    ///
    /// ### Returns
    /// * `Result<u64>` - Number of rows affected
    async fn update_attributes(
        &self,
        tenant_id: &str,
        id: &Uuid,
        attributes: &JsonValue,
        updated_at: DateTime<Utc>,
    ) -> Result<u64>;

    /// Marks a resource as deleted; its short name becomes available again
    ///
    /// ### Returns
    /// * `Result<bool>` - Whether a live resource was deleted
    async fn soft_delete(&self, tenant_id: &str, id: &Uuid) -> Result<bool>;
}

// Implementation using actual database
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    pub fn new(db: Database) -> Self {
        Self {
            pool: db.get_pool().clone(),
        }
    }
}

#[async_trait]
impl ResourceRepositoryTrait for ResourceRepository {
    async fn save(&self, resource: &Resource) -> Result<Resource> {
        let record = sqlx::query_as::<_, Resource>(
            r#"
                INSERT INTO resources
                (id, tenant_id, kind, name, attributes, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            "#,
        )
        .bind(resource.id)
        .bind(&resource.tenant_id)
        .bind(&resource.kind)
        .bind(&resource.name)
        .bind(&resource.attributes)
        .bind(resource.created_at)
        .bind(resource.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to insert resource: {}", e);
            RepositoryError::from(e)
        })?;

        Ok(record)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &Uuid) -> Result<Option<Resource>> {
        sqlx::query_as::<_, Resource>(
            r#"
            SELECT * FROM resources
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find(&self, tenant_id: &str, params: &ResourceQueryParams) -> Result<Vec<Resource>> {
        let mut query_builder =
            QueryBuilder::new("SELECT * FROM resources WHERE deleted_at IS NULL AND tenant_id = ");
        query_builder.push_bind(tenant_id);

        if let Some(kind) = &params.kind {
            query_builder.push(" AND kind = ");
            query_builder.push_bind(kind);
        }

        if let Some(short_name) = &params.short_name {
            query_builder.push(" AND attributes ->> ");
            query_builder.push_bind(SHORT_NAME_ATTRIBUTE);
            query_builder.push(" = ");
            query_builder.push_bind(short_name);
        }

        query_builder.push(" ORDER BY created_at ASC");

        query_builder.push(" LIMIT ");
        query_builder.push_bind(params.limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE));

        if let Some(offset) = params.offset {
            query_builder.push(" OFFSET ");
            query_builder.push_bind(offset.max(0));
        }

        let results = query_builder
            .build_query_as::<Resource>()
            .fetch_all(&self.pool)
            .await?;

        Ok(results)
    }

    async fn find_short_names(&self, tenant_id: &str, kind: &str) -> Result<HashSet<String>> {
        let short_names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT attributes ->> $3 FROM resources
            WHERE tenant_id = $1 AND kind = $2 AND deleted_at IS NULL
              AND attributes ->> $3 IS NOT NULL
            "#,
        )
        .bind(tenant_id)
        .bind(kind)
        .bind(SHORT_NAME_ATTRIBUTE)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Loaded {} short names for tenant '{}' kind '{}'",
            short_names.len(),
            tenant_id,
            kind
        );
        Ok(short_names.into_iter().collect())
    }

    async fn update_attributes(
        &self,
        tenant_id: &str,
        id: &Uuid,
        attributes: &JsonValue,
        updated_at: DateTime<Utc>,
    ) -> Result<u64> {
        debug!("Updating attributes of resource {} to {}", id, attributes);

        let result = sqlx::query(
            r#"
            UPDATE resources SET attributes = $3, updated_at = $4
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(attributes)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn soft_delete(&self, tenant_id: &str, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE resources SET deleted_at = $3, updated_at = $3
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() > 0)
    }
}

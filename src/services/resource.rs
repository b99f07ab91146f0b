// src/services/resource.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{flatten_validation_errors, ServiceError};
use crate::models::{
    Attributed, CreateResourceDto, Resource, ResourceQueryParams, ResourceResponseDto,
    ShortNamePreviewQuery,
};
use crate::repositories::ResourceRepositoryTrait;
use crate::services::short_name::{self, SearchParameters};

type Result<T> = std::result::Result<T, ServiceError>;

#[async_trait]
pub trait ResourceServiceTrait {
    async fn create(&self, tenant_id: &str, dto: CreateResourceDto) -> Result<ResourceResponseDto>;
    async fn get_by_id(&self, tenant_id: &str, id: &Uuid) -> Result<ResourceResponseDto>;
    async fn get_all(
        &self,
        tenant_id: &str,
        params: &ResourceQueryParams,
    ) -> Result<Vec<ResourceResponseDto>>;
    async fn delete(&self, tenant_id: &str, id: &Uuid) -> Result<()>;
    async fn reassign_short_name(&self, tenant_id: &str, id: &Uuid) -> Result<ResourceResponseDto>;
    async fn preview_short_name(&self, tenant_id: &str, query: &ShortNamePreviewQuery)
        -> Result<String>;
}

pub struct ResourceService<T: ResourceRepositoryTrait> {
    repository: Arc<T>,
    search: SearchParameters,
}

impl<T: ResourceRepositoryTrait> ResourceService<T> {
    pub fn new(repository: Arc<T>, search: SearchParameters) -> Self {
        Self { repository, search }
    }

    async fn find_live(&self, tenant_id: &str, id: &Uuid) -> Result<Resource> {
        self.repository
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Resource with ID '{}' not found", id)))
    }
}

#[async_trait]
impl<T: ResourceRepositoryTrait> ResourceServiceTrait for ResourceService<T> {
    async fn create(&self, tenant_id: &str, dto: CreateResourceDto) -> Result<ResourceResponseDto> {
        if let Err(e) = dto.validate() {
            return Err(ServiceError::ValidationError(flatten_validation_errors(&e)));
        }

        // Collision set is read once; concurrent creates may race, last writer wins
        let taken = self.repository.find_short_names(tenant_id, &dto.kind).await?;
        let mut resource = Resource::new(tenant_id, &dto.kind, &dto.name, dto.attributes);

        match dto.short_name {
            Some(custom) => {
                if custom.len() > self.search.max_size {
                    return Err(ServiceError::ValidationError(format!(
                        "Short name '{}' is longer than {} characters",
                        custom, self.search.max_size
                    )));
                }
                if taken.contains(&custom) {
                    return Err(ServiceError::Conflict(format!(
                        "Short name '{}' is already in use",
                        custom
                    )));
                }
                resource.set_short_name(&custom);
            }
            None => {
                let name = resource.name.clone();
                short_name::assign_short_name(&mut resource, &name, &self.search, &taken);
            }
        }

        let record = self.repository.save(&resource).await?;
        info!(
            "Created {} '{}' for tenant '{}' with short name {:?}",
            record.kind,
            record.name,
            tenant_id,
            record.short_name()
        );

        Ok(ResourceResponseDto::from(record))
    }

    async fn get_by_id(&self, tenant_id: &str, id: &Uuid) -> Result<ResourceResponseDto> {
        self.find_live(tenant_id, id).await.map(ResourceResponseDto::from)
    }

    async fn get_all(
        &self,
        tenant_id: &str,
        params: &ResourceQueryParams,
    ) -> Result<Vec<ResourceResponseDto>> {
        let resources = self.repository.find(tenant_id, params).await?;
        Ok(resources.into_iter().map(ResourceResponseDto::from).collect())
    }

    async fn delete(&self, tenant_id: &str, id: &Uuid) -> Result<()> {
        if !self.repository.soft_delete(tenant_id, id).await? {
            return Err(ServiceError::NotFound(format!(
                "Resource with ID '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn reassign_short_name(&self, tenant_id: &str, id: &Uuid) -> Result<ResourceResponseDto> {
        let mut resource = self.find_live(tenant_id, id).await?;

        // The current short name stays in the collision set so the new one differs
        let taken = self
            .repository
            .find_short_names(tenant_id, &resource.kind)
            .await?;
        let previous = resource.short_name().map(str::to_string);
        let name = resource.name.clone();
        let allocated = short_name::assign_short_name(&mut resource, &name, &self.search, &taken);
        resource.updated_at = Utc::now();

        if self
            .repository
            .update_attributes(tenant_id, id, &resource.attributes, resource.updated_at)
            .await?
            == 0
        {
            return Err(ServiceError::NotFound(format!(
                "Resource with ID '{}' not found",
                id
            )));
        }

        info!(
            "Reassigned short name of resource {} from {:?} to '{}'",
            id, previous, allocated
        );
        Ok(ResourceResponseDto::from(resource))
    }

    async fn preview_short_name(
        &self,
        tenant_id: &str,
        query: &ShortNamePreviewQuery,
    ) -> Result<String> {
        if let Err(e) = query.validate() {
            return Err(ServiceError::ValidationError(flatten_validation_errors(&e)));
        }

        let params = SearchParameters {
            max_size: query.max_size.unwrap_or(self.search.max_size),
            ..self.search
        };
        let taken = self.repository.find_short_names(tenant_id, &query.kind).await?;
        let preview = short_name::allocate_with_rng(&query.name, &params, &taken, &mut rand::rng());

        debug!(
            "Previewed short name '{}' for '{}' ({} taken)",
            preview,
            query.name,
            taken.len()
        );
        Ok(preview)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use chrono::Duration;
    use serde_json::json;

    use super::*;
    use crate::repositories::MockResourceRepositoryTrait;

    const TENANT: &str = "acme";
    const CLUSTER: &str = "gke_elated-pottery-310110_us-central1-c_dwertent";

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn create_dto(short_name: Option<&str>) -> CreateResourceDto {
        CreateResourceDto {
            kind: "cluster".into(),
            name: CLUSTER.into(),
            short_name: short_name.map(str::to_string),
            attributes: Some(json!({ "region": "us-central1" })),
        }
    }

    fn service(repo: MockResourceRepositoryTrait) -> ResourceService<MockResourceRepositoryTrait> {
        ResourceService::new(Arc::new(repo), SearchParameters::default())
    }

    #[tokio::test]
    async fn test_create_allocates_next_short_name() {
        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_find_short_names()
            .times(1)
            .returning(|_, _| Ok(taken(&["D", "DW"])));
        repo.expect_save().times(1).returning(|r| Ok(r.clone()));

        let created = service(repo).create(TENANT, create_dto(None)).await.unwrap();

        assert_eq!(created.short_name.as_deref(), Some("DWE"));
        assert_eq!(created.attributes["region"], "us-central1");
    }

    #[tokio::test]
    async fn test_create_keeps_free_custom_short_name() {
        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_find_short_names()
            .returning(|_, _| Ok(taken(&["D"])));
        repo.expect_save().times(1).returning(|r| Ok(r.clone()));

        let created = service(repo)
            .create(TENANT, create_dto(Some("PROD")))
            .await
            .unwrap();

        assert_eq!(created.short_name.as_deref(), Some("PROD"));
    }

    #[tokio::test]
    async fn test_create_rejects_taken_custom_short_name() {
        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_find_short_names()
            .returning(|_, _| Ok(taken(&["PROD"])));
        repo.expect_save().never();

        let result = service(repo).create(TENANT, create_dto(Some("PROD"))).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_custom_short_name_over_max_size() {
        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_find_short_names().returning(|_, _| Ok(HashSet::new()));
        repo.expect_save().never();

        let result = service(repo)
            .create(TENANT, create_dto(Some("PRODUCTION")))
            .await;

        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_dto() {
        let repo = MockResourceRepositoryTrait::new();
        let dto = CreateResourceDto {
            name: String::new(),
            ..create_dto(None)
        };

        let result = service(repo).create(TENANT, dto).await;

        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_find_by_id().returning(|_, _| Ok(None));

        let result = service(repo).get_by_id(TENANT, &Uuid::new_v4()).await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_resource() {
        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_soft_delete().returning(|_, _| Ok(false));

        let result = service(repo).delete(TENANT, &Uuid::new_v4()).await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reassign_short_name_moves_to_next_candidate() {
        let mut existing = Resource::new(TENANT, "cluster", CLUSTER, None);
        existing.set_short_name("D");
        existing.updated_at = Utc::now() - Duration::hours(1);
        let id = existing.id;
        let previous_update = existing.updated_at;
        let stored_at = Arc::new(Mutex::new(None));
        let stored = stored_at.clone();

        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(existing.clone())));
        repo.expect_find_short_names()
            .returning(|_, _| Ok(taken(&["D"])));
        repo.expect_update_attributes()
            .times(1)
            .returning(move |_, _, attributes, updated_at| {
                assert_eq!(attributes["alias"], "DW");
                *stored.lock().unwrap() = Some(updated_at);
                Ok(1)
            });

        let updated = service(repo).reassign_short_name(TENANT, &id).await.unwrap();

        assert_eq!(updated.short_name.as_deref(), Some("DW"));
        assert!(updated.updated_at > previous_update);
        assert_eq!(*stored_at.lock().unwrap(), Some(updated.updated_at));
    }

    #[tokio::test]
    async fn test_preview_short_name_honours_max_size_override() {
        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_find_short_names()
            .returning(|_, _| Ok(taken(&["P", "PO"])));
        repo.expect_save().never();

        let query = ShortNamePreviewQuery {
            kind: "cluster".into(),
            name: "gke_elated-pottery".into(),
            max_size: Some(3),
        };
        let preview = service(repo).preview_short_name(TENANT, &query).await.unwrap();

        // POTTERY truncated to three characters only yields P and PO
        assert_eq!(preview, "P1");
    }

    #[tokio::test]
    async fn test_get_all_maps_resources() {
        let mut repo = MockResourceRepositoryTrait::new();
        repo.expect_find().returning(|tenant, _| {
            let mut resource = Resource::new(tenant, "cluster", "prod", None);
            resource.set_short_name("P");
            Ok(vec![resource])
        });

        let resources = service(repo)
            .get_all(TENANT, &ResourceQueryParams::default())
            .await
            .unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].short_name.as_deref(), Some("P"));
    }
}

//! Source service.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use syncplane_db::{catalog_hash, ActorCatalog, ActorType};

use crate::error::Result;
use crate::matcher::{matches, SourceMatcher};
use crate::models::{
    ActorCatalogWithUpdatedAtRead, DiscoverCatalogResult, SourceCloneRequestBody, SourceCreate,
    SourceDiscoverSchemaWriteRequestBody, SourceIdRequestBody, SourceRead, SourceReadList,
    SourceSearch, SourceUpdate, WorkspaceIdRequestBody,
};
use crate::services::actor_service::{ActorService, ActorView};

/// Operations behind the `/sources` endpoints.
#[async_trait]
pub trait SourceHandler: Send + Sync {
    async fn create_source(&self, request: SourceCreate) -> Result<SourceRead>;
    async fn get_source(&self, request: SourceIdRequestBody) -> Result<SourceRead>;
    async fn list_sources_for_workspace(
        &self,
        request: WorkspaceIdRequestBody,
    ) -> Result<SourceReadList>;
    async fn search_sources(&self, request: SourceSearch) -> Result<SourceReadList>;
    async fn update_source(&self, request: SourceUpdate) -> Result<SourceRead>;
    async fn clone_source(&self, request: SourceCloneRequestBody) -> Result<SourceRead>;
    async fn delete_source(&self, request: SourceIdRequestBody) -> Result<()>;
    async fn upgrade_source_version(&self, request: SourceIdRequestBody) -> Result<()>;
    async fn most_recent_source_actor_catalog(
        &self,
        request: SourceIdRequestBody,
    ) -> Result<ActorCatalogWithUpdatedAtRead>;
    async fn write_discover_catalog_result(
        &self,
        request: SourceDiscoverSchemaWriteRequestBody,
    ) -> Result<DiscoverCatalogResult>;
}

impl From<ActorView> for SourceRead {
    fn from(view: ActorView) -> Self {
        Self {
            is_version_override_applied: view.actor.is_version_override_applied(),
            source_id: view.actor.actor_id,
            name: view.actor.name,
            source_definition_id: view.definition.definition_id,
            source_name: view.definition.name,
            workspace_id: view.actor.workspace_id,
            connection_configuration: view.actor.configuration,
            icon: view.definition.icon,
            breaking_changes: view.breaking_changes.into_iter().map(Into::into).collect(),
            support_state: view.definition.support_state,
        }
    }
}

/// Postgres-backed source handler.
pub struct SourceService {
    actors: ActorService,
}

impl SourceService {
    /// Create a new source service.
    pub fn new(pool: PgPool) -> Self {
        Self {
            actors: ActorService::new(pool, ActorType::Source),
        }
    }
}

#[async_trait]
impl SourceHandler for SourceService {
    async fn create_source(&self, request: SourceCreate) -> Result<SourceRead> {
        let view = self
            .actors
            .create(
                request.workspace_id,
                request.source_definition_id,
                request.name,
                request.connection_configuration,
            )
            .await?;
        Ok(view.into())
    }

    async fn get_source(&self, request: SourceIdRequestBody) -> Result<SourceRead> {
        Ok(self.actors.get(request.source_id).await?.into())
    }

    async fn list_sources_for_workspace(
        &self,
        request: WorkspaceIdRequestBody,
    ) -> Result<SourceReadList> {
        let views = self.actors.list_for_workspace(request.workspace_id).await?;
        Ok(SourceReadList {
            sources: views.into_iter().map(Into::into).collect(),
        })
    }

    #[instrument(skip(self, request))]
    async fn search_sources(&self, request: SourceSearch) -> Result<SourceReadList> {
        let candidates = self.actors.list(request.workspace_id).await?;
        let total = candidates.len();

        let sources: Vec<SourceRead> = candidates
            .into_iter()
            .map(SourceRead::from)
            .filter(|source| matches(&SourceMatcher, Some(&request), source))
            .collect();

        debug!(candidates = total, matched = sources.len(), "Searched sources");
        Ok(SourceReadList { sources })
    }

    async fn update_source(&self, request: SourceUpdate) -> Result<SourceRead> {
        let view = self
            .actors
            .update(
                request.source_id,
                request.name,
                request.connection_configuration,
            )
            .await?;
        Ok(view.into())
    }

    async fn clone_source(&self, request: SourceCloneRequestBody) -> Result<SourceRead> {
        let overrides = request.source_configuration.unwrap_or_default();
        let view = self
            .actors
            .clone_actor(
                request.source_clone_id,
                overrides.name,
                overrides.connection_configuration,
            )
            .await?;
        Ok(view.into())
    }

    async fn delete_source(&self, request: SourceIdRequestBody) -> Result<()> {
        self.actors.delete(request.source_id).await
    }

    async fn upgrade_source_version(&self, request: SourceIdRequestBody) -> Result<()> {
        self.actors.upgrade_version(request.source_id).await
    }

    async fn most_recent_source_actor_catalog(
        &self,
        request: SourceIdRequestBody,
    ) -> Result<ActorCatalogWithUpdatedAtRead> {
        self.actors.get(request.source_id).await?;

        let latest =
            ActorCatalog::most_recent_for_actor(self.actors.pool(), request.source_id).await?;
        Ok(latest
            .map(|catalog| ActorCatalogWithUpdatedAtRead {
                catalog: Some(catalog.catalog),
                updated_at: Some(catalog.updated_at),
            })
            .unwrap_or_default())
    }

    #[instrument(skip(self, request), fields(source_id = %request.source_id))]
    async fn write_discover_catalog_result(
        &self,
        request: SourceDiscoverSchemaWriteRequestBody,
    ) -> Result<DiscoverCatalogResult> {
        let view = self.actors.get(request.source_id).await?;

        let connector_version = request.connector_version.unwrap_or_else(|| {
            view.actor
                .version_override
                .clone()
                .unwrap_or_else(|| view.definition.docker_image_tag.clone())
        });
        let configuration_hash = request
            .configuration_hash
            .unwrap_or_else(|| catalog_hash(&view.actor.configuration));

        let catalog_id = ActorCatalog::write_for_actor(
            self.actors.pool(),
            request.source_id,
            &request.catalog,
            &configuration_hash,
            &connector_version,
        )
        .await?;

        info!(catalog_id = %catalog_id, "Stored discovered catalog");
        Ok(DiscoverCatalogResult { catalog_id })
    }
}

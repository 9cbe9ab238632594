//! Destination service.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use syncplane_db::ActorType;

use crate::error::Result;
use crate::matcher::{matches, DestinationMatcher};
use crate::models::{
    DestinationCloneRequestBody, DestinationCreate, DestinationIdRequestBody, DestinationRead,
    DestinationReadList, DestinationSearch, DestinationUpdate, WorkspaceIdRequestBody,
};
use crate::services::actor_service::{ActorService, ActorView};

/// Operations behind the `/destinations` endpoints.
#[async_trait]
pub trait DestinationHandler: Send + Sync {
    async fn create_destination(&self, request: DestinationCreate) -> Result<DestinationRead>;
    async fn get_destination(&self, request: DestinationIdRequestBody) -> Result<DestinationRead>;
    async fn list_destinations_for_workspace(
        &self,
        request: WorkspaceIdRequestBody,
    ) -> Result<DestinationReadList>;
    async fn search_destinations(&self, request: DestinationSearch)
        -> Result<DestinationReadList>;
    async fn update_destination(&self, request: DestinationUpdate) -> Result<DestinationRead>;
    async fn clone_destination(
        &self,
        request: DestinationCloneRequestBody,
    ) -> Result<DestinationRead>;
    async fn delete_destination(&self, request: DestinationIdRequestBody) -> Result<()>;
    async fn upgrade_destination_version(&self, request: DestinationIdRequestBody) -> Result<()>;
}

impl From<ActorView> for DestinationRead {
    fn from(view: ActorView) -> Self {
        Self {
            is_version_override_applied: view.actor.is_version_override_applied(),
            destination_id: view.actor.actor_id,
            name: view.actor.name,
            destination_definition_id: view.definition.definition_id,
            destination_name: view.definition.name,
            workspace_id: view.actor.workspace_id,
            connection_configuration: view.actor.configuration,
            icon: view.definition.icon,
            breaking_changes: view.breaking_changes.into_iter().map(Into::into).collect(),
            support_state: view.definition.support_state,
        }
    }
}

/// Postgres-backed destination handler.
pub struct DestinationService {
    actors: ActorService,
}

impl DestinationService {
    /// Create a new destination service.
    pub fn new(pool: PgPool) -> Self {
        Self {
            actors: ActorService::new(pool, ActorType::Destination),
        }
    }
}

#[async_trait]
impl DestinationHandler for DestinationService {
    async fn create_destination(&self, request: DestinationCreate) -> Result<DestinationRead> {
        let view = self
            .actors
            .create(
                request.workspace_id,
                request.destination_definition_id,
                request.name,
                request.connection_configuration,
            )
            .await?;
        Ok(view.into())
    }

    async fn get_destination(&self, request: DestinationIdRequestBody) -> Result<DestinationRead> {
        Ok(self.actors.get(request.destination_id).await?.into())
    }

    async fn list_destinations_for_workspace(
        &self,
        request: WorkspaceIdRequestBody,
    ) -> Result<DestinationReadList> {
        let views = self.actors.list_for_workspace(request.workspace_id).await?;
        Ok(DestinationReadList {
            destinations: views.into_iter().map(Into::into).collect(),
        })
    }

    #[instrument(skip(self, request))]
    async fn search_destinations(
        &self,
        request: DestinationSearch,
    ) -> Result<DestinationReadList> {
        let candidates = self.actors.list(request.workspace_id).await?;
        let total = candidates.len();

        let destinations: Vec<DestinationRead> = candidates
            .into_iter()
            .map(DestinationRead::from)
            .filter(|destination| matches(&DestinationMatcher, Some(&request), destination))
            .collect();

        debug!(
            candidates = total,
            matched = destinations.len(),
            "Searched destinations"
        );
        Ok(DestinationReadList { destinations })
    }

    async fn update_destination(&self, request: DestinationUpdate) -> Result<DestinationRead> {
        let view = self
            .actors
            .update(
                request.destination_id,
                request.name,
                request.connection_configuration,
            )
            .await?;
        Ok(view.into())
    }

    async fn clone_destination(
        &self,
        request: DestinationCloneRequestBody,
    ) -> Result<DestinationRead> {
        let overrides = request.destination_configuration.unwrap_or_default();
        let view = self
            .actors
            .clone_actor(
                request.destination_clone_id,
                overrides.name,
                overrides.connection_configuration,
            )
            .await?;
        Ok(view.into())
    }

    async fn delete_destination(&self, request: DestinationIdRequestBody) -> Result<()> {
        self.actors.delete(request.destination_id).await
    }

    async fn upgrade_destination_version(&self, request: DestinationIdRequestBody) -> Result<()> {
        self.actors.upgrade_version(request.destination_id).await
    }
}

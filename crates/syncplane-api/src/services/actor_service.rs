//! Persistence logic shared by sources and destinations.
//!
//! Both resources live in the `actor` table; this service carries the actor
//! type and assembles each record with its definition and the breaking
//! changes still ahead of it.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use syncplane_db::{
    Actor, ActorDefinition, ActorType, BreakingChange, CreateActor, UpdateActor, Workspace,
};

use crate::error::{ApiError, Result};

/// An actor with everything needed to render it.
#[derive(Debug, Clone)]
pub struct ActorView {
    pub actor: Actor,
    pub definition: ActorDefinition,
    pub breaking_changes: Vec<BreakingChange>,
}

/// Actor operations for one actor type.
#[derive(Clone)]
pub struct ActorService {
    pool: PgPool,
    actor_type: ActorType,
}

impl ActorService {
    /// Create a new actor service.
    pub fn new(pool: PgPool, actor_type: ActorType) -> Self {
        Self { pool, actor_type }
    }

    /// Database pool used by this service.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn upcoming_changes(&self, definition_id: Uuid) -> Result<Vec<BreakingChange>> {
        let today = Utc::now().date_naive();
        Ok(ActorDefinition::upcoming_breaking_changes(&self.pool, definition_id, today).await?)
    }

    async fn view(&self, actor: Actor) -> Result<ActorView> {
        let definition =
            ActorDefinition::get(&self.pool, self.actor_type, actor.actor_definition_id).await?;
        let breaking_changes = self.upcoming_changes(definition.definition_id).await?;
        Ok(ActorView {
            actor,
            definition,
            breaking_changes,
        })
    }

    /// Fetch an actor that has not been deleted.
    async fn live(&self, actor_id: Uuid) -> Result<Actor> {
        let actor = Actor::get(&self.pool, self.actor_type, actor_id).await?;
        if actor.tombstone {
            return Err(ApiError::not_found(self.actor_type.config_kind(), actor_id));
        }
        Ok(actor)
    }

    /// Create an actor in a workspace.
    #[instrument(skip(self, configuration))]
    pub async fn create(
        &self,
        workspace_id: Uuid,
        definition_id: Uuid,
        name: String,
        configuration: Value,
    ) -> Result<ActorView> {
        require_object(&configuration)?;
        Workspace::get(&self.pool, workspace_id, false).await?;

        let definition = ActorDefinition::get(&self.pool, self.actor_type, definition_id).await?;
        if definition.tombstone {
            return Err(ApiError::Validation(format!(
                "{} {} has been retired",
                self.actor_type.definition_kind(),
                definition_id
            )));
        }
        if !Workspace::can_use_definition(&self.pool, definition_id, workspace_id).await? {
            return Err(ApiError::Validation(format!(
                "workspace {workspace_id} may not use {} {definition_id}",
                self.actor_type.definition_kind()
            )));
        }

        let input = CreateActor {
            workspace_id,
            actor_definition_id: definition_id,
            name,
            configuration,
        };
        let actor = Actor::create(&self.pool, self.actor_type, &input).await?;

        info!(
            actor_type = %self.actor_type,
            actor_id = %actor.actor_id,
            workspace_id = %workspace_id,
            "Created actor"
        );

        let breaking_changes = self.upcoming_changes(definition_id).await?;
        Ok(ActorView {
            actor,
            definition,
            breaking_changes,
        })
    }

    /// Get an actor by ID. Deleted actors are still returned.
    pub async fn get(&self, actor_id: Uuid) -> Result<ActorView> {
        let actor = Actor::get(&self.pool, self.actor_type, actor_id).await?;
        self.view(actor).await
    }

    /// List the live actors of an existing workspace.
    pub async fn list_for_workspace(&self, workspace_id: Uuid) -> Result<Vec<ActorView>> {
        Workspace::get(&self.pool, workspace_id, false).await?;
        self.list(Some(workspace_id)).await
    }

    /// List live actors, optionally limited to one workspace.
    ///
    /// Breaking changes are loaded once per definition.
    pub async fn list(&self, workspace_id: Option<Uuid>) -> Result<Vec<ActorView>> {
        let rows = Actor::list_with_definitions(&self.pool, self.actor_type, workspace_id).await?;

        let mut changes: HashMap<Uuid, Vec<BreakingChange>> = HashMap::new();
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let definition_id = row.definition.definition_id;
            if !changes.contains_key(&definition_id) {
                let upcoming = self.upcoming_changes(definition_id).await?;
                changes.insert(definition_id, upcoming);
            }
            views.push(ActorView {
                breaking_changes: changes.get(&definition_id).cloned().unwrap_or_default(),
                actor: row.actor,
                definition: row.definition,
            });
        }
        Ok(views)
    }

    /// Replace the name and configuration of a live actor.
    #[instrument(skip(self, configuration))]
    pub async fn update(
        &self,
        actor_id: Uuid,
        name: String,
        configuration: Value,
    ) -> Result<ActorView> {
        require_object(&configuration)?;

        let input = UpdateActor {
            name: Some(name),
            configuration: Some(configuration),
        };
        let actor = Actor::update(&self.pool, self.actor_type, actor_id, &input)
            .await?
            .ok_or_else(|| ApiError::not_found(self.actor_type.config_kind(), actor_id))?;

        info!(actor_type = %self.actor_type, actor_id = %actor_id, "Updated actor");
        self.view(actor).await
    }

    /// Copy a live actor into a new one in the same workspace.
    ///
    /// The copy keeps the original configuration unless one is given and is
    /// named `"<name> (Copy)"` unless a name is given.
    #[instrument(skip(self, configuration))]
    pub async fn clone_actor(
        &self,
        actor_id: Uuid,
        name: Option<String>,
        configuration: Option<Value>,
    ) -> Result<ActorView> {
        let original = self.live(actor_id).await?;
        let configuration = configuration.unwrap_or_else(|| original.configuration.clone());
        require_object(&configuration)?;

        let input = CreateActor {
            workspace_id: original.workspace_id,
            actor_definition_id: original.actor_definition_id,
            name: name.unwrap_or_else(|| format!("{} (Copy)", original.name)),
            configuration,
        };
        let copy = Actor::create(&self.pool, self.actor_type, &input).await?;

        info!(
            actor_type = %self.actor_type,
            actor_id = %copy.actor_id,
            cloned_from = %actor_id,
            "Cloned actor"
        );
        self.view(copy).await
    }

    /// Deprecate every connection using a live actor, then delete it.
    #[instrument(skip(self))]
    pub async fn delete(&self, actor_id: Uuid) -> Result<()> {
        self.live(actor_id).await?;

        let deprecated = Actor::tombstone(&self.pool, self.actor_type, actor_id)
            .await?
            .ok_or_else(|| ApiError::not_found(self.actor_type.config_kind(), actor_id))?;

        info!(
            actor_type = %self.actor_type,
            actor_id = %actor_id,
            deprecated_connections = deprecated,
            "Deleted actor"
        );
        Ok(())
    }

    /// Move a live actor back to its definition's default version.
    #[instrument(skip(self))]
    pub async fn upgrade_version(&self, actor_id: Uuid) -> Result<()> {
        self.live(actor_id).await?;
        Actor::clear_version_override(&self.pool, self.actor_type, actor_id).await?;
        info!(actor_type = %self.actor_type, actor_id = %actor_id, "Upgraded actor version");
        Ok(())
    }
}

/// Connector configurations are JSON objects.
pub(crate) fn require_object(configuration: &Value) -> Result<()> {
    if configuration.is_object() {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "connection_configuration must be a JSON object".to_string(),
        ))
    }
}

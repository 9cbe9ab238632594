//! Actor model (configured sources and destinations).
//!
//! Sources and destinations share one table and differ only by `actor_type`.
//! Configuration is stored as JSON without secrets; secret handling lives
//! outside this crate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::actor_definition::{ActorDefinition, ActorType};
use super::connection::Connection;
use crate::error::{DbError, DbResult};

/// A configured source or destination.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: Uuid,
    pub workspace_id: Uuid,
    pub actor_definition_id: Uuid,
    pub name: String,
    pub configuration: serde_json::Value,
    pub actor_type: ActorType,
    /// Image tag pinned for this actor instead of the definition default.
    pub version_override: Option<String>,
    pub tombstone: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActor {
    pub workspace_id: Uuid,
    pub actor_definition_id: Uuid,
    pub name: String,
    pub configuration: serde_json::Value,
}

/// Partial update of an actor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateActor {
    pub name: Option<String>,
    pub configuration: Option<serde_json::Value>,
}

/// An actor together with the definition backing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorAndDefinition {
    pub actor: Actor,
    pub definition: ActorDefinition,
}

impl Actor {
    /// Whether this actor runs a pinned version instead of the default one.
    #[must_use]
    pub fn is_version_override_applied(&self) -> bool {
        self.version_override.is_some()
    }

    /// Find an actor of the given type by ID (tombstoned rows included).
    pub async fn find_by_id(
        pool: &PgPool,
        actor_type: ActorType,
        actor_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM actor
            WHERE actor_id = $1 AND actor_type = $2
            ",
        )
        .bind(actor_id)
        .bind(actor_type.to_string())
        .fetch_optional(pool)
        .await
    }

    /// Get an actor, failing with `NotFound` when absent.
    pub async fn get(pool: &PgPool, actor_type: ActorType, actor_id: Uuid) -> DbResult<Self> {
        Self::find_by_id(pool, actor_type, actor_id)
            .await?
            .ok_or_else(|| DbError::not_found(actor_type.config_kind(), actor_id))
    }

    /// List every live actor of a type.
    pub async fn list(pool: &PgPool, actor_type: ActorType) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM actor
            WHERE actor_type = $1 AND tombstone = FALSE
            ORDER BY name ASC
            ",
        )
        .bind(actor_type.to_string())
        .fetch_all(pool)
        .await
    }

    /// List the live actors of a type in one workspace.
    pub async fn list_by_workspace(
        pool: &PgPool,
        actor_type: ActorType,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM actor
            WHERE actor_type = $1 AND workspace_id = $2 AND tombstone = FALSE
            ORDER BY name ASC
            ",
        )
        .bind(actor_type.to_string())
        .bind(workspace_id)
        .fetch_all(pool)
        .await
    }

    /// Live actors of a type, optionally limited to one workspace, each with
    /// its definition.
    ///
    /// Actors whose definition row is missing are skipped.
    pub async fn list_with_definitions(
        pool: &PgPool,
        actor_type: ActorType,
        workspace_id: Option<Uuid>,
    ) -> Result<Vec<ActorAndDefinition>, sqlx::Error> {
        let actors = match workspace_id {
            Some(workspace_id) => Self::list_by_workspace(pool, actor_type, workspace_id).await?,
            None => Self::list(pool, actor_type).await?,
        };

        let definition_ids: Vec<Uuid> = actors.iter().map(|a| a.actor_definition_id).collect();
        let definitions: Vec<ActorDefinition> = sqlx::query_as(
            r"
            SELECT * FROM actor_definition
            WHERE definition_id = ANY($1)
            ",
        )
        .bind(&definition_ids)
        .fetch_all(pool)
        .await?;

        let by_id: HashMap<Uuid, ActorDefinition> = definitions
            .into_iter()
            .map(|d| (d.definition_id, d))
            .collect();

        Ok(actors
            .into_iter()
            .filter_map(|actor| {
                by_id
                    .get(&actor.actor_definition_id)
                    .cloned()
                    .map(|definition| ActorAndDefinition { actor, definition })
            })
            .collect())
    }

    /// Insert a new actor.
    pub async fn create(
        pool: &PgPool,
        actor_type: ActorType,
        input: &CreateActor,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO actor (
                actor_id, workspace_id, actor_definition_id, name, configuration, actor_type
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(input.workspace_id)
        .bind(input.actor_definition_id)
        .bind(&input.name)
        .bind(&input.configuration)
        .bind(actor_type.to_string())
        .fetch_one(pool)
        .await
    }

    /// Apply a partial update to a live actor.
    pub async fn update(
        pool: &PgPool,
        actor_type: ActorType,
        actor_id: Uuid,
        input: &UpdateActor,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE actor SET
                name = COALESCE($3, name),
                configuration = COALESCE($4, configuration),
                updated_at = NOW()
            WHERE actor_id = $1 AND actor_type = $2 AND tombstone = FALSE
            RETURNING *
            ",
        )
        .bind(actor_id)
        .bind(actor_type.to_string())
        .bind(input.name.as_deref())
        .bind(input.configuration.as_ref())
        .fetch_optional(pool)
        .await
    }

    /// Drop a pinned version so the actor follows the definition default again.
    pub async fn clear_version_override(
        pool: &PgPool,
        actor_type: ActorType,
        actor_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE actor SET version_override = NULL, updated_at = NOW()
            WHERE actor_id = $1 AND actor_type = $2 AND tombstone = FALSE
            ",
        )
        .bind(actor_id)
        .bind(actor_type.to_string())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a live actor and deprecate every connection using it.
    ///
    /// Returns the number of deprecated connections, or `None` when the actor
    /// was not live. Nothing is written in that case.
    pub async fn tombstone(
        pool: &PgPool,
        actor_type: ActorType,
        actor_id: Uuid,
    ) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE actor SET tombstone = TRUE, updated_at = NOW()
            WHERE actor_id = $1 AND actor_type = $2 AND tombstone = FALSE
            ",
        )
        .bind(actor_id)
        .bind(actor_type.to_string())
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let deprecated = Connection::deprecate_for_actor(&mut tx, actor_id).await?;

        tx.commit().await?;
        Ok(Some(deprecated))
    }
}

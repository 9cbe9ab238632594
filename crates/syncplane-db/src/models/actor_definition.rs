//! Connector definition model.
//!
//! A definition names the connector image that backs an actor and carries the
//! metadata shown next to it: icon, support state and announced breaking
//! changes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{ConfigKind, DbError, DbResult};

/// Whether an actor reads data (source) or writes it (destination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    Source,
    Destination,
}

impl ActorType {
    /// Entity kind used when a record of this type is missing.
    #[must_use]
    pub fn config_kind(&self) -> ConfigKind {
        match self {
            ActorType::Source => ConfigKind::Source,
            ActorType::Destination => ConfigKind::Destination,
        }
    }

    /// Entity kind used when a definition of this type is missing.
    #[must_use]
    pub fn definition_kind(&self) -> ConfigKind {
        match self {
            ActorType::Source => ConfigKind::SourceDefinition,
            ActorType::Destination => ConfigKind::DestinationDefinition,
        }
    }
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorType::Source => write!(f, "source"),
            ActorType::Destination => write!(f, "destination"),
        }
    }
}

impl std::str::FromStr for ActorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(ActorType::Source),
            "destination" => Ok(ActorType::Destination),
            _ => Err(format!("Unknown actor type: {s}")),
        }
    }
}

/// Support level of a connector definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SupportState {
    Supported,
    Deprecated,
    Unsupported,
}

impl std::fmt::Display for SupportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportState::Supported => write!(f, "supported"),
            SupportState::Deprecated => write!(f, "deprecated"),
            SupportState::Unsupported => write!(f, "unsupported"),
        }
    }
}

impl std::str::FromStr for SupportState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supported" => Ok(SupportState::Supported),
            "deprecated" => Ok(SupportState::Deprecated),
            "unsupported" => Ok(SupportState::Unsupported),
            _ => Err(format!("Unknown support state: {s}")),
        }
    }
}

/// A connector definition row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ActorDefinition {
    pub definition_id: Uuid,
    pub actor_type: ActorType,
    pub name: String,
    pub docker_repository: String,
    /// Default image tag used by actors without a version override.
    pub docker_image_tag: String,
    pub icon: Option<String>,
    pub support_state: SupportState,
    pub public: bool,
    pub custom: bool,
    pub tombstone: bool,
    pub created_at: DateTime<Utc>,
}

/// A recorded incompatibility introduced by a connector version.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BreakingChange {
    pub definition_id: Uuid,
    pub version: String,
    pub message: String,
    pub upgrade_deadline: NaiveDate,
    pub migration_documentation_url: String,
}

impl ActorDefinition {
    /// Find a definition of the given actor type by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        actor_type: ActorType,
        definition_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM actor_definition
            WHERE definition_id = $1 AND actor_type = $2
            ",
        )
        .bind(definition_id)
        .bind(actor_type.to_string())
        .fetch_optional(pool)
        .await
    }

    /// Get a definition, failing with `NotFound` when absent.
    pub async fn get(
        pool: &PgPool,
        actor_type: ActorType,
        definition_id: Uuid,
    ) -> DbResult<Self> {
        Self::find_by_id(pool, actor_type, definition_id)
            .await?
            .ok_or_else(|| DbError::not_found(actor_type.definition_kind(), definition_id))
    }

    /// Grant a definition to a workspace. Granting twice is a no-op.
    pub async fn grant_to_workspace(
        pool: &PgPool,
        definition_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO actor_definition_workspace_grant (definition_id, workspace_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(definition_id)
        .bind(workspace_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Breaking changes whose upgrade deadline has not passed yet.
    pub async fn upcoming_breaking_changes(
        pool: &PgPool,
        definition_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<BreakingChange>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM actor_definition_breaking_change
            WHERE definition_id = $1 AND upgrade_deadline >= $2
            ORDER BY upgrade_deadline ASC, version ASC
            ",
        )
        .bind(definition_id)
        .bind(today)
        .fetch_all(pool)
        .await
    }
}

//! Source request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use syncplane_db::SupportState;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::BreakingChangeRead;

/// Request to create a source.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceCreate {
    pub source_definition_id: Uuid,
    pub workspace_id: Uuid,
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: String,
    /// Connector configuration. Must be a JSON object.
    pub connection_configuration: serde_json::Value,
}

/// Body naming a source by ID.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceIdRequestBody {
    pub source_id: Uuid,
}

/// Replacement name and configuration of a source.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceUpdate {
    pub source_id: Uuid,
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: String,
    pub connection_configuration: serde_json::Value,
}

/// Overrides applied to a cloned source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceCloneConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_configuration: Option<serde_json::Value>,
}

/// Request to clone a source.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceCloneRequestBody {
    pub source_clone_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub source_configuration: Option<SourceCloneConfiguration>,
}

/// Source response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SourceRead {
    pub source_id: Uuid,
    pub name: String,
    pub source_definition_id: Uuid,
    /// Display name of the definition.
    pub source_name: String,
    pub workspace_id: Uuid,
    pub connection_configuration: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub is_version_override_applied: bool,
    #[serde(default)]
    pub breaking_changes: Vec<BreakingChangeRead>,
    pub support_state: SupportState,
}

/// Search filter over sources. Every absent field matches anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_definition_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<Uuid>,
    /// Top-level keys that must be present with these values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_configuration: Option<serde_json::Value>,
}

/// List of sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SourceReadList {
    pub sources: Vec<SourceRead>,
}

/// Request to discover the schema of a source.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceDiscoverSchemaRequestBody {
    pub source_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<Uuid>,
    /// Force a fresh discovery instead of returning the cached catalog.
    #[serde(default)]
    pub disable_cache: bool,
}

/// Result of a schema discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SourceDiscoverSchemaRead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<Uuid>,
    pub job_info: super::SynchronousJobRead,
    #[serde(default)]
    pub breaking_change: bool,
}

/// Catalog produced by a discovery run, to be stored for a source.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceDiscoverSchemaWriteRequestBody {
    pub source_id: Uuid,
    pub catalog: serde_json::Value,
    /// Connector version that produced the catalog. Defaults to the version
    /// the source currently runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_version: Option<String>,
    /// Hash of the configuration used for discovery. Defaults to the hash of
    /// the stored configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_hash: Option<String>,
}

/// ID of a stored catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiscoverCatalogResult {
    pub catalog_id: Uuid,
}

/// Latest catalog of a source. Both fields are absent when none was stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActorCatalogWithUpdatedAtRead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

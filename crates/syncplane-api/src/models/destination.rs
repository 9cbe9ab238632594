//! Destination request and response models.

use serde::{Deserialize, Serialize};
use syncplane_db::SupportState;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::BreakingChangeRead;

/// Request to create a destination.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationCreate {
    pub destination_definition_id: Uuid,
    pub workspace_id: Uuid,
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: String,
    /// Connector configuration. Must be a JSON object.
    pub connection_configuration: serde_json::Value,
}

/// Body naming a destination by ID.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationIdRequestBody {
    pub destination_id: Uuid,
}

/// Replacement name and configuration of a destination.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationUpdate {
    pub destination_id: Uuid,
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: String,
    pub connection_configuration: serde_json::Value,
}

/// Overrides applied to a cloned destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationCloneConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_configuration: Option<serde_json::Value>,
}

/// Request to clone a destination.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationCloneRequestBody {
    pub destination_clone_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub destination_configuration: Option<DestinationCloneConfiguration>,
}

/// Destination response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DestinationRead {
    pub destination_id: Uuid,
    pub name: String,
    pub destination_definition_id: Uuid,
    /// Display name of the definition.
    pub destination_name: String,
    pub workspace_id: Uuid,
    pub connection_configuration: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub is_version_override_applied: bool,
    #[serde(default)]
    pub breaking_changes: Vec<BreakingChangeRead>,
    pub support_state: SupportState,
}

/// Search filter over destinations. Every absent field matches anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_definition_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_configuration: Option<serde_json::Value>,
}

/// List of destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DestinationReadList {
    pub destinations: Vec<DestinationRead>,
}

//! Connection request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use syncplane_db::ConnectionStatus;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

fn default_status() -> ConnectionStatus {
    ConnectionStatus::Active
}

/// Request to create a connection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConnectionCreate {
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: String,
    pub source_id: Uuid,
    pub destination_id: Uuid,
    #[serde(default = "default_status")]
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_cron: Option<String>,
    /// Configured catalog (streams and sync modes).
    #[serde(default)]
    pub sync_catalog: serde_json::Value,
    #[serde(default)]
    pub operation_ids: Vec<Uuid>,
}

/// Body naming a connection by ID.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConnectionIdRequestBody {
    pub connection_id: Uuid,
}

/// Request to list the connections of a workspace.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ListConnectionsRequestBody {
    pub workspace_id: Uuid,
    #[serde(default)]
    pub source_ids: Vec<Uuid>,
    #[serde(default)]
    pub destination_ids: Vec<Uuid>,
    #[serde(default)]
    pub include_deleted: bool,
}

/// Partial update of a connection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConnectionUpdate {
    pub connection_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ConnectionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_cron: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_catalog: Option<serde_json::Value>,
    /// Replaces the attached operations when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_ids: Option<Vec<Uuid>>,
}

/// Connection response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionRead {
    pub connection_id: Uuid,
    pub name: String,
    pub source_id: Uuid,
    pub destination_id: Uuid,
    pub workspace_id: Uuid,
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_cron: Option<String>,
    pub sync_catalog: serde_json::Value,
    pub operation_ids: Vec<Uuid>,
    pub breaking_change: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List of connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionReadList {
    pub connections: Vec<ConnectionRead>,
}

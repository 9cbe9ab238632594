//! Connector check and discovery models.
//!
//! These bodies are answered by the scheduler, which runs connector
//! containers outside this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Unsaved source configuration to check.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SourceCoreConfig {
    pub source_definition_id: Uuid,
    pub connection_configuration: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<Uuid>,
}

/// Unsaved destination configuration to check.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationCoreConfig {
    pub destination_definition_id: Uuid,
    pub connection_configuration: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<Uuid>,
}

/// Outcome of a connection check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckConnectionStatus {
    Succeeded,
    Failed,
}

/// Record of a job the scheduler ran synchronously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SynchronousJobRead {
    pub id: Uuid,
    pub config_type: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub succeeded: bool,
}

/// Connection check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckConnectionRead {
    pub status: CheckConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub job_info: SynchronousJobRead,
}

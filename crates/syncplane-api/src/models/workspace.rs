//! Workspace request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use syncplane_db::Workspace;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Pagination;

/// Request to create a workspace.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WorkspaceCreate {
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: String,

    /// URL-safe key. Derived from the name when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 256, message = "Slug must be 1-256 characters"))]
    pub slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

/// Body naming a workspace by ID.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WorkspaceIdRequestBody {
    pub workspace_id: Uuid,
}

/// Body naming a workspace by slug.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SlugRequestBody {
    #[validate(length(min = 1, message = "Slug cannot be empty"))]
    pub slug: String,
}

/// Request to list workspaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ListWorkspacesRequestBody {
    #[serde(default)]
    pub include_deleted: bool,

    /// Case-insensitive substring of the workspace name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub pagination: Option<Pagination>,
}

/// Partial update of a workspace.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WorkspaceUpdate {
    pub workspace_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_setup_complete: Option<bool>,
}

/// Resource counts shown on a single workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceStats {
    pub source_count: i64,
    pub destination_count: i64,
    pub connection_count: i64,
    pub active_connection_count: i64,
}

/// Workspace response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceRead {
    pub workspace_id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub initial_setup_complete: bool,
    pub feedback_done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only filled in when a single workspace is fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<WorkspaceStats>,
}

impl From<Workspace> for WorkspaceRead {
    fn from(workspace: Workspace) -> Self {
        Self {
            workspace_id: workspace.workspace_id,
            name: workspace.name,
            slug: workspace.slug,
            email: workspace.email,
            initial_setup_complete: workspace.initial_setup_complete,
            feedback_done: workspace.feedback_done,
            created_at: workspace.created_at,
            updated_at: workspace.updated_at,
            stats: None,
        }
    }
}

/// List of workspaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceReadList {
    pub workspaces: Vec<WorkspaceRead>,
}

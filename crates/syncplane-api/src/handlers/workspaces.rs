//! HTTP handlers for workspaces.

use axum::{extract::State, http::StatusCode, Json};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::{
    ListWorkspacesRequestBody, SlugRequestBody, WorkspaceCreate, WorkspaceIdRequestBody,
    WorkspaceRead, WorkspaceReadList, WorkspaceUpdate,
};
use crate::router::ApiState;

/// Create a workspace.
#[utoipa::path(
    post,
    path = "/workspaces/create",
    tag = "Workspaces",
    request_body = WorkspaceCreate,
    responses(
        (status = 200, description = "Workspace created", body = WorkspaceRead),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Slug already taken"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_workspace(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<WorkspaceCreate>,
) -> Result<Json<WorkspaceRead>> {
    let workspace = state.workspaces.create_workspace(request).await?;
    Ok(Json(workspace))
}

/// Get a workspace with its resource counts.
#[utoipa::path(
    post,
    path = "/workspaces/get",
    tag = "Workspaces",
    request_body = WorkspaceIdRequestBody,
    responses(
        (status = 200, description = "Workspace details", body = WorkspaceRead),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_workspace(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<WorkspaceIdRequestBody>,
) -> Result<Json<WorkspaceRead>> {
    let workspace = state.workspaces.get_workspace(request).await?;
    Ok(Json(workspace))
}

/// Get a workspace by slug.
#[utoipa::path(
    post,
    path = "/workspaces/get_by_slug",
    tag = "Workspaces",
    request_body = SlugRequestBody,
    responses(
        (status = 200, description = "Workspace details", body = WorkspaceRead),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_workspace_by_slug(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SlugRequestBody>,
) -> Result<Json<WorkspaceRead>> {
    let workspace = state.workspaces.get_workspace_by_slug(request).await?;
    Ok(Json(workspace))
}

/// List workspaces.
#[utoipa::path(
    post,
    path = "/workspaces/list",
    tag = "Workspaces",
    request_body = ListWorkspacesRequestBody,
    responses(
        (status = 200, description = "List of workspaces", body = WorkspaceReadList),
        (status = 400, description = "Invalid pagination"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_workspaces(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<ListWorkspacesRequestBody>,
) -> Result<Json<WorkspaceReadList>> {
    let workspaces = state.workspaces.list_workspaces(request).await?;
    Ok(Json(workspaces))
}

/// Update a workspace.
#[utoipa::path(
    post,
    path = "/workspaces/update",
    tag = "Workspaces",
    request_body = WorkspaceUpdate,
    responses(
        (status = 200, description = "Workspace updated", body = WorkspaceRead),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_workspace(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<WorkspaceUpdate>,
) -> Result<Json<WorkspaceRead>> {
    let workspace = state.workspaces.update_workspace(request).await?;
    Ok(Json(workspace))
}

/// Record that the workspace answered the feedback prompt.
#[utoipa::path(
    post,
    path = "/workspaces/tag_feedback_status_as_done",
    tag = "Workspaces",
    request_body = WorkspaceIdRequestBody,
    responses(
        (status = 204, description = "Feedback recorded"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn set_feedback_done(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<WorkspaceIdRequestBody>,
) -> Result<StatusCode> {
    state.workspaces.set_feedback_done(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a workspace and everything in it.
#[utoipa::path(
    post,
    path = "/workspaces/delete",
    tag = "Workspaces",
    request_body = WorkspaceIdRequestBody,
    responses(
        (status = 204, description = "Workspace deleted"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_workspace(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<WorkspaceIdRequestBody>,
) -> Result<StatusCode> {
    state.workspaces.delete_workspace(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

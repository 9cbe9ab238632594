//! HTTP handlers for connections.

use axum::{extract::State, http::StatusCode, Json};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::{
    ConnectionCreate, ConnectionIdRequestBody, ConnectionRead, ConnectionReadList,
    ConnectionUpdate, ListConnectionsRequestBody,
};
use crate::router::ApiState;

/// Create a connection between a source and a destination.
#[utoipa::path(
    post,
    path = "/connections/create",
    tag = "Connections",
    request_body = ConnectionCreate,
    responses(
        (status = 200, description = "Connection created", body = ConnectionRead),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Source or destination not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_connection(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<ConnectionCreate>,
) -> Result<Json<ConnectionRead>> {
    let connection = state.connections.create_connection(request).await?;
    Ok(Json(connection))
}

/// Get a connection.
#[utoipa::path(
    post,
    path = "/connections/get",
    tag = "Connections",
    request_body = ConnectionIdRequestBody,
    responses(
        (status = 200, description = "Connection details", body = ConnectionRead),
        (status = 404, description = "Connection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_connection(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<ConnectionIdRequestBody>,
) -> Result<Json<ConnectionRead>> {
    let connection = state.connections.get_connection(request).await?;
    Ok(Json(connection))
}

/// List the connections of a workspace.
#[utoipa::path(
    post,
    path = "/connections/list",
    tag = "Connections",
    request_body = ListConnectionsRequestBody,
    responses(
        (status = 200, description = "List of connections", body = ConnectionReadList),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_connections_for_workspace(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<ListConnectionsRequestBody>,
) -> Result<Json<ConnectionReadList>> {
    let connections = state
        .connections
        .list_connections_for_workspace(request)
        .await?;
    Ok(Json(connections))
}

/// Update a connection.
#[utoipa::path(
    post,
    path = "/connections/update",
    tag = "Connections",
    request_body = ConnectionUpdate,
    responses(
        (status = 200, description = "Connection updated", body = ConnectionRead),
        (status = 400, description = "Invalid request or connection deprecated"),
        (status = 404, description = "Connection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_connection(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<ConnectionUpdate>,
) -> Result<Json<ConnectionRead>> {
    let connection = state.connections.update_connection(request).await?;
    Ok(Json(connection))
}

/// Deprecate a connection.
#[utoipa::path(
    post,
    path = "/connections/delete",
    tag = "Connections",
    request_body = ConnectionIdRequestBody,
    responses(
        (status = 204, description = "Connection deprecated"),
        (status = 404, description = "Connection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_connection(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<ConnectionIdRequestBody>,
) -> Result<StatusCode> {
    state.connections.delete_connection(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

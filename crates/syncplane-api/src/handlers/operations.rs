//! HTTP handlers for sync operations.

use axum::{extract::State, http::StatusCode, Json};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::{
    ConnectionIdRequestBody, OperationCreate, OperationIdRequestBody, OperationRead,
    OperationReadList, OperationUpdate,
};
use crate::router::ApiState;

/// Create an operation.
#[utoipa::path(
    post,
    path = "/operations/create",
    tag = "Operations",
    request_body = OperationCreate,
    responses(
        (status = 200, description = "Operation created", body = OperationRead),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_operation(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<OperationCreate>,
) -> Result<Json<OperationRead>> {
    let operation = state.operations.create_operation(request).await?;
    Ok(Json(operation))
}

/// Get an operation.
#[utoipa::path(
    post,
    path = "/operations/get",
    tag = "Operations",
    request_body = OperationIdRequestBody,
    responses(
        (status = 200, description = "Operation details", body = OperationRead),
        (status = 404, description = "Operation not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_operation(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<OperationIdRequestBody>,
) -> Result<Json<OperationRead>> {
    let operation = state.operations.get_operation(request).await?;
    Ok(Json(operation))
}

/// List the operations attached to a connection.
#[utoipa::path(
    post,
    path = "/operations/list",
    tag = "Operations",
    request_body = ConnectionIdRequestBody,
    responses(
        (status = 200, description = "List of operations", body = OperationReadList),
        (status = 404, description = "Connection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_operations_for_connection(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<ConnectionIdRequestBody>,
) -> Result<Json<OperationReadList>> {
    let operations = state
        .operations
        .list_operations_for_connection(request)
        .await?;
    Ok(Json(operations))
}

/// Update an operation.
#[utoipa::path(
    post,
    path = "/operations/update",
    tag = "Operations",
    request_body = OperationUpdate,
    responses(
        (status = 200, description = "Operation updated", body = OperationRead),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Operation not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_operation(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<OperationUpdate>,
) -> Result<Json<OperationRead>> {
    let operation = state.operations.update_operation(request).await?;
    Ok(Json(operation))
}

/// Delete an operation and detach it from its connections.
#[utoipa::path(
    post,
    path = "/operations/delete",
    tag = "Operations",
    request_body = OperationIdRequestBody,
    responses(
        (status = 204, description = "Operation deleted"),
        (status = 404, description = "Operation not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_operation(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<OperationIdRequestBody>,
) -> Result<StatusCode> {
    state.operations.delete_operation(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

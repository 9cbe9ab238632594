//! HTTP handlers for sources.

use axum::{extract::State, http::StatusCode, Json};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::{
    ActorCatalogWithUpdatedAtRead, CheckConnectionRead, DiscoverCatalogResult,
    SourceCloneRequestBody, SourceCreate, SourceDiscoverSchemaRead,
    SourceDiscoverSchemaRequestBody, SourceDiscoverSchemaWriteRequestBody, SourceIdRequestBody,
    SourceRead, SourceReadList, SourceSearch, SourceUpdate, WorkspaceIdRequestBody,
};
use crate::router::ApiState;

/// Create a source.
#[utoipa::path(
    post,
    path = "/sources/create",
    tag = "Sources",
    request_body = SourceCreate,
    responses(
        (status = 200, description = "Source created", body = SourceRead),
        (status = 400, description = "Invalid request or definition not usable"),
        (status = 404, description = "Workspace or definition not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_source(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceCreate>,
) -> Result<Json<SourceRead>> {
    let source = state.sources.create_source(request).await?;
    Ok(Json(source))
}

/// Get a source.
#[utoipa::path(
    post,
    path = "/sources/get",
    tag = "Sources",
    request_body = SourceIdRequestBody,
    responses(
        (status = 200, description = "Source details", body = SourceRead),
        (status = 404, description = "Source not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_source(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceIdRequestBody>,
) -> Result<Json<SourceRead>> {
    let source = state.sources.get_source(request).await?;
    Ok(Json(source))
}

/// List the sources of a workspace.
#[utoipa::path(
    post,
    path = "/sources/list",
    tag = "Sources",
    request_body = WorkspaceIdRequestBody,
    responses(
        (status = 200, description = "List of sources", body = SourceReadList),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_sources_for_workspace(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<WorkspaceIdRequestBody>,
) -> Result<Json<SourceReadList>> {
    let sources = state.sources.list_sources_for_workspace(request).await?;
    Ok(Json(sources))
}

/// Search sources by example.
#[utoipa::path(
    post,
    path = "/sources/search",
    tag = "Sources",
    request_body = SourceSearch,
    responses(
        (status = 200, description = "Matching sources", body = SourceReadList),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn search_sources(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceSearch>,
) -> Result<Json<SourceReadList>> {
    let sources = state.sources.search_sources(request).await?;
    Ok(Json(sources))
}

/// Update a source.
#[utoipa::path(
    post,
    path = "/sources/update",
    tag = "Sources",
    request_body = SourceUpdate,
    responses(
        (status = 200, description = "Source updated", body = SourceRead),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Source not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_source(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceUpdate>,
) -> Result<Json<SourceRead>> {
    let source = state.sources.update_source(request).await?;
    Ok(Json(source))
}

/// Clone a source.
#[utoipa::path(
    post,
    path = "/sources/clone",
    tag = "Sources",
    request_body = SourceCloneRequestBody,
    responses(
        (status = 200, description = "Source cloned", body = SourceRead),
        (status = 404, description = "Source not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn clone_source(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceCloneRequestBody>,
) -> Result<Json<SourceRead>> {
    let source = state.sources.clone_source(request).await?;
    Ok(Json(source))
}

/// Delete a source and deprecate its connections.
#[utoipa::path(
    post,
    path = "/sources/delete",
    tag = "Sources",
    request_body = SourceIdRequestBody,
    responses(
        (status = 204, description = "Source deleted"),
        (status = 404, description = "Source not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_source(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceIdRequestBody>,
) -> Result<StatusCode> {
    state.sources.delete_source(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a source to its definition's default version.
#[utoipa::path(
    post,
    path = "/sources/upgrade_version",
    tag = "Sources",
    request_body = SourceIdRequestBody,
    responses(
        (status = 204, description = "Source upgraded"),
        (status = 404, description = "Source not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upgrade_source_version(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceIdRequestBody>,
) -> Result<StatusCode> {
    state.sources.upgrade_source_version(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Latest catalog discovered for a source.
#[utoipa::path(
    post,
    path = "/sources/most_recent_source_actor_catalog",
    tag = "Sources",
    request_body = SourceIdRequestBody,
    responses(
        (status = 200, description = "Latest catalog, empty when none",
            body = ActorCatalogWithUpdatedAtRead),
        (status = 404, description = "Source not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn most_recent_source_actor_catalog(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceIdRequestBody>,
) -> Result<Json<ActorCatalogWithUpdatedAtRead>> {
    let catalog = state.sources.most_recent_source_actor_catalog(request).await?;
    Ok(Json(catalog))
}

/// Store a catalog discovered for a source.
#[utoipa::path(
    post,
    path = "/sources/write_discover_catalog_result",
    tag = "Sources",
    request_body = SourceDiscoverSchemaWriteRequestBody,
    responses(
        (status = 200, description = "Catalog stored", body = DiscoverCatalogResult),
        (status = 404, description = "Source not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn write_discover_catalog_result(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceDiscoverSchemaWriteRequestBody>,
) -> Result<Json<DiscoverCatalogResult>> {
    let result = state.sources.write_discover_catalog_result(request).await?;
    Ok(Json(result))
}

/// Check the stored configuration of a source.
#[utoipa::path(
    post,
    path = "/sources/check_connection",
    tag = "Sources",
    request_body = SourceIdRequestBody,
    responses(
        (status = 200, description = "Check result", body = CheckConnectionRead),
        (status = 404, description = "Source not found"),
        (status = 501, description = "Scheduler not configured")
    )
)]
pub async fn check_connection_to_source(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceIdRequestBody>,
) -> Result<Json<CheckConnectionRead>> {
    let result = state
        .scheduler()?
        .check_source_connection_from_source_id(request)
        .await?;
    Ok(Json(result))
}

/// Check a source with a pending update applied.
#[utoipa::path(
    post,
    path = "/sources/check_connection_for_update",
    tag = "Sources",
    request_body = SourceUpdate,
    responses(
        (status = 200, description = "Check result", body = CheckConnectionRead),
        (status = 404, description = "Source not found"),
        (status = 501, description = "Scheduler not configured")
    )
)]
pub async fn check_connection_to_source_for_update(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceUpdate>,
) -> Result<Json<CheckConnectionRead>> {
    let result = state
        .scheduler()?
        .check_source_connection_for_update(request)
        .await?;
    Ok(Json(result))
}

/// Discover the catalog of a source.
#[utoipa::path(
    post,
    path = "/sources/discover_schema",
    tag = "Sources",
    request_body = SourceDiscoverSchemaRequestBody,
    responses(
        (status = 200, description = "Discovered catalog", body = SourceDiscoverSchemaRead),
        (status = 404, description = "Source not found"),
        (status = 501, description = "Scheduler not configured")
    )
)]
pub async fn discover_schema_for_source(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceDiscoverSchemaRequestBody>,
) -> Result<Json<SourceDiscoverSchemaRead>> {
    let result = state
        .scheduler()?
        .discover_schema_for_source(request)
        .await?;
    Ok(Json(result))
}

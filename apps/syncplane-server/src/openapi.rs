//! `OpenAPI` documentation and Swagger UI configuration.

use axum::Router;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use syncplane_api::handlers;
use syncplane_api::models::*;
use syncplane_db::{
    ActorType, ConnectionStatus, JobConfigType, JobStatus, OperatorType,
    SupportState,
};

use crate::health::{DependencyStatus, HealthResponse, HealthState, HealthStatus};
use crate::API_PREFIX;

/// Prefixes every API path with the mount point of the API router.
struct ApiPrefix;

impl Modify for ApiPrefix {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let paths = std::mem::take(&mut openapi.paths.paths);
        openapi.paths.paths = paths
            .into_iter()
            .map(|(path, item)| {
                if path == "/health" {
                    (path, item)
                } else {
                    (format!("{API_PREFIX}{path}"), item)
                }
            })
            .collect();
    }
}

/// `OpenAPI` documentation for the syncplane server.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "syncplane API",
        version = "0.1.0",
        description = "Configuration API for workspaces, sources, destinations and connections"
    ),
    modifiers(&ApiPrefix),
    tags(
        (name = "Health", description = "Service health and status"),
        (name = "Workspaces", description = "Workspace management"),
        (name = "Sources", description = "Source configuration, catalogs and checks"),
        (name = "Destinations", description = "Destination configuration and checks"),
        (name = "Connections", description = "Connections between sources and destinations"),
        (name = "Operations", description = "Operations run around a sync"),
        (name = "Jobs", description = "Sync job queue"),
        (name = "Scheduler", description = "Checks of unsaved connector configurations"),
        (name = "Destination OAuth", description = "OAuth flows for destinations"),
    ),
    paths(
        crate::health::health_handler,
        handlers::create_workspace,
        handlers::get_workspace,
        handlers::get_workspace_by_slug,
        handlers::list_workspaces,
        handlers::update_workspace,
        handlers::set_feedback_done,
        handlers::delete_workspace,
        handlers::create_source,
        handlers::get_source,
        handlers::list_sources_for_workspace,
        handlers::search_sources,
        handlers::update_source,
        handlers::clone_source,
        handlers::delete_source,
        handlers::upgrade_source_version,
        handlers::most_recent_source_actor_catalog,
        handlers::write_discover_catalog_result,
        handlers::check_connection_to_source,
        handlers::check_connection_to_source_for_update,
        handlers::discover_schema_for_source,
        handlers::create_destination,
        handlers::get_destination,
        handlers::list_destinations_for_workspace,
        handlers::search_destinations,
        handlers::update_destination,
        handlers::clone_destination,
        handlers::delete_destination,
        handlers::upgrade_destination_version,
        handlers::check_connection_to_destination,
        handlers::check_connection_to_destination_for_update,
        handlers::create_connection,
        handlers::get_connection,
        handlers::list_connections_for_workspace,
        handlers::update_connection,
        handlers::delete_connection,
        handlers::create_operation,
        handlers::get_operation,
        handlers::list_operations_for_connection,
        handlers::update_operation,
        handlers::delete_operation,
        handlers::create_job,
        handlers::cancel_job,
        handlers::get_job_debug_info,
        handlers::execute_source_check_connection,
        handlers::execute_destination_check_connection,
        handlers::get_destination_oauth_consent,
        handlers::complete_destination_oauth,
        handlers::set_instancewide_destination_oauth_params,
    ),
    components(schemas(
        HealthResponse,
        HealthStatus,
        DependencyStatus,
        Pagination,
        BreakingChangeRead,
        ActorType,
        SupportState,
        ConnectionStatus,
        OperatorType,
        CheckConnectionStatus,
        JobConfigType,
        JobStatus,
        // Workspaces
        WorkspaceCreate,
        WorkspaceIdRequestBody,
        SlugRequestBody,
        ListWorkspacesRequestBody,
        WorkspaceUpdate,
        WorkspaceRead,
        WorkspaceReadList,
        WorkspaceStats,
        // Sources
        SourceCreate,
        SourceIdRequestBody,
        SourceSearch,
        SourceUpdate,
        SourceCloneConfiguration,
        SourceCloneRequestBody,
        SourceRead,
        SourceReadList,
        SourceCoreConfig,
        SourceDiscoverSchemaRequestBody,
        SourceDiscoverSchemaRead,
        SourceDiscoverSchemaWriteRequestBody,
        DiscoverCatalogResult,
        ActorCatalogWithUpdatedAtRead,
        // Destinations
        DestinationCreate,
        DestinationIdRequestBody,
        DestinationSearch,
        DestinationUpdate,
        DestinationCloneConfiguration,
        DestinationCloneRequestBody,
        DestinationRead,
        DestinationReadList,
        DestinationCoreConfig,
        // Connections and operations
        ConnectionCreate,
        ConnectionIdRequestBody,
        ListConnectionsRequestBody,
        ConnectionUpdate,
        ConnectionRead,
        ConnectionReadList,
        OperationCreate,
        OperationIdRequestBody,
        OperationUpdate,
        OperationRead,
        OperationReadList,
        // Jobs
        JobCreate,
        JobIdRequestBody,
        JobRead,
        JobInfoRead,
        JobDebugInfoRead,
        // Scheduler and OAuth
        CheckConnectionRead,
        SynchronousJobRead,
        DestinationOauthConsentRequest,
        OAuthConsentRead,
        CompleteDestinationOAuthRequest,
        CompleteOAuthResponse,
        SetInstancewideDestinationOauthParamsRequestBody,
    ))
)]
pub struct ApiDoc;

/// Swagger UI at `/docs`, spec at `/api-doc/openapi.json`.
pub fn swagger_routes() -> Router<HealthState> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
}

//! Router configuration for the syncplane API.

use std::sync::Arc;

use axum::{routing::post, Router};
use sqlx::PgPool;

use crate::error::{ApiError, Result};
use crate::handlers;
use crate::services::{
    ConnectionHandler, ConnectionService, DestinationHandler, DestinationService, JobHandler,
    JobService, OAuthHandler, OperationHandler, OperationService, SchedulerHandler,
    SourceHandler, SourceService, WorkspaceHandler, WorkspaceService,
};

/// Shared state for every API handler.
#[derive(Clone)]
pub struct ApiState {
    pub workspaces: Arc<dyn WorkspaceHandler>,
    pub sources: Arc<dyn SourceHandler>,
    pub destinations: Arc<dyn DestinationHandler>,
    pub connections: Arc<dyn ConnectionHandler>,
    pub operations: Arc<dyn OperationHandler>,
    pub jobs: Arc<dyn JobHandler>,
    pub scheduler: Option<Arc<dyn SchedulerHandler>>,
    pub oauth: Option<Arc<dyn OAuthHandler>>,
}

impl ApiState {
    /// Create a new API state without scheduler or OAuth support.
    pub fn new(
        workspaces: Arc<dyn WorkspaceHandler>,
        sources: Arc<dyn SourceHandler>,
        destinations: Arc<dyn DestinationHandler>,
        connections: Arc<dyn ConnectionHandler>,
        operations: Arc<dyn OperationHandler>,
        jobs: Arc<dyn JobHandler>,
    ) -> Self {
        Self {
            workspaces,
            sources,
            destinations,
            connections,
            operations,
            jobs,
            scheduler: None,
            oauth: None,
        }
    }

    /// Create an API state backed by the Postgres services.
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(WorkspaceService::new(pool.clone())),
            Arc::new(SourceService::new(pool.clone())),
            Arc::new(DestinationService::new(pool.clone())),
            Arc::new(ConnectionService::new(pool.clone())),
            Arc::new(OperationService::new(pool.clone())),
            Arc::new(JobService::new(pool)),
        )
    }

    /// Attach a scheduler for connector checks and discovery.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: Arc<dyn SchedulerHandler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Attach an OAuth flow for destinations.
    #[must_use]
    pub fn with_oauth(mut self, oauth: Arc<dyn OAuthHandler>) -> Self {
        self.oauth = Some(oauth);
        self
    }

    pub(crate) fn scheduler(&self) -> Result<&Arc<dyn SchedulerHandler>> {
        self.scheduler
            .as_ref()
            .ok_or(ApiError::NotConfigured("scheduler"))
    }

    pub(crate) fn oauth(&self) -> Result<&Arc<dyn OAuthHandler>> {
        self.oauth.as_ref().ok_or(ApiError::NotConfigured("oauth"))
    }
}

/// Create the workspace router.
pub fn workspace_routes(state: ApiState) -> Router {
    Router::new()
        .route("/create", post(handlers::create_workspace))
        .route("/get", post(handlers::get_workspace))
        .route("/get_by_slug", post(handlers::get_workspace_by_slug))
        .route("/list", post(handlers::list_workspaces))
        .route("/update", post(handlers::update_workspace))
        .route(
            "/tag_feedback_status_as_done",
            post(handlers::set_feedback_done),
        )
        .route("/delete", post(handlers::delete_workspace))
        .with_state(state)
}

/// Create the source router.
pub fn source_routes(state: ApiState) -> Router {
    Router::new()
        .route("/create", post(handlers::create_source))
        .route("/get", post(handlers::get_source))
        .route("/list", post(handlers::list_sources_for_workspace))
        .route("/search", post(handlers::search_sources))
        .route("/update", post(handlers::update_source))
        .route("/clone", post(handlers::clone_source))
        .route("/delete", post(handlers::delete_source))
        .route("/upgrade_version", post(handlers::upgrade_source_version))
        // Catalogs
        .route(
            "/most_recent_source_actor_catalog",
            post(handlers::most_recent_source_actor_catalog),
        )
        .route(
            "/write_discover_catalog_result",
            post(handlers::write_discover_catalog_result),
        )
        // Scheduler-backed
        .route("/check_connection", post(handlers::check_connection_to_source))
        .route(
            "/check_connection_for_update",
            post(handlers::check_connection_to_source_for_update),
        )
        .route("/discover_schema", post(handlers::discover_schema_for_source))
        .with_state(state)
}

/// Create the destination router.
pub fn destination_routes(state: ApiState) -> Router {
    Router::new()
        .route("/create", post(handlers::create_destination))
        .route("/get", post(handlers::get_destination))
        .route("/list", post(handlers::list_destinations_for_workspace))
        .route("/search", post(handlers::search_destinations))
        .route("/update", post(handlers::update_destination))
        .route("/clone", post(handlers::clone_destination))
        .route("/delete", post(handlers::delete_destination))
        .route(
            "/upgrade_version",
            post(handlers::upgrade_destination_version),
        )
        // Scheduler-backed
        .route(
            "/check_connection",
            post(handlers::check_connection_to_destination),
        )
        .route(
            "/check_connection_for_update",
            post(handlers::check_connection_to_destination_for_update),
        )
        .with_state(state)
}

/// Create the connection router.
pub fn connection_routes(state: ApiState) -> Router {
    Router::new()
        .route("/create", post(handlers::create_connection))
        .route("/get", post(handlers::get_connection))
        .route("/list", post(handlers::list_connections_for_workspace))
        .route("/update", post(handlers::update_connection))
        .route("/delete", post(handlers::delete_connection))
        .with_state(state)
}

/// Create the operation router.
pub fn operation_routes(state: ApiState) -> Router {
    Router::new()
        .route("/create", post(handlers::create_operation))
        .route("/get", post(handlers::get_operation))
        .route("/list", post(handlers::list_operations_for_connection))
        .route("/update", post(handlers::update_operation))
        .route("/delete", post(handlers::delete_operation))
        .with_state(state)
}

/// Create the job router.
pub fn job_routes(state: ApiState) -> Router {
    Router::new()
        .route("/create", post(handlers::create_job))
        .route("/cancel", post(handlers::cancel_job))
        .route("/get_debug_info", post(handlers::get_job_debug_info))
        .with_state(state)
}

/// Create the router for checks of unsaved configurations.
pub fn scheduler_routes(state: ApiState) -> Router {
    Router::new()
        .route(
            "/sources/check_connection",
            post(handlers::execute_source_check_connection),
        )
        .route(
            "/destinations/check_connection",
            post(handlers::execute_destination_check_connection),
        )
        .with_state(state)
}

/// Create the destination OAuth router.
pub fn destination_oauth_routes(state: ApiState) -> Router {
    Router::new()
        .route(
            "/get_consent_url",
            post(handlers::get_destination_oauth_consent),
        )
        .route("/complete_oauth", post(handlers::complete_destination_oauth))
        .route(
            "/oauth_params/create",
            post(handlers::set_instancewide_destination_oauth_params),
        )
        .with_state(state)
}

/// Create the full API router.
///
/// # Example
///
/// ```ignore
/// use syncplane_api::{api_routes, ApiState};
///
/// let state = ApiState::from_pool(pool);
/// let app = Router::new().nest("/api/v1", api_routes(state));
/// ```
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .nest("/workspaces", workspace_routes(state.clone()))
        .nest("/sources", source_routes(state.clone()))
        .nest("/destinations", destination_routes(state.clone()))
        .nest("/connections", connection_routes(state.clone()))
        .nest("/operations", operation_routes(state.clone()))
        .nest("/jobs", job_routes(state.clone()))
        .nest("/scheduler", scheduler_routes(state.clone()))
        .nest("/destination_oauths", destination_oauth_routes(state))
}

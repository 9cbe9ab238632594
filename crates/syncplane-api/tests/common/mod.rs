//! In-memory collaborators for exercising the router without a database.
//!
//! Every mock knows exactly one record per resource, keyed by [`known_id`]
//! (jobs by [`KNOWN_JOB_ID`]). Any other key answers `NotFound`.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use syncplane_api::error::{ApiError, Result};
use syncplane_api::matcher::{matches, DestinationMatcher, SourceMatcher};
use syncplane_api::models::*;
use syncplane_api::{
    api_routes, ApiState, ConnectionHandler, DestinationHandler, JobHandler, OAuthHandler,
    OperationHandler, SchedulerHandler, SourceHandler, WorkspaceHandler,
};
use syncplane_db::{ConnectionStatus, JobConfigType, JobStatus, OperatorType, SupportState};

pub const KNOWN_JOB_ID: i64 = 42;

pub fn known_id() -> Uuid {
    Uuid::from_u128(1)
}

pub fn unknown_id() -> Uuid {
    Uuid::from_u128(404)
}

fn timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn require_known(kind: &str, id: Uuid) -> Result<()> {
    if id == known_id() {
        Ok(())
    } else {
        Err(ApiError::not_found(kind, id))
    }
}

pub fn workspace_read(workspace_id: Uuid) -> WorkspaceRead {
    WorkspaceRead {
        workspace_id,
        name: "Data Team".to_string(),
        slug: "data-team".to_string(),
        email: None,
        initial_setup_complete: false,
        feedback_done: false,
        created_at: timestamp(),
        updated_at: timestamp(),
        stats: None,
    }
}

pub fn source_read(source_id: Uuid, name: &str, configuration: Value) -> SourceRead {
    SourceRead {
        source_id,
        name: name.to_string(),
        source_definition_id: Uuid::from_u128(100),
        source_name: "Postgres".to_string(),
        workspace_id: known_id(),
        connection_configuration: configuration,
        icon: None,
        is_version_override_applied: false,
        breaking_changes: vec![],
        support_state: SupportState::Supported,
    }
}

pub fn destination_read(destination_id: Uuid, name: &str) -> DestinationRead {
    DestinationRead {
        destination_id,
        name: name.to_string(),
        destination_definition_id: Uuid::from_u128(200),
        destination_name: "Snowflake".to_string(),
        workspace_id: known_id(),
        connection_configuration: json!({"account": "acme"}),
        icon: None,
        is_version_override_applied: false,
        breaking_changes: vec![],
        support_state: SupportState::Supported,
    }
}

pub fn connection_read(connection_id: Uuid) -> ConnectionRead {
    ConnectionRead {
        connection_id,
        name: "pg to snowflake".to_string(),
        source_id: known_id(),
        destination_id: known_id(),
        workspace_id: known_id(),
        status: ConnectionStatus::Active,
        schedule_cron: None,
        sync_catalog: json!({}),
        operation_ids: vec![],
        breaking_change: false,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn operation_read(operation_id: Uuid) -> OperationRead {
    OperationRead {
        operation_id,
        workspace_id: known_id(),
        name: "normalize".to_string(),
        operator_type: OperatorType::Normalization,
        operator_config: json!({}),
    }
}

pub fn job_read(status: JobStatus) -> JobRead {
    JobRead {
        id: KNOWN_JOB_ID,
        config_type: JobConfigType::Sync,
        config_id: known_id().to_string(),
        status,
        created_at: timestamp(),
        updated_at: timestamp(),
        started_at: None,
    }
}

fn check_read() -> CheckConnectionRead {
    CheckConnectionRead {
        status: CheckConnectionStatus::Succeeded,
        message: None,
        job_info: SynchronousJobRead {
            id: Uuid::from_u128(7),
            config_type: "check_connection_source".to_string(),
            created_at: timestamp(),
            ended_at: timestamp(),
            succeeded: true,
        },
    }
}

/// Sources stored by [`MockSources`].
pub fn stored_sources() -> Vec<SourceRead> {
    vec![
        source_read(known_id(), "prod-db", json!({"host": "h1", "port": 5432})),
        source_read(Uuid::from_u128(2), "staging-db", json!({"host": "h2", "port": 5432})),
    ]
}

pub struct MockWorkspaces;

#[async_trait]
impl WorkspaceHandler for MockWorkspaces {
    async fn create_workspace(&self, request: WorkspaceCreate) -> Result<WorkspaceRead> {
        if request.slug.as_deref() == Some("taken") {
            return Err(ApiError::Conflict("slug 'taken' already exists".to_string()));
        }
        let mut workspace = workspace_read(known_id());
        workspace.name = request.name;
        Ok(workspace)
    }

    async fn get_workspace(&self, request: WorkspaceIdRequestBody) -> Result<WorkspaceRead> {
        require_known("workspace", request.workspace_id)?;
        Ok(workspace_read(request.workspace_id))
    }

    async fn get_workspace_by_slug(&self, request: SlugRequestBody) -> Result<WorkspaceRead> {
        if request.slug == "data-team" {
            Ok(workspace_read(known_id()))
        } else {
            Err(ApiError::not_found("workspace", request.slug))
        }
    }

    async fn list_workspaces(
        &self,
        _request: ListWorkspacesRequestBody,
    ) -> Result<WorkspaceReadList> {
        Ok(WorkspaceReadList {
            workspaces: vec![workspace_read(known_id())],
        })
    }

    async fn update_workspace(&self, request: WorkspaceUpdate) -> Result<WorkspaceRead> {
        require_known("workspace", request.workspace_id)?;
        let mut workspace = workspace_read(request.workspace_id);
        if let Some(name) = request.name {
            workspace.name = name;
        }
        Ok(workspace)
    }

    async fn set_feedback_done(&self, request: WorkspaceIdRequestBody) -> Result<()> {
        require_known("workspace", request.workspace_id)
    }

    async fn delete_workspace(&self, request: WorkspaceIdRequestBody) -> Result<()> {
        require_known("workspace", request.workspace_id)
    }
}

pub struct MockSources;

#[async_trait]
impl SourceHandler for MockSources {
    async fn create_source(&self, request: SourceCreate) -> Result<SourceRead> {
        require_known("workspace", request.workspace_id)?;
        Ok(source_read(
            Uuid::from_u128(3),
            &request.name,
            request.connection_configuration,
        ))
    }

    async fn get_source(&self, request: SourceIdRequestBody) -> Result<SourceRead> {
        require_known("source", request.source_id)?;
        Ok(stored_sources().remove(0))
    }

    async fn list_sources_for_workspace(
        &self,
        request: WorkspaceIdRequestBody,
    ) -> Result<SourceReadList> {
        require_known("workspace", request.workspace_id)?;
        Ok(SourceReadList {
            sources: stored_sources(),
        })
    }

    async fn search_sources(&self, request: SourceSearch) -> Result<SourceReadList> {
        let sources = stored_sources()
            .into_iter()
            .filter(|source| matches(&SourceMatcher, Some(&request), source))
            .collect();
        Ok(SourceReadList { sources })
    }

    async fn update_source(&self, request: SourceUpdate) -> Result<SourceRead> {
        require_known("source", request.source_id)?;
        Ok(source_read(
            request.source_id,
            &request.name,
            request.connection_configuration,
        ))
    }

    async fn clone_source(&self, request: SourceCloneRequestBody) -> Result<SourceRead> {
        require_known("source", request.source_clone_id)?;
        let original = stored_sources().remove(0);
        let overrides = request.source_configuration.unwrap_or_default();
        Ok(source_read(
            Uuid::from_u128(4),
            &overrides
                .name
                .unwrap_or_else(|| format!("{} (Copy)", original.name)),
            overrides
                .connection_configuration
                .unwrap_or(original.connection_configuration),
        ))
    }

    async fn delete_source(&self, request: SourceIdRequestBody) -> Result<()> {
        require_known("source", request.source_id)
    }

    async fn upgrade_source_version(&self, request: SourceIdRequestBody) -> Result<()> {
        require_known("source", request.source_id)
    }

    async fn most_recent_source_actor_catalog(
        &self,
        request: SourceIdRequestBody,
    ) -> Result<ActorCatalogWithUpdatedAtRead> {
        require_known("source", request.source_id)?;
        Ok(ActorCatalogWithUpdatedAtRead::default())
    }

    async fn write_discover_catalog_result(
        &self,
        request: SourceDiscoverSchemaWriteRequestBody,
    ) -> Result<DiscoverCatalogResult> {
        require_known("source", request.source_id)?;
        Ok(DiscoverCatalogResult {
            catalog_id: Uuid::from_u128(500),
        })
    }
}

pub struct MockDestinations;

#[async_trait]
impl DestinationHandler for MockDestinations {
    async fn create_destination(&self, request: DestinationCreate) -> Result<DestinationRead> {
        require_known("workspace", request.workspace_id)?;
        Ok(destination_read(Uuid::from_u128(3), &request.name))
    }

    async fn get_destination(&self, request: DestinationIdRequestBody) -> Result<DestinationRead> {
        require_known("destination", request.destination_id)?;
        Ok(destination_read(request.destination_id, "warehouse"))
    }

    async fn list_destinations_for_workspace(
        &self,
        request: WorkspaceIdRequestBody,
    ) -> Result<DestinationReadList> {
        require_known("workspace", request.workspace_id)?;
        Ok(DestinationReadList {
            destinations: vec![destination_read(known_id(), "warehouse")],
        })
    }

    async fn search_destinations(
        &self,
        request: DestinationSearch,
    ) -> Result<DestinationReadList> {
        let destinations = vec![destination_read(known_id(), "warehouse")]
            .into_iter()
            .filter(|destination| matches(&DestinationMatcher, Some(&request), destination))
            .collect();
        Ok(DestinationReadList { destinations })
    }

    async fn update_destination(&self, request: DestinationUpdate) -> Result<DestinationRead> {
        require_known("destination", request.destination_id)?;
        Ok(destination_read(request.destination_id, &request.name))
    }

    async fn clone_destination(
        &self,
        request: DestinationCloneRequestBody,
    ) -> Result<DestinationRead> {
        require_known("destination", request.destination_clone_id)?;
        Ok(destination_read(Uuid::from_u128(4), "warehouse (Copy)"))
    }

    async fn delete_destination(&self, request: DestinationIdRequestBody) -> Result<()> {
        require_known("destination", request.destination_id)
    }

    async fn upgrade_destination_version(&self, request: DestinationIdRequestBody) -> Result<()> {
        require_known("destination", request.destination_id)
    }
}

pub struct MockConnections;

#[async_trait]
impl ConnectionHandler for MockConnections {
    async fn create_connection(&self, request: ConnectionCreate) -> Result<ConnectionRead> {
        require_known("source", request.source_id)?;
        require_known("destination", request.destination_id)?;
        let mut connection = connection_read(Uuid::from_u128(3));
        connection.name = request.name;
        connection.operation_ids = request.operation_ids;
        Ok(connection)
    }

    async fn get_connection(&self, request: ConnectionIdRequestBody) -> Result<ConnectionRead> {
        require_known("connection", request.connection_id)?;
        Ok(connection_read(request.connection_id))
    }

    async fn list_connections_for_workspace(
        &self,
        request: ListConnectionsRequestBody,
    ) -> Result<ConnectionReadList> {
        let connections = if request.workspace_id == known_id() {
            vec![connection_read(known_id())]
        } else {
            vec![]
        };
        Ok(ConnectionReadList { connections })
    }

    async fn update_connection(&self, request: ConnectionUpdate) -> Result<ConnectionRead> {
        require_known("connection", request.connection_id)?;
        let mut connection = connection_read(request.connection_id);
        if let Some(status) = request.status {
            connection.status = status;
        }
        Ok(connection)
    }

    async fn delete_connection(&self, request: ConnectionIdRequestBody) -> Result<()> {
        require_known("connection", request.connection_id)
    }
}

pub struct MockOperations;

#[async_trait]
impl OperationHandler for MockOperations {
    async fn create_operation(&self, request: OperationCreate) -> Result<OperationRead> {
        require_known("workspace", request.workspace_id)?;
        let mut operation = operation_read(Uuid::from_u128(3));
        operation.name = request.name;
        operation.operator_type = request.operator_type;
        Ok(operation)
    }

    async fn get_operation(&self, request: OperationIdRequestBody) -> Result<OperationRead> {
        require_known("sync_operation", request.operation_id)?;
        Ok(operation_read(request.operation_id))
    }

    async fn list_operations_for_connection(
        &self,
        request: ConnectionIdRequestBody,
    ) -> Result<OperationReadList> {
        require_known("connection", request.connection_id)?;
        Ok(OperationReadList {
            operations: vec![operation_read(known_id())],
        })
    }

    async fn update_operation(&self, request: OperationUpdate) -> Result<OperationRead> {
        require_known("sync_operation", request.operation_id)?;
        Ok(operation_read(request.operation_id))
    }

    async fn delete_operation(&self, request: OperationIdRequestBody) -> Result<()> {
        require_known("sync_operation", request.operation_id)
    }
}

pub struct MockJobs;

#[async_trait]
impl JobHandler for MockJobs {
    async fn create_job(&self, request: JobCreate) -> Result<JobInfoRead> {
        require_known("connection", request.connection_id)?;
        Ok(JobInfoRead {
            job: job_read(JobStatus::Pending),
        })
    }

    async fn cancel_job(&self, request: JobIdRequestBody) -> Result<JobInfoRead> {
        if request.id != KNOWN_JOB_ID {
            return Err(ApiError::not_found("job", request.id));
        }
        Ok(JobInfoRead {
            job: job_read(JobStatus::Cancelled),
        })
    }

    async fn get_job_debug_info(&self, request: JobIdRequestBody) -> Result<JobDebugInfoRead> {
        if request.id != KNOWN_JOB_ID {
            return Err(ApiError::not_found("job", request.id));
        }
        Ok(JobDebugInfoRead {
            job: job_read(JobStatus::Running),
            connection_name: "pg to snowflake".to_string(),
            source_name: "prod-db".to_string(),
            source_definition_name: "Postgres".to_string(),
            destination_name: "warehouse".to_string(),
            destination_definition_name: "Snowflake".to_string(),
        })
    }
}

pub struct MockScheduler;

#[async_trait]
impl SchedulerHandler for MockScheduler {
    async fn check_source_connection_from_source_id(
        &self,
        request: SourceIdRequestBody,
    ) -> Result<CheckConnectionRead> {
        require_known("source", request.source_id)?;
        Ok(check_read())
    }

    async fn check_source_connection_from_source_create(
        &self,
        _request: SourceCoreConfig,
    ) -> Result<CheckConnectionRead> {
        Ok(check_read())
    }

    async fn check_source_connection_for_update(
        &self,
        request: SourceUpdate,
    ) -> Result<CheckConnectionRead> {
        require_known("source", request.source_id)?;
        Ok(check_read())
    }

    async fn discover_schema_for_source(
        &self,
        request: SourceDiscoverSchemaRequestBody,
    ) -> Result<SourceDiscoverSchemaRead> {
        require_known("source", request.source_id)?;
        Ok(SourceDiscoverSchemaRead {
            catalog: Some(json!({"streams": []})),
            catalog_id: Some(Uuid::from_u128(500)),
            job_info: check_read().job_info,
            breaking_change: false,
        })
    }

    async fn check_destination_connection_from_destination_id(
        &self,
        request: DestinationIdRequestBody,
    ) -> Result<CheckConnectionRead> {
        require_known("destination", request.destination_id)?;
        Ok(check_read())
    }

    async fn check_destination_connection_from_destination_create(
        &self,
        _request: DestinationCoreConfig,
    ) -> Result<CheckConnectionRead> {
        Ok(check_read())
    }

    async fn check_destination_connection_for_update(
        &self,
        request: DestinationUpdate,
    ) -> Result<CheckConnectionRead> {
        require_known("destination", request.destination_id)?;
        Ok(check_read())
    }
}

pub struct MockOAuth;

#[async_trait]
impl OAuthHandler for MockOAuth {
    async fn get_destination_oauth_consent(
        &self,
        request: DestinationOauthConsentRequest,
    ) -> Result<OAuthConsentRead> {
        require_known("destination_definition", request.destination_definition_id)?;
        Ok(OAuthConsentRead {
            consent_url: "https://provider.example.com/authorize?state=abc".to_string(),
        })
    }

    async fn complete_destination_oauth(
        &self,
        request: CompleteDestinationOAuthRequest,
    ) -> Result<CompleteOAuthResponse> {
        require_known("destination_definition", request.destination_definition_id)?;
        Ok(CompleteOAuthResponse {
            request_succeeded: true,
            request_error: None,
            auth_payload: json!({"refresh_token": "r"}),
        })
    }

    async fn set_destination_instancewide_oauth_params(
        &self,
        request: SetInstancewideDestinationOauthParamsRequestBody,
    ) -> Result<()> {
        require_known("destination_definition", request.destination_definition_id)
    }
}

/// State backed by the mocks, without scheduler or OAuth.
pub fn mock_state() -> ApiState {
    ApiState::new(
        Arc::new(MockWorkspaces),
        Arc::new(MockSources),
        Arc::new(MockDestinations),
        Arc::new(MockConnections),
        Arc::new(MockOperations),
        Arc::new(MockJobs),
    )
}

/// Router over [`mock_state`].
pub fn test_app() -> Router {
    api_routes(mock_state())
}

/// Router with every collaborator, including scheduler and OAuth.
pub fn full_test_app() -> Router {
    api_routes(
        mock_state()
            .with_scheduler(Arc::new(MockScheduler))
            .with_oauth(Arc::new(MockOAuth)),
    )
}

/// POST a JSON body and return the status and parsed body (`Null` if empty).
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

/// POST a raw body with a JSON content type.
pub async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

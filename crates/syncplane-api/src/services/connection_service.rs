//! Connection service.

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use syncplane_db::{
    Actor, ActorType, ConfigKind, Connection, ConnectionQuery, ConnectionStatus, CreateConnection,
    SyncOperation, UpdateConnection,
};

use crate::error::{ApiError, Result};
use crate::models::{
    ConnectionCreate, ConnectionIdRequestBody, ConnectionRead, ConnectionReadList,
    ConnectionUpdate, ListConnectionsRequestBody,
};

/// Operations behind the `/connections` endpoints.
#[async_trait]
pub trait ConnectionHandler: Send + Sync {
    async fn create_connection(&self, request: ConnectionCreate) -> Result<ConnectionRead>;
    async fn get_connection(&self, request: ConnectionIdRequestBody) -> Result<ConnectionRead>;
    async fn list_connections_for_workspace(
        &self,
        request: ListConnectionsRequestBody,
    ) -> Result<ConnectionReadList>;
    async fn update_connection(&self, request: ConnectionUpdate) -> Result<ConnectionRead>;
    async fn delete_connection(&self, request: ConnectionIdRequestBody) -> Result<()>;
}

/// Postgres-backed connection handler.
pub struct ConnectionService {
    pool: PgPool,
}

impl ConnectionService {
    /// Create a new connection service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn read(&self, connection: Connection, workspace_id: Uuid) -> Result<ConnectionRead> {
        let operation_ids = Connection::operation_ids(&self.pool, connection.connection_id).await?;
        Ok(ConnectionRead {
            connection_id: connection.connection_id,
            name: connection.name,
            source_id: connection.source_id,
            destination_id: connection.destination_id,
            workspace_id,
            status: connection.status,
            schedule_cron: connection.schedule_cron,
            sync_catalog: connection.catalog,
            operation_ids,
            breaking_change: connection.breaking_change,
            created_at: connection.created_at,
            updated_at: connection.updated_at,
        })
    }

    async fn live_actor(&self, actor_type: ActorType, actor_id: Uuid) -> Result<Actor> {
        let actor = Actor::get(&self.pool, actor_type, actor_id).await?;
        if actor.tombstone {
            return Err(ApiError::not_found(actor_type.config_kind(), actor_id));
        }
        Ok(actor)
    }

    /// Every operation must be a live operation of the workspace.
    async fn check_operations(&self, workspace_id: Uuid, operation_ids: &[Uuid]) -> Result<()> {
        if operation_ids.is_empty() {
            return Ok(());
        }

        let known: HashSet<Uuid> = SyncOperation::list_by_workspace(&self.pool, workspace_id)
            .await?
            .into_iter()
            .map(|operation| operation.operation_id)
            .collect();

        match operation_ids.iter().find(|id| !known.contains(id)) {
            Some(missing) => Err(ApiError::Validation(format!(
                "operation {missing} does not belong to workspace {workspace_id}"
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConnectionHandler for ConnectionService {
    #[instrument(
        skip(self, request),
        fields(source_id = %request.source_id, destination_id = %request.destination_id)
    )]
    async fn create_connection(&self, request: ConnectionCreate) -> Result<ConnectionRead> {
        let source = self.live_actor(ActorType::Source, request.source_id).await?;
        let destination = self
            .live_actor(ActorType::Destination, request.destination_id)
            .await?;

        if source.workspace_id != destination.workspace_id {
            return Err(ApiError::Validation(
                "Source and destination must belong to the same workspace".to_string(),
            ));
        }
        if request.status == ConnectionStatus::Deprecated {
            return Err(ApiError::Validation(
                "A connection cannot be created deprecated".to_string(),
            ));
        }
        self.check_operations(source.workspace_id, &request.operation_ids)
            .await?;

        let catalog = match request.sync_catalog {
            Value::Null => Value::Object(serde_json::Map::new()),
            catalog => catalog,
        };
        let input = CreateConnection {
            name: request.name,
            source_id: source.actor_id,
            destination_id: destination.actor_id,
            status: request.status,
            schedule_cron: request.schedule_cron,
            catalog,
            operation_ids: request.operation_ids,
        };
        let connection = Connection::create(&self.pool, &input).await?;

        info!(connection_id = %connection.connection_id, "Created connection");
        self.read(connection, source.workspace_id).await
    }

    async fn get_connection(&self, request: ConnectionIdRequestBody) -> Result<ConnectionRead> {
        let connection = Connection::get(&self.pool, request.connection_id).await?;
        let workspace_id = Connection::workspace_id_for(&self.pool, request.connection_id).await?;
        self.read(connection, workspace_id).await
    }

    async fn list_connections_for_workspace(
        &self,
        request: ListConnectionsRequestBody,
    ) -> Result<ConnectionReadList> {
        let query = ConnectionQuery {
            workspace_id: request.workspace_id,
            source_ids: request.source_ids,
            destination_ids: request.destination_ids,
            include_deleted: request.include_deleted,
        };
        let rows = Connection::list_by_workspace(&self.pool, &query).await?;

        let mut connections = Vec::with_capacity(rows.len());
        for connection in rows {
            connections.push(self.read(connection, request.workspace_id).await?);
        }
        Ok(ConnectionReadList { connections })
    }

    #[instrument(skip(self, request), fields(connection_id = %request.connection_id))]
    async fn update_connection(&self, request: ConnectionUpdate) -> Result<ConnectionRead> {
        let existing = Connection::get(&self.pool, request.connection_id).await?;
        if existing.status == ConnectionStatus::Deprecated {
            return Err(ApiError::Validation(format!(
                "connection {} is deprecated and cannot be updated",
                request.connection_id
            )));
        }
        if request.status == Some(ConnectionStatus::Deprecated) {
            return Err(ApiError::Validation(
                "Use the delete endpoint to deprecate a connection".to_string(),
            ));
        }

        let workspace_id = Connection::workspace_id_for(&self.pool, request.connection_id).await?;
        if let Some(operation_ids) = &request.operation_ids {
            self.check_operations(workspace_id, operation_ids).await?;
        }

        let input = UpdateConnection {
            name: request.name,
            status: request.status,
            schedule_cron: request.schedule_cron,
            catalog: request.sync_catalog,
            breaking_change: None,
            operation_ids: request.operation_ids,
        };
        let connection = Connection::update(&self.pool, request.connection_id, &input)
            .await?
            .ok_or_else(|| ApiError::not_found(ConfigKind::Connection, request.connection_id))?;

        info!("Updated connection");
        self.read(connection, workspace_id).await
    }

    async fn delete_connection(&self, request: ConnectionIdRequestBody) -> Result<()> {
        Connection::get(&self.pool, request.connection_id).await?;
        Connection::deprecate(&self.pool, request.connection_id).await?;
        info!(connection_id = %request.connection_id, "Deprecated connection");
        Ok(())
    }
}

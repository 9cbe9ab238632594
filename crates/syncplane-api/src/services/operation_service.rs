//! Sync operation service.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use syncplane_db::{
    ConfigKind, Connection, CreateSyncOperation, SyncOperation, UpdateSyncOperation, Workspace,
};

use crate::error::{ApiError, Result};
use crate::models::{
    ConnectionIdRequestBody, OperationCreate, OperationIdRequestBody, OperationRead,
    OperationReadList, OperationUpdate,
};

/// Operations behind the `/operations` endpoints.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    async fn create_operation(&self, request: OperationCreate) -> Result<OperationRead>;
    async fn get_operation(&self, request: OperationIdRequestBody) -> Result<OperationRead>;
    async fn list_operations_for_connection(
        &self,
        request: ConnectionIdRequestBody,
    ) -> Result<OperationReadList>;
    async fn update_operation(&self, request: OperationUpdate) -> Result<OperationRead>;
    async fn delete_operation(&self, request: OperationIdRequestBody) -> Result<()>;
}

/// Postgres-backed operation handler.
pub struct OperationService {
    pool: PgPool,
}

impl OperationService {
    /// Create a new operation service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OperationHandler for OperationService {
    async fn create_operation(&self, request: OperationCreate) -> Result<OperationRead> {
        Workspace::get(&self.pool, request.workspace_id, false).await?;

        let input = CreateSyncOperation {
            workspace_id: request.workspace_id,
            name: request.name,
            operator_type: request.operator_type,
            operator_config: request.operator_config,
        };
        let operation = SyncOperation::create(&self.pool, &input).await?;

        info!(
            operation_id = %operation.operation_id,
            operator_type = %operation.operator_type,
            "Created operation"
        );
        Ok(operation.into())
    }

    async fn get_operation(&self, request: OperationIdRequestBody) -> Result<OperationRead> {
        Ok(SyncOperation::get(&self.pool, request.operation_id)
            .await?
            .into())
    }

    async fn list_operations_for_connection(
        &self,
        request: ConnectionIdRequestBody,
    ) -> Result<OperationReadList> {
        Connection::get(&self.pool, request.connection_id).await?;
        let ids = Connection::operation_ids(&self.pool, request.connection_id).await?;
        let operations = SyncOperation::list(&self.pool, &ids).await?;

        Ok(OperationReadList {
            operations: operations.into_iter().map(Into::into).collect(),
        })
    }

    async fn update_operation(&self, request: OperationUpdate) -> Result<OperationRead> {
        let input = UpdateSyncOperation {
            name: request.name,
            operator_type: request.operator_type,
            operator_config: request.operator_config,
        };
        let operation = SyncOperation::update(&self.pool, request.operation_id, &input)
            .await?
            .ok_or_else(|| ApiError::not_found(ConfigKind::SyncOperation, request.operation_id))?;

        info!(operation_id = %operation.operation_id, "Updated operation");
        Ok(operation.into())
    }

    async fn delete_operation(&self, request: OperationIdRequestBody) -> Result<()> {
        SyncOperation::get(&self.pool, request.operation_id).await?;
        SyncOperation::tombstone(&self.pool, request.operation_id).await?;
        info!(operation_id = %request.operation_id, "Deleted operation");
        Ok(())
    }
}

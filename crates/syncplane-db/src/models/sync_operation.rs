//! Sync operation model.
//!
//! Operations are workspace-scoped post-sync steps (normalization, dbt runs,
//! webhooks) that connections reference by ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{ConfigKind, DbError, DbResult};

/// Kind of work an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OperatorType {
    Normalization,
    Dbt,
    Webhook,
}

impl std::fmt::Display for OperatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorType::Normalization => write!(f, "normalization"),
            OperatorType::Dbt => write!(f, "dbt"),
            OperatorType::Webhook => write!(f, "webhook"),
        }
    }
}

impl std::str::FromStr for OperatorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normalization" => Ok(OperatorType::Normalization),
            "dbt" => Ok(OperatorType::Dbt),
            "webhook" => Ok(OperatorType::Webhook),
            _ => Err(format!("Unknown operator type: {s}")),
        }
    }
}

/// A sync operation row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SyncOperation {
    pub operation_id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub operator_type: OperatorType,
    pub operator_config: serde_json::Value,
    pub tombstone: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSyncOperation {
    pub workspace_id: Uuid,
    pub name: String,
    pub operator_type: OperatorType,
    pub operator_config: serde_json::Value,
}

/// Partial update of an operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSyncOperation {
    pub name: Option<String>,
    pub operator_type: Option<OperatorType>,
    pub operator_config: Option<serde_json::Value>,
}

impl SyncOperation {
    /// Find an operation by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        operation_id: Uuid,
        include_tombstone: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM sync_operation
            WHERE operation_id = $1 AND ($2 OR tombstone = FALSE)
            ",
        )
        .bind(operation_id)
        .bind(include_tombstone)
        .fetch_optional(pool)
        .await
    }

    /// Get a live operation, failing with `NotFound` when absent.
    pub async fn get(pool: &PgPool, operation_id: Uuid) -> DbResult<Self> {
        Self::find_by_id(pool, operation_id, false)
            .await?
            .ok_or_else(|| DbError::not_found(ConfigKind::SyncOperation, operation_id))
    }

    /// List the live operations with the given IDs, ordered by name.
    pub async fn list(
        pool: &PgPool,
        operation_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM sync_operation
            WHERE operation_id = ANY($1) AND tombstone = FALSE
            ORDER BY name ASC
            ",
        )
        .bind(operation_ids)
        .fetch_all(pool)
        .await
    }

    /// List the live operations of a workspace.
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM sync_operation
            WHERE workspace_id = $1 AND tombstone = FALSE
            ORDER BY name ASC
            ",
        )
        .bind(workspace_id)
        .fetch_all(pool)
        .await
    }

    /// Insert a new operation.
    pub async fn create(pool: &PgPool, input: &CreateSyncOperation) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO sync_operation (
                operation_id, workspace_id, name, operator_type, operator_config
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(input.workspace_id)
        .bind(&input.name)
        .bind(input.operator_type.to_string())
        .bind(&input.operator_config)
        .fetch_one(pool)
        .await
    }

    /// Apply a partial update to a live operation.
    pub async fn update(
        pool: &PgPool,
        operation_id: Uuid,
        input: &UpdateSyncOperation,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE sync_operation SET
                name = COALESCE($2, name),
                operator_type = COALESCE($3, operator_type),
                operator_config = COALESCE($4, operator_config),
                updated_at = NOW()
            WHERE operation_id = $1 AND tombstone = FALSE
            RETURNING *
            ",
        )
        .bind(operation_id)
        .bind(input.name.as_deref())
        .bind(input.operator_type.map(|t| t.to_string()))
        .bind(input.operator_config.as_ref())
        .fetch_optional(pool)
        .await
    }

    /// Soft-delete an operation and detach it from every connection.
    pub async fn tombstone(pool: &PgPool, operation_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE sync_operation SET tombstone = TRUE, updated_at = NOW()
            WHERE operation_id = $1 AND tombstone = FALSE
            ",
        )
        .bind(operation_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            DELETE FROM connection_operation WHERE operation_id = $1
            ",
        )
        .bind(operation_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

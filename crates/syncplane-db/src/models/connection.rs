//! Connection model.
//!
//! A connection wires one source to one destination and carries the
//! configured catalog plus the list of sync operations run after each sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{ConfigKind, DbError, DbResult};

/// Lifecycle state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Active,
    Inactive,
    /// Terminal state reached when an endpoint of the connection is deleted.
    Deprecated,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Active => write!(f, "active"),
            ConnectionStatus::Inactive => write!(f, "inactive"),
            ConnectionStatus::Deprecated => write!(f, "deprecated"),
        }
    }
}

impl std::str::FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ConnectionStatus::Active),
            "inactive" => Ok(ConnectionStatus::Inactive),
            "deprecated" => Ok(ConnectionStatus::Deprecated),
            _ => Err(format!("Unknown connection status: {s}")),
        }
    }
}

/// A connection row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Connection {
    pub connection_id: Uuid,
    pub name: String,
    pub source_id: Uuid,
    pub destination_id: Uuid,
    pub status: ConnectionStatus,
    pub schedule_cron: Option<String>,
    pub catalog: serde_json::Value,
    /// Set when an upgrade of either endpoint flagged a breaking change.
    pub breaking_change: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter used to look up connections inside a single workspace.
///
/// Empty ID lists do not filter.
#[derive(Debug, Clone, Default)]
pub struct ConnectionQuery {
    pub workspace_id: Uuid,
    pub source_ids: Vec<Uuid>,
    pub destination_ids: Vec<Uuid>,
    pub include_deleted: bool,
}

/// Input for creating a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConnection {
    pub name: String,
    pub source_id: Uuid,
    pub destination_id: Uuid,
    pub status: ConnectionStatus,
    pub schedule_cron: Option<String>,
    pub catalog: serde_json::Value,
    pub operation_ids: Vec<Uuid>,
}

/// Partial update of a connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConnection {
    pub name: Option<String>,
    pub status: Option<ConnectionStatus>,
    pub schedule_cron: Option<String>,
    pub catalog: Option<serde_json::Value>,
    pub breaking_change: Option<bool>,
    /// Replaces the attached operations when set.
    pub operation_ids: Option<Vec<Uuid>>,
}

impl Connection {
    /// Find a connection by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        connection_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM connection
            WHERE connection_id = $1
            ",
        )
        .bind(connection_id)
        .fetch_optional(pool)
        .await
    }

    /// Get a connection, failing with `NotFound` when absent.
    pub async fn get(pool: &PgPool, connection_id: Uuid) -> DbResult<Self> {
        Self::find_by_id(pool, connection_id)
            .await?
            .ok_or_else(|| DbError::not_found(ConfigKind::Connection, connection_id))
    }

    /// List the connections whose source lives in a workspace.
    pub async fn list_by_workspace(
        pool: &PgPool,
        query: &ConnectionQuery,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT c.* FROM connection c
            JOIN actor a ON a.actor_id = c.source_id
            WHERE a.workspace_id = $1
              AND (cardinality($2::uuid[]) = 0 OR c.source_id = ANY($2))
              AND (cardinality($3::uuid[]) = 0 OR c.destination_id = ANY($3))
              AND ($4 OR c.status <> 'deprecated')
            ORDER BY c.name ASC
            ",
        )
        .bind(query.workspace_id)
        .bind(&query.source_ids)
        .bind(&query.destination_ids)
        .bind(query.include_deleted)
        .fetch_all(pool)
        .await
    }

    /// List the connections reading from a source.
    pub async fn list_by_source(
        pool: &PgPool,
        source_id: Uuid,
        include_deleted: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM connection
            WHERE source_id = $1 AND ($2 OR status <> 'deprecated')
            ORDER BY name ASC
            ",
        )
        .bind(source_id)
        .bind(include_deleted)
        .fetch_all(pool)
        .await
    }

    /// List the connections writing to a destination.
    pub async fn list_by_destination(
        pool: &PgPool,
        destination_id: Uuid,
        include_deleted: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM connection
            WHERE destination_id = $1 AND ($2 OR status <> 'deprecated')
            ORDER BY name ASC
            ",
        )
        .bind(destination_id)
        .bind(include_deleted)
        .fetch_all(pool)
        .await
    }

    /// Insert a connection together with its operation links.
    pub async fn create(pool: &PgPool, input: &CreateConnection) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let connection: Connection = sqlx::query_as(
            r"
            INSERT INTO connection (
                connection_id, name, source_id, destination_id, status, schedule_cron, catalog
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.source_id)
        .bind(input.destination_id)
        .bind(input.status.to_string())
        .bind(input.schedule_cron.as_deref())
        .bind(&input.catalog)
        .fetch_one(&mut *tx)
        .await?;

        for operation_id in &input.operation_ids {
            sqlx::query(
                r"
                INSERT INTO connection_operation (connection_id, operation_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(connection.connection_id)
            .bind(operation_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(connection)
    }

    /// Apply a partial update, operation links included, in one transaction.
    ///
    /// Returns `None` when the connection is missing.
    pub async fn update(
        pool: &PgPool,
        connection_id: Uuid,
        input: &UpdateConnection,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<Self> = sqlx::query_as(
            r"
            UPDATE connection SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                schedule_cron = COALESCE($4, schedule_cron),
                catalog = COALESCE($5, catalog),
                breaking_change = COALESCE($6, breaking_change),
                updated_at = NOW()
            WHERE connection_id = $1
            RETURNING *
            ",
        )
        .bind(connection_id)
        .bind(input.name.as_deref())
        .bind(input.status.map(|s| s.to_string()))
        .bind(input.schedule_cron.as_deref())
        .bind(input.catalog.as_ref())
        .bind(input.breaking_change)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(connection) = updated else {
            return Ok(None);
        };
        if let Some(operation_ids) = &input.operation_ids {
            Self::replace_operation_ids(&mut tx, connection_id, operation_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(connection))
    }

    /// Mark a connection deprecated. Deprecation is terminal.
    pub async fn deprecate(pool: &PgPool, connection_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE connection SET status = 'deprecated', updated_at = NOW()
            WHERE connection_id = $1 AND status <> 'deprecated'
            ",
        )
        .bind(connection_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Operation IDs attached to a connection, in attachment order.
    pub async fn operation_ids(
        pool: &PgPool,
        connection_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT operation_id FROM connection_operation
            WHERE connection_id = $1
            ORDER BY created_at ASC, operation_id ASC
            ",
        )
        .bind(connection_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the set of operations attached to a connection.
    pub async fn update_operation_ids(
        pool: &PgPool,
        connection_id: Uuid,
        operation_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::replace_operation_ids(&mut tx, connection_id, operation_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_operation_ids(
        conn: &mut PgConnection,
        connection_id: Uuid,
        operation_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            DELETE FROM connection_operation
            WHERE connection_id = $1 AND NOT (operation_id = ANY($2))
            ",
        )
        .bind(connection_id)
        .bind(operation_ids)
        .execute(&mut *conn)
        .await?;

        for operation_id in operation_ids {
            sqlx::query(
                r"
                INSERT INTO connection_operation (connection_id, operation_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(connection_id)
            .bind(operation_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Deprecate every live connection with `actor_id` as source or destination.
    pub(crate) async fn deprecate_for_actor(
        conn: &mut PgConnection,
        actor_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE connection SET status = 'deprecated', updated_at = NOW()
            WHERE (source_id = $1 OR destination_id = $1) AND status <> 'deprecated'
            ",
        )
        .bind(actor_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Workspace owning a connection, resolved through its source.
    pub async fn workspace_id_for(pool: &PgPool, connection_id: Uuid) -> DbResult<Uuid> {
        let workspace_id: Option<Uuid> = sqlx::query_scalar(
            r"
            SELECT a.workspace_id FROM connection c
            JOIN actor a ON a.actor_id = c.source_id
            WHERE c.connection_id = $1
            ",
        )
        .bind(connection_id)
        .fetch_optional(pool)
        .await?;

        workspace_id.ok_or_else(|| DbError::not_found(ConfigKind::Connection, connection_id))
    }
}

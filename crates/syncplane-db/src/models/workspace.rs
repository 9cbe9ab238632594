//! Workspace model.
//!
//! A workspace groups the sources, destinations and sync operations of one
//! team. Deleting a workspace only sets its tombstone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::connection::ConnectionQuery;
use super::ResourcesQuery;
use crate::error::{ConfigKind, DbError, DbResult};

/// A workspace row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Workspace {
    pub workspace_id: Uuid,
    pub name: String,
    /// URL-safe unique key.
    pub slug: String,
    pub email: Option<String>,
    pub initial_setup_complete: bool,
    /// Whether the user already answered the feedback prompt.
    pub feedback_done: bool,
    pub tombstone: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspace {
    pub name: String,
    pub slug: String,
    pub email: Option<String>,
}

/// Partial update of a workspace. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkspace {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
    pub initial_setup_complete: Option<bool>,
}

impl Workspace {
    /// Find a workspace by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        workspace_id: Uuid,
        include_tombstone: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM workspace
            WHERE workspace_id = $1 AND ($2 OR tombstone = FALSE)
            ",
        )
        .bind(workspace_id)
        .bind(include_tombstone)
        .fetch_optional(pool)
        .await
    }

    /// Get a workspace by ID, failing with `NotFound` when absent.
    pub async fn get(pool: &PgPool, workspace_id: Uuid, include_tombstone: bool) -> DbResult<Self> {
        Self::find_by_id(pool, workspace_id, include_tombstone)
            .await?
            .ok_or_else(|| DbError::not_found(ConfigKind::Workspace, workspace_id))
    }

    /// Find a workspace by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
        include_tombstone: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM workspace
            WHERE slug = $1 AND ($2 OR tombstone = FALSE)
            ",
        )
        .bind(slug)
        .bind(include_tombstone)
        .fetch_optional(pool)
        .await
    }

    /// Get a workspace by slug. The `NotFound` key is the slug itself.
    pub async fn get_by_slug(pool: &PgPool, slug: &str, include_tombstone: bool) -> DbResult<Self> {
        Self::find_by_slug(pool, slug, include_tombstone)
            .await?
            .ok_or_else(|| DbError::not_found(ConfigKind::Workspace, slug))
    }

    /// List workspaces one page at a time.
    ///
    /// An empty `workspace_ids` list means "every workspace".
    pub async fn list_paginated(
        pool: &PgPool,
        query: &ResourcesQuery,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM workspace
            WHERE (cardinality($1::uuid[]) = 0 OR workspace_id = ANY($1))
              AND ($2 OR tombstone = FALSE)
              AND ($3::text IS NULL OR strpos(lower(name), lower($3)) > 0)
            ORDER BY name ASC
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(&query.workspace_ids)
        .bind(query.include_deleted)
        .bind(query.name_contains.as_deref())
        .bind(query.page_size)
        .bind(query.row_offset)
        .fetch_all(pool)
        .await
    }

    /// Insert a new workspace.
    pub async fn create(pool: &PgPool, input: &CreateWorkspace) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO workspace (workspace_id, name, slug, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.email.as_deref())
        .fetch_one(pool)
        .await
    }

    /// Apply a partial update. Returns `None` when the workspace is missing.
    pub async fn update(
        pool: &PgPool,
        workspace_id: Uuid,
        input: &UpdateWorkspace,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE workspace SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                email = COALESCE($4, email),
                initial_setup_complete = COALESCE($5, initial_setup_complete),
                updated_at = NOW()
            WHERE workspace_id = $1 AND tombstone = FALSE
            RETURNING *
            ",
        )
        .bind(workspace_id)
        .bind(input.name.as_deref())
        .bind(input.slug.as_deref())
        .bind(input.email.as_deref())
        .bind(input.initial_setup_complete)
        .fetch_optional(pool)
        .await
    }

    /// Record that the feedback prompt was answered.
    pub async fn set_feedback(pool: &PgPool, workspace_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE workspace SET feedback_done = TRUE, updated_at = NOW()
            WHERE workspace_id = $1 AND tombstone = FALSE
            ",
        )
        .bind(workspace_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a workspace and every actor in it, deprecating the
    /// connections using those actors.
    ///
    /// Returns `false` without writing anything when the workspace was not live.
    pub async fn tombstone(pool: &PgPool, workspace_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE workspace SET tombstone = TRUE, updated_at = NOW()
            WHERE workspace_id = $1 AND tombstone = FALSE
            ",
        )
        .bind(workspace_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r"
            UPDATE connection SET status = 'deprecated', updated_at = NOW()
            WHERE status <> 'deprecated'
              AND (
                source_id IN (SELECT actor_id FROM actor WHERE workspace_id = $1)
                OR destination_id IN (SELECT actor_id FROM actor WHERE workspace_id = $1)
              )
            ",
        )
        .bind(workspace_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            UPDATE actor SET tombstone = TRUE, updated_at = NOW()
            WHERE workspace_id = $1 AND tombstone = FALSE
            ",
        )
        .bind(workspace_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Count the live sources in a workspace.
    pub async fn count_sources(pool: &PgPool, workspace_id: Uuid) -> Result<i64, sqlx::Error> {
        Self::count_actors(pool, workspace_id, "source").await
    }

    /// Count the live destinations in a workspace.
    pub async fn count_destinations(pool: &PgPool, workspace_id: Uuid) -> Result<i64, sqlx::Error> {
        Self::count_actors(pool, workspace_id, "destination").await
    }

    async fn count_actors(
        pool: &PgPool,
        workspace_id: Uuid,
        actor_type: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM actor
            WHERE workspace_id = $1 AND actor_type = $2 AND tombstone = FALSE
            ",
        )
        .bind(workspace_id)
        .bind(actor_type)
        .fetch_one(pool)
        .await
    }

    /// Count the non-deprecated connections whose source lives in a workspace.
    pub async fn count_connections(pool: &PgPool, workspace_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM connection c
            JOIN actor a ON a.actor_id = c.source_id
            WHERE a.workspace_id = $1 AND c.status <> 'deprecated'
            ",
        )
        .bind(workspace_id)
        .fetch_one(pool)
        .await
    }

    /// Count the active connections whose source lives in a workspace.
    pub async fn count_active_syncs(pool: &PgPool, workspace_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM connection c
            JOIN actor a ON a.actor_id = c.source_id
            WHERE a.workspace_id = $1 AND c.status = 'active'
            ",
        )
        .bind(workspace_id)
        .fetch_one(pool)
        .await
    }

    /// Whether a workspace may use a definition: it is public, or granted to it.
    pub async fn can_use_definition(
        pool: &PgPool,
        definition_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM actor_definition d
                WHERE d.definition_id = $1
                  AND d.tombstone = FALSE
                  AND (
                    d.public = TRUE
                    OR EXISTS (
                        SELECT 1 FROM actor_definition_workspace_grant g
                        WHERE g.definition_id = d.definition_id AND g.workspace_id = $2
                    )
                  )
            )
            ",
        )
        .bind(definition_id)
        .bind(workspace_id)
        .fetch_one(pool)
        .await
    }

    /// IDs of the active connections matching a query.
    pub async fn list_active_sync_ids(
        pool: &PgPool,
        query: &ConnectionQuery,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT c.connection_id FROM connection c
            JOIN actor a ON a.actor_id = c.source_id
            WHERE a.workspace_id = $1
              AND c.status = 'active'
              AND (cardinality($2::uuid[]) = 0 OR c.source_id = ANY($2))
              AND (cardinality($3::uuid[]) = 0 OR c.destination_id = ANY($3))
            ORDER BY c.name ASC
            ",
        )
        .bind(query.workspace_id)
        .bind(&query.source_ids)
        .bind(&query.destination_ids)
        .fetch_all(pool)
        .await
    }
}

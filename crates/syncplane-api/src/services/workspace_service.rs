//! Workspace service.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use syncplane_db::{ConfigKind, CreateWorkspace, ResourcesQuery, UpdateWorkspace, Workspace};

use crate::error::{ApiError, Result};
use crate::models::{
    ListWorkspacesRequestBody, SlugRequestBody, WorkspaceCreate, WorkspaceIdRequestBody,
    WorkspaceRead, WorkspaceReadList, WorkspaceStats, WorkspaceUpdate,
};

/// Operations behind the `/workspaces` endpoints.
#[async_trait]
pub trait WorkspaceHandler: Send + Sync {
    async fn create_workspace(&self, request: WorkspaceCreate) -> Result<WorkspaceRead>;
    async fn get_workspace(&self, request: WorkspaceIdRequestBody) -> Result<WorkspaceRead>;
    async fn get_workspace_by_slug(&self, request: SlugRequestBody) -> Result<WorkspaceRead>;
    async fn list_workspaces(&self, request: ListWorkspacesRequestBody)
        -> Result<WorkspaceReadList>;
    async fn update_workspace(&self, request: WorkspaceUpdate) -> Result<WorkspaceRead>;
    async fn set_feedback_done(&self, request: WorkspaceIdRequestBody) -> Result<()>;
    async fn delete_workspace(&self, request: WorkspaceIdRequestBody) -> Result<()>;
}

/// Postgres-backed workspace handler.
pub struct WorkspaceService {
    pool: PgPool,
}

impl WorkspaceService {
    /// Create a new workspace service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_stats(&self, workspace: Workspace) -> Result<WorkspaceRead> {
        let workspace_id = workspace.workspace_id;
        let stats = WorkspaceStats {
            source_count: Workspace::count_sources(&self.pool, workspace_id).await?,
            destination_count: Workspace::count_destinations(&self.pool, workspace_id).await?,
            connection_count: Workspace::count_connections(&self.pool, workspace_id).await?,
            active_connection_count: Workspace::count_active_syncs(&self.pool, workspace_id)
                .await?,
        };

        let mut read = WorkspaceRead::from(workspace);
        read.stats = Some(stats);
        Ok(read)
    }
}

#[async_trait]
impl WorkspaceHandler for WorkspaceService {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_workspace(&self, request: WorkspaceCreate) -> Result<WorkspaceRead> {
        let slug = match request.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => slugify(&request.name),
        };
        if slug.is_empty() {
            return Err(ApiError::Validation(
                "Workspace name must contain at least one letter or digit".to_string(),
            ));
        }

        if Workspace::find_by_slug(&self.pool, &slug, true)
            .await?
            .is_some()
        {
            warn!(slug = %slug, "Workspace slug already taken");
            return Err(ApiError::Conflict(format!(
                "A workspace with slug '{slug}' already exists"
            )));
        }

        let input = CreateWorkspace {
            name: request.name,
            slug,
            email: request.email,
        };
        let workspace = Workspace::create(&self.pool, &input).await?;

        info!(
            workspace_id = %workspace.workspace_id,
            slug = %workspace.slug,
            "Created workspace"
        );
        Ok(workspace.into())
    }

    async fn get_workspace(&self, request: WorkspaceIdRequestBody) -> Result<WorkspaceRead> {
        let workspace = Workspace::get(&self.pool, request.workspace_id, false).await?;
        self.with_stats(workspace).await
    }

    async fn get_workspace_by_slug(&self, request: SlugRequestBody) -> Result<WorkspaceRead> {
        let workspace = Workspace::get_by_slug(&self.pool, &request.slug, false).await?;
        self.with_stats(workspace).await
    }

    async fn list_workspaces(
        &self,
        request: ListWorkspacesRequestBody,
    ) -> Result<WorkspaceReadList> {
        let query = ResourcesQuery {
            workspace_ids: Vec::new(),
            include_deleted: request.include_deleted,
            page_size: request.pagination.as_ref().map(|p| p.page_size),
            row_offset: request.pagination.as_ref().map_or(0, |p| p.row_offset),
            name_contains: request
                .name_contains
                .filter(|name| !name.trim().is_empty()),
        };
        let workspaces = Workspace::list_paginated(&self.pool, &query).await?;

        Ok(WorkspaceReadList {
            workspaces: workspaces.into_iter().map(Into::into).collect(),
        })
    }

    #[instrument(skip(self, request), fields(workspace_id = %request.workspace_id))]
    async fn update_workspace(&self, request: WorkspaceUpdate) -> Result<WorkspaceRead> {
        let input = UpdateWorkspace {
            name: request.name,
            slug: None,
            email: request.email,
            initial_setup_complete: request.initial_setup_complete,
        };
        let workspace = Workspace::update(&self.pool, request.workspace_id, &input)
            .await?
            .ok_or_else(|| ApiError::not_found(ConfigKind::Workspace, request.workspace_id))?;

        info!("Updated workspace");
        Ok(workspace.into())
    }

    async fn set_feedback_done(&self, request: WorkspaceIdRequestBody) -> Result<()> {
        if !Workspace::set_feedback(&self.pool, request.workspace_id).await? {
            return Err(ApiError::not_found(ConfigKind::Workspace, request.workspace_id));
        }
        Ok(())
    }

    #[instrument(skip(self, request), fields(workspace_id = %request.workspace_id))]
    async fn delete_workspace(&self, request: WorkspaceIdRequestBody) -> Result<()> {
        let workspace = Workspace::get(&self.pool, request.workspace_id, false).await?;

        if !Workspace::tombstone(&self.pool, workspace.workspace_id).await? {
            return Err(ApiError::not_found(ConfigKind::Workspace, workspace.workspace_id));
        }

        info!("Deleted workspace");
        Ok(())
    }
}

/// Derive a URL-safe slug: lowercase ASCII letters and digits, with every
/// other run of characters collapsed to a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

//! Job service.
//!
//! Jobs are queued here and executed elsewhere. Creating a sync for a
//! connection that already has one pending or running returns the existing
//! job rather than queueing a second one.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use syncplane_db::{
    Actor, ActorDefinition, ActorType, ConfigKind, Connection, ConnectionStatus, Job,
    JobConfigType,
};

use crate::error::{ApiError, Result};
use crate::models::{JobCreate, JobDebugInfoRead, JobIdRequestBody, JobInfoRead};

/// Operations behind the `/jobs` endpoints.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn create_job(&self, request: JobCreate) -> Result<JobInfoRead>;
    async fn cancel_job(&self, request: JobIdRequestBody) -> Result<JobInfoRead>;
    async fn get_job_debug_info(&self, request: JobIdRequestBody) -> Result<JobDebugInfoRead>;
}

/// Postgres-backed job handler.
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    /// Create a new job service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn actor_names(&self, actor_type: ActorType, actor_id: Uuid) -> Result<(String, String)> {
        let actor = Actor::get(&self.pool, actor_type, actor_id).await?;
        let definition =
            ActorDefinition::get(&self.pool, actor_type, actor.actor_definition_id).await?;
        Ok((actor.name, definition.name))
    }
}

#[async_trait]
impl JobHandler for JobService {
    #[instrument(skip(self, request), fields(connection_id = %request.connection_id))]
    async fn create_job(&self, request: JobCreate) -> Result<JobInfoRead> {
        let connection = Connection::get(&self.pool, request.connection_id).await?;
        if connection.status != ConnectionStatus::Active {
            return Err(ApiError::Validation(format!(
                "connection {} is {} and cannot be synced",
                connection.connection_id, connection.status
            )));
        }

        let scope = connection.connection_id.to_string();
        if let Some(job) = Job::find_active_for_scope(&self.pool, &scope).await? {
            info!(job_id = job.id, "Sync already queued");
            return Ok(JobInfoRead { job: job.into() });
        }

        let job = Job::create(&self.pool, JobConfigType::Sync, &scope).await?;
        info!(job_id = job.id, "Queued sync job");
        Ok(JobInfoRead { job: job.into() })
    }

    #[instrument(skip(self, request), fields(job_id = request.id))]
    async fn cancel_job(&self, request: JobIdRequestBody) -> Result<JobInfoRead> {
        let job = Job::cancel(&self.pool, request.id)
            .await?
            .ok_or_else(|| ApiError::not_found(ConfigKind::Job, request.id))?;

        info!(status = %job.status, "Cancel requested");
        Ok(JobInfoRead { job: job.into() })
    }

    async fn get_job_debug_info(&self, request: JobIdRequestBody) -> Result<JobDebugInfoRead> {
        let job = Job::get(&self.pool, request.id).await?;

        let connection_id = Uuid::parse_str(&job.scope).map_err(|e| {
            warn!(job_id = job.id, scope = %job.scope, "Job scope is not a connection ID");
            ApiError::Internal(format!("job {} has invalid scope: {e}", job.id))
        })?;
        let connection = Connection::get(&self.pool, connection_id).await?;

        let (source_name, source_definition_name) = self
            .actor_names(ActorType::Source, connection.source_id)
            .await?;
        let (destination_name, destination_definition_name) = self
            .actor_names(ActorType::Destination, connection.destination_id)
            .await?;

        Ok(JobDebugInfoRead {
            job: job.into(),
            connection_name: connection.name,
            source_name,
            source_definition_name,
            destination_name,
            destination_definition_name,
        })
    }
}

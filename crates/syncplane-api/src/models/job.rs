//! Job request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use syncplane_db::{Job, JobConfigType, JobStatus};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request to queue a sync for a connection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct JobCreate {
    pub connection_id: Uuid,
}

/// Body naming a job by ID.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct JobIdRequestBody {
    pub id: i64,
}

/// Job summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobRead {
    pub id: i64,
    pub config_type: JobConfigType,
    /// ID of the connection the job runs for.
    pub config_id: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl From<Job> for JobRead {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            config_type: job.config_type,
            config_id: job.scope,
            status: job.status,
            created_at: job.created_at,
            updated_at: job.updated_at,
            started_at: job.started_at,
        }
    }
}

/// Job response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobInfoRead {
    pub job: JobRead,
}

/// Job plus the names of the records it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobDebugInfoRead {
    pub job: JobRead,
    pub connection_name: String,
    pub source_name: String,
    pub source_definition_name: String,
    pub destination_name: String,
    pub destination_definition_name: String,
}

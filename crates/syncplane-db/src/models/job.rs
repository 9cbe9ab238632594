//! Job records.
//!
//! Jobs are only queued and tracked here; the sync engine picks them up and
//! moves them through their states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::{ConfigKind, DbError, DbResult};

/// What a job does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobConfigType {
    Sync,
    ResetConnection,
    Refresh,
}

impl std::fmt::Display for JobConfigType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobConfigType::Sync => write!(f, "sync"),
            JobConfigType::ResetConnection => write!(f, "reset_connection"),
            JobConfigType::Refresh => write!(f, "refresh"),
        }
    }
}

impl std::str::FromStr for JobConfigType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sync" => Ok(JobConfigType::Sync),
            "reset_connection" => Ok(JobConfigType::ResetConnection),
            "refresh" => Ok(JobConfigType::Refresh),
            _ => Err(format!("Unknown job config type: {s}")),
        }
    }
}

/// Job lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    /// An attempt failed but the job will be retried.
    Incomplete,
    Failed,
    Succeeded,
    Cancelled,
}

impl JobStatus {
    /// Terminal states never change again.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Succeeded | JobStatus::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Incomplete => write!(f, "incomplete"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "incomplete" => Ok(JobStatus::Incomplete),
            "failed" => Ok(JobStatus::Failed),
            "succeeded" => Ok(JobStatus::Succeeded),
            "cancelled" => Ok(JobStatus::Cancelled),
            _ => Err(format!("Unknown job status: {s}")),
        }
    }
}

/// A job row. `scope` is the ID of the connection the job runs for.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub config_type: JobConfigType,
    pub scope: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Queue a pending job.
    pub async fn create(
        pool: &PgPool,
        config_type: JobConfigType,
        scope: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO jobs (config_type, scope)
            VALUES ($1, $2)
            RETURNING *
            ",
        )
        .bind(config_type.to_string())
        .bind(scope)
        .fetch_one(pool)
        .await
    }

    /// Find a job by ID.
    pub async fn find_by_id(pool: &PgPool, job_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM jobs WHERE id = $1
            ",
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await
    }

    /// Get a job, failing with `NotFound` when absent.
    pub async fn get(pool: &PgPool, job_id: i64) -> DbResult<Self> {
        Self::find_by_id(pool, job_id)
            .await?
            .ok_or_else(|| DbError::not_found(ConfigKind::Job, job_id))
    }

    /// The newest job for a scope that has not reached a terminal state.
    pub async fn find_active_for_scope(
        pool: &PgPool,
        scope: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM jobs
            WHERE scope = $1 AND status IN ('pending', 'running', 'incomplete')
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(scope)
        .fetch_optional(pool)
        .await
    }

    /// Cancel a job unless it already finished.
    ///
    /// Returns `None` when the job does not exist. A terminal job is returned
    /// unchanged.
    pub async fn cancel(pool: &PgPool, job_id: i64) -> Result<Option<Self>, sqlx::Error> {
        let cancelled: Option<Self> = sqlx::query_as(
            r"
            UPDATE jobs SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'running', 'incomplete')
            RETURNING *
            ",
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

        match cancelled {
            Some(job) => Ok(Some(job)),
            None => Self::find_by_id(pool, job_id).await,
        }
    }
}

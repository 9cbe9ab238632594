//! Health check endpoint.

use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tokio::time::timeout;
use tracing::warn;
use utoipa::ToSchema;

const DATABASE_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// State for the health endpoint.
#[derive(Clone)]
pub struct HealthState {
    pub pool: PgPool,
    pub start_time: Instant,
    pub version: String,
}

impl HealthState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DependencyStatus,
    pub timestamp: DateTime<Utc>,
}

/// Overall service status.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Status of a single dependency.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Up,
    Down,
}

/// Report service health, including database reachability.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse),
    )
)]
pub async fn health_handler(
    State(state): State<HealthState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = match timeout(
        DATABASE_CHECK_TIMEOUT,
        sqlx::query("SELECT 1").execute(&state.pool),
    )
    .await
    {
        Ok(Ok(_)) => DependencyStatus::Up,
        Ok(Err(e)) => {
            warn!(error = %e, "Database health check failed");
            DependencyStatus::Down
        }
        Err(_) => {
            warn!("Database health check timed out");
            DependencyStatus::Down
        }
    };

    let (status, code) = match database {
        DependencyStatus::Up => (HealthStatus::Healthy, StatusCode::OK),
        DependencyStatus::Down => (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
        timestamp: Utc::now(),
    };
    (code, Json(response))
}

//! HTTP handlers for jobs.

use axum::{extract::State, Json};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::{JobCreate, JobDebugInfoRead, JobIdRequestBody, JobInfoRead};
use crate::router::ApiState;

/// Queue a sync for a connection.
#[utoipa::path(
    post,
    path = "/jobs/create",
    tag = "Jobs",
    request_body = JobCreate,
    responses(
        (status = 200, description = "Queued or already running job", body = JobInfoRead),
        (status = 400, description = "Connection is not active"),
        (status = 404, description = "Connection not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_job(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<JobCreate>,
) -> Result<Json<JobInfoRead>> {
    let job = state.jobs.create_job(request).await?;
    Ok(Json(job))
}

/// Cancel a job.
#[utoipa::path(
    post,
    path = "/jobs/cancel",
    tag = "Jobs",
    request_body = JobIdRequestBody,
    responses(
        (status = 200, description = "Job after cancellation", body = JobInfoRead),
        (status = 404, description = "Job not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn cancel_job(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<JobIdRequestBody>,
) -> Result<Json<JobInfoRead>> {
    let job = state.jobs.cancel_job(request).await?;
    Ok(Json(job))
}

/// Get a job with the names of the records it touches.
#[utoipa::path(
    post,
    path = "/jobs/get_debug_info",
    tag = "Jobs",
    request_body = JobIdRequestBody,
    responses(
        (status = 200, description = "Job debug info", body = JobDebugInfoRead),
        (status = 404, description = "Job not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_job_debug_info(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<JobIdRequestBody>,
) -> Result<Json<JobDebugInfoRead>> {
    let info = state.jobs.get_job_debug_info(request).await?;
    Ok(Json(info))
}

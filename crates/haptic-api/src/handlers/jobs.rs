//! Job lifecycle handlers.
//!
//! Provides REST API endpoints for:
//! - Minting presigned upload URLs for source videos
//! - Creating and listing haptic conversion jobs
//! - Fetching presigned download URLs for finished artifacts
//! - The worker status callback

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use haptic_models::{Job, JobStatus};

use crate::auth::{AuthUser, ServiceCaller};
use crate::error::ApiResult;
use crate::state::AppState;

// ============================================================================
// Types
// ============================================================================

/// Request body for an upload URL.
#[derive(Debug, Deserialize)]
pub struct UploadUrlRequest {
    /// Object name the client intends to upload.
    pub filename: String,
    /// MIME type the upload will be served with.
    pub content_type: String,
}

/// Upload URL response.
#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    /// Presigned PUT URL, valid for a bounded window.
    pub url: String,
}

/// Request body for job creation.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    /// Name of the previously uploaded source video.
    pub video_filename: String,
}

/// Worker callback body.
#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    /// Status to move the job to.
    pub status: JobStatus,
    /// Artifact location, required with COMPLETED and only then.
    #[serde(default)]
    pub output_location: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /jobs/upload-url
///
/// Mint a presigned PUT URL for a source video upload. Issuing a URL
/// records nothing; jobs exist only once POST /jobs is called.
///
/// Returns:
/// - 200: Presigned URL
/// - 400: Blank filename or content type
/// - 401: Not authenticated
/// - 502: Signing failed
pub async fn upload_url(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UploadUrlRequest>,
) -> ApiResult<Json<UploadUrlResponse>> {
    info!(
        "upload_url user={} filename={}",
        user.user_id, request.filename
    );

    let url = state
        .urls
        .issue_upload_url(&request.filename, &request.content_type)
        .await?;

    Ok(Json(UploadUrlResponse { url }))
}

/// POST /jobs
///
/// Create a conversion job for an uploaded video and notify the worker
/// fleet.
///
/// Returns:
/// - 201: The created job, status PENDING
/// - 400: Blank video filename
/// - 401: Not authenticated
/// - 502: Event publish failed; the job row is already committed
pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    info!(
        "create_job user={} video={}",
        user.user_id, request.video_filename
    );

    let job = state
        .jobs
        .create_job(user.user_id, &request.video_filename)
        .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /jobs
///
/// List the caller's jobs, newest first. Other owners' jobs are never
/// included.
///
/// Returns:
/// - 200: Jobs owned by the caller
/// - 401: Not authenticated
pub async fn list_jobs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Job>>> {
    let jobs = state.jobs.list_jobs(user.user_id).await?;
    Ok(Json(jobs))
}

/// GET /jobs/:job_id/download-urls
///
/// Presigned GET URLs for a completed job's artifacts, keyed by artifact
/// extension. Responses force attachment disposition.
///
/// Returns:
/// - 200: URL per artifact
/// - 400: Job not COMPLETED, or its output location is unusable
/// - 401: Not authenticated
/// - 403: Job belongs to another user
/// - 404: Job not found
/// - 502: Signing failed
pub async fn download_urls(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<HashMap<String, String>>> {
    info!("download_urls user={} job_id={}", user.user_id, job_id);

    let urls = state.jobs.download_urls(job_id, user.user_id).await?;
    Ok(Json(urls))
}

/// PATCH /jobs/:job_id
///
/// Worker callback: advance a job along its lifecycle. Authenticated by
/// service credential only; bearer tokens are refused.
///
/// Returns:
/// - 200: The updated job
/// - 400: Illegal transition, or output location rules violated
/// - 401: Missing or wrong service credential
/// - 404: Job not found
pub async fn update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    _caller: ServiceCaller,
    Json(request): Json<UpdateJobRequest>,
) -> ApiResult<Json<Job>> {
    info!(
        "update_job job_id={} status={}",
        job_id, request.status
    );

    let job = state
        .jobs
        .update_status(job_id, request.status, request.output_location)
        .await?;

    Ok(Json(job))
}

//! Job orchestration: creation with worker notification, owner-scoped
//! listing, and the status state machine.

use std::collections::HashMap;
use std::sync::Arc;

use haptic_models::{Job, JobCreatedEvent, JobStatus};
use haptic_queue::EventDispatch;
use haptic_store::JobStore;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::UrlService;

/// Composes the store, the event dispatcher, and the URL issuer into the
/// public job operations.
#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobStore>,
    dispatcher: Arc<dyn EventDispatch>,
    urls: UrlService,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobStore>, dispatcher: Arc<dyn EventDispatch>, urls: UrlService) -> Self {
        Self {
            jobs,
            dispatcher,
            urls,
        }
    }

    /// Persist a new PENDING job and notify the worker fleet.
    ///
    /// Creation and publish are not atomic. When the publish fails the
    /// committed row stays, and the caller sees an upstream error; a
    /// request failure therefore does not imply no side effect.
    pub async fn create_job(&self, owner: Uuid, video_filename: &str) -> ApiResult<Job> {
        if video_filename.trim().is_empty() {
            return Err(ApiError::validation("video_filename must not be empty"));
        }

        let job = self.jobs.create_job(owner, video_filename).await?;

        let event = JobCreatedEvent {
            job_id: job.id,
            video_filename: job.video_filename.clone(),
        };

        match self.dispatcher.publish_job_created(&event).await {
            Ok(message_id) => {
                info!(
                    "Created job {} and published event as message {}",
                    job.id, message_id
                );
                Ok(job)
            }
            Err(e) => {
                error!("Job {} created but event publish failed: {}", job.id, e);
                Err(ApiError::from(e))
            }
        }
    }

    /// All jobs owned by `owner`, newest first.
    pub async fn list_jobs(&self, owner: Uuid) -> ApiResult<Vec<Job>> {
        Ok(self.jobs.list_jobs_for_owner(owner).await?)
    }

    /// Worker callback: move a job along the lifecycle.
    ///
    /// The machine is enforced strictly; an illegal transition leaves the
    /// record unchanged. An output location is required with COMPLETED and
    /// rejected with anything else.
    pub async fn update_status(
        &self,
        job_id: Uuid,
        new_status: JobStatus,
        output_location: Option<String>,
    ) -> ApiResult<Job> {
        if new_status == JobStatus::Completed && output_location.is_none() {
            return Err(ApiError::validation("COMPLETED requires an output_location"));
        }
        if new_status != JobStatus::Completed && output_location.is_some() {
            return Err(ApiError::validation(
                "output_location is only accepted with COMPLETED",
            ));
        }

        let job = self
            .jobs
            .find_job(job_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Job {job_id} not found")))?;

        if !job.status.can_transition_to(new_status) {
            return Err(ApiError::invalid_state(format!(
                "Cannot move job from {} to {}",
                job.status, new_status
            )));
        }

        let updated = self
            .jobs
            .transition_job(job_id, job.status, new_status, output_location.as_deref())
            .await?;

        match updated {
            Some(job) => {
                info!("Job {} moved to {}", job.id, job.status);
                Ok(job)
            }
            // A concurrent callback won the guarded update.
            None => Err(ApiError::invalid_state("Job status changed concurrently")),
        }
    }

    /// Download URLs for a job's artifacts, after loading the record.
    ///
    /// Ownership and completion checks are the issuer's; their outcomes
    /// propagate unchanged.
    pub async fn download_urls(
        &self,
        job_id: Uuid,
        requester: Uuid,
    ) -> ApiResult<HashMap<String, String>> {
        let job = self
            .jobs
            .find_job(job_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Job {job_id} not found")))?;

        self.urls.issue_download_urls(&job, requester).await
    }
}

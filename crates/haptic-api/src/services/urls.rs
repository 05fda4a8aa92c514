//! Presigned URL issuance.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use haptic_models::{artifact_label, Job, JobStatus, OutputLocation, OUTPUT_ARTIFACTS};
use haptic_storage::UrlSigner;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Mints time-bounded upload and download URLs.
///
/// Owns the storage signer handle; every URL it issues expires after the
/// configured window.
#[derive(Clone)]
pub struct UrlService {
    signer: Arc<dyn UrlSigner>,
    url_ttl: Duration,
}

impl UrlService {
    pub fn new(signer: Arc<dyn UrlSigner>, url_ttl: Duration) -> Self {
        Self { signer, url_ttl }
    }

    /// Write-scoped URL for one client upload.
    ///
    /// Filenames are client-chosen and carry no ownership; nothing here
    /// is a security boundary beyond the bounded validity window.
    pub async fn issue_upload_url(&self, filename: &str, content_type: &str) -> ApiResult<String> {
        if filename.trim().is_empty() {
            return Err(ApiError::validation("filename must not be empty"));
        }
        if content_type.trim().is_empty() {
            return Err(ApiError::validation("content_type must not be empty"));
        }

        let key = self.signer.upload_key(filename);
        let url = self
            .signer
            .presign_upload(&key, content_type, self.url_ttl)
            .await?;
        Ok(url)
    }

    /// Read-scoped URLs for every output artifact of a completed job,
    /// keyed by artifact extension.
    ///
    /// The requester must own the job, and the job must be COMPLETED with
    /// a resolvable output location.
    pub async fn issue_download_urls(
        &self,
        job: &Job,
        requester: Uuid,
    ) -> ApiResult<HashMap<String, String>> {
        if job.owner_id != requester {
            return Err(ApiError::forbidden("Access denied"));
        }
        if job.status != JobStatus::Completed {
            return Err(ApiError::invalid_state("Job is not completed"));
        }
        let location = job
            .output_location
            .as_deref()
            .ok_or_else(|| ApiError::invalid_state("Job has no output location"))?;

        let location = OutputLocation::parse(location)
            .map_err(|e| ApiError::invalid_state(e.to_string()))?;

        let mut urls = HashMap::with_capacity(OUTPUT_ARTIFACTS.len());
        for artifact in OUTPUT_ARTIFACTS {
            let key = location.artifact_key(artifact);
            let url = self
                .signer
                .presign_download(&location.bucket, &key, artifact, self.url_ttl)
                .await?;
            urls.insert(artifact_label(artifact).to_string(), url);
        }

        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::Utc;
    use haptic_storage::StorageResult;

    struct StubSigner;

    #[async_trait]
    impl UrlSigner for StubSigner {
        fn upload_key(&self, filename: &str) -> String {
            format!("uploads/{filename}")
        }

        async fn presign_upload(
            &self,
            key: &str,
            content_type: &str,
            expires_in: Duration,
        ) -> StorageResult<String> {
            Ok(format!(
                "https://storage.test/{key}?type={content_type}&expires={}",
                expires_in.as_secs()
            ))
        }

        async fn presign_download(
            &self,
            bucket: &str,
            key: &str,
            attachment_name: &str,
            expires_in: Duration,
        ) -> StorageResult<String> {
            Ok(format!(
                "https://storage.test/{bucket}/{key}?attachment={attachment_name}&expires={}",
                expires_in.as_secs()
            ))
        }
    }

    fn service() -> UrlService {
        UrlService::new(Arc::new(StubSigner), Duration::from_secs(900))
    }

    fn job(owner: Uuid, status: JobStatus, output_location: Option<&str>) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            owner_id: owner,
            video_filename: "a.mov".into(),
            status,
            output_location: output_location.map(String::from),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_upload_url_rejects_blank_fields() {
        let service = service();
        for (filename, content_type) in [("", "video/mp4"), ("  ", "video/mp4"), ("a.mov", ""), ("a.mov", " ")] {
            let err = service.issue_upload_url(filename, content_type).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_upload_url_signs_configured_key_and_ttl() {
        let url = service().issue_upload_url("clip.mp4", "video/mp4").await.unwrap();
        assert!(url.contains("uploads/clip.mp4"));
        assert!(url.contains("expires=900"));
    }

    #[tokio::test]
    async fn test_download_urls_require_ownership() {
        let service = service();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        // Refused whatever the status, completed included.
        for job in [
            job(owner, JobStatus::Pending, None),
            job(owner, JobStatus::Completed, Some("gs://out/jobs/x/")),
        ] {
            let err = service.issue_download_urls(&job, stranger).await.unwrap_err();
            assert!(matches!(err, ApiError::Forbidden(_)));
        }
    }

    #[tokio::test]
    async fn test_download_urls_require_completed_status() {
        let service = service();
        let owner = Uuid::new_v4();

        for status in [JobStatus::Pending, JobStatus::Processing, JobStatus::Failed] {
            let job = job(owner, status, None);
            let err = service.issue_download_urls(&job, owner).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidState(_)));
        }
    }

    #[tokio::test]
    async fn test_download_urls_require_output_location() {
        let service = service();
        let owner = Uuid::new_v4();

        let job = job(owner, JobStatus::Completed, None);
        let err = service.issue_download_urls(&job, owner).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));

        let job = self::job(owner, JobStatus::Completed, Some("not-a-location"));
        let err = service.issue_download_urls(&job, owner).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_download_urls_keyed_by_artifact_extension() {
        let service = service();
        let owner = Uuid::new_v4();
        let job = job(owner, JobStatus::Completed, Some("gs://haptic-out/jobs/abc/"));

        let urls = service.issue_download_urls(&job, owner).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls["json"].contains("haptic-out/jobs/abc/haptic.json"));
        assert!(urls["json"].contains("attachment=haptic.json"));
        assert!(urls["ahap"].contains("haptic-out/jobs/abc/haptic.ahap"));
        assert!(urls["ahap"].contains("expires=900"));
    }
}

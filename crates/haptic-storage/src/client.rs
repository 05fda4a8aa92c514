//! Object store client implementation.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Configuration for the object store client.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3 API endpoint URL
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket that receives client uploads
    pub upload_bucket: String,
    /// Key prefix for client uploads
    pub upload_prefix: String,
    /// Region ("auto" for R2-style providers)
    pub region: String,
}

impl StorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            endpoint_url: std::env::var("STORAGE_ENDPOINT_URL")
                .map_err(|_| StorageError::config_error("STORAGE_ENDPOINT_URL not set"))?,
            access_key_id: std::env::var("STORAGE_ACCESS_KEY_ID")
                .map_err(|_| StorageError::config_error("STORAGE_ACCESS_KEY_ID not set"))?,
            secret_access_key: std::env::var("STORAGE_SECRET_ACCESS_KEY")
                .map_err(|_| StorageError::config_error("STORAGE_SECRET_ACCESS_KEY not set"))?,
            upload_bucket: std::env::var("STORAGE_UPLOAD_BUCKET")
                .map_err(|_| StorageError::config_error("STORAGE_UPLOAD_BUCKET not set"))?,
            upload_prefix: std::env::var("STORAGE_UPLOAD_PREFIX")
                .unwrap_or_else(|_| "uploads/".to_string()),
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".to_string()),
        })
    }
}

/// Mints time-bounded presigned URLs.
///
/// Presigning is a local signature computation; implementations must not
/// require the object to exist yet.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Object key for a client upload, under the signer's configured
    /// prefix.
    fn upload_key(&self, filename: &str) -> String;

    /// Write-scoped URL for one upload into the configured upload bucket.
    /// The signature pins `content_type`, so the uploader must send it.
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Read-scoped URL for one object, served with a content-disposition
    /// header that forces download under `attachment_name`.
    async fn presign_download(
        &self,
        bucket: &str,
        key: &str,
        attachment_name: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;
}

/// S3-compatible storage client.
#[derive(Clone)]
pub struct ObjectStore {
    client: Client,
    config: StorageConfig,
}

impl ObjectStore {
    /// Create a new client from configuration.
    pub fn new(config: StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "haptic-storage",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            config,
        }
    }

    /// Bucket that receives client uploads.
    pub fn upload_bucket(&self) -> &str {
        &self.config.upload_bucket
    }
}

#[async_trait]
impl UrlSigner for ObjectStore {
    fn upload_key(&self, filename: &str) -> String {
        let prefix = &self.config.upload_prefix;
        if prefix.is_empty() || prefix.ends_with('/') {
            format!("{prefix}{filename}")
        } else {
            format!("{prefix}/{filename}")
        }
    }

    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        debug!("Presigning upload for {}", key);

        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.config.upload_bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presign_config)
            .await
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn presign_download(
        &self,
        bucket: &str,
        key: &str,
        attachment_name: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        debug!("Presigning download for {}/{}", bucket, key);

        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .response_content_disposition(format!("attachment; filename=\"{attachment_name}\""))
            .presigned(presign_config)
            .await
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }
}

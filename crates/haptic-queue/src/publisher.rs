//! Event publishing over Redis Streams.

use async_trait::async_trait;
use haptic_models::JobCreatedEvent;
use tracing::debug;

use crate::error::{QueueError, QueueResult};

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Redis URL
    pub redis_url: String,
    /// Stream the worker fleet consumes
    pub topic: String,
}

impl QueueConfig {
    /// Create config from environment variables.
    ///
    /// The topic has no default: publishing into an unconfigured stream
    /// would strand every job, so a missing value aborts startup.
    pub fn from_env() -> QueueResult<Self> {
        Ok(Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            topic: std::env::var("EVENT_TOPIC")
                .map_err(|_| QueueError::config_error("EVENT_TOPIC not set"))?,
        })
    }
}

/// Publish-side seam, substitutable with a capturing fake in tests.
#[async_trait]
pub trait EventDispatch: Send + Sync {
    /// Publish one job-created event to the configured topic, returning
    /// the broker-assigned message id.
    async fn publish_job_created(&self, event: &JobCreatedEvent) -> QueueResult<String>;
}

/// Redis Streams publisher.
pub struct EventPublisher {
    client: redis::Client,
    config: QueueConfig,
}

impl EventPublisher {
    /// Create a new publisher.
    pub fn new(config: QueueConfig) -> QueueResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> QueueResult<Self> {
        Self::new(QueueConfig::from_env()?)
    }

    /// Topic the publisher writes to.
    pub fn topic(&self) -> &str {
        &self.config.topic
    }
}

#[async_trait]
impl EventDispatch for EventPublisher {
    async fn publish_job_created(&self, event: &JobCreatedEvent) -> QueueResult<String> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let payload = serde_json::to_string(event)?;

        let message_id: String = redis::cmd("XADD")
            .arg(&self.config.topic)
            .arg("*")
            .arg("event")
            .arg(&payload)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                QueueError::publish_failed(format!("XADD to {} failed: {e}", self.config.topic))
            })?;

        debug!(
            "Published job-created event for {} as message {}",
            event.job_id, message_id
        );
        Ok(message_id)
    }
}

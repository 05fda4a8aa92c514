//! Job records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::JobStatus;

/// A processing job owned by a single user.
///
/// The owner id never leaves the backend: ownership checks happen
/// server-side and the field is skipped on serialization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Job {
    /// Unique job ID
    pub id: Uuid,
    /// User who owns this job
    #[serde(skip_serializing)]
    pub owner_id: Uuid,
    /// Client-supplied name of the uploaded video
    pub video_filename: String,
    /// Current lifecycle state
    pub status: JobStatus,
    /// Storage URI of the worker's output, set on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_location: Option<String>,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated
    pub updated_at: DateTime<Utc>,
}

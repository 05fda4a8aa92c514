//! Event payloads published to the worker fleet.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload published when a job is created.
///
/// Field names are camelCase on the wire; the worker fleet consumes the
/// serialized form as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreatedEvent {
    /// Job the worker should pick up
    pub job_id: Uuid,
    /// Name of the uploaded source video
    pub video_filename: String,
}

//! Shared data models for the Haptic Studio backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs and the status state machine
//! - User accounts and verified identities
//! - Worker event payloads
//! - Output artifact locations

pub mod event;
pub mod job;
pub mod job_status;
pub mod output;
pub mod user;

// Re-export common types
pub use event::JobCreatedEvent;
pub use job::Job;
pub use job_status::JobStatus;
pub use output::{artifact_label, OutputLocation, OutputLocationError, OUTPUT_ARTIFACTS};
pub use user::{Identity, User};

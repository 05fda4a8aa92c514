//! S3-compatible object storage for the Haptic Studio backend.
//!
//! The orchestrator never moves video bytes itself. This crate mints the
//! presigned URLs that let clients upload directly to storage and download
//! worker artifacts, each URL valid for a bounded window.

pub mod client;
pub mod error;

pub use client::{ObjectStore, StorageConfig, UrlSigner};
pub use error::{StorageError, StorageResult};

//! Worker notification events over Redis Streams.
//!
//! Job creation publishes a single self-describing message to a configured
//! topic; the external worker fleet consumes it. One synchronous attempt,
//! no internal retry: a failed publish surfaces to the caller.

pub mod error;
pub mod publisher;

pub use error::{QueueError, QueueResult};
pub use publisher::{EventDispatch, EventPublisher, QueueConfig};

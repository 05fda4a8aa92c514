//! Persistence layer for the Haptic Studio backend.
//!
//! Exposes the `UserStore`/`JobStore` trait seams plus the Postgres-backed
//! implementation. Services depend on the traits, so tests can substitute
//! in-memory fakes without a database.

pub mod error;
pub mod jobs;
pub mod store;
pub mod users;

pub use error::{StoreError, StoreResult};
pub use jobs::JobStore;
pub use store::{connect, PgStore, MIGRATOR};
pub use users::UserStore;

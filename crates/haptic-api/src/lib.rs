//! Axum HTTP API server.
//!
//! This crate provides:
//! - Sign-up/login and bearer-token verification
//! - Presigned upload/download URL issuance
//! - Job creation, owner-scoped listing, and the worker status callback
//! - Event publication to the worker fleet on job creation

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{IdentityService, JobService, UrlService};
pub use state::AppState;

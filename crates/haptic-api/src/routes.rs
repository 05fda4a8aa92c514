//! API routes.

use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::auth::{login, signup};
use crate::handlers::health::health;
use crate::handlers::jobs::{create_job, download_urls, list_jobs, update_job, upload_url};
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login));

    let job_routes = Router::new()
        // Creation and owner-scoped listing
        .route("/jobs", post(create_job))
        .route("/jobs", get(list_jobs))
        // Presigned upload URL (no job is recorded here)
        .route("/jobs/upload-url", post(upload_url))
        // Artifact download URLs
        .route("/jobs/:job_id/download-urls", get(download_urls))
        // Worker status callback (service credential)
        .route("/jobs/:job_id", patch(update_job));

    let health_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(auth_routes)
        .merge(job_routes)
        .merge(health_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

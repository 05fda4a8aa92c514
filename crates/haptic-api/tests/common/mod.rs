#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use haptic_api::{create_router, ApiConfig, AppState};
use haptic_models::{Job, JobCreatedEvent, JobStatus, User};
use haptic_queue::{EventDispatch, QueueError, QueueResult};
use haptic_storage::{StorageResult, UrlSigner};
use haptic_store::{JobStore, StoreError, StoreResult, UserStore};

/// Service credential the test router is configured with.
pub const TEST_API_KEY: &str = "worker-shared-secret";

// ---------------------------------------------------------------------------
// In-memory collaborators
// ---------------------------------------------------------------------------

/// In-memory store backing both repositories.
#[derive(Default)]
pub struct InMemoryStore {
    pub users: Mutex<Vec<User>>,
    pub jobs: Mutex<Vec<Job>>,
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate("email"));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn create_job(&self, owner_id: Uuid, video_filename: &str) -> StoreResult<Job> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            owner_id,
            video_filename: video_filename.to_string(),
            status: JobStatus::Pending,
            output_location: None,
            created_at: now,
            updated_at: now,
        };
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }

    async fn list_jobs_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.owner_id == owner_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn transition_job(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
        output_location: Option<&str>,
    ) -> StoreResult<Option<Job>> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.iter_mut().find(|j| j.id == id && j.status == from) else {
            return Ok(None);
        };
        job.status = to;
        if let Some(loc) = output_location {
            job.output_location = Some(loc.to_string());
        }
        job.updated_at = Utc::now();
        Ok(Some(job.clone()))
    }
}

/// Capturing dispatcher with a failure toggle.
#[derive(Default)]
pub struct RecordingDispatch {
    pub events: Mutex<Vec<JobCreatedEvent>>,
    pub fail: AtomicBool,
}

impl RecordingDispatch {
    pub fn fail_next_publishes(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventDispatch for RecordingDispatch {
    async fn publish_job_created(&self, event: &JobCreatedEvent) -> QueueResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(QueueError::publish_failed("broker unavailable"));
        }
        let mut events = self.events.lock().unwrap();
        events.push(event.clone());
        Ok(format!("{}-0", events.len()))
    }
}

/// Deterministic signer; issued URLs embed bucket, key, and expiry.
pub struct StubSigner;

#[async_trait]
impl UrlSigner for StubSigner {
    fn upload_key(&self, filename: &str) -> String {
        format!("uploads/{filename}")
    }

    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://storage.test/{key}?type={content_type}&expires={}",
            expires_in.as_secs()
        ))
    }

    async fn presign_download(
        &self,
        bucket: &str,
        key: &str,
        attachment_name: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://storage.test/{bucket}/{key}?attachment={attachment_name}&expires={}",
            expires_in.as_secs()
        ))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub dispatcher: Arc<RecordingDispatch>,
}

/// Build a test `ApiConfig` with fixed secrets.
pub fn test_config() -> ApiConfig {
    ApiConfig {
        jwt_secret: "integration-test-secret".to_string(),
        service_api_key: TEST_API_KEY.to_string(),
        ..ApiConfig::default()
    }
}

/// Build the production router over in-memory collaborators.
///
/// This goes through `AppState::from_parts` and `create_router`, so
/// requests cross the same middleware and extractors production uses.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Arc::new(RecordingDispatch::default());

    let state = AppState::from_parts(
        test_config(),
        store.clone(),
        store.clone(),
        Arc::new(StubSigner),
        dispatcher.clone(),
    );

    TestApp {
        router: create_router(state),
        store,
        dispatcher,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, path: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_key(app: &Router, path: &str, api_key: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("x-api-key", api_key)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_key(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    api_key: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .header("x-api-key", api_key)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn patch_json_key(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    api_key: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(path)
        .header("Content-Type", "application/json")
        .header("x-api-key", api_key)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn patch_json_auth(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(path)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn patch_json(app: &Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Sign up an account over the API and return its bearer token.
pub async fn signup_and_login(app: &Router, email: &str) -> String {
    let password = "integration-pass-1";

    let response = post_json(
        app,
        "/auth/signup",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    let response = post_json(
        app,
        "/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

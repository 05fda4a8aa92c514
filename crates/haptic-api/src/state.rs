//! Application state.

use std::sync::Arc;

use haptic_queue::{EventDispatch, EventPublisher};
use haptic_storage::{ObjectStore, StorageConfig, UrlSigner};
use haptic_store::{JobStore, PgStore, UserStore};

use crate::config::ApiConfig;
use crate::services::{IdentityService, JobService, UrlService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub identity: IdentityService,
    pub jobs: JobService,
    pub urls: UrlService,
}

impl AppState {
    /// Create new application state, connecting to Postgres, the object
    /// store, and the broker, and running pending migrations.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = haptic_store::connect(&config.database_url).await?;
        let store = PgStore::new(pool);
        store.migrate().await?;

        let signer = ObjectStore::new(StorageConfig::from_env()?);
        let publisher = EventPublisher::from_env()?;

        let users: Arc<dyn UserStore> = Arc::new(store.clone());
        let jobs: Arc<dyn JobStore> = Arc::new(store);

        Ok(Self::from_parts(
            config,
            users,
            jobs,
            Arc::new(signer),
            Arc::new(publisher),
        ))
    }

    /// Wire the services over explicit store, signer, and dispatcher
    /// handles. Handlers reach every collaborator through these seams,
    /// so a state built here carries no hidden connections.
    pub fn from_parts(
        config: ApiConfig,
        users: Arc<dyn UserStore>,
        jobs: Arc<dyn JobStore>,
        signer: Arc<dyn UrlSigner>,
        dispatcher: Arc<dyn EventDispatch>,
    ) -> Self {
        let identity = IdentityService::new(users, config.clone());
        let urls = UrlService::new(signer, config.url_ttl);
        let jobs = JobService::new(jobs, dispatcher, urls.clone());

        Self {
            config,
            identity,
            jobs,
            urls,
        }
    }
}

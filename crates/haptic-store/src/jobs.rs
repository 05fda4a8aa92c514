//! Job persistence.

use async_trait::async_trait;
use haptic_models::{Job, JobStatus};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::store::PgStore;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, owner_id, video_filename, status, output_location, created_at, updated_at";

/// Job record lifecycle: create, owner-scoped query, guarded transition.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new PENDING job for `owner_id`.
    async fn create_job(&self, owner_id: Uuid, video_filename: &str) -> StoreResult<Job>;

    /// All jobs owned by `owner_id`, newest first.
    async fn list_jobs_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Job>>;

    /// Find a job by id.
    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>>;

    /// Move a job from `from` to `to`, optionally recording the output
    /// location. Returns `None` when no row matched, either because the
    /// job is gone or because its status is no longer `from`.
    async fn transition_job(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
        output_location: Option<&str>,
    ) -> StoreResult<Option<Job>>;
}

#[async_trait]
impl JobStore for PgStore {
    async fn create_job(&self, owner_id: Uuid, video_filename: &str) -> StoreResult<Job> {
        let query = format!(
            "INSERT INTO jobs (owner_id, video_filename)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Job>(&query)
            .bind(owner_id)
            .bind(video_filename)
            .fetch_one(self.pool())
            .await?)
    }

    async fn list_jobs_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Job>> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs
             WHERE owner_id = $1
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Job>(&query)
            .bind(owner_id)
            .fetch_all(self.pool())
            .await?)
    }

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        Ok(sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn transition_job(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
        output_location: Option<&str>,
    ) -> StoreResult<Option<Job>> {
        // The status guard keeps concurrent callbacks from interleaving
        // past the transition check.
        let query = format!(
            "UPDATE jobs
             SET status = $3,
                 output_location = COALESCE($4, output_location),
                 updated_at = now()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(output_location)
            .fetch_optional(self.pool())
            .await?)
    }
}

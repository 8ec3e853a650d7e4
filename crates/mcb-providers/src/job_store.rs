//! In-memory [`JobStore`] (C9), backed by `DashMap` for per-key atomicity
//! without a global lock held across I/O.

use async_trait::async_trait;
use dashmap::DashMap;

use mcb_domain::entities::Job;
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{JobPatch, JobStore};
use mcb_domain::value_objects::JobId;

/// [`JobStore`] backed by a sharded concurrent map.
///
/// Every operation resolves to a single `DashMap` shard lock, held only for
/// the duration of the in-memory mutation; no operation here ever awaits
/// while holding it.
#[derive(Debug, Default)]
pub struct DashMapJobStore {
    jobs: DashMap<JobId, Job>,
}

impl DashMapJobStore {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for DashMapJobStore {
    async fn add(&self, job: Job) -> Result<()> {
        if let Some(existing) = self.jobs.get(&job.id) {
            if existing.status.is_terminal() && existing.status != job.status {
                return Err(Error::unexpected(format!(
                    "job {} already has a terminal record with a different status",
                    job.id
                )));
            }
        }
        self.jobs.insert(job.id, job);
        Ok(())
    }

    async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.get(&id).map(|entry| entry.clone())
    }

    async fn update(&self, id: JobId, patch: JobPatch) -> Result<()> {
        let mut entry = self
            .jobs
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("job {id}")))?;

        if let Some(status) = patch.status {
            entry.status = status;
        }
        entry.errors.extend(patch.append_errors);
        Ok(())
    }

    async fn replace(&self, id: JobId, job: Job) -> Result<()> {
        let mut entry = self
            .jobs
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("job {id}")))?;
        *entry = job;
        Ok(())
    }

    async fn delete(&self, id: JobId) {
        self.jobs.remove(&id);
    }

    async fn list(&self) -> Vec<Job> {
        self.jobs.iter().map(|entry| entry.value().clone()).collect()
    }
}

//! The job store port (C9).
//!
//! Every HTTP handler reads through this trait; exactly one worker per job
//! writes through it. Implementations must make every operation atomic with
//! respect to other operations on the same id, and must never hold their
//! internal lock across I/O or an LLM call.

use async_trait::async_trait;

use crate::entities::Job;
use crate::error::Result;
use crate::value_objects::JobId;

/// Shallow partial update applied to a stored [`Job`].
///
/// Each `Some` field replaces the corresponding field on the stored record;
/// `None` leaves it untouched. Mirrors the teacher's job-manager update
/// style, generalized from job-type-tagged progress fields to this system's
/// narrower job shape.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    /// Replace the job's status.
    pub status: Option<crate::entities::JobStatus>,
    /// Append these messages to `errors[]` rather than replacing it.
    pub append_errors: Vec<String>,
}

/// Public contract for the job store.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert or replace a job record.
    ///
    /// # Errors
    /// Returns an error if a terminal record already exists under `job.id`
    /// with a different terminal status than the incoming record.
    async fn add(&self, job: Job) -> Result<()>;

    /// Return a snapshot of the job, if present.
    async fn get(&self, id: JobId) -> Option<Job>;

    /// Apply a shallow, atomic patch to the stored record.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if no job exists under `id`.
    async fn update(&self, id: JobId, patch: JobPatch) -> Result<()>;

    /// Replace the full stored record for `id` atomically.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if no job exists under `id`.
    async fn replace(&self, id: JobId, job: Job) -> Result<()>;

    /// Remove a job unconditionally (administrative).
    async fn delete(&self, id: JobId);

    /// Snapshot of every stored job, for diagnostics.
    async fn list(&self) -> Vec<Job>;
}

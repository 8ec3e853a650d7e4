//! Report retrieval use case backing `GET /report`.
//!
//! Rendering itself is a domain port (`ReportRenderer`, implemented by a
//! concrete adapter); this use case only enforces the one rule an HTTP
//! handler must not get wrong: a report can only be produced for a job that
//! has actually finished.

use mcb_domain::entities::{Job, JobStatus};
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{ReportFormat, ReportRenderer};

/// Render `job` in `format`, refusing jobs that have not reached `COMPLETED`.
///
/// # Errors
/// Returns [`Error::InputValidation`] if `job.status` is not `COMPLETED`
///. Otherwise propagates whatever the renderer returns.
pub fn render(job: &Job, format: ReportFormat, renderer: &dyn ReportRenderer) -> Result<String> {
    ensure_completed(job)?;
    renderer.render(job, format)
}

fn ensure_completed(job: &Job) -> Result<()> {
    if job.status != JobStatus::Completed {
        return Err(Error::input_validation(format!(
            "job {} is not completed (status: {:?})",
            job.id, job.status
        )));
    }
    Ok(())
}

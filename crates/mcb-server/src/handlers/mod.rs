//! HTTP handlers, one module per route family.

pub mod analyze;
pub mod graph;
pub mod health;
pub mod report;
pub mod status;

use mcb_domain::error::Error;
use mcb_domain::value_objects::JobId;

use crate::error::ApiError;

/// Parse a path segment into a [`JobId`], mapping a malformed UUID onto
/// the same 404 a genuinely-unknown id would get (`GET`s on an
/// unknown job id are 404; a malformed one is indistinguishable from
/// "never existed" to a client).
pub(crate) fn parse_job_id(raw: &str) -> Result<JobId, ApiError> {
    JobId::parse(raw)
        .map_err(|_| ApiError::Domain(Error::not_found(format!("job {raw}"))))
}

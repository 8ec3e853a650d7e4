//! Maps the domain [`Error`] (and the submission-time [`SubmitError`]) onto
//! HTTP status codes ( "Exit/status codes").
//!
//! Re-architecture note: `mcb-server` is the one place a domain
//! error becomes a status code; no other crate knows about HTTP.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use mcb_application::SubmitError;
use mcb_domain::error::{error_kind_label, Error};

/// A domain or submission error, ready to become an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A domain-level failure.
    #[error(transparent)]
    Domain(#[from] Error),
    /// A submission-time failure from [`mcb_application::submit_job`].
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match &self {
            ApiError::Domain(err) => (status_for(err), err.to_string(), error_kind_label(err)),
            ApiError::Submit(SubmitError::EmptyWorkingSet) => {
                (StatusCode::BAD_REQUEST, self.to_string(), "input_validation")
            }
            ApiError::Submit(SubmitError::Store(err)) => (status_for(err), err.to_string(), error_kind_label(err)),
        };

        (status, Json(ErrorBody { error: message, kind })).into_response()
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InputValidation { .. } => StatusCode::BAD_REQUEST,
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::RemoteFetch { .. } => StatusCode::BAD_GATEWAY,
        Error::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        Error::ParseFailure { .. }
        | Error::AnalyzerInternal { .. }
        | Error::LlmFailure { .. }
        | Error::ExternalReporterFailure { .. }
        | Error::Configuration { .. }
        | Error::Unexpected { .. }
        | Error::Io(_)
        | Error::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

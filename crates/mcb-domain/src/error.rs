//! Domain error type.
//!
//! One [`Error`] enum covers every failure kind the pipeline can produce.
//! Variants map directly onto the error-kind taxonomy the orchestrator and
//! HTTP layer both key off of: which kinds are fatal to a job, which are
//! merely recorded and tolerated, and which never reach a client.

/// Result alias using the domain [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Domain-wide error type.
///
/// Variants carry a `message` plus an optional boxed `source` so call sites
/// can attach an underlying cause without the enum depending on concrete
/// error types from providers.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed submission: bad URL, missing required field, too many
    /// uploaded files. Surfaced synchronously as a 4xx at submission time.
    #[error("input validation failed: {message}")]
    InputValidation {
        /// Human-readable description of the violated constraint.
        message: String,
    },

    /// The remote repository host refused, timed out, or returned 4xx/5xx.
    /// Fatal to the job: the job transitions to FAILED.
    #[error("remote fetch failed: {message}")]
    RemoteFetch {
        /// Human-readable description.
        message: String,
        /// Underlying transport error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A file could not be parsed by its language analyzer. Non-fatal: the
    /// analyzer emits one HIGH issue for the file and continues.
    #[error("parse failed for {file_path}: {message}")]
    ParseFailure {
        /// Path of the file that failed to parse.
        file_path: String,
        /// Human-readable description.
        message: String,
    },

    /// An analyzer panicked or returned an internal fault while processing
    /// one file. Non-fatal: logged, that file yields no issues.
    #[error("analyzer internal error for {file_path}: {message}")]
    AnalyzerInternal {
        /// Path of the file being analyzed when the fault occurred.
        file_path: String,
        /// Human-readable description.
        message: String,
    },

    /// The LLM was unavailable, timed out, or returned malformed JSON.
    /// Non-fatal at file-enhancement granularity (skip enhancement); at the
    /// cross-corpus review stage this is retried once before falling back
    /// to a partial envelope.
    #[error("LLM call failed: {message}")]
    LlmFailure {
        /// Human-readable description.
        message: String,
        /// Underlying transport error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The external reporter page API rejected a block (typically length).
    /// Non-fatal: retried with stricter brevity, then recorded as a failed
    /// reporting step without failing the job.
    #[error("external reporter failed: {message}")]
    ExternalReporterFailure {
        /// Human-readable description.
        message: String,
    },

    /// Explicit cancellation or timeout.
    #[error("operation cancelled")]
    Cancelled,

    /// Any unclassified fault. Fatal: job transitions to FAILED, full
    /// diagnostic retained for operators but not surfaced to clients.
    #[error("unexpected error: {message}")]
    Unexpected {
        /// Human-readable description (operator-facing; not sent to clients).
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A requested resource (job, report) does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// A configuration value was missing or failed validation at startup.
    #[error("configuration error: {message}")]
    Configuration {
        /// Human-readable description.
        message: String,
    },

    /// I/O failure (file read, archive extraction).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure outside the LLM-envelope repair path.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Construct an [`Error::InputValidation`].
    pub fn input_validation(message: impl Into<String>) -> Self {
        Error::InputValidation {
            message: message.into(),
        }
    }

    /// Construct an [`Error::RemoteFetch`] with no attached source.
    pub fn remote_fetch(message: impl Into<String>) -> Self {
        Error::RemoteFetch {
            message: message.into(),
            source: None,
        }
    }

    /// Construct an [`Error::RemoteFetch`] wrapping a transport error.
    pub fn remote_fetch_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::RemoteFetch {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Construct an [`Error::ParseFailure`].
    pub fn parse_failure(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ParseFailure {
            file_path: file_path.into(),
            message: message.into(),
        }
    }

    /// Construct an [`Error::AnalyzerInternal`].
    pub fn analyzer_internal(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::AnalyzerInternal {
            file_path: file_path.into(),
            message: message.into(),
        }
    }

    /// Construct an [`Error::LlmFailure`] with no attached source.
    pub fn llm_failure(message: impl Into<String>) -> Self {
        Error::LlmFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Construct an [`Error::LlmFailure`] wrapping a transport error.
    pub fn llm_failure_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::LlmFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Construct an [`Error::ExternalReporterFailure`].
    pub fn external_reporter_failure(message: impl Into<String>) -> Self {
        Error::ExternalReporterFailure {
            message: message.into(),
        }
    }

    /// Construct an [`Error::Unexpected`] with no attached source.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Error::Unexpected {
            message: message.into(),
            source: None,
        }
    }

    /// Construct an [`Error::NotFound`].
    pub fn not_found(resource: impl Into<String>) -> Self {
        Error::NotFound {
            resource: resource.into(),
        }
    }

    /// Construct an [`Error::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error kind is fatal to the enclosing job, i.e. it must
    /// terminate the pipeline rather than being appended to `state.errors[]`.
    ///
    /// Per the propagation policy: only `RemoteFetch`, `Unexpected`, and
    /// `Cancelled` are fatal inside a running job (`InputValidation` is
    /// fatal too, but only ever occurs at submission time, synchronously,
    /// before a job exists).
    #[must_use]
    pub fn is_fatal_to_job(&self) -> bool {
        matches!(
            self,
            Error::RemoteFetch { .. } | Error::Unexpected { .. } | Error::Cancelled
        )
    }
}

/// A short, stable label for an error kind, used in job `errors[]` entries
/// and log fields where the full `Display` text is too verbose.
#[must_use]
pub fn error_kind_label(error: &Error) -> &'static str {
    match error {
        Error::InputValidation { .. } => "input_validation",
        Error::RemoteFetch { .. } => "remote_fetch",
        Error::ParseFailure { .. } => "parse_failure",
        Error::AnalyzerInternal { .. } => "analyzer_internal",
        Error::LlmFailure { .. } => "llm_failure",
        Error::ExternalReporterFailure { .. } => "external_reporter_failure",
        Error::Cancelled => "cancelled",
        Error::Unexpected { .. } => "unexpected",
        Error::NotFound { .. } => "not_found",
        Error::Configuration { .. } => "configuration",
        Error::Io(_) => "io",
        Error::Json(_) => "json",
    }
}

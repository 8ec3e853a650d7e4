//! Fixed tables and default values shared across the pipeline.

pub mod secrets;

pub use secrets::{is_likely_secret, SecretPattern, SECRET_PATTERNS, TEST_INDICATORS};

/// Directory names skipped during both upload-path validation and remote
/// repository traversal.
pub const SKIP_DIRECTORIES: &[&str] = &[".git", "node_modules", "__pycache__", "venv", ".venv", "env"];

/// Default per-language analysis fan-out.
pub const DEFAULT_FAN_OUT: usize = 4;

/// Default LLM per-call timeout in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Default per-file line cap; oversized files are replaced with a short
/// marker rather than analyzed.
pub const DEFAULT_PER_FILE_LINE_CAP: usize = 500;

/// Default per-file byte cap enforced by the source fetcher.
pub const DEFAULT_PER_FILE_BYTE_CAP: usize = 1_024 * 1_024;

/// Bounded content window sent to the LLM per file (Open Question in §9,
/// resolved here as a single constant held across all call sites).
pub const LLM_CONTENT_WINDOW_CHARS: usize = 2_000;

/// Hard limit on a single external block's `content` field;
/// the upstream API rejects blocks at or above 2000 characters.
pub const EXTERNAL_BLOCK_MAX_CHARS: usize = 1_990;

/// Maximum automatic regeneration attempts when an external block document
/// violates [`EXTERNAL_BLOCK_MAX_CHARS`].
pub const EXTERNAL_BLOCK_MAX_RETRIES: u32 = 3;

/// Cyclomatic-complexity thresholds for the Python-like analyzer.
pub const COMPLEXITY_MEDIUM_THRESHOLD: u32 = 10;
/// See [`COMPLEXITY_MEDIUM_THRESHOLD`].
pub const COMPLEXITY_HIGH_THRESHOLD: u32 = 15;

/// Allow-listed file extensions for the remote source fetcher:
/// source files, common config, and Dockerfiles.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "json", "yaml", "yml", "toml", "md", "txt", "cfg", "ini",
    "env", "dockerfile",
];

/// Language tags used throughout the `DiscoveredSet` and `FileMetrics`.
pub mod languages {
    /// Python-like source.
    pub const PYTHON_LIKE: &str = "python-like";
    /// JavaScript/TypeScript-family source.
    pub const JS_LIKE: &str = "js-like";
    /// Dockerfiles.
    pub const DOCKER: &str = "docker";
}

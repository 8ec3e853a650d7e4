//! Environment-variable configuration, loaded once at startup via
//! `figment`'s `Env` provider, simplified from a YAML-layered loader down
//! to a flat, fixed env-var set.

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use mcb_domain::error::{Error, Result};

/// The exact environment variable names recognized; `Env::raw`
/// performs no prefix stripping, so these are read verbatim.
const RECOGNIZED_VARS: &[&str] = &[
    "LLM_A_API_KEY",
    "LLM_B_API_KEY",
    "REMOTE_REPO_API_TOKEN",
    "EXTERNAL_REPORTER_TOKEN",
    "EXTERNAL_REPORTER_PAGE_ID",
    "LISTEN_HOST",
    "LISTEN_PORT",
];

/// Typed, validated process configuration.
///
/// Field names mirror the environment variable names verbatim (`serde`
/// rename) so the `Env` provider's raw keys line up without a translation
/// layer; everything not named above is a sane constant default rather
/// than a configurable knob (fan-out, timeouts, caps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// `LLM_A_API_KEY`; gates whether the `llm_a` service is selectable.
    #[serde(rename = "LLM_A_API_KEY", default)]
    pub llm_a_api_key: Option<String>,
    /// `LLM_B_API_KEY`; gates whether the `llm_b` service is selectable.
    #[serde(rename = "LLM_B_API_KEY", default)]
    pub llm_b_api_key: Option<String>,
    /// `REMOTE_REPO_API_TOKEN`; optional, raises the remote host's rate limit.
    #[serde(rename = "REMOTE_REPO_API_TOKEN", default)]
    pub remote_repo_api_token: Option<String>,
    /// `EXTERNAL_REPORTER_TOKEN`; both this and the page id are required to
    /// enable external reporting.
    #[serde(rename = "EXTERNAL_REPORTER_TOKEN", default)]
    pub external_reporter_token: Option<String>,
    /// `EXTERNAL_REPORTER_PAGE_ID`; see [`Self::external_reporter_token`].
    #[serde(rename = "EXTERNAL_REPORTER_PAGE_ID", default)]
    pub external_reporter_page_id: Option<String>,
    /// `LISTEN_HOST`, default `0.0.0.0`.
    #[serde(rename = "LISTEN_HOST", default = "default_listen_host")]
    pub listen_host: String,
    /// `LISTEN_PORT`, default `8000`.
    #[serde(rename = "LISTEN_PORT", default = "default_listen_port")]
    pub listen_port: u16,

    /// Per-language-stage fan-out; not environment-configurable,
    /// held constant at a fixed default.
    #[serde(default = "default_fan_out")]
    pub fan_out: usize,
    /// Per-LLM-call timeout in seconds.
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
    /// Per-file byte cap enforced by the source fetcher.
    #[serde(default = "default_per_file_byte_cap")]
    pub per_file_byte_cap: usize,
    /// Per-file line cap; oversized files are replaced with a marker.
    #[serde(default = "default_per_file_line_cap")]
    pub per_file_line_cap: usize,
}

fn default_listen_host() -> String {
    "0.0.0.0".to_owned()
}
fn default_listen_port() -> u16 {
    8000
}
fn default_fan_out() -> usize {
    mcb_domain::constants::DEFAULT_FAN_OUT
}
fn default_llm_timeout_secs() -> u64 {
    mcb_domain::constants::DEFAULT_LLM_TIMEOUT_SECS
}
fn default_per_file_byte_cap() -> usize {
    mcb_domain::constants::DEFAULT_PER_FILE_BYTE_CAP
}
fn default_per_file_line_cap() -> usize {
    mcb_domain::constants::DEFAULT_PER_FILE_LINE_CAP
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_a_api_key: None,
            llm_b_api_key: None,
            remote_repo_api_token: None,
            external_reporter_token: None,
            external_reporter_page_id: None,
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
            fan_out: default_fan_out(),
            llm_timeout_secs: default_llm_timeout_secs(),
            per_file_byte_cap: default_per_file_byte_cap(),
            per_file_line_cap: default_per_file_line_cap(),
        }
    }
}

impl AppConfig {
    /// Whether `llm_a` is selectable (`LLM_A_API_KEY` configured).
    #[must_use]
    pub fn llm_a_available(&self) -> bool {
        self.llm_a_api_key.is_some()
    }

    /// Whether `llm_b` is selectable (`LLM_B_API_KEY` configured).
    #[must_use]
    pub fn llm_b_available(&self) -> bool {
        self.llm_b_api_key.is_some()
    }

    /// External reporting is enabled only when both the token and the page
    /// id are configured.
    #[must_use]
    pub fn external_reporter_available(&self) -> bool {
        self.external_reporter_token.is_some() && self.external_reporter_page_id.is_some()
    }

    /// The socket address the HTTP server should bind to.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if `listen_host`/`listen_port` do
    /// not form a valid socket address.
    pub fn listen_addr(&self) -> Result<std::net::SocketAddr> {
        format!("{}:{}", self.listen_host, self.listen_port)
            .parse()
            .map_err(|e| Error::configuration(format!("invalid LISTEN_HOST/LISTEN_PORT: {e}")))
    }
}

/// Loads [`AppConfig`] from the process environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Construct a loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Load configuration, merging `Env::raw()` over the struct defaults.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if `LISTEN_PORT` is present but not
    /// a valid `u16`, or if the resulting socket address is malformed.
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Env::raw().only(RECOGNIZED_VARS))
            .extract()
            .map_err(|e| Error::configuration(format!("failed to load configuration: {e}")))?;

        config.listen_addr()?;
        Ok(config)
    }
}

//! Concrete adapters implementing the domain's port traits.
//!
//! Every public type here implements a trait from [`mcb_domain::ports`]; the
//! application layer never names a concrete type from this crate directly,
//! only the port it implements.

pub mod analyzers;
pub mod dependency_graph;
pub mod external_reporter;
pub mod fetcher;
pub mod job_store;
pub mod llm;
pub mod renderer;

pub use analyzers::{DockerfileAnalyzer, JsLikeAnalyzer, PythonLikeAnalyzer};
pub use dependency_graph::ImportDependencyGraphBuilder;
pub use external_reporter::PageExternalReporter;
pub use fetcher::{fetch_remote_working_set, parse_github_url, validate_upload_paths, GithubRepoClient};
pub use job_store::DashMapJobStore;
pub use llm::{LlmAClient, LlmBClient};
pub use renderer::TemplateReportRenderer;

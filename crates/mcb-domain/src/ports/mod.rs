//! Port traits: the seams where `mcb-providers` plugs concrete adapters
//! into `mcb-application`'s use cases.

pub mod analyzer;
pub mod dependency_graph;
pub mod external_reporter;
pub mod job_store;
pub mod llm_client;
pub mod remote_repo;
pub mod renderer;

pub use analyzer::{AnalysisOutput, LanguageAnalyzer};
pub use dependency_graph::DependencyGraphBuilder;
pub use external_reporter::{ExternalBlock, ExternalReporter};
pub use job_store::{JobPatch, JobStore};
pub use llm_client::LlmClient;
pub use remote_repo::{RemoteEntry, RemoteRepoClient};
pub use renderer::{ReportFormat, ReportRenderer};

//! Process-wide shared state. Everything else held here is
//! either immutable configuration or a `Send + Sync` capability handle
//! that is itself internally stateless from the orchestrator's point of
//! view (the LLM clients, the dependency graph builder, the renderer).

use std::sync::Arc;

use mcb_application::{JobRunnerDeps, OrchestratorDeps};
use mcb_domain::entities::LlmService;
use mcb_domain::ports::{
    DependencyGraphBuilder, ExternalReporter, JobStore, LanguageAnalyzer, LlmClient, RemoteRepoClient, ReportRenderer,
};
use mcb_infrastructure::AppConfig;
use mcb_providers::{
    DashMapJobStore, DockerfileAnalyzer, GithubRepoClient, ImportDependencyGraphBuilder, JsLikeAnalyzer, LlmAClient,
    LlmBClient, PageExternalReporter, PythonLikeAnalyzer, TemplateReportRenderer,
};

/// Everything an HTTP handler needs: the shared job store plus the
/// capability handles used to assemble a per-job [`OrchestratorDeps`].
pub struct AppState {
    /// Validated process configuration.
    pub config: Arc<AppConfig>,
    /// The job store (C9); the only state actually shared with workers.
    pub job_store: Arc<dyn JobStore>,
    /// One analyzer per supported language tag (C3).
    pub analyzers: Vec<Arc<dyn LanguageAnalyzer>>,
    /// Import-graph builder (C7).
    pub dependency_graph_builder: Arc<dyn DependencyGraphBuilder>,
    /// `llm_a` client, present iff `LLM_A_API_KEY` is configured.
    pub llm_a: Option<Arc<dyn LlmClient>>,
    /// `llm_b` client, present iff `LLM_B_API_KEY` is configured.
    pub llm_b: Option<Arc<dyn LlmClient>>,
    /// Report renderer (C10).
    pub renderer: Arc<dyn ReportRenderer>,
    /// External reporter, present iff both reporter env vars are configured.
    pub external_reporter: Option<Arc<dyn ExternalReporter>>,
    /// Remote repository client backing `/analyze/remote`.
    pub remote_repo_client: Arc<dyn RemoteRepoClient>,
}

impl AppState {
    /// Wire concrete providers for `config` into a fresh [`AppState`].
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let llm_a: Option<Arc<dyn LlmClient>> = config
            .llm_a_api_key
            .clone()
            .map(|key| Arc::new(LlmAClient::new(key)) as Arc<dyn LlmClient>);
        let llm_b: Option<Arc<dyn LlmClient>> = config
            .llm_b_api_key
            .clone()
            .map(|key| Arc::new(LlmBClient::new(key)) as Arc<dyn LlmClient>);
        let external_reporter: Option<Arc<dyn ExternalReporter>> = if config.external_reporter_available() {
            Some(Arc::new(PageExternalReporter::new(
                config.external_reporter_token.clone().unwrap_or_default(),
                config.external_reporter_page_id.clone().unwrap_or_default(),
            )))
        } else {
            None
        };

        Self {
            job_store: Arc::new(DashMapJobStore::new()),
            analyzers: vec![
                Arc::new(PythonLikeAnalyzer),
                Arc::new(JsLikeAnalyzer),
                Arc::new(DockerfileAnalyzer),
            ],
            dependency_graph_builder: Arc::new(ImportDependencyGraphBuilder),
            llm_a,
            llm_b,
            renderer: Arc::new(TemplateReportRenderer::new()),
            external_reporter,
            remote_repo_client: Arc::new(GithubRepoClient::new(config.remote_repo_api_token.clone())),
            config: Arc::new(config),
        }
    }

    /// The LLM client selected by a job's requested `service`, or `None`
    /// when that backend's API key is not configured.
    #[must_use]
    pub fn llm_client_for(&self, service: LlmService) -> Option<Arc<dyn LlmClient>> {
        match service {
            LlmService::LlmA => self.llm_a.clone(),
            LlmService::LlmB => self.llm_b.clone(),
        }
    }

    /// Assemble the per-job dependency bundle the background worker needs.
    #[must_use]
    pub fn job_runner_deps(&self, service: LlmService) -> Arc<JobRunnerDeps> {
        Arc::new(JobRunnerDeps {
            orchestrator: OrchestratorDeps {
                analyzers: self.analyzers.clone(),
                llm_client: self.llm_client_for(service),
                dependency_graph_builder: Arc::clone(&self.dependency_graph_builder),
                fan_out: self.config.fan_out,
            },
            renderer: Arc::clone(&self.renderer),
            external_reporter: self.external_reporter.clone(),
            job_store: Arc::clone(&self.job_store),
        })
    }
}

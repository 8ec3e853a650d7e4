//! Process entry point: load configuration, bootstrap logging, bind, serve.

use std::sync::Arc;

use mcb_infrastructure::{logging, ConfigLoader};
use mcb_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = ConfigLoader::new().load()?;
    let addr = config.listen_addr()?;
    tracing::info!(
        %addr,
        llm_a = config.llm_a_available(),
        llm_b = config.llm_b_available(),
        external_reporter = config.external_reporter_available(),
        "starting mcb-quality-analyzer"
    );

    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Router assembly: wires each route onto its handler and layers the
//! ambient tracing/CORS middleware. Full CORS policy design is out of
//! scope here; this is the permissive default, present but not bespoke.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{analyze, graph, health, report, status};
use crate::state::AppState;

/// Build the full HTTP router over a shared [`AppState`].
#[must_use]
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/analyze/remote", post(analyze::analyze_remote))
        .route("/analyze/upload", post(analyze::analyze_upload))
        .route("/status/{job_id}", get(status::get_status))
        .route("/graph/{job_id}", get(graph::get_graph))
        .route("/report", post(report::post_report))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state)
}

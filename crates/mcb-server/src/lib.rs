//! HTTP API surface for the code-quality analysis service.
//!
//! Thin axum wiring over `mcb-application`'s use cases: handlers only
//! extract request data, call a use case, and map the result onto a
//! response. No business logic lives here.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;

pub use app::build_router;
pub use state::AppState;

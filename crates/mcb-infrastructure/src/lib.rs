//! Ambient infrastructure for the code-quality analysis service: reads the
//! environment-variable configuration once at process start and
//! bootstraps the global `tracing` subscriber.
//!
//! Neither module depends on a concrete provider or the HTTP layer; both
//! are injected into `mcb-server`'s `AppState` at startup.

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigLoader};

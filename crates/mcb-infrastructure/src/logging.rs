//! Structured logging bootstrap: initializes the global `tracing`
//! subscriber once per process, wrapping `tracing-subscriber` with an
//! env-filter. The pipeline itself never calls into this module again
//! after startup; every stage just emits `tracing` events and spans
//! (`job_id`, `stage`, `file_path` fields) against whatever global
//! subscriber is installed.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global `tracing` subscriber, reading the filter from
/// `RUST_LOG` (default: `info`).
///
/// Idempotent: safe to call from multiple test modules or from both
/// `main` and an integration test harness in the same process.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .finish();
        // `set_global_default` fails only if a subscriber is already
        // installed; harmless in tests that race to call `init`.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

#[cfg(test)]
mod tests {
    use super::init;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}

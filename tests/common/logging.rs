//! Test logging setup

use std::sync::Once;

static INIT: Once = Once::new();

/// Route `tracing` output to the test harness. Honors `RUST_LOG`, defaulting
/// to debug output for this crate.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mocktree=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_ansi(false)
            .try_init();
    });
}

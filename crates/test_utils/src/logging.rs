//! Test logging
//!
//! Installs a `tracing` subscriber once per test binary. Output goes through
//! the test harness writer so it is only shown for failing tests; set
//! `RUST_LOG=domain_policy=debug` to see lock and schedule events.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Another subscriber may already be installed by the test binary
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Initializes test logging; safe to call from every test
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

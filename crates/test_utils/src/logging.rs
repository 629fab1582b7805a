//! Test Logging
//!
//! Installs a tracing subscriber once per test binary so adapter probing and
//! registry events show up with `RUST_LOG=claims_core=debug cargo test`.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Another harness may already have installed a global subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Initializes test logging; safe to call from every test
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

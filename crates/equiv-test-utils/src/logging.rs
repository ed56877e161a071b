//! Tracing output for tests

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Install a compact subscriber writing to the test harness.
///
/// Uses `RUST_LOG` when set, otherwise `info`. Safe to call from every test;
/// only the first call installs anything.
pub fn init() {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_level(true)
            .compact();

        let filter_layer = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        // Another harness may already own the global subscriber
        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}

//! Tracing setup for drivers and tests.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Only installs a subscriber when `RUST_LOG` is set, so evaluation stays
/// silent by default. Safe to call more than once.
///
/// ```bash
/// RUST_LOG=mdl_eval=debug cargo test -p mdl_eval
/// RUST_LOG=mdl_eval::ops=trace cargo test -p mdl_eval
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{fmt, EnvFilter};

        // Another subscriber may already be installed by the host program.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .try_init();
    });
}

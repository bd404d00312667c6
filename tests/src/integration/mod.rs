//! Cross-module flows exercised through the public API only.

pub mod golden_vectors;
pub mod signing_flows;

use tracing_subscriber::EnvFilter;

/// Install a test log subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "family_budget=info";

/// Initializes the global tracing subscriber. `RUST_LOG` wins when set.
/// Returns `true` only for the call that performed the setup.
pub fn init_tracing() -> bool {
    let mut first = false;
    TRACING_INIT.call_once(|| {
        first = true;
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // Another subscriber may already be installed by an embedding host.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
    first
}

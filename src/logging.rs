//! Diagnostic logging setup
//!
//! Installs a `tracing` fmt subscriber once per process. `RUST_LOG` overrides
//! the default `cardledger=warn` directive; `--verbose` raises it to debug.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Initialize the global tracing subscriber
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let default_directive = if verbose {
            "cardledger=debug"
        } else {
            "cardledger=warn"
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        // Logs go to stderr so command output on stdout stays clean
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

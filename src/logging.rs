//! Tracing initialization for the command-line front end

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g.
/// `INSIGHTDECK_LOG=insightdeck::insights=debug,insightdeck=info`.
pub const LOG_ENV: &str = "INSIGHTDECK_LOG";

/// Filter used when `INSIGHTDECK_LOG` is unset or invalid.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "insightdeck=debug"
    } else {
        "insightdeck=warn"
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose)
                    .with_line_number(verbose),
            )
            .with(filter)
            .try_init();
    });
}

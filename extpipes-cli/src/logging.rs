//! Logging setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(debug: bool) -> &'static str {
    if debug {
        "extpipes_cli=debug,extpipes_client=debug"
    } else {
        "extpipes_cli=info,extpipes_client=info"
    }
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the `--debug` flag.
pub fn init(debug: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(debug).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

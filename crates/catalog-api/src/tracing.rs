//! Log output for the catalog server.
//!
//! Development gets readable, colored output; production gets one JSON object
//! per event for log shipping.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEVELOPMENT_FILTER: &str = "debug,tower_http=debug";
const PRODUCTION_FILTER: &str = "info,catalog_pipeline=info,tower_http=info";

/// Initialize tracing/logging based on the environment
///
/// `RUST_LOG` overrides the default filter, e.g.
/// `RUST_LOG=info,catalog_pipeline=debug` to see every rejected import row.
pub fn init_tracing(env: &Environment) {
    let default_filter = if env.is_development() {
        DEVELOPMENT_FILTER
    } else {
        PRODUCTION_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if env.is_development() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .pretty()
                    .with_filter(env_filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_target(true)
                    .with_filter(env_filter),
            )
            .init();
    }

    tracing::info!(environment = ?env, "Tracing initialized");
}

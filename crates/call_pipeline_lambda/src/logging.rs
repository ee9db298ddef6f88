//! Structured JSON logging for CloudWatch.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Installs the JSON subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Lambda stamps every line itself, so event timestamps are omitted.
pub fn init_logging(default_filter: &str) {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .json()
        .with_target(true)
        .without_time()
        .with_current_span(false)
        .flatten_event(true);

    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .try_init();
}

#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

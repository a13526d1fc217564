//! Tracing setup for embedding binaries and tests

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops so tests can share
/// the process-wide subscriber.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beanshub_app=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

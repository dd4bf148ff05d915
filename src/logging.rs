//! Structured logging setup.
//!
//! Library code only emits `tracing` events; binaries and test harnesses call
//! [`init`] to install a subscriber.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "tasktracker=info";

/// Installs the global subscriber with the default filter.
///
/// Returns `false` if a global subscriber was already installed.
#[must_use]
pub fn init() -> bool {
    init_with_filter(DEFAULT_FILTER)
}

/// Installs the global subscriber, falling back to `default_filter` when
/// `RUST_LOG` does not provide a valid filter.
///
/// Returns `false` if a global subscriber was already installed.
#[must_use]
pub fn init_with_filter(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

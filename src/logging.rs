//! Subscriber setup for binaries and tests.
//!
//! The library crates only emit `tracing` events. Call [`init`] once to print
//! them to stderr, filtered by `RUST_LOG` (default `formula=info`).

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "formula=info,formula_compiler=info,formula_registry=warn";

/// Install a stderr subscriber. Later calls are no-ops.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a stderr subscriber, using `default_filter` when `RUST_LOG` is unset.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed, e.g. by another test.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init();
        init_with_filter("formula=debug");
        tracing::debug!("still running");
    }
}

//! Log output for hosts embedding the crate

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_DIRECTIVE: &str = "storefront_parser=info";

/// Install a stderr fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once. Returns `false` when a global subscriber was
/// already installed, by this function or by the host.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

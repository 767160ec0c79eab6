//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_directive` (e.g. `"info"` or
/// `"duelyard=debug"`) when `RUST_LOG` is unset or invalid. Calling it
/// more than once is harmless; later calls leave the first subscriber in
/// place.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

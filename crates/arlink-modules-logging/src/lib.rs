//! Logger bootstrap for the shell binaries.
//!
//! Everything else logs through the `log` facade; this crate only installs
//! the `env_logger` backend.

use env_logger::Env;

/// Install the global logger. `default_filter` applies unless `RUST_LOG` is set.
///
/// Returns `false` if a logger was already installed.
pub fn init(default_filter: &str) -> bool {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .format_target(false)
        .try_init()
        .is_ok()
}

/// Logger for test binaries: captured by the test harness, never fails twice.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}

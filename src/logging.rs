//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events. Binaries and tests that want to
//! see them install a subscriber through these helpers; the filter is read
//! from `RUST_LOG`.

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

fn build_and_set_global_subscriber(is_test: bool) {
    let layer = if is_test {
        fmt::layer().with_test_writer().boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    let r = registry().with(layer).with(EnvFilter::from_default_env());
    if is_test {
        r.try_init().ok();
    } else {
        r.init();
    }
}

/// Installs a stderr subscriber. Panics if a global subscriber is already set.
pub fn init_logging() {
    build_and_set_global_subscriber(false);
}

/// Installs a subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_test_logging() {
    build_and_set_global_subscriber(true);
}

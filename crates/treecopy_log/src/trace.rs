//! Stderr `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity count (`-v` repetitions).
pub fn level_for_verbosity(n_verbose: u8) -> &'static str {
    match n_verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` takes precedence over `n_verbose`. Calling this twice is a no-op.
pub fn init_tracing(n_verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(n_verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber for the CLI.
///
/// The filter is read from `RUST_LOG` and defaults to `info`,
/// e.g. `RUST_LOG=roster_planner=debug`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Test-friendly subscriber; safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

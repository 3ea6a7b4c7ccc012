use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter, e.g. `hotword_core=debug`.
pub const LOG_ENV: &str = "HOTWORD_LOG";

/// Install the stderr subscriber. The daemon's stderr is redirected to its
/// log file by `hotword start`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

use tracing_subscriber::EnvFilter;

/// Env var holding an `EnvFilter` directive. Overrides `log.filter` from config.
pub const LOG_ENV: &str = "TIMEMASTER_LOG";

/// Install the stderr subscriber. Stdout stays reserved for command output.
pub fn init(config_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

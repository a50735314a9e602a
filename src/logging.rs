/// Environment variable holding the log filter, e.g. `HOMEAUTH_LOG_LEVEL=debug`.
pub const LOG_ENV: &str = "HOMEAUTH_LOG_LEVEL";

/// Install the stderr log subscriber used by both binaries.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter (e.g. `ENCORE_LOG=encore_core=debug`).
pub const LOG_ENV: &str = "ENCORE_LOG";

/// Installs the global subscriber. Logs go to stderr so they never mix with command output.
pub fn init(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore double-init errors when a subscriber is already set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

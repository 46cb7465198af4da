use tracing_subscriber::{fmt, EnvFilter};

/// Installs the stderr subscriber. `RUST_LOG` overrides the default `warn`;
/// stdout is left to the formatters.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}

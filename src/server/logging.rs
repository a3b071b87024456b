use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG`, when set, wins over `--log-level`.
pub fn setup_tracing(log_level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},hyper_util=warn,reqwest=warn",
            log_level.as_str().to_lowercase()
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

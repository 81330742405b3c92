use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "linkshelf=debug,axum=info,tower_http=info";

/// Install the global subscriber. JSON lines for log shippers, plain text otherwise.
pub fn init(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init(),
        LogFormat::Plain => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }
}

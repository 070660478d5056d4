use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const LOG_ENV: &str = "SIDECAR_LOG";
pub const DEFAULT_DIRECTIVES: &str = "sidecar_extension=info,info";

/// `SIDECAR_LOG`, then `RUST_LOG`, then the built-in directives.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// A stderr subscriber. Install it with `tracing::subscriber::with_default`.
pub fn build_subscriber() -> impl Subscriber + Send + Sync + 'static {
    FmtSubscriber::builder()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
}

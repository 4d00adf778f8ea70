use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over
/// `default_filter`; a second call is a no-op.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter))
        .add_directive("hyper=warn".parse().unwrap_or_else(|_| tracing::Level::WARN.into()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

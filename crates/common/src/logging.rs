use tracing_subscriber::{fmt, EnvFilter};

/// Installs the stderr subscriber once; `RUST_LOG` overrides the default
/// directives when set. Called by the embedding binary (web layer or tooling)
/// before it constructs the service.
pub fn init_logging(default_directives: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

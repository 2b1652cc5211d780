//! Logging pipeline bootstrap.
//!
//! Kept free of the kernel settings types so the crate can be reused by
//! auxiliary binaries; the application maps its settings onto [`Format`].

use tracing_subscriber::EnvFilter;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Pretty,
    Json,
}

/// Initialize the global tracing subscriber once at startup.
///
/// `RUST_LOG` takes precedence; otherwise the configured filter directive
/// is used, falling back to `info`.
pub fn init(format: Format, filter: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        Format::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .try_init(),
        Format::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .try_init(),
    };

    result.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

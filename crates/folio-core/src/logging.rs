#![forbid(unsafe_code)]

//! Logging bootstrap.
//!
//! The runtime emits `tracing` events; installing a subscriber is the host's
//! choice. Native hosts and test binaries can use [`init_json`] for
//! line-delimited JSON output filtered by an `EnvFilter` directive string
//! (for example `"folio_runtime=debug"`).

use tracing_subscriber::EnvFilter;

/// Failure to install the JSON subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber was already installed.
    #[error("failed to install subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a JSON formatting subscriber as the global default.
pub fn init_json(filter: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_new(filter)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;
    Ok(())
}

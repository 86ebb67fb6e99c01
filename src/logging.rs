//! Tracing subscriber setup for the command line host.

use thiserror::Error;
use tracing_subscriber::EnvFilter;


/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";


/// Errors that can occur during logging initialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// A global subscriber was installed before.
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}


/// Install a `fmt` subscriber writing to stderr.
///
/// Respects `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns [`LoggingError::SubscriberAlreadySet`] if called twice.
pub fn init() -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

//! Error types for telemetry operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// Installing the tracing subscriber failed.
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: tracing_subscriber::util::TryInitError,
    },
    /// The requested log level could not be parsed as a filter directive.
    InvalidLevel {
        /// Level string supplied by the caller.
        level: String,
    },
    /// The requested log format is not one of `json`, `pretty`, or `auto`.
    InvalidFormat {
        /// Format string supplied by the caller.
        format: String,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriberInstall { .. } => {
                formatter.write_str("failed to install tracing subscriber")
            }
            Self::InvalidLevel { level } => write!(formatter, "invalid log level '{level}'"),
            Self::InvalidFormat { format } => write!(formatter, "unknown log format '{format}'"),
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SubscriberInstall { source } => Some(source),
            Self::InvalidLevel { .. } | Self::InvalidFormat { .. } => None,
        }
    }
}

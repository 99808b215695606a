use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Terminal failure of one forwarding invocation. Each variant maps to the
/// HTTP status the caller receives; nothing is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyError {
    Validation(String),
    Authentication(String),
    DestinationTimeout(String),
    DestinationUnavailable(String),
    DestinationRejected { status: u16, reason: String },
}

impl ProxyError {
    /// Stable machine-readable tag carried in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Validation(_) => "validation_error",
            ProxyError::Authentication(_) => "authentication_error",
            ProxyError::DestinationTimeout(_) => "destination_timeout",
            ProxyError::DestinationUnavailable(_) => "destination_unavailable",
            ProxyError::DestinationRejected { .. } => "destination_rejected",
        }
    }

    pub fn status_code(&self) -> i64 {
        match self {
            ProxyError::Validation(_) => 400,
            ProxyError::Authentication(_) => 401,
            ProxyError::DestinationTimeout(_) => 504,
            ProxyError::DestinationUnavailable(_) => 502,
            ProxyError::DestinationRejected { .. } => 502,
        }
    }
}

impl Display for ProxyError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ProxyError::Validation(reason) => write!(f, "invalid observation: {}", reason),
            ProxyError::Authentication(reason) => write!(f, "authentication failed: {}", reason),
            ProxyError::DestinationTimeout(reason) => {
                write!(f, "destination timed out: {}", reason)
            }
            ProxyError::DestinationUnavailable(reason) => {
                write!(f, "destination unreachable: {}", reason)
            }
            ProxyError::DestinationRejected { status, reason } => {
                write!(f, "destination rejected observation with status {}: {}", status, reason)
            }
        }
    }
}

impl Error for ProxyError {}

/// Startup-time configuration failure. Never reaches request handling.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Config Error: {}", self.0)
    }
}

impl Error for ConfigError {}

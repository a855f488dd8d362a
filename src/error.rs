use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum PushGateError {
    // Connection errors
    ConnectionError(String),
    ConnectionClosed,

    // Message errors
    MessageParseError(String),

    // System errors
    SystemError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for PushGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            Self::ConnectionClosed => write!(f, "Connection closed unexpectedly"),
            Self::MessageParseError(msg) => write!(f, "Message parse error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for PushGateError {}

impl From<serde_json::Error> for PushGateError {
    fn from(err: serde_json::Error) -> Self {
        PushGateError::MessageParseError(err.to_string())
    }
}

// Generic result type for PushGate
pub type Result<T> = std::result::Result<T, PushGateError>;

//! Connector error types
//!
//! Every failure surfaced to the host is one of these kinds. HTTP failures are
//! always classified into the first four; the last two are raised locally.

use thiserror::Error;

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Error that can occur during connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The server reported a uniqueness conflict.
    #[error("uniqueness: {0}")]
    AlreadyExists(String),

    /// A field value was rejected, locally or by the server.
    #[error("invalidValue: {0}")]
    InvalidValue(String),

    /// The addressed record does not exist.
    #[error("unknown uid: {0}")]
    UnknownUid(String),

    /// Network failure, unparseable body or unclassified HTTP status.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Object class or query shape the remote API cannot serve.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Connector configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ConnectorError {
    /// Create a transport error without an underlying cause.
    pub fn transport(message: impl Into<String>) -> Self {
        ConnectorError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping its cause.
    pub fn transport_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConnectorError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the caller can fix the request and try again.
    pub fn is_caller_correctable(&self) -> bool {
        matches!(self, ConnectorError::InvalidValue(_))
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectorError::AlreadyExists(_) => "already_exists",
            ConnectorError::InvalidValue(_) => "invalid_value",
            ConnectorError::UnknownUid(_) => "unknown_uid",
            ConnectorError::Transport { .. } => "transport",
            ConnectorError::Unsupported(_) => "unsupported",
            ConnectorError::InvalidConfiguration(_) => "invalid_configuration",
        }
    }
}

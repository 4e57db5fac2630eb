//! Error types for the Yodash dashboard.

use thiserror::Error;

/// A shared error type for every Yodash crate.
///
/// The first four variants are the failure taxonomy of the remote
/// services (identity, transport, backend status, response decoding).
/// The remaining variants cover local concerns such as configuration
/// and file access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashError {
    /// Identity provider failure, shown as plain text
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network unreachable or the request could not be sent
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Non-success HTTP status returned by a backend
    #[error("Backend error: {status} {status_text}")]
    Backend { status: u16, status_text: String },

    /// Response body could not be parsed into the expected shape
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Image could not be decoded or encoded
    #[error("Image error: {0}")]
    Image(String),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DashError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a Backend error from a status code and its reason phrase
    pub fn backend(status: u16, status_text: impl Into<String>) -> Self {
        Self::Backend {
            status,
            status_text: status_text.into(),
        }
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// HTTP status carried by a Backend error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DashError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A type alias for `Result<T, DashError>`.
pub type Result<T> = std::result::Result<T, DashError>;

//! Error types for the LeadMap client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire LeadMap client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LeadmapError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (backend row store)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Transport failure before any HTTP status was received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status returned by a remote service
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Credentials rejected by the auth backend
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Account already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input rejected before reaching any backend
    #[error("Validation error: {0}")]
    Validation(String),

    /// Password below the configured minimum length
    #[error("Validation error: password must have at least {min_len} characters")]
    PasswordTooShort { min_len: usize },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LeadmapError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a PasswordTooShort error
    pub fn password_too_short(min_len: usize) -> Self {
        Self::PasswordTooShort { min_len }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a Conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::PasswordTooShort { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if the failure happened on the wire (transport or HTTP status).
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }

    /// The bare message without the variant prefix.
    ///
    /// Used for the persistent fetch banner, which shows the backend's own text.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound { entity_type, id } => format!("{entity_type} '{id}' not found"),
            Self::Io { message } => message.clone(),
            Self::DataAccess(m)
            | Self::Network(m)
            | Self::Auth(m)
            | Self::Conflict(m)
            | Self::Validation(m)
            | Self::Config(m)
            | Self::Internal(m) => m.clone(),
            Self::PasswordTooShort { min_len } => {
                format!("password must have at least {min_len} characters")
            }
            Self::Http { message, .. } => message.clone(),
            Self::Serialization { message, .. } => message.clone(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LeadmapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LeadmapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LeadmapError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for LeadmapError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for LeadmapError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            };
        }
        Self::Network(err.to_string())
    }
}

/// Conversion from anyhow::Error (bootstrap code)
impl From<anyhow::Error> for LeadmapError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for LeadmapError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, LeadmapError>`.
pub type Result<T> = std::result::Result<T, LeadmapError>;

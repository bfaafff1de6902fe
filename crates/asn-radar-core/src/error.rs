//! Error types for ASN Radar.
//!
//! Strategy-level failures are carried as [`AsnRadarError`] values inside the
//! lookup pipeline and folded into a `LookupResult` before they reach a caller.
//! The storage layer returns these errors too; only the cache boundary turns
//! them into "absent".

use crate::config::NetworkConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for the ASN Radar library.
#[derive(Debug, Error)]
pub enum AsnRadarError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("{source_name} API error: {status}")]
    UpstreamHttp { source_name: String, status: u16 },

    #[error("ASN not found in {source_name}")]
    AsnNotFound { source_name: String },

    #[error("Could not parse {source_name} response: {message}")]
    Parse { source_name: String, message: String },

    #[error("Cloudflare Radar token not configured")]
    NoToken,

    // Database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for ASN Radar operations.
pub type Result<T> = std::result::Result<T, AsnRadarError>;

impl From<std::io::Error> for AsnRadarError {
    fn from(err: std::io::Error) -> Self {
        AsnRadarError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for AsnRadarError {
    fn from(err: serde_json::Error) -> Self {
        AsnRadarError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for AsnRadarError {
    fn from(err: rusqlite::Error) -> Self {
        AsnRadarError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for AsnRadarError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AsnRadarError::Timeout(NetworkConfig::REQUEST_TIMEOUT)
        } else {
            AsnRadarError::Network {
                message: err.to_string(),
                source: Some(err),
            }
        }
    }
}

impl AsnRadarError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        AsnRadarError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Short machine-readable tag for the error taxonomy.
    pub fn code(&self) -> String {
        match self {
            AsnRadarError::NoToken => "NO_TOKEN".to_string(),
            AsnRadarError::UpstreamHttp { status, .. } => format!("UPSTREAM_HTTP_{}", status),
            AsnRadarError::Network { .. } | AsnRadarError::Timeout(_) => {
                "UPSTREAM_UNAVAILABLE".to_string()
            }
            AsnRadarError::AsnNotFound { .. } => "ASN_NOT_FOUND".to_string(),
            AsnRadarError::Parse { .. } | AsnRadarError::Json { .. } => "PARSE".to_string(),
            AsnRadarError::Database { .. } | AsnRadarError::Io { .. } => "STORAGE".to_string(),
            AsnRadarError::Config { .. } => "CONFIG".to_string(),
            AsnRadarError::InvalidParams { .. } => "INVALID_PARAMS".to_string(),
            AsnRadarError::MethodNotFound { .. } => "METHOD_NOT_FOUND".to_string(),
            AsnRadarError::Other(_) => "OTHER".to_string(),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Network/upstream error
    /// - -32001: Configuration error
    /// - -32002: Storage error
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            AsnRadarError::Network { .. }
            | AsnRadarError::Timeout(_)
            | AsnRadarError::UpstreamHttp { .. }
            | AsnRadarError::AsnNotFound { .. }
            | AsnRadarError::Parse { .. } => -32000,

            AsnRadarError::NoToken | AsnRadarError::Config { .. } => -32001,

            AsnRadarError::Database { .. } | AsnRadarError::Io { .. } => -32002,

            AsnRadarError::InvalidParams { .. } => -32602,

            AsnRadarError::MethodNotFound { .. } => -32601,

            _ => -32603,
        }
    }
}

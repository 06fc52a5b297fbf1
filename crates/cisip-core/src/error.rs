//! Error types for the CIS IP data source
//!
//! This module defines all error types used throughout the crate.

use std::fmt;
use thiserror::Error;

/// Result type alias for data source operations
pub type Result<T> = std::result::Result<T, Error>;

/// Raw response returned by the remote service
///
/// Carried alongside successful results and inside [`Error::RemoteRequest`]
/// so the payload can be logged when a call fails.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DetailedResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response body as received
    pub body: String,
}

impl DetailedResponse {
    /// Create a new raw response
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

impl fmt::Display for DetailedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response (status {}): {}", self.status_code, self.body)
    }
}

/// Core error type for the CIS IP data source
#[derive(Error, Debug)]
pub enum Error {
    /// The session could not produce a scoped client
    #[error("{0}")]
    ClientAcquisition(String),

    /// The list call failed at transport or API level
    #[error("{message}")]
    RemoteRequest {
        /// Diagnostic message
        message: String,
        /// Raw response, when the service answered at all
        response: Option<DetailedResponse>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record store-related errors
    #[error("Record store error: {0}")]
    RecordStore(String),

    /// Data source or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record does not match its schema
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a client acquisition error
    pub fn client_acquisition(msg: impl Into<String>) -> Self {
        Self::ClientAcquisition(msg.into())
    }

    /// Create a remote request error
    pub fn remote_request(msg: impl Into<String>, response: Option<DetailedResponse>) -> Self {
        Self::RemoteRequest {
            message: msg.into(),
            response,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a record store error
    pub fn record_store(msg: impl Into<String>) -> Self {
        Self::RecordStore(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Raw response attached to a remote request error, if any
    pub fn response(&self) -> Option<&DetailedResponse> {
        match self {
            Self::RemoteRequest { response, .. } => response.as_ref(),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

//! Error types for the DDNS system
//!
//! This module defines all error types used throughout the crate.
//!
//! Every variant raised while talking to a provider API carries the
//! `endpoint` it failed on, so callers can tell which phase of an update
//! went wrong (for example the fetch vs. the write of a record set).

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (invalid domain, missing credentials, unknown provider)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input passed by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The outgoing request could not be built
    #[error("{endpoint}: failed creating HTTP request: {message}")]
    RequestConstruction {
        /// API endpoint the request was meant for
        endpoint: String,
        /// Underlying cause
        message: String,
    },

    /// The caller cancelled the operation while a request was in flight
    #[error("{endpoint}: request cancelled")]
    Cancelled {
        /// API endpoint that was being called
        endpoint: String,
    },

    /// The request could not be performed or its body could not be read
    #[error("{endpoint}: failed performing HTTP request: {message}")]
    Transport {
        /// API endpoint that was being called
        endpoint: String,
        /// Underlying cause
        message: String,
    },

    /// The API answered with a status code other than 200
    #[error("{endpoint}: HTTP status is {status}")]
    HttpStatus {
        /// API endpoint that was called
        endpoint: String,
        /// HTTP status code returned
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// The response body is not the JSON we expected
    #[error("{endpoint}: failed decoding response: {source}")]
    Decode {
        /// API endpoint that produced the body
        endpoint: String,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered, but the answer does not confirm success
    #[error("{endpoint}: {message}")]
    Reconciliation {
        /// API endpoint whose answer was rejected
        endpoint: String,
        /// What was wrong with the answer
        message: String,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a request construction error
    pub fn request_construction(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestConstruction {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(endpoint: impl Into<String>) -> Self {
        Self::Cancelled {
            endpoint: endpoint.into(),
        }
    }

    /// Create a transport error
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a reconciliation error
    pub fn reconciliation(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reconciliation {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// True if the operation was aborted through its cancellation token
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// True for the whole transport family (network failure, cancellation, non-200)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Cancelled { .. } | Self::Transport { .. } | Self::HttpStatus { .. }
        )
    }

    /// Raw response body attached to the error, if any
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The API endpoint this error was raised for, if it came from an API call
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::RequestConstruction { endpoint, .. }
            | Self::Cancelled { endpoint }
            | Self::Transport { endpoint, .. }
            | Self::HttpStatus { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Reconciliation { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}

/// Render a (possibly multi-line) response body on a single line.
///
/// Runs of whitespace and control characters collapse into one space.
pub fn to_single_line(s: &str) -> String {
    let mut line = String::with_capacity(s.len());
    let mut pending_space = false;

    for c in s.chars() {
        if c.is_whitespace() || c.is_control() {
            pending_space = true;
            continue;
        }
        if pending_space && !line.is_empty() {
            line.push(' ');
        }
        pending_space = false;
        line.push(c);
    }

    line
}

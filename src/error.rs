//! Error types
//!
//! Every fallible operation in the library returns [`Error`]. Transport and
//! identity failures carry their own enums so callers can tell a timeout
//! apart from a server answer, or a missing id apart from a bad payload.

use std::time::Duration;
use thiserror::Error;

use crate::client::transport::Method;

/// Library result alias
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error
#[derive(Debug, Error)]
pub enum Error {
    /// Missing path template, empty data sentinel, invalid settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Malformed JSON in a request or response body
    #[error("Invalid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// True when a single request ran past the configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(e) if e.is_timeout())
    }

    /// True only when the server answered 404. A timeout is never "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Transport(e) if e.status() == Some(404))
    }
}

/// No channel produced an id where one is required
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error(
        "Provided data does not have the '{attribute}' attribute for the object's id and the \
         client is not configured to read the object or its id from a POST response. \
         Without an id, the object cannot be managed."
    )]
    NoIdentityChannel { attribute: String },

    #[error(
        "'{attribute}' is not in the data returned by the API nor was an id passed in. \
         Keys available: [{}]",
        .available.join(", ")
    )]
    MissingAttribute {
        attribute: String,
        available: Vec<String>,
    },

    #[error("Cannot {operation} an object unless its id has been set")]
    NotSet { operation: &'static str },

    #[error("Object id is not set after create, but the object *may* have been created")]
    Unconfirmed,
}

/// Failure of a single transport call
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{method} {url} timed out after {timeout:?}")]
    Timeout {
        method: Method,
        url: String,
        timeout: Duration,
    },

    #[error("{method} {url} failed to connect after {attempts} attempt(s)")]
    Connect {
        method: Method,
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}")]
    Status {
        method: Method,
        url: String,
        status: u16,
        body: String,
    },

    #[error("{method} {url} failed")]
    Request {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    /// HTTP status, when the server actually answered
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

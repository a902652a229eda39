//! Error types for the CIMI client.
//!
//! This module provides a unified error type with explicit variants for
//! client-side, provider, unsupported-operation, lookup and input errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for CIMI operations.
///
/// None of these are retried or swallowed by the library. A job that ends
/// in `FAILED` is not an error; it is reported through [`Job`](crate::Job).
#[derive(Debug, Error)]
pub enum Error {
    /// Local or transport failure (no connection, malformed response).
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// The provider answered with an error status.
    #[error("provider error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The provider does not advertise the collection or operation needed.
    #[error("unsupported operation: {0}")]
    Unsupported(#[from] UnsupportedOperation),

    /// A lookup by name matched no resource.
    #[error("no {kind} named '{name}'")]
    NotFound { kind: &'static str, name: String },

    /// Input validation errors (bad endpoint URL, empty reference).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Shorthand for a malformed provider response.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::Client(ClientError::MalformedResponse {
            message: message.into(),
        })
    }

    /// True for any flavor of [`UnsupportedOperation`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }

    /// True for a name lookup miss or a provider 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Protocol(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::malformed(err.to_string())
    }
}

/// Client-side errors: the request never produced a usable provider answer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The provider answered with a body the client could not interpret.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },
}

/// Error status returned by the provider.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the provider.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Check if the provider reported an unknown reference.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// The provider does not advertise what an operation needs.
#[derive(Debug, Error)]
pub enum UnsupportedOperation {
    /// The entry point does not list this collection at all.
    #[error("provider does not support {collection}")]
    Collection { collection: String },

    /// The resource or collection does not advertise the operation.
    #[error("'{operation}' is not supported by {resource}")]
    Operation { operation: String, resource: String },

    /// The action is not legal in the resource's current state.
    #[error("illegal operation '{operation}' on {resource}")]
    IllegalOperation { operation: String, resource: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid endpoint URL.
    #[error("invalid endpoint URL '{value}': {reason}")]
    EndpointUrl { value: String, reason: String },

    /// Invalid resource reference.
    #[error("invalid reference '{value}': {reason}")]
    Reference { value: String, reason: String },
}

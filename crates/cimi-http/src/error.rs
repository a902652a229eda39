//! Mapping of HTTP failures onto the core error type.

use cimi_core::{ClientError, Error, ProtocolError};
use serde::Deserialize;

/// JSON error body some providers send alongside an error status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub(crate) fn client_error(err: reqwest::Error) -> Error {
    let client = if err.is_timeout() {
        ClientError::Timeout
    } else if err.is_connect() {
        ClientError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        ClientError::MalformedResponse {
            message: err.to_string(),
        }
    } else {
        ClientError::Http {
            message: err.to_string(),
        }
    };
    client.into()
}

/// Builds a protocol error from an error status and its raw body.
///
/// A JSON `message` wins; otherwise any non-blank text body is used.
pub(crate) fn protocol_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        });
    ProtocolError::new(status, message).into()
}

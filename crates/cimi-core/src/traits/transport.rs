//! Transport trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::query::QueryParams;
use crate::types::EndpointUrl;

/// The wire beneath the protocol layer.
///
/// Paths are relative to [`endpoint`](Transport::endpoint) (see
/// [`EndpointUrl::extract_path`]). Implementations report connection or
/// decoding failures as [`ClientError`](crate::error::ClientError) and
/// provider error statuses as [`ProtocolError`](crate::error::ProtocolError).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the provider endpoint this transport talks to.
    fn endpoint(&self) -> &EndpointUrl;

    /// Read a representation.
    async fn get(&self, path: &str, params: &QueryParams) -> Result<Value>;

    /// Send a payload. `None` when the provider answered without a body.
    async fn post(&self, path: &str, payload: &Value) -> Result<Option<Value>>;

    /// Delete a resource. `None` when the provider answered without a body.
    async fn delete(&self, path: &str) -> Result<Option<Value>>;
}

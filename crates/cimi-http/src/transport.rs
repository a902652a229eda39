//! reqwest-backed [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use cimi_core::{EndpointUrl, Error, QueryParams, Result, Transport};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::credentials::Credentials;
use crate::error::{client_error, protocol_error};

/// CIMI version announced on every request.
pub const SPECIFICATION_VERSION: &str = "1.0.1";

const VERSION_HEADER: &str = "cimi-specification-version";

/// HTTP transport for a CIMI provider.
///
/// Sends JSON, asks for JSON, and authenticates with basic auth when
/// credentials are set. Relative paths are resolved against the endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: EndpointUrl,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport for `endpoint` without credentials.
    pub fn new(endpoint: EndpointUrl) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            VERSION_HEADER,
            HeaderValue::from_static(SPECIFICATION_VERSION),
        );

        let client = reqwest::Client::builder()
            .user_agent(concat!("cimi/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(client_error)?;

        Ok(Self {
            client,
            endpoint,
            credentials: None,
            timeout: None,
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Per-request timeout. Requests that exceed it fail with
    /// [`ClientError::Timeout`](cimi_core::ClientError::Timeout).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.credentials {
            Some(c) => request.basic_auth(c.username(), Some(c.password())),
            None => request,
        };
        match self.timeout {
            Some(t) => request.timeout(t),
            None => request,
        }
    }

    /// Reads the body, turning error statuses into protocol errors.
    ///
    /// Returns `None` for 204 or a blank body.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Option<Value>> {
        let status = response.status();
        trace!(status = %status, "CIMI response");

        let body = response.text().await.map_err(client_error)?;
        if !status.is_success() {
            return Err(protocol_error(status.as_u16(), &body));
        }
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| Error::malformed(format!("response is not JSON: {}", e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    #[instrument(skip(self, params), fields(endpoint = %self.endpoint))]
    async fn get(&self, path: &str, params: &QueryParams) -> Result<Value> {
        let url = self.endpoint.url_for(path);
        let query = params.to_query_pairs();
        debug!(%url, "CIMI GET");
        trace!(?query, "query parameters");

        let response = self
            .prepare(self.client.get(&url).query(&query))
            .send()
            .await
            .map_err(client_error)?;

        self.handle_response(response)
            .await?
            .ok_or_else(|| Error::malformed(format!("empty body from GET {}", url)))
    }

    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    async fn post(&self, path: &str, payload: &Value) -> Result<Option<Value>> {
        let url = self.endpoint.url_for(path);
        debug!(%url, "CIMI POST");

        let response = self
            .prepare(self.client.post(&url).json(payload))
            .send()
            .await
            .map_err(client_error)?;

        self.handle_response(response).await
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn delete(&self, path: &str) -> Result<Option<Value>> {
        let url = self.endpoint.url_for(path);
        debug!(%url, "CIMI DELETE");

        let response = self
            .prepare(self.client.delete(&url))
            .send()
            .await
            .map_err(client_error)?;

        self.handle_response(response).await
    }
}

//! Connected client: transport plus the provider's entry point.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::Result;
use crate::query::QueryParams;
use crate::repr::Representation;
use crate::resource::ResourceClient;
use crate::traits::{ResourceKind, Transport};
use crate::types::{EndpointUrl, Reference};

/// Path of the cloud entry point, relative to the endpoint.
pub const CLOUD_ENTRY_POINT: &str = "cloudEntryPoint";

/// The root document listing the collections a provider implements.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudEntryPoint {
    repr: Representation,
}

impl CloudEntryPoint {
    pub fn new(repr: Representation) -> Self {
        Self { repr }
    }

    /// Reference of the collection under `key`, if the provider has it.
    ///
    /// Collections are advertised as `{"href": ...}` links; plain string
    /// attributes such as `name` never count.
    pub fn collection(&self, key: &str) -> Option<Reference> {
        self.repr
            .get(key)
            .filter(|v| v.is_object())
            .and_then(|_| self.repr.ref_attr(key))
    }

    pub fn supports(&self, key: &str) -> bool {
        self.collection(key).is_some()
    }

    /// Every advertised collection, by key.
    pub fn collections(&self) -> Vec<(&str, Reference)> {
        self.repr
            .attributes()
            .keys()
            .filter_map(|k| self.collection(k).map(|r| (k.as_str(), r)))
            .collect()
    }

    pub fn name(&self) -> Option<&str> {
        self.repr.str_attr("name")
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.repr.str_attr("baseURI")
    }

    pub fn representation(&self) -> &Representation {
        &self.repr
    }
}

/// A connected CIMI client.
///
/// Cheap to clone; the transport and entry point are shared read-only.
/// Every resource handle keeps a clone so it can refresh itself.
#[derive(Clone)]
pub struct CimiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    entry_point: CloudEntryPoint,
}

impl CimiClient {
    /// Fetch the entry point and return a connected client.
    pub async fn connect<T: Transport + 'static>(transport: T) -> Result<Self> {
        Self::connect_shared(Arc::new(transport)).await
    }

    /// Like [`connect`](Self::connect), for an already shared transport.
    #[instrument(skip(transport), fields(endpoint = %transport.endpoint()))]
    pub async fn connect_shared(transport: Arc<dyn Transport>) -> Result<Self> {
        debug!("Fetching cloud entry point");
        let body = transport
            .get(CLOUD_ENTRY_POINT, &QueryParams::none())
            .await?;
        let entry_point = CloudEntryPoint::new(Representation::from_value(body)?);
        trace!(collections = ?entry_point.collections(), "entry point");

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                entry_point,
            }),
        })
    }

    pub fn endpoint(&self) -> &EndpointUrl {
        self.inner.transport.endpoint()
    }

    pub fn entry_point(&self) -> &CloudEntryPoint {
        &self.inner.entry_point
    }

    /// Normalizes an href into a path relative to the endpoint.
    pub fn extract_path(&self, href: &str) -> String {
        self.endpoint().extract_path(href)
    }

    /// Generic CRUD surface for resource kind `K`.
    pub fn resources<K: ResourceKind>(&self) -> ResourceClient<K> {
        ResourceClient::new(self.clone())
    }

    pub(crate) async fn get(
        &self,
        href: &Reference,
        params: &QueryParams,
    ) -> Result<Representation> {
        let path = self.extract_path(href.as_str());
        let body = self.inner.transport.get(&path, params).await?;
        Representation::from_value(body)
    }

    pub(crate) async fn post(&self, href: &Reference, payload: &Value) -> Result<Option<Value>> {
        let path = self.extract_path(href.as_str());
        self.inner.transport.post(&path, payload).await
    }

    pub(crate) async fn delete(&self, href: &Reference) -> Result<Option<Value>> {
        let path = self.extract_path(href.as_str());
        self.inner.transport.delete(&path).await
    }
}

impl fmt::Debug for CimiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CimiClient")
            .field("endpoint", self.endpoint())
            .field("entry_point", &self.inner.entry_point.name())
            .finish()
    }
}

//! Generic CRUD surface over one resource kind.

use std::marker::PhantomData;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::Result;
use crate::client::CimiClient;
use crate::error::{Error, UnsupportedOperation};
use crate::job::Job;
use crate::operation::{self, ActionRequest};
use crate::query::QueryParams;
use crate::repr::Representation;
use crate::traits::ResourceKind;
use crate::types::Reference;

use super::{CreateResult, Outcome, ResourceHandle};

/// Get, list, create, delete and act on resources of kind `K`.
///
/// Obtained from [`CimiClient::resources`].
pub struct ResourceClient<K> {
    client: CimiClient,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> ResourceClient<K> {
    pub(crate) fn new(client: CimiClient) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    /// Reference of this kind's top-level collection.
    ///
    /// Answered from the entry point fetched at connect time, so no request
    /// is made.
    ///
    /// # Errors
    ///
    /// [`UnsupportedOperation::Collection`] if the kind has no top-level
    /// collection or the provider does not advertise it.
    pub fn collection(&self) -> Result<Reference> {
        K::COLLECTION
            .and_then(|key| self.client.entry_point().collection(key))
            .ok_or_else(|| {
                UnsupportedOperation::Collection {
                    collection: K::COLLECTION.unwrap_or(K::ARRAY_KEY).to_string(),
                }
                .into()
            })
    }

    /// Fetch one resource by reference.
    pub async fn get_by_reference(
        &self,
        reference: &Reference,
        params: &QueryParams,
    ) -> Result<ResourceHandle<K>> {
        ResourceHandle::fetch_by_reference(&self.client, reference, params).await
    }

    /// Fetch one page of the top-level collection.
    ///
    /// Only the `$first`/`$last` window in `params` is returned; walking
    /// further pages is up to the caller.
    pub async fn list(&self, params: &QueryParams) -> Result<Vec<ResourceHandle<K>>> {
        let collection = self.collection()?;
        self.list_at(&collection, params).await
    }

    /// Fetch one page of the collection at `collection`, e.g. a machine's
    /// disks.
    ///
    /// A `$select` without `id` is widened to include it.
    #[instrument(skip(self, params), fields(kind = K::NAME, %collection))]
    pub async fn list_at(
        &self,
        collection: &Reference,
        params: &QueryParams,
    ) -> Result<Vec<ResourceHandle<K>>> {
        let doc = self.client.get(collection, &params.keeping_id()).await?;
        let members = doc
            .array(K::ARRAY_KEY)
            .iter()
            .cloned()
            .map(|item| {
                ResourceHandle::from_representation(
                    self.client.clone(),
                    Representation::from_value(item)?,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(count = members.len(), "Listed collection");
        Ok(members)
    }

    /// Create a resource by posting `payload` to the collection's `add`
    /// operation.
    ///
    /// # Errors
    ///
    /// [`UnsupportedOperation`] if the entry point lacks the collection
    /// (checked before any request) or the collection does not advertise
    /// `add`.
    #[instrument(skip(self, payload), fields(kind = K::NAME))]
    pub async fn create<P>(&self, payload: &P) -> Result<CreateResult<K>>
    where
        P: Serialize + ?Sized,
    {
        let collection = self.collection()?;
        let doc = self.client.get(&collection, &QueryParams::none()).await?;
        let add = operation::find_operation(operation::ADD, &doc).ok_or_else(|| {
            UnsupportedOperation::Operation {
                operation: operation::ADD.to_string(),
                resource: format!("{} collection {}", K::NAME, collection),
            }
        })?;

        info!(%add, "Creating resource");
        let body = serde_json::to_value(payload)?;
        let response = self.client.post(add, &body).await?;
        Ok(Outcome::classify(&self.client, response)?.into_create_result())
    }

    /// Delete `handle` through its advertised `delete` operation.
    #[instrument(skip(self, handle), fields(kind = K::NAME, reference = %handle.reference()))]
    pub async fn delete(&self, handle: &ResourceHandle<K>) -> Result<Option<Job>> {
        let href = handle.require_operation(operation::DELETE, false)?;
        info!(%href, "Deleting resource");
        let response = self.client.delete(href).await?;
        Ok(Outcome::<K>::classify(&self.client, response)?.into_job())
    }

    /// Send an action request through the matching advertised operation.
    ///
    /// # Errors
    ///
    /// [`UnsupportedOperation::IllegalOperation`] without any request when
    /// the representation does not advertise the action.
    #[instrument(skip(self, handle, request), fields(kind = K::NAME, reference = %handle.reference(), action = %request.action))]
    pub async fn invoke(
        &self,
        handle: &ResourceHandle<K>,
        request: &ActionRequest,
    ) -> Result<Outcome<K>> {
        let href = handle.require_operation(&request.action, true)?;
        info!(%href, "Invoking action");
        let body = serde_json::to_value(request)?;
        let response = self.client.post(href, &body).await?;
        Outcome::classify(&self.client, response)
    }

    /// Resolve a user token that is either a reference or a name.
    ///
    /// Names go through a filtered list. When several resources share the
    /// name, the first one in provider order wins; that is the only
    /// disambiguation the protocol allows.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no resource has that name.
    pub async fn find_by_name_or_reference(
        &self,
        token: &str,
        params: &QueryParams,
    ) -> Result<ResourceHandle<K>> {
        if Reference::looks_like_reference(token) {
            let reference = Reference::new(token)?;
            return self.get_by_reference(&reference, params).await;
        }

        let filtered = params.to_builder().filter(name_filter(token)).build();
        let matches = self.list(&filtered).await?;
        if matches.len() > 1 {
            debug!(
                kind = K::NAME,
                name = token,
                count = matches.len(),
                "Several resources share this name, using the first"
            );
        }
        matches.into_iter().next().ok_or_else(|| Error::NotFound {
            kind: K::NAME,
            name: token.to_string(),
        })
    }

    pub fn client(&self) -> &CimiClient {
        &self.client
    }
}

impl<K> Clone for ResourceClient<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _kind: PhantomData,
        }
    }
}

/// `name='<token>'`, switching to double quotes if the name has a `'`.
pub(crate) fn name_filter(name: &str) -> String {
    if name.contains('\'') {
        format!("name=\"{}\"", name)
    } else {
        format!("name='{}'", name)
    }
}

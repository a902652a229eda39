//! Typed handle over a remote resource.

use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::Result;
use crate::client::CimiClient;
use crate::error::{Error, UnsupportedOperation};
use crate::job::Job;
use crate::operation::{self, Action, ActionRequest};
use crate::query::QueryParams;
use crate::repr::Representation;
use crate::traits::ResourceKind;
use crate::types::Reference;

use super::Outcome;

/// A remote resource: its reference plus its last-fetched representation.
///
/// A handle is a single-owner value. Refreshing replaces the
/// representation wholesale; only [`refresh_relation`] merges.
///
/// [`refresh_relation`]: ResourceHandle::refresh_relation
pub struct ResourceHandle<K> {
    client: CimiClient,
    reference: Reference,
    repr: Representation,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> ResourceHandle<K> {
    /// Wrap a representation the provider already returned.
    ///
    /// # Errors
    ///
    /// Fails with a malformed-response error if the representation carries
    /// neither `href` nor `id`.
    pub fn from_representation(client: CimiClient, repr: Representation) -> Result<Self> {
        let reference = repr.reference().ok_or_else(|| {
            Error::malformed(format!("{} representation has no href or id", K::NAME))
        })?;
        Ok(Self {
            client,
            reference,
            repr,
            _kind: PhantomData,
        })
    }

    /// Read the resource at `reference`.
    #[instrument(skip(client, params), fields(kind = K::NAME, %reference))]
    pub async fn fetch_by_reference(
        client: &CimiClient,
        reference: &Reference,
        params: &QueryParams,
    ) -> Result<Self> {
        debug!("Fetching resource");
        let repr = client.get(reference, params).await?;
        // A narrow $select may leave out id and href.
        let reference = repr.reference().unwrap_or_else(|| reference.clone());
        Ok(Self {
            client: client.clone(),
            reference,
            repr,
            _kind: PhantomData,
        })
    }

    /// Re-read this resource, replacing the representation wholesale.
    #[instrument(skip(self, params), fields(kind = K::NAME, reference = %self.reference))]
    pub async fn refresh(&mut self, params: &QueryParams) -> Result<()> {
        debug!("Refreshing resource");
        self.repr = self.client.get(&self.reference, params).await?;
        Ok(())
    }

    /// Re-fetch the collection behind relation `relation` and merge it into
    /// the representation in place.
    ///
    /// Used when the provider returned the relation as a bare reference
    /// instead of inline members.
    #[instrument(skip(self, params), fields(kind = K::NAME, reference = %self.reference))]
    pub async fn refresh_relation(&mut self, relation: &str, params: &QueryParams) -> Result<()> {
        let href = self.repr.ref_attr(relation).ok_or_else(|| {
            Error::malformed(format!(
                "{} {} has no '{}' relation",
                K::NAME,
                self.reference,
                relation
            ))
        })?;
        debug!(relation, %href, "Refreshing relation");
        let fetched = self.client.get(&href, &params.keeping_id()).await?;
        self.repr.merge_relation(relation, fetched);
        Ok(())
    }

    /// Typed handles for the members currently held in relation `relation`.
    pub fn relation_members<R: ResourceKind>(
        &self,
        relation: &str,
    ) -> Result<Vec<ResourceHandle<R>>> {
        let members = self
            .repr
            .get(relation)
            .and_then(|rel| rel.get(R::ARRAY_KEY))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        members
            .into_iter()
            .map(|item| {
                ResourceHandle::from_representation(
                    self.client.clone(),
                    Representation::from_value(item)?,
                )
            })
            .collect()
    }

    /// Normalizes an href into a path relative to the provider endpoint.
    pub fn extract_path(&self, href: &str) -> String {
        self.client.extract_path(href)
    }

    /// The advertised reference for operation `name`, if currently legal.
    pub fn find_operation(&self, name: &str) -> Option<&Reference> {
        operation::find_operation(name, &self.repr)
    }

    /// Perform `action`, failing before any request if it isn't advertised.
    ///
    /// A resource returned directly replaces this handle's representation.
    /// Returns the job when the provider tracks the action asynchronously.
    pub async fn perform(&mut self, action: Action) -> Result<Option<Job>> {
        self.perform_request(ActionRequest::new(action)).await
    }

    /// Like [`perform`](Self::perform) with a caller-built payload.
    pub async fn perform_request(&mut self, request: ActionRequest) -> Result<Option<Job>> {
        let outcome = self.client.resources::<K>().invoke(self, &request).await?;
        match outcome {
            Outcome::Resource(updated) if updated.reference == self.reference => {
                self.repr = updated.repr;
                Ok(None)
            }
            Outcome::Resource(_) | Outcome::Empty => Ok(None),
            Outcome::Job(job) => Ok(Some(job)),
        }
    }

    /// Delete this resource. Fails if `delete` is not advertised.
    pub async fn delete(&self) -> Result<Option<Job>> {
        self.client.resources::<K>().delete(self).await
    }

    pub(crate) fn require_operation(&self, name: &str, illegal: bool) -> Result<&Reference> {
        self.find_operation(name).ok_or_else(|| {
            let operation = name.to_string();
            let resource = self.describe();
            if illegal {
                UnsupportedOperation::IllegalOperation { operation, resource }.into()
            } else {
                UnsupportedOperation::Operation { operation, resource }.into()
            }
        })
    }

    pub(crate) fn describe(&self) -> String {
        format!("{} {}", K::NAME, self.reference)
    }

    pub fn client(&self) -> &CimiClient {
        &self.client
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn representation(&self) -> &Representation {
        &self.repr
    }

    pub fn into_representation(self) -> Representation {
        self.repr
    }

    pub fn id(&self) -> Option<&str> {
        self.repr.str_attr("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.repr.str_attr("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.repr.str_attr("description")
    }

    pub fn created(&self) -> Option<&str> {
        self.repr.str_attr("created")
    }

    pub fn updated(&self) -> Option<&str> {
        self.repr.str_attr("updated")
    }

    pub fn properties(&self) -> Vec<(String, String)> {
        self.repr.properties()
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.repr.get(name)
    }

    /// Provider- or type-specific attributes beyond the typed accessors.
    pub fn extension_attributes(&self) -> Vec<(&str, &Value)> {
        self.repr.extension_attributes(K::ATTRIBUTES)
    }
}

impl<K> Clone for ResourceHandle<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            reference: self.reference.clone(),
            repr: self.repr.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for ResourceHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = std::any::type_name::<K>();
        f.debug_struct("ResourceHandle")
            .field("kind", &kind.rsplit("::").next().unwrap_or(kind))
            .field("reference", &self.reference)
            .field("representation", &self.repr)
            .finish()
    }
}

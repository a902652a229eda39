//! Credentials.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::traits::ResourceKind;

/// Marker for the `credentials` collection.
///
/// Credential content is provider-defined (user name, public key, ...)
/// and is read through
/// [`extension_attributes`](crate::ResourceHandle::extension_attributes).
#[derive(Debug, Clone, Copy)]
pub struct Credential;

impl ResourceKind for Credential {
    const NAME: &'static str = "Credential";
    const COLLECTION: Option<&'static str> = Some("credentials");
    const ARRAY_KEY: &'static str = "credentials";
}

/// Creation parameters for a credential.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCreate {
    #[serde(rename = "resourceURI")]
    resource_uri: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    pub credential_template: Map<String, Value>,
}

impl CredentialCreate {
    pub fn new() -> Self {
        Self {
            resource_uri: "http://schemas.dmtf.org/cimi/1/CredentialCreate",
            name: None,
            description: None,
            properties: BTreeMap::new(),
            credential_template: Map::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// User name and password credential.
    pub fn user_password(self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.template_field("userName", user.into())
            .template_field("password", password.into())
    }

    /// Public key credential.
    pub fn public_key(self, key: impl Into<String>) -> Self {
        self.template_field("key", key.into())
    }

    /// Any other provider-specific template field.
    pub fn template_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.credential_template.insert(key.into(), value.into());
        self
    }
}

impl Default for CredentialCreate {
    fn default() -> Self {
        Self::new()
    }
}

// Keep secrets out of logs.
impl fmt::Debug for CredentialCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let template_fields: Vec<_> = self.credential_template.keys().collect();
        f.debug_struct("CredentialCreate")
            .field("name", &self.name)
            .field("template_fields", &template_fields)
            .finish()
    }
}

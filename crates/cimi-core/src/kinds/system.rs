//! Systems: machines, volumes and networks managed as one unit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::job::Job;
use crate::operation::Action;
use crate::query::QueryParams;
use crate::resource::ResourceHandle;
use crate::traits::ResourceKind;
use crate::types::Reference;

use super::{SystemMachine, enum_attr};

/// Marker for the `systems` collection.
#[derive(Debug, Clone, Copy)]
pub struct System;

impl ResourceKind for System {
    const NAME: &'static str = "System";
    const COLLECTION: Option<&'static str> = Some("systems");
    const ARRAY_KEY: &'static str = "systems";
    const ATTRIBUTES: &'static [&'static str] = &[
        "state",
        "machines",
        "systems",
        "volumes",
        "networks",
        "credentials",
    ];
}

/// System state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemState {
    Creating,
    Created,
    Starting,
    Started,
    Stopping,
    Stopped,
    Pausing,
    Paused,
    Suspending,
    Suspended,
    Mixed,
    Deleting,
    Deleted,
    Error,
}

impl ResourceHandle<System> {
    pub fn state(&self) -> Option<SystemState> {
        enum_attr(self.representation(), "state")
    }

    /// Starts this system. Illegal unless the provider advertises `start`.
    pub async fn start(&mut self) -> Result<Option<Job>> {
        self.perform(Action::Start).await
    }

    /// Stops this system. Illegal unless the provider advertises `stop`.
    pub async fn stop(&mut self) -> Result<Option<Job>> {
        self.perform(Action::Stop).await
    }

    /// Machines of this system, with each member's machine expanded.
    pub async fn machines(&mut self) -> Result<Vec<ResourceHandle<SystemMachine>>> {
        let params = QueryParams::builder().expand("machine").build();
        self.refresh_relation("machines", &params).await?;
        self.relation_members("machines")
    }
}

/// Creation parameters for a system.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemCreate {
    #[serde(rename = "resourceURI")]
    resource_uri: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_template: Option<Value>,
}

impl SystemCreate {
    pub fn new() -> Self {
        Self {
            resource_uri: "http://schemas.dmtf.org/cimi/1/SystemCreate",
            name: None,
            description: None,
            properties: BTreeMap::new(),
            system_template: None,
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

    /// Builds the system from an existing template.
    pub fn template(mut self, template: &Reference) -> Self {
        self.system_template = Some(template.to_link());
        self
    }
}

impl Default for SystemCreate {
    fn default() -> Self {
        Self::new()
    }
}

//! Operation discovery and action requests.
//!
//! A provider advertises what can be done to a resource *right now* by
//! listing operations in its representation. Nothing here models resource
//! state: if the link is absent, the operation is not legal.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::repr::Representation;
use crate::types::Reference;

/// Operation name for creating a member of a collection.
pub const ADD: &str = "add";

/// Operation name for updating a resource.
pub const EDIT: &str = "edit";

/// Operation name for deleting a resource.
pub const DELETE: &str = "delete";

const ACTION_BASE: &str = "http://schemas.dmtf.org/cimi/1/action/";

/// Finds the reference advertised for operation `name`, if any.
///
/// Matching is exact on the operation name.
pub fn find_operation<'a>(name: &str, repr: &'a Representation) -> Option<&'a Reference> {
    repr.operations()
        .iter()
        .find(|op| op.name == name)
        .map(|op| &op.href)
}

/// Standard CIMI actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Pause,
    Suspend,
    Capture,
    Export,
}

impl Action {
    /// Short verb, e.g. `start`.
    pub fn verb(self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Pause => "pause",
            Action::Suspend => "suspend",
            Action::Capture => "capture",
            Action::Export => "export",
        }
    }

    /// Full action URI used both as operation name and request payload.
    pub fn path(self) -> String {
        format!("{}{}", ACTION_BASE, self.verb())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Body of an action request: `{"action": "<uri>", ...properties}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl ActionRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action: action.path(),
            properties: Map::new(),
        }
    }

    /// Adds an extra payload field, e.g. `force` on stop.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

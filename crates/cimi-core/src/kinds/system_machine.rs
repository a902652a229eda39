//! Membership of a machine in a system.

use serde_json::Value;

use crate::Result;
use crate::repr::Representation;
use crate::resource::ResourceHandle;
use crate::traits::ResourceKind;
use crate::types::Reference;

use super::Machine;

/// Marker for a system's `machines` sub-collection.
#[derive(Debug, Clone, Copy)]
pub struct SystemMachine;

impl ResourceKind for SystemMachine {
    const NAME: &'static str = "SystemMachine";
    const COLLECTION: Option<&'static str> = None;
    const ARRAY_KEY: &'static str = "systemMachines";
    const ATTRIBUTES: &'static [&'static str] = &["machine"];
}

impl ResourceHandle<SystemMachine> {
    /// Reference of the member machine.
    pub fn machine_ref(&self) -> Option<Reference> {
        self.representation().ref_attr("machine")
    }

    /// The member machine, when the provider expanded it inline.
    ///
    /// Returns `Ok(None)` if only the reference was sent.
    pub fn machine(&self) -> Result<Option<ResourceHandle<Machine>>> {
        let Some(inline) = self.attribute("machine").filter(|m| is_expanded(m)) else {
            return Ok(None);
        };
        let repr = Representation::from_value(inline.clone())?;
        ResourceHandle::from_representation(self.client().clone(), repr).map(Some)
    }
}

/// A link carrying more than its `href`.
fn is_expanded(link: &Value) -> bool {
    match link.as_object() {
        Some(fields) => fields.keys().any(|k| k != "href"),
        None => false,
    }
}

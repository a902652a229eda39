//! Volume attachments.

use crate::resource::ResourceHandle;
use crate::traits::ResourceKind;
use crate::types::Reference;

/// Marker for a machine's `volumes` sub-collection.
///
/// Deleting a machine volume detaches the volume; the volume itself stays.
#[derive(Debug, Clone, Copy)]
pub struct MachineVolume;

impl ResourceKind for MachineVolume {
    const NAME: &'static str = "MachineVolume";
    const COLLECTION: Option<&'static str> = None;
    const ARRAY_KEY: &'static str = "machineVolumes";
    const ATTRIBUTES: &'static [&'static str] = &["volume", "initialLocation"];
}

impl ResourceHandle<MachineVolume> {
    /// The attached volume.
    pub fn volume(&self) -> Option<Reference> {
        self.representation().ref_attr("volume")
    }

    pub fn initial_location(&self) -> Option<&str> {
        self.representation().str_attr("initialLocation")
    }
}

//! Machine disks.

use crate::resource::ResourceHandle;
use crate::traits::ResourceKind;

/// Marker for a machine's `disks` sub-collection.
#[derive(Debug, Clone, Copy)]
pub struct Disk;

impl ResourceKind for Disk {
    const NAME: &'static str = "Disk";
    const COLLECTION: Option<&'static str> = None;
    const ARRAY_KEY: &'static str = "disks";
    const ATTRIBUTES: &'static [&'static str] = &["capacity", "initialLocation"];
}

impl ResourceHandle<Disk> {
    /// Capacity in KB.
    pub fn capacity(&self) -> Option<i64> {
        self.representation().i64_attr("capacity")
    }

    /// Where the disk is mounted inside the guest, if known.
    pub fn initial_location(&self) -> Option<&str> {
        self.representation().str_attr("initialLocation")
    }
}

//! Volumes.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceHandle;
use crate::traits::ResourceKind;

use super::enum_attr;

/// Marker for the `volumes` collection.
#[derive(Debug, Clone, Copy)]
pub struct Volume;

impl ResourceKind for Volume {
    const NAME: &'static str = "Volume";
    const COLLECTION: Option<&'static str> = Some("volumes");
    const ARRAY_KEY: &'static str = "volumes";
    const ATTRIBUTES: &'static [&'static str] =
        &["state", "type", "capacity", "bootable", "images"];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeState {
    Creating,
    Available,
    Capturing,
    Deleting,
    Error,
}

impl ResourceHandle<Volume> {
    pub fn state(&self) -> Option<VolumeState> {
        enum_attr(self.representation(), "state")
    }

    /// Capacity in KB.
    pub fn capacity(&self) -> Option<i64> {
        self.representation().i64_attr("capacity")
    }

    pub fn bootable(&self) -> Option<bool> {
        self.representation().bool_attr("bootable")
    }
}

//! Machine images.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceHandle;
use crate::traits::ResourceKind;
use crate::types::Reference;

use super::enum_attr;

/// Marker for the `machineImages` collection.
#[derive(Debug, Clone, Copy)]
pub struct MachineImage;

impl ResourceKind for MachineImage {
    const NAME: &'static str = "MachineImage";
    const COLLECTION: Option<&'static str> = Some("machineImages");
    const ARRAY_KEY: &'static str = "machineImages";
    const ATTRIBUTES: &'static [&'static str] =
        &["state", "type", "imageLocation", "relatedImage"];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineImageState {
    Creating,
    Available,
    Deleting,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineImageType {
    Image,
    Snapshot,
    PartialSnapshot,
}

impl ResourceHandle<MachineImage> {
    pub fn state(&self) -> Option<MachineImageState> {
        enum_attr(self.representation(), "state")
    }

    pub fn image_type(&self) -> Option<MachineImageType> {
        enum_attr(self.representation(), "type")
    }

    /// Provider-specific location of the image bits.
    pub fn image_location(&self) -> Option<String> {
        let repr = self.representation();
        repr.str_attr("imageLocation")
            .map(str::to_string)
            .or_else(|| repr.ref_attr("imageLocation").map(|r| r.to_string()))
    }

    /// The image this one was derived from.
    pub fn related_image(&self) -> Option<Reference> {
        self.representation().ref_attr("relatedImage")
    }
}

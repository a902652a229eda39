//! Resource kinds.
//!
//! Each kind is a marker type implementing
//! [`ResourceKind`](crate::ResourceKind) plus typed accessors on
//! `ResourceHandle<Kind>`. All protocol behavior comes from the generic
//! [`ResourceHandle`](crate::ResourceHandle) and
//! [`ResourceClient`](crate::ResourceClient).

mod credential;
mod disk;
mod machine;
mod machine_image;
mod machine_volume;
mod system;
mod system_machine;
mod volume;

use serde::de::DeserializeOwned;

use crate::repr::Representation;

pub use credential::{Credential, CredentialCreate};
pub use disk::Disk;
pub use machine::{Machine, MachineState};
pub use machine_image::{MachineImage, MachineImageState, MachineImageType};
pub use machine_volume::MachineVolume;
pub use system::{System, SystemCreate, SystemState};
pub use system_machine::SystemMachine;
pub use volume::{Volume, VolumeState};

/// `Display` as the wire name, e.g. `STARTED`.
macro_rules! display_as_wire_name {
    ($($ty:ty),* $(,)?) => {$(
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match serde_json::to_value(self) {
                    Ok(serde_json::Value::String(name)) => f.write_str(&name),
                    _ => write!(f, "{:?}", self),
                }
            }
        }
    )*};
}

display_as_wire_name!(
    MachineImageState,
    MachineImageType,
    MachineState,
    SystemState,
    VolumeState,
);

/// Reads an enum-valued attribute. Unknown values read as `None`.
fn enum_attr<T: DeserializeOwned>(repr: &Representation, name: &str) -> Option<T> {
    repr.get(name)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

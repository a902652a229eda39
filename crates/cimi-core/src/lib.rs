//! cimi-core - Resource, query and job protocol layer for CIMI clients.
//!
//! A [`CimiClient`] sits on top of any [`Transport`] and exposes provider
//! resources as typed [`ResourceHandle`]s. What a handle may do is decided
//! by the operations the provider advertises, never by local state.

pub mod client;
pub mod error;
pub mod job;
pub mod kinds;
pub mod operation;
pub mod query;
pub mod repr;
pub mod resource;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{CimiClient, CloudEntryPoint};
pub use error::{ClientError, Error, InvalidInputError, ProtocolError, UnsupportedOperation};
pub use job::{Job, JobResource, JobStatus};
pub use kinds::{
    Credential, CredentialCreate, Disk, Machine, MachineImage, MachineImageState,
    MachineImageType, MachineState, MachineVolume, System, SystemCreate, SystemMachine,
    SystemState, Volume, VolumeState,
};
pub use operation::{Action, ActionRequest};
pub use query::{QueryParams, QueryParamsBuilder};
pub use repr::{Operation, Representation};
pub use resource::{CreateResult, Outcome, ResourceClient, ResourceHandle};
pub use traits::{ResourceKind, Transport};
pub use types::{EndpointUrl, Reference};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

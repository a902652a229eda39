//! Machines.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::job::Job;
use crate::operation::{Action, ActionRequest};
use crate::query::QueryParams;
use crate::resource::ResourceHandle;
use crate::traits::ResourceKind;

use super::{Disk, MachineVolume, enum_attr};

/// Marker for the `machines` collection.
#[derive(Debug, Clone, Copy)]
pub struct Machine;

impl ResourceKind for Machine {
    const NAME: &'static str = "Machine";
    const COLLECTION: Option<&'static str> = Some("machines");
    const ARRAY_KEY: &'static str = "machines";
    const ATTRIBUTES: &'static [&'static str] = &[
        "state",
        "cpu",
        "memory",
        "disks",
        "volumes",
        "networkInterfaces",
        "latestSnapshot",
    ];
}

/// Machine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineState {
    Creating,
    Initializing,
    Starting,
    Started,
    Stopping,
    Stopped,
    Pausing,
    Paused,
    Suspending,
    Suspended,
    Capturing,
    Restoring,
    Deleting,
    Deleted,
    Error,
    Failed,
}

impl ResourceHandle<Machine> {
    pub fn state(&self) -> Option<MachineState> {
        enum_attr(self.representation(), "state")
    }

    /// Number of CPUs.
    pub fn cpu(&self) -> Option<i64> {
        self.representation().i64_attr("cpu")
    }

    /// Memory in KB.
    pub fn memory(&self) -> Option<i64> {
        self.representation().i64_attr("memory")
    }

    pub async fn start(&mut self) -> Result<Option<Job>> {
        self.perform(Action::Start).await
    }

    /// Stops the machine; `force` asks for a hard power-off.
    pub async fn stop(&mut self, force: bool) -> Result<Option<Job>> {
        let mut request = ActionRequest::new(Action::Stop);
        if force {
            request = request.with("force", true);
        }
        self.perform_request(request).await
    }

    pub async fn restart(&mut self, force: bool) -> Result<Option<Job>> {
        let mut request = ActionRequest::new(Action::Restart);
        if force {
            request = request.with("force", true);
        }
        self.perform_request(request).await
    }

    /// Disks attached to this machine.
    pub async fn disks(&mut self, params: &QueryParams) -> Result<Vec<ResourceHandle<Disk>>> {
        self.refresh_relation("disks", params).await?;
        self.relation_members("disks")
    }

    /// Volume attachments of this machine.
    pub async fn volumes(
        &mut self,
        params: &QueryParams,
    ) -> Result<Vec<ResourceHandle<MachineVolume>>> {
        self.refresh_relation("volumes", params).await?;
        self.relation_members("volumes")
    }
}

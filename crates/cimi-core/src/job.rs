//! Asynchronous jobs.
//!
//! A provider that cannot finish a mutating call right away answers with a
//! job. The job's status only changes on the provider side; the client sees
//! it by calling [`Job::refresh`], at whatever pace the caller chooses.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::Result;
use crate::client::CimiClient;
use crate::error::Error;
use crate::query::QueryParams;
use crate::repr::Representation;
use crate::resource::ResourceHandle;
use crate::traits::ResourceKind;
use crate::types::Reference;

/// Resource kind for the `jobs` collection.
#[derive(Debug, Clone, Copy)]
pub struct JobResource;

impl ResourceKind for JobResource {
    const NAME: &'static str = "Job";
    const COLLECTION: Option<&'static str> = Some("jobs");
    const ARRAY_KEY: &'static str = "jobs";
    const ATTRIBUTES: &'static [&'static str] = &[
        "status",
        "targetResource",
        "returnCode",
        "statusMessage",
        "action",
        "progress",
        "timeOfStatusChange",
        "parentJob",
        "nestedJobs",
        "affectedResources",
        "isCancellable",
    ];
}

/// Job status. `Running` is the only non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JobStatus {
    Running,
    Success,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Running => "RUNNING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "RUNNING" => Ok(JobStatus::Running),
            "SUCCESS" => Ok(JobStatus::Success),
            "FAILED" => Ok(JobStatus::Failed),
            "CANCELLED" | "CANCELED" => Ok(JobStatus::Cancelled),
            _ => Err(Error::malformed(format!("unknown job status '{}'", s))),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Typed view of a job representation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobState {
    status: JobStatus,
    #[serde(default)]
    target_resource: Option<Reference>,
    #[serde(default)]
    return_code: Option<i64>,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default, deserialize_with = "lenient_progress")]
    progress: Option<u8>,
    #[serde(default)]
    time_of_status_change: Option<String>,
}

/// Reads a percentage, rounding fractions. Anything that is not a number
/// in 0..=100 reads as unknown.
fn lenient_progress<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|p| (0.0..=100.0).contains(p))
        .map(|p| p.round() as u8))
}

impl JobState {
    fn parse(repr: &Representation) -> Result<Self> {
        if repr.get("status").is_none() {
            return Err(Error::malformed("job representation has no status"));
        }
        Ok(serde_json::from_value(Value::Object(repr.attributes().clone()))?)
    }
}

/// A provider-side asynchronous operation.
///
/// Everything but the status is fixed at creation. Once the status is
/// terminal it never changes again, and [`refresh`](Job::refresh) stops
/// going to the provider. A `FAILED` job is a normal value; inspect
/// [`return_code`](Job::return_code) and
/// [`status_message`](Job::status_message).
#[derive(Clone, Debug)]
pub struct Job {
    handle: ResourceHandle<JobResource>,
    state: JobState,
}

impl Job {
    pub(crate) fn from_representation(client: CimiClient, repr: Representation) -> Result<Self> {
        let state = JobState::parse(&repr)?;
        let handle = ResourceHandle::from_representation(client, repr)?;
        Ok(Self { handle, state })
    }

    /// Read the job at `reference`.
    pub async fn fetch(client: &CimiClient, reference: &Reference) -> Result<Self> {
        let handle = ResourceHandle::<JobResource>::fetch_by_reference(
            client,
            reference,
            &QueryParams::none(),
        )
        .await?;
        Job::try_from(handle)
    }

    /// Re-read the job and return its current status.
    ///
    /// A job already in a terminal state is not fetched again.
    #[instrument(skip(self), fields(job = %self.reference()))]
    pub async fn refresh(&mut self) -> Result<JobStatus> {
        if self.is_terminal() {
            debug!(status = %self.state.status, "Job already terminal");
            return Ok(self.state.status);
        }

        let mut handle = self.handle.clone();
        handle.refresh(&QueryParams::none()).await?;
        let state = JobState::parse(handle.representation())?;
        debug!(from = %self.state.status, to = %state.status, "Job refreshed");

        self.handle = handle;
        self.state = state;
        Ok(self.state.status)
    }

    pub fn reference(&self) -> &Reference {
        self.handle.reference()
    }

    pub fn status(&self) -> JobStatus {
        self.state.status
    }

    pub fn is_terminal(&self) -> bool {
        self.state.status.is_terminal()
    }

    pub fn is_success(&self) -> bool {
        self.state.status == JobStatus::Success
    }

    /// The resource the job operates on.
    pub fn target_resource(&self) -> Option<&Reference> {
        self.state.target_resource.as_ref()
    }

    pub fn return_code(&self) -> Option<i64> {
        self.state.return_code
    }

    pub fn status_message(&self) -> Option<&str> {
        self.state.status_message.as_deref()
    }

    /// The operation that started the job (`add`, `delete`, an action URI).
    pub fn action(&self) -> Option<&str> {
        self.state.action.as_deref()
    }

    /// Completion percentage, when the provider reports one.
    pub fn progress(&self) -> Option<u8> {
        self.state.progress
    }

    pub fn time_of_status_change(&self) -> Option<&str> {
        self.state.time_of_status_change.as_deref()
    }

    pub fn handle(&self) -> &ResourceHandle<JobResource> {
        &self.handle
    }
}

impl TryFrom<ResourceHandle<JobResource>> for Job {
    type Error = Error;

    fn try_from(handle: ResourceHandle<JobResource>) -> Result<Self> {
        let state = JobState::parse(handle.representation())?;
        Ok(Self { handle, state })
    }
}

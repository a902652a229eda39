//! Results of mutating calls.

use serde_json::Value;
use tracing::debug;

use crate::Result;
use crate::client::CimiClient;
use crate::job::Job;
use crate::repr::Representation;
use crate::traits::ResourceKind;

use super::ResourceHandle;

/// What the provider answered to a mutating call.
///
/// Providers either complete synchronously (returning the resource, or
/// nothing) or hand back a job to poll. Callers match on this instead of
/// assuming one or the other.
#[derive(Debug)]
pub enum Outcome<K> {
    /// Completed synchronously; the body was the resource.
    Resource(ResourceHandle<K>),
    /// Running asynchronously; poll the job.
    Job(Job),
    /// Completed synchronously without a usable body.
    Empty,
}

impl<K: ResourceKind> Outcome<K> {
    /// Classify a response body by its shape.
    pub(crate) fn classify(client: &CimiClient, body: Option<Value>) -> Result<Self> {
        let body = match body {
            Some(Value::Null) | None => return Ok(Outcome::Empty),
            Some(Value::Object(map)) if map.is_empty() => return Ok(Outcome::Empty),
            Some(body) => body,
        };

        let repr = Representation::from_value(body)?;
        if is_job(&repr) {
            let job = Job::from_representation(client.clone(), repr)?;
            debug!(job = %job.reference(), status = %job.status(), "Provider returned a job");
            return Ok(Outcome::Job(job));
        }

        if repr.reference().is_none() {
            debug!(kind = K::NAME, "Response body carries no reference, ignoring it");
            return Ok(Outcome::Empty);
        }

        Ok(Outcome::Resource(ResourceHandle::from_representation(client.clone(), repr)?))
    }

    pub fn job(&self) -> Option<&Job> {
        match self {
            Outcome::Job(job) => Some(job),
            _ => None,
        }
    }

    pub fn into_job(self) -> Option<Job> {
        match self {
            Outcome::Job(job) => Some(job),
            _ => None,
        }
    }

    pub fn into_create_result(self) -> CreateResult<K> {
        match self {
            Outcome::Resource(resource) => CreateResult {
                job: None,
                resource: Some(resource),
            },
            Outcome::Job(job) => CreateResult {
                job: Some(job),
                resource: None,
            },
            Outcome::Empty => CreateResult {
                job: None,
                resource: None,
            },
        }
    }
}

/// Result of a create call.
///
/// At most one side is set: a job for asynchronous creation, or the new
/// resource for synchronous creation. Both are `None` when the provider
/// answered without a body.
#[derive(Debug)]
pub struct CreateResult<K> {
    pub job: Option<Job>,
    pub resource: Option<ResourceHandle<K>>,
}

/// Job-shaped: typed as a Job, or carrying status and target together.
fn is_job(repr: &Representation) -> bool {
    if let Some(uri) = repr.resource_uri() {
        return uri.ends_with("/Job");
    }
    repr.get("status").is_some() && repr.get("targetResource").is_some()
}

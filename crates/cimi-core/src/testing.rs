//! Scripted in-memory transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::ProtocolError;
use crate::query::QueryParams;
use crate::traits::Transport;
use crate::types::EndpointUrl;
use crate::{CimiClient, Result};

pub(crate) const ENDPOINT: &str = "http://cloud.test/cimi";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Method {
    Get,
    Post,
    Delete,
}

#[derive(Clone, Debug)]
pub(crate) enum Reply {
    Body(Value),
    /// Like `Body`, but collection members keep only the `$select`ed
    /// attributes, as a strict provider does.
    Selected(Value),
    NoBody,
    Status(u16),
}

#[derive(Clone, Debug)]
pub(crate) struct Call {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

/// Replies are queued per (method, path). The last reply of a queue keeps
/// being served; unscripted routes answer 404.
pub(crate) struct FakeTransport {
    endpoint: EndpointUrl,
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        let fake = Arc::new(Self {
            endpoint: EndpointUrl::new(ENDPOINT).unwrap(),
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        });
        fake.on(
            Method::Get,
            "cloudEntryPoint",
            Reply::Body(json!({
                "id": format!("{}/cloudEntryPoint", ENDPOINT),
                "name": "test cloud",
                "systems": {"href": format!("{}/systems", ENDPOINT)},
                "machines": {"href": format!("{}/machines", ENDPOINT)},
                "jobs": {"href": format!("{}/jobs", ENDPOINT)}
            })),
        );
        fake
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls after the entry point fetch.
    pub fn calls_after_connect(&self) -> Vec<Call> {
        self.calls().into_iter().skip(1).collect()
    }

    pub async fn connect(self: &Arc<Self>) -> CimiClient {
        CimiClient::connect_shared(self.clone()).await.unwrap()
    }

    fn reply(&self, call: Call) -> Reply {
        let key = (call.method, call.path.clone());
        self.calls.lock().unwrap().push(call);
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Status(404)),
            None => Reply::Status(404),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    async fn get(&self, path: &str, params: &QueryParams) -> Result<Value> {
        let call = Call {
            method: Method::Get,
            path: path.to_string(),
            query: params.to_query_pairs(),
            body: None,
        };
        match self.reply(call) {
            Reply::Body(v) => Ok(v),
            Reply::Selected(v) => Ok(project(v, params)),
            Reply::NoBody => Ok(Value::Null),
            Reply::Status(s) => Err(ProtocolError::new(s, None).into()),
        }
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Option<Value>> {
        let call = Call {
            method: Method::Post,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(payload.clone()),
        };
        match self.reply(call) {
            Reply::Body(v) | Reply::Selected(v) => Ok(Some(v)),
            Reply::NoBody => Ok(None),
            Reply::Status(s) => Err(ProtocolError::new(s, None).into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<Option<Value>> {
        let call = Call {
            method: Method::Delete,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        };
        match self.reply(call) {
            Reply::Body(v) | Reply::Selected(v) => Ok(Some(v)),
            Reply::NoBody => Ok(None),
            Reply::Status(s) => Err(ProtocolError::new(s, None).into()),
        }
    }
}

fn project(mut doc: Value, params: &QueryParams) -> Value {
    if params.select().is_none() {
        return doc;
    }
    if let Value::Object(map) = &mut doc {
        for members in map.values_mut().filter_map(Value::as_array_mut) {
            for member in members.iter_mut().filter_map(Value::as_object_mut) {
                member.retain(|k, _| params.is_selected(k));
            }
        }
    }
    doc
}

pub(crate) fn url(path: &str) -> String {
    format!("{}/{}", ENDPOINT, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Outcome;
    use crate::error::{ClientError, Error, UnsupportedOperation};
    use crate::kinds::{Machine, MachineVolume, System, SystemCreate, SystemState, Volume};
    use crate::operation::Action;
    use crate::{Job, JobStatus};

    fn system_json(state: &str, ops: Value) -> Value {
        json!({
            "resourceURI": "http://schemas.dmtf.org/cimi/1/System",
            "id": url("systems/1"),
            "name": "web",
            "state": state,
            "machines": {"href": url("systems/1/machines")},
            "operations": ops
        })
    }

    fn job_json(status: &str) -> Value {
        json!({
            "resourceURI": "http://schemas.dmtf.org/cimi/1/Job",
            "id": url("jobs/9"),
            "status": status,
            "targetResource": {"href": url("machineVolumes/3")},
            "action": "delete"
        })
    }

    #[tokio::test]
    async fn create_system_returns_resource() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "systems",
            Reply::Body(json!({
                "id": url("systems"),
                "systems": [],
                "operations": [{"rel": "add", "href": url("systems")}]
            })),
        );
        fake.on(
            Method::Post,
            "systems",
            Reply::Body(system_json("CREATED", json!([]))),
        );
        let client = fake.connect().await;

        let created = client
            .resources::<System>()
            .create(&SystemCreate::new().name("web"))
            .await
            .unwrap();
        assert!(created.job.is_none());
        let system = created.resource.unwrap();
        assert_eq!(system.state(), Some(SystemState::Created));

        let post = fake
            .calls()
            .into_iter()
            .find(|c| c.method == Method::Post)
            .unwrap();
        assert_eq!(post.body.unwrap()["name"], "web");
    }

    #[tokio::test]
    async fn create_without_add_is_unsupported() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "systems",
            Reply::Body(json!({"id": url("systems"), "systems": []})),
        );
        let client = fake.connect().await;

        let err = client
            .resources::<System>()
            .create(&SystemCreate::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(UnsupportedOperation::Operation { .. })));
        assert!(fake.calls().iter().all(|c| c.method == Method::Get));
    }

    #[tokio::test]
    async fn illegal_action_sends_nothing() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "systems/1",
            Reply::Body(system_json(
                "STARTED",
                json!([{"rel": Action::Stop.path(), "href": url("systems/1/stop")}]),
            )),
        );
        let client = fake.connect().await;
        let reference = crate::Reference::new(url("systems/1")).unwrap();
        let mut system = client
            .resources::<System>()
            .get_by_reference(&reference, &QueryParams::none())
            .await
            .unwrap();
        let before = fake.calls().len();

        let err = system.start().await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(UnsupportedOperation::IllegalOperation { .. })));
        assert_eq!(fake.calls().len(), before);
    }

    #[tokio::test]
    async fn action_with_same_resource_updates_handle() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "systems/1",
            Reply::Body(system_json(
                "STOPPED",
                json!([{"rel": Action::Start.path(), "href": url("systems/1/start")}]),
            )),
        );
        fake.on(
            Method::Post,
            "systems/1/start",
            Reply::Body(system_json("STARTED", json!([]))),
        );
        let client = fake.connect().await;
        let reference = crate::Reference::new("systems/1").unwrap();
        let mut system = client
            .resources::<System>()
            .get_by_reference(&reference, &QueryParams::none())
            .await
            .unwrap();

        assert!(system.start().await.unwrap().is_none());
        assert_eq!(system.state(), Some(SystemState::Started));

        let post = fake.calls().pop().unwrap();
        assert_eq!(
            post.body.unwrap(),
            json!({"action": "http://schemas.dmtf.org/cimi/1/action/start"})
        );
    }

    #[tokio::test]
    async fn delete_returns_job_that_polls_to_success() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Delete,
            "machineVolumes/3",
            Reply::Body(job_json("RUNNING")),
        );
        fake.on(Method::Get, "jobs/9", Reply::Body(job_json("RUNNING")));
        fake.on(Method::Get, "jobs/9", Reply::Body(job_json("SUCCESS")));
        let client = fake.connect().await;

        let attachment = crate::ResourceHandle::<MachineVolume>::from_representation(
            client.clone(),
            crate::Representation::from_value(json!({
                "id": url("machineVolumes/3"),
                "volume": {"href": url("volumes/5")},
                "operations": [{"rel": "delete", "href": url("machineVolumes/3")}]
            }))
            .unwrap(),
        )
        .unwrap();
        assert_eq!(attachment.volume().unwrap().as_str(), url("volumes/5"));

        let mut job: Job = attachment.delete().await.unwrap().unwrap();
        assert_eq!(job.status(), JobStatus::Running);
        assert_eq!(job.refresh().await.unwrap(), JobStatus::Running);
        assert_eq!(job.refresh().await.unwrap(), JobStatus::Success);

        let polls = fake.calls().len();
        assert_eq!(job.refresh().await.unwrap(), JobStatus::Success);
        assert_eq!(fake.calls().len(), polls);
    }

    #[tokio::test]
    async fn delete_without_advertised_operation() {
        let fake = FakeTransport::new();
        let client = fake.connect().await;
        let machine = crate::ResourceHandle::<Machine>::from_representation(
            client,
            crate::Representation::from_value(json!({"id": url("machines/1")})).unwrap(),
        )
        .unwrap();

        let err = machine.delete().await.unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_collection_fails_before_any_request() {
        let fake = FakeTransport::new();
        let client = fake.connect().await;

        let err = client
            .resources::<Volume>()
            .list(&QueryParams::none())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(UnsupportedOperation::Collection { .. })));
        assert!(fake.calls_after_connect().is_empty());
    }

    #[tokio::test]
    async fn name_lookup_filters_and_takes_first() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "machines",
            Reply::Body(json!({
                "id": url("machines"),
                "machines": [
                    {"id": url("machines/1"), "name": "db"},
                    {"id": url("machines/2"), "name": "db"}
                ]
            })),
        );
        let client = fake.connect().await;

        let found = client
            .resources::<Machine>()
            .find_by_name_or_reference("db", &QueryParams::none())
            .await
            .unwrap();
        assert_eq!(found.reference().as_str(), url("machines/1"));

        let list = fake.calls_after_connect().pop().unwrap();
        assert!(list.query.contains(&("$filter", "name='db'".to_string())));
    }

    #[tokio::test]
    async fn name_lookup_miss_is_not_found() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "machines",
            Reply::Body(json!({"id": url("machines"), "machines": []})),
        );
        let client = fake.connect().await;

        let err = client
            .resources::<Machine>()
            .find_by_name_or_reference("ghost", &QueryParams::none())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "Machine", .. }));
    }

    #[tokio::test]
    async fn relation_refresh_merges_members() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "systems/1/machines",
            Reply::Body(json!({
                "id": url("systems/1/machines"),
                "systemMachines": [{
                    "id": url("systemMachines/4"),
                    "machine": {"href": url("machines/7"), "name": "m7", "state": "STARTED"}
                }]
            })),
        );
        let client = fake.connect().await;
        let mut system = crate::ResourceHandle::<System>::from_representation(
            client,
            crate::Representation::from_value(system_json("STARTED", json!([]))).unwrap(),
        )
        .unwrap();

        let members = system.machines().await.unwrap();
        assert_eq!(members.len(), 1);
        let machine = members[0].machine().unwrap().unwrap();
        assert_eq!(machine.name(), Some("m7"));

        // Merged in place; the relation keeps its original href.
        let relation = system.attribute("machines").unwrap();
        assert_eq!(relation["href"], url("systems/1/machines"));

        let call = fake.calls_after_connect().pop().unwrap();
        assert!(call.query.contains(&("$expand", "machine".to_string())));
    }

    #[tokio::test]
    async fn repeated_refresh_is_stable() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "systems/1",
            Reply::Body(system_json("STOPPED", json!([]))),
        );
        let client = fake.connect().await;
        let reference = crate::Reference::new("systems/1").unwrap();
        let mut system = client
            .resources::<System>()
            .get_by_reference(&reference, &QueryParams::none())
            .await
            .unwrap();
        let params = QueryParams::builder().select("name,state").build();
        system.refresh(&params).await.unwrap();
        let first = system.representation().clone();
        system.refresh(&params).await.unwrap();
        assert!(first.same_attributes(system.representation(), &["name", "state"]));
        assert_eq!(system.representation(), &first);
    }

    fn machines_page() -> Value {
        json!({
            "id": url("machines"),
            "machines": [
                {"id": url("machines/1"), "name": "web", "state": "STARTED", "cpu": 2},
                {"id": url("machines/2"), "name": "db", "state": "STOPPED", "cpu": 4}
            ]
        })
    }

    #[tokio::test]
    async fn narrow_select_still_requests_ids() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "machines", Reply::Selected(machines_page()));
        let client = fake.connect().await;

        let params = QueryParams::builder().select("name").build();
        let machines = client.resources::<Machine>().list(&params).await.unwrap();
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[0].reference().as_str(), url("machines/1"));
        assert_eq!(machines[0].name(), Some("web"));
        assert!(machines[0].state().is_none());

        let call = fake.calls_after_connect().pop().unwrap();
        assert_eq!(call.query, vec![("$select", "name,id".to_string())]);
    }

    #[tokio::test]
    async fn name_lookup_with_narrow_select() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "machines", Reply::Selected(machines_page()));
        let client = fake.connect().await;

        let params = QueryParams::builder().select("name").build();
        let found = client
            .resources::<Machine>()
            .find_by_name_or_reference("web", &params)
            .await
            .unwrap();
        assert_eq!(found.reference().as_str(), url("machines/1"));

        let call = fake.calls_after_connect().pop().unwrap();
        assert!(call.query.contains(&("$select", "name,id".to_string())));
        assert!(call.query.contains(&("$filter", "name='web'".to_string())));
    }

    #[tokio::test]
    async fn member_without_id_is_malformed() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "machines",
            Reply::Body(json!({"id": url("machines"), "machines": [{"name": "web"}]})),
        );
        let client = fake.connect().await;

        let err = client
            .resources::<Machine>()
            .list(&QueryParams::none())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Client(ClientError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn relation_members_under_narrow_select() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "machines/1/disks",
            Reply::Selected(json!({
                "id": url("machines/1/disks"),
                "disks": [{"id": url("machines/1/disks/1"), "capacity": 1024, "initialLocation": "/dev/sda"}]
            })),
        );
        let client = fake.connect().await;
        let mut machine = crate::ResourceHandle::<Machine>::from_representation(
            client,
            crate::Representation::from_value(json!({
                "id": url("machines/1"),
                "disks": {"href": url("machines/1/disks")}
            }))
            .unwrap(),
        )
        .unwrap();

        let params = QueryParams::builder().select("capacity").build();
        let disks = machine.disks(&params).await.unwrap();
        assert_eq!(disks.len(), 1);
        assert_eq!(disks[0].capacity(), Some(1024));
        assert!(disks[0].initial_location().is_none());
        assert_eq!(disks[0].reference().as_str(), url("machines/1/disks/1"));
    }

    #[tokio::test]
    async fn missing_relation_is_malformed() {
        let fake = FakeTransport::new();
        let client = fake.connect().await;
        let mut machine = crate::ResourceHandle::<Machine>::from_representation(
            client,
            crate::Representation::from_value(json!({"id": url("machines/1")})).unwrap(),
        )
        .unwrap();

        let err = machine
            .refresh_relation("disks", &QueryParams::none())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Client(ClientError::MalformedResponse { .. })));
        assert!(fake.calls_after_connect().is_empty());
    }

    #[tokio::test]
    async fn body_without_reference_is_empty_outcome() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "systems/1",
            Reply::Body(system_json(
                "STOPPED",
                json!([{"rel": Action::Start.path(), "href": url("systems/1/start")}]),
            )),
        );
        fake.on(
            Method::Post,
            "systems/1/start",
            Reply::Body(json!({"message": "start accepted"})),
        );
        let client = fake.connect().await;
        let reference = crate::Reference::new("systems/1").unwrap();
        let systems = client.resources::<System>();
        let mut system = systems
            .get_by_reference(&reference, &QueryParams::none())
            .await
            .unwrap();

        let request = crate::ActionRequest::new(Action::Start);
        let outcome = systems.invoke(&system, &request).await.unwrap();
        assert!(matches!(outcome, Outcome::Empty));

        assert!(system.start().await.unwrap().is_none());
        assert_eq!(system.state(), Some(SystemState::Stopped));
    }

    #[tokio::test]
    async fn provider_error_surfaces_status() {
        let fake = FakeTransport::new();
        let client = fake.connect().await;
        let reference = crate::Reference::new("machines/404").unwrap();
        let err = client
            .resources::<Machine>()
            .get_by_reference(&reference, &QueryParams::none())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, Error::Protocol(ref p) if p.status == 404));
    }
}

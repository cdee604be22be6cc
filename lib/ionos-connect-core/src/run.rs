use serde_json::{Map, Value, json};
use tracing::warn;

use crate::catalog::{NodeDef, Operation, Policy};
use crate::error::NodeError;
use crate::params::ParamBag;
use crate::request::{Payload, build_plan, merge_for_update};
use crate::shape::{OutputRecord, shape_response};
use crate::transport::Transport;

/// One node invocation: a (resource, operation) selection applied to a batch
/// of input items, each with its own resolved parameter bag.
#[derive(Debug, Clone)]
pub struct NodeInvocation {
    /// Selected resource.
    pub resource: String,
    /// Selected operation.
    pub operation: String,
    /// Credential name; defaults to the node's `default_credential`.
    pub credential: Option<String>,
    /// When `true`, a failing item yields an `{"error": ...}` record and the
    /// batch continues; when `false`, the first failure aborts the batch.
    pub continue_on_fail: bool,
    /// One parameter bag per input item, in input order.
    pub bags: Vec<ParamBag>,
}

impl NodeInvocation {
    /// Creates an invocation with failure isolation disabled.
    pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
            credential: None,
            continue_on_fail: false,
            bags: Vec::new(),
        }
    }

    /// Adds one input item's parameter bag.
    #[must_use]
    pub fn item(mut self, bag: ParamBag) -> Self {
        self.bags.push(bag);
        self
    }

    /// Enables per-item failure isolation.
    #[must_use]
    pub fn continue_on_fail(mut self) -> Self {
        self.continue_on_fail = true;
        self
    }

    /// Overrides the credential name.
    #[must_use]
    pub fn with_credential(mut self, name: impl Into<String>) -> Self {
        self.credential = Some(name.into());
        self
    }
}

/// Runs a node invocation: one request per input item, strictly in order.
///
/// Each item goes through plan → dispatch → shape; items are independent and
/// nothing is shared between them. Already-issued calls are never undone when
/// a later item fails.
///
/// # Errors
///
/// With failure isolation off, the first failing item aborts the batch and
/// the error carries the item index. With isolation on, this only fails for
/// batch-level problems (an unknown (resource, operation) pair).
pub async fn execute<T: Transport>(
    node: &NodeDef,
    transport: &T,
    invocation: &NodeInvocation,
) -> Result<Vec<OutputRecord>, NodeError> {
    let op = node.find(&invocation.resource, &invocation.operation)?;
    let credential = invocation
        .credential
        .as_deref()
        .unwrap_or(node.default_credential);

    let mut output = Vec::new();
    for (index, bag) in invocation.bags.iter().enumerate() {
        match run_item(node, op, transport, credential, bag).await {
            Ok(records) => output.extend(records),
            Err(error) if invocation.continue_on_fail => {
                warn!(item = index, error = %error, "item failed, continuing");
                output.push(OutputRecord::error(error.to_string()));
            }
            Err(error) => return Err(error.with_item(index)),
        }
    }
    Ok(output)
}

async fn run_item<T: Transport>(
    node: &NodeDef,
    op: &Operation,
    transport: &T,
    credential: &str,
    bag: &ParamBag,
) -> Result<Vec<OutputRecord>, NodeError> {
    let mut plan = build_plan(node, op, bag)?;

    match op.policy {
        Some(Policy::ReadModifyWrite { strip }) => {
            let current = transport.send(&plan.refetch(), credential).await?;
            let updates = match &plan.body {
                Payload::Json(value) => value.clone(),
                _ => Value::Object(Map::new()),
            };
            plan.body = Payload::Json(merge_for_update(&current, &updates, strip));
        }
        Some(Policy::Expect404IsAvailable { field }) => {
            let name = plan
                .path_args
                .get(field)
                .cloned()
                .or_else(|| bag.get_str(field).map(String::from))
                .ok_or_else(|| NodeError::missing(field))?;
            let available = match transport.send(&plan, credential).await {
                Ok(_) => false,
                Err(error) if error.api_status() == Some(404) => true,
                Err(error) => return Err(error),
            };
            return Ok(vec![OutputRecord::new(json!({
                field: name,
                "available": available,
            }))]);
        }
        _ => {}
    }

    let envelope = transport.send(&plan, credential).await?;
    Ok(shape_response(op.shape, envelope, &plan.path_args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldMapping;
    use crate::error::api_error;
    use crate::request::RequestPlan;
    use crate::schema::{Property, PropertyKind};
    use crate::shape::ShapeRule;
    use http::Method;
    use std::sync::Mutex;

    /// Canned transport: answers from a queue and records every plan it saw.
    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<Vec<Result<Value, (u16, String)>>>,
        seen: Mutex<Vec<(Method, String, Payload)>>,
    }

    impl MockTransport {
        /// Queues a response; responses are consumed in the order queued.
        fn respond(self, response: Result<Value, (u16, String)>) -> Self {
            self.responses.lock().expect("lock").push(response);
            self
        }

        fn seen(&self) -> Vec<(Method, String, Payload)> {
            self.seen.lock().expect("lock").clone()
        }
    }

    impl Transport for MockTransport {
        async fn send(&self, plan: &RequestPlan, _credential: &str) -> Result<Value, NodeError> {
            self.seen.lock().expect("lock").push((
                plan.method.clone(),
                plan.url.to_string(),
                plan.body.clone(),
            ));
            let mut responses = self.responses.lock().expect("lock");
            assert!(!responses.is_empty(), "a canned response for every send");
            responses.remove(0).map_err(|(status, body)| api_error(status, body))
        }
    }

    fn node() -> NodeDef {
        NodeDef {
            name: "test",
            display_name: "Test",
            description: "",
            base_url: "https://api.ionos.com/test/v1",
            default_credential: "ionosCloudApi",
            properties: vec![
                Property::required("thingId", "Thing ID", PropertyKind::String, &[]),
                Property::required("name", "Name", PropertyKind::String, &[]),
            ],
            operations: vec![
                Operation::new("thing", "getMany", Method::GET, "/things")
                    .shape(ShapeRule::Items),
                Operation::new("thing", "delete", Method::DELETE, "/things/{thingId}")
                    .path_params(&["thingId"])
                    .shape(ShapeRule::Success),
                Operation::new("thing", "update", Method::PUT, "/things/{thingId}")
                    .path_params(&["thingId"])
                    .field(FieldMapping::optional("replicas", "properties.replicas"))
                    .field(FieldMapping::optional("cores", "properties.resources.cores"))
                    .policy(Policy::ReadModifyWrite {
                        strip: &["credentials", "metadata"],
                    }),
                Operation::new("name", "check", Method::HEAD, "/names/{name}")
                    .path_params(&["name"])
                    .policy(Policy::Expect404IsAvailable { field: "name" }),
            ],
        }
    }

    #[tokio::test]
    async fn list_responses_become_one_record_per_item() {
        let transport =
            MockTransport::default().respond(Ok(json!({"items": [{"id": "a"}, {"id": "b"}]})));
        let invocation = NodeInvocation::new("thing", "getMany").item(ParamBag::new());

        let records = execute(&node(), &transport, &invocation).await.expect("records");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].json, json!({"id": "a"}));
        assert_eq!(records[1].json, json!({"id": "b"}));
    }

    #[tokio::test]
    async fn delete_synthesizes_success_with_ids() {
        let transport = MockTransport::default().respond(Ok(Value::Null));
        let invocation = NodeInvocation::new("thing", "delete")
            .item(ParamBag::new().with("thingId", "t-1"));

        let records = execute(&node(), &transport, &invocation).await.expect("records");
        assert_eq!(records, vec![OutputRecord::new(json!({"success": true, "thingId": "t-1"}))]);
    }

    #[tokio::test]
    async fn failure_isolation_captures_the_failing_item_and_continues() {
        let transport = MockTransport::default()
            .respond(Ok(json!({"items": [{"id": "1"}]})))
            .respond(Err((500, r#"{"message":"boom"}"#.to_string())))
            .respond(Ok(json!({"items": [{"id": "3"}]})));
        let invocation = NodeInvocation::new("thing", "getMany")
            .continue_on_fail()
            .item(ParamBag::new())
            .item(ParamBag::new())
            .item(ParamBag::new());

        let records = execute(&node(), &transport, &invocation).await.expect("records");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].json, json!({"id": "1"}));
        assert_eq!(records[1].json, json!({"error": "API error 500: boom"}));
        assert_eq!(records[2].json, json!({"id": "3"}));
    }

    #[tokio::test]
    async fn without_isolation_the_batch_aborts_with_item_context() {
        let transport = MockTransport::default()
            .respond(Ok(json!({"items": [{"id": "1"}]})))
            .respond(Err((403, r#"{"message":"forbidden"}"#.to_string())));
        let invocation = NodeInvocation::new("thing", "getMany")
            .item(ParamBag::new())
            .item(ParamBag::new())
            .item(ParamBag::new());

        let error = execute(&node(), &transport, &invocation).await.expect_err("abort");
        assert_eq!(error.to_string(), "Item 1: API error 403: forbidden");
        // The third item was never dispatched
        assert_eq!(transport.seen().len(), 2);
    }

    #[tokio::test]
    async fn read_modify_write_fetches_merges_and_strips() {
        // First the GET of the current entity, then the PUT acknowledgement
        let transport = MockTransport::default()
            .respond(Ok(json!({
                "id": "t-1",
                "metadata": {"state": "AVAILABLE"},
                "properties": {
                    "displayName": "cache",
                    "replicas": 2,
                    "credentials": {"username": "admin"},
                    "resources": {"cores": 2, "ram": 4},
                },
            })))
            .respond(Ok(json!({"id": "t-1", "properties": {"replicas": 3, "displayName": "cache"}})));
        let invocation = NodeInvocation::new("thing", "update").item(
            ParamBag::new()
                .with("thingId", "t-1")
                .with("replicas", 3)
                .with("cores", 4),
        );

        let records = execute(&node(), &transport, &invocation).await.expect("records");
        assert_eq!(records.len(), 1);

        let seen = transport.seen();
        assert_eq!(seen[0].0, Method::GET);
        assert_eq!(seen[1].0, Method::PUT);
        // Unchanged fields kept, updates override, credentials and metadata gone
        assert_eq!(
            seen[1].2,
            Payload::Json(json!({
                "id": "t-1",
                "properties": {
                    "displayName": "cache",
                    "replicas": 3,
                    "resources": {"cores": 4, "ram": 4},
                },
            }))
        );
    }

    #[tokio::test]
    async fn availability_check_treats_404_as_available() {
        let transport = MockTransport::default().respond(Err((404, String::new())));
        let invocation =
            NodeInvocation::new("name", "check").item(ParamBag::new().with("name", "my-registry"));

        let records = execute(&node(), &transport, &invocation).await.expect("records");
        assert_eq!(
            records,
            vec![OutputRecord::new(json!({"name": "my-registry", "available": true}))]
        );
    }

    #[tokio::test]
    async fn availability_check_treats_2xx_as_taken_and_rethrows_other_statuses() {
        let transport = MockTransport::default().respond(Ok(Value::Null));
        let invocation =
            NodeInvocation::new("name", "check").item(ParamBag::new().with("name", "taken"));
        let records = execute(&node(), &transport, &invocation).await.expect("records");
        assert_eq!(
            records,
            vec![OutputRecord::new(json!({"name": "taken", "available": false}))]
        );

        let transport = MockTransport::default().respond(Err((500, String::new())));
        let invocation =
            NodeInvocation::new("name", "check").item(ParamBag::new().with("name", "broken"));
        let error = execute(&node(), &transport, &invocation).await.expect_err("rethrown");
        assert_eq!(error.api_status(), Some(500));
    }

    #[tokio::test]
    async fn unknown_operation_fails_the_whole_batch() {
        let transport = MockTransport::default();
        let invocation = NodeInvocation::new("thing", "explode").item(ParamBag::new());

        let error = execute(&node(), &transport, &invocation).await.expect_err("unknown");
        assert!(matches!(error, NodeError::UnknownOperation { .. }));
        assert!(transport.seen().is_empty());
    }
}

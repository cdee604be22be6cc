use http::Method;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use url::Url;

use crate::catalog::{BodyKind, FieldMapping, NodeDef, Operation, Policy};
use crate::error::NodeError;
use crate::params::ParamBag;
use crate::request::body::Payload;
use crate::request::path::resolve_path;
use crate::request::query::QueryMap;

/// A fully-formed HTTP call specification, ready for dispatch.
///
/// Built fresh per input item and discarded after the call returns. The URL
/// is always fully interpolated; the body is present only for mutating
/// operations that declared body fields.
#[derive(Debug, Clone)]
pub struct RequestPlan {
    /// HTTP method.
    pub method: Method,
    /// Full request URL, query string included.
    pub url: Url,
    /// Request body.
    pub body: Payload,
    /// Resolved path parameters, kept for output correlation.
    pub path_args: IndexMap<String, String>,
}

impl RequestPlan {
    /// Derives the GET used as the first leg of a read-modify-write update.
    pub fn refetch(&self) -> Self {
        let mut url = self.url.clone();
        url.set_query(None);
        Self {
            method: Method::GET,
            url,
            body: Payload::Empty,
            path_args: self.path_args.clone(),
        }
    }
}

/// Builds the request plan for one (resource, operation) invocation.
///
/// All configuration checks happen here, before any network call: required
/// fields, path parameters, and mutually-exclusive discriminants. Optional
/// fields that were not supplied are omitted from the body and query
/// entirely.
///
/// # Errors
///
/// Returns [`NodeError::Config`] for missing or malformed parameters,
/// [`NodeError::PathUnresolved`] for unresolved placeholders, and URL parse
/// errors for malformed base URLs.
pub fn build_plan(
    node: &NodeDef,
    op: &Operation,
    bag: &ParamBag,
) -> Result<RequestPlan, NodeError> {
    check_discriminants(op, bag)?;

    let path_args = collect_path_args(op, bag)?;
    let path = resolve_path(op.path, &path_args)?;

    let base = node.resolve_base_url(bag)?;
    let url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = url.parse::<Url>()?;

    let query = build_query(op, bag)?;
    if !query.is_empty() {
        url.set_query(Some(&query.to_query_string()?));
    }

    let body = build_body(op, bag)?;

    Ok(RequestPlan {
        method: op.method.clone(),
        url,
        body,
        path_args,
    })
}

fn check_discriminants(op: &Operation, bag: &ParamBag) -> Result<(), NodeError> {
    if op.exactly_one_of.is_empty() {
        return Ok(());
    }
    let supplied = op
        .exactly_one_of
        .iter()
        .filter(|field| bag.contains(field))
        .count();
    let names = op.exactly_one_of.join("', '");
    match supplied {
        1 => Ok(()),
        0 => Err(NodeError::config(format!(
            "exactly one of '{names}' must be provided"
        ))),
        _ => Err(NodeError::config(format!(
            "only one of '{names}' may be provided"
        ))),
    }
}

fn collect_path_args(
    op: &Operation,
    bag: &ParamBag,
) -> Result<IndexMap<String, String>, NodeError> {
    let mut args = IndexMap::with_capacity(op.path_params.len());
    for name in op.path_params {
        let value = bag.require(name)?;
        args.insert((*name).to_string(), scalar_to_string(name, value)?);
    }
    Ok(args)
}

fn build_query(op: &Operation, bag: &ParamBag) -> Result<QueryMap, NodeError> {
    let mut query = QueryMap::new();
    for mapping in &op.query {
        if let Some(value) = mapped_value(mapping, bag)? {
            query.add(mapping.target, value);
        }
    }
    Ok(query)
}

fn build_body(op: &Operation, bag: &ParamBag) -> Result<Payload, NodeError> {
    match op.body {
        BodyKind::Text { source } => Ok(Payload::Text(bag.require_str(source)?.to_string())),
        BodyKind::Form => {
            let mut pairs = Vec::with_capacity(op.fields.len());
            for mapping in &op.fields {
                if let Some(value) = mapped_value(mapping, bag)? {
                    pairs.push((
                        mapping.target.to_string(),
                        scalar_to_string(mapping.source, &value)?,
                    ));
                }
            }
            if pairs.is_empty() {
                Ok(Payload::Empty)
            } else {
                Ok(Payload::Form(pairs))
            }
        }
        BodyKind::Json => {
            let mut root = Map::new();
            for mapping in &op.fields {
                if let Some(value) = mapped_value(mapping, bag)? {
                    insert_dotted(&mut root, mapping.target, value);
                }
            }
            if let Some(Policy::BootVolumeReorder { list, flag }) = op.policy {
                reorder_boot_volume(&mut root, list, flag);
            }
            if root.is_empty() {
                Ok(Payload::Empty)
            } else {
                Ok(Payload::Json(Value::Object(root)))
            }
        }
    }
}

/// Reads and transforms one mapped field, enforcing required-ness.
fn mapped_value(mapping: &FieldMapping, bag: &ParamBag) -> Result<Option<Value>, NodeError> {
    match bag.get(mapping.source) {
        Some(value) => mapping.transform.apply(mapping.source, value).map(Some),
        None if mapping.required => Err(NodeError::missing(mapping.source)),
        None => Ok(None),
    }
}

fn scalar_to_string(name: &str, value: &Value) -> Result<String, NodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(NodeError::config(format!(
            "parameter '{name}' must be a scalar value, got {other}"
        ))),
    }
}

/// Inserts a value at a dotted path, creating intermediate objects.
fn insert_dotted(root: &mut Map<String, Value>, target: &str, value: Value) {
    let mut current = root;
    let mut segments = target.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            unreachable!("slot was just made an object");
        };
        current = next;
    }
}

fn value_at_dotted_mut<'a>(
    root: &'a mut Map<String, Value>,
    path: &str,
) -> Option<&'a mut Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = root.get_mut(first)?;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

/// Moves the volume flagged as boot volume to index 0, preserving the
/// relative order of the remaining volumes, and strips the flag field.
fn reorder_boot_volume(root: &mut Map<String, Value>, list: &str, flag: &str) {
    let Some(Value::Array(volumes)) = value_at_dotted_mut(root, list) else {
        return;
    };
    let boot_index = volumes
        .iter()
        .position(|volume| volume.get(flag).and_then(Value::as_bool) == Some(true));
    if let Some(index) = boot_index {
        let boot = volumes.remove(index);
        volumes.insert(0, boot);
    }
    for volume in volumes.iter_mut() {
        if let Some(object) = volume.as_object_mut() {
            object.remove(flag);
        }
    }
}

/// Merges a partial update into a fetched entity for read-modify-write PUTs.
///
/// Every unchanged field of `current` is kept; every field of `updates`
/// overrides it, recursing into objects so sub-objects like
/// `resources.cores` merge instead of replacing their siblings. The `strip`
/// fields (server-assigned or write-once, e.g. `credentials`) are removed at
/// any depth before the merge.
pub fn merge_for_update(current: &Value, updates: &Value, strip: &[&str]) -> Value {
    let mut merged = current.clone();
    strip_keys(&mut merged, strip);
    merge_into(&mut merged, updates);
    merged
}

fn strip_keys(value: &mut Value, strip: &[&str]) {
    if let Value::Object(object) = value {
        object.retain(|key, _| !strip.contains(&key.as_str()));
        for nested in object.values_mut() {
            strip_keys(nested, strip);
        }
    }
}

fn merge_into(current: &mut Value, updates: &Value) {
    match (current, updates) {
        (Value::Object(current), Value::Object(updates)) => {
            for (key, update) in updates {
                match current.get_mut(key) {
                    Some(existing) if existing.is_object() && update.is_object() => {
                        merge_into(existing, update);
                    }
                    _ => {
                        current.insert(key.clone(), update.clone());
                    }
                }
            }
        }
        (current, updates) => *current = updates.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Transform;
    use crate::schema::{Property, PropertyKind};
    use crate::shape::ShapeRule;
    use serde_json::json;

    fn test_node() -> NodeDef {
        NodeDef {
            name: "test",
            display_name: "Test",
            description: "",
            base_url: "https://api.ionos.com/cloudapi/v6",
            default_credential: "ionosCloudApi",
            properties: vec![Property::optional(
                "location",
                "Location",
                PropertyKind::String,
                &[],
            )],
            operations: Vec::new(),
        }
    }

    #[test]
    fn minimal_bag_produces_a_clean_plan() {
        let op = Operation::new(
            "server",
            "create",
            Method::POST,
            "/datacenters/{datacenterId}/servers",
        )
        .path_params(&["datacenterId"])
        .field(FieldMapping::required("name", "properties.name"))
        .field(FieldMapping::optional("cores", "properties.cores"))
        .field(FieldMapping::optional("ram", "properties.ram"));

        let bag = ParamBag::new().with("datacenterId", "dc-42").with("name", "web-01");
        let plan = build_plan(&test_node(), &op, &bag).expect("a plan");

        assert_eq!(plan.method, Method::POST);
        insta::assert_snapshot!(
            plan.url.as_str(),
            @"https://api.ionos.com/cloudapi/v6/datacenters/dc%2D42/servers"
        );
        assert!(!plan.url.path().contains("//"), "no empty path segments");
        // Unsupplied optionals are omitted, not sent as null
        assert_eq!(
            plan.body,
            Payload::Json(json!({"properties": {"name": "web-01"}}))
        );
    }

    #[test]
    fn missing_required_field_fails_before_dispatch() {
        let op = Operation::new("zone", "create", Method::POST, "/zones")
            .field(FieldMapping::required("zoneName", "properties.zoneName"));

        let error = build_plan(&test_node(), &op, &ParamBag::new()).expect_err("missing");
        assert_eq!(
            error.to_string(),
            "Configuration error: required parameter 'zoneName' is missing"
        );
    }

    #[test]
    fn query_mappings_are_applied_and_optional() {
        let op = Operation::new("server", "getMany", Method::GET, "/servers")
            .query(FieldMapping::optional("depth", "depth"))
            .query(FieldMapping::optional("offset", "offset"))
            .shape(ShapeRule::Items);

        let bag = ParamBag::new().with("depth", 3);
        let plan = build_plan(&test_node(), &op, &bag).expect("a plan");
        assert_eq!(plan.url.query(), Some("depth=3"));
    }

    #[test]
    fn discriminant_requires_exactly_one_choice() {
        let op = Operation::new("volume", "create", Method::POST, "/volumes")
            .exactly_one_of(&["image", "imageAlias", "licenceType"]);

        let error = build_plan(&test_node(), &op, &ParamBag::new()).expect_err("none chosen");
        assert_eq!(
            error.to_string(),
            "Configuration error: exactly one of 'image', 'imageAlias', 'licenceType' must be provided"
        );

        let bag = ParamBag::new().with("image", "img-1").with("imageAlias", "ubuntu:latest");
        let error = build_plan(&test_node(), &op, &bag).expect_err("two chosen");
        assert_eq!(
            error.to_string(),
            "Configuration error: only one of 'image', 'imageAlias', 'licenceType' may be provided"
        );

        let bag = ParamBag::new().with("licenceType", "LINUX");
        assert!(build_plan(&test_node(), &op, &bag).is_ok());
    }

    #[test]
    fn boot_volume_moves_to_front_and_keeps_relative_order() {
        let op = Operation::new("server", "create", Method::POST, "/servers")
            .field(FieldMapping::required("volumes", "entities.volumes.items"))
            .policy(Policy::BootVolumeReorder {
                list: "entities.volumes.items",
                flag: "bootVolume",
            });

        let bag = ParamBag::new().with(
            "volumes",
            json!([
                {"name": "data-1"},
                {"name": "data-2"},
                {"name": "system", "bootVolume": true},
                {"name": "data-3"},
            ]),
        );
        let plan = build_plan(&test_node(), &op, &bag).expect("a plan");

        let Payload::Json(body) = plan.body else {
            panic!("expected a JSON body");
        };
        assert_eq!(
            body,
            json!({"entities": {"volumes": {"items": [
                {"name": "system"},
                {"name": "data-1"},
                {"name": "data-2"},
                {"name": "data-3"},
            ]}}})
        );
    }

    #[test]
    fn boot_volume_already_first_is_untouched() {
        let mut root = Map::new();
        insert_dotted(
            &mut root,
            "entities.volumes.items",
            json!([{"name": "system", "bootVolume": true}, {"name": "data"}]),
        );
        reorder_boot_volume(&mut root, "entities.volumes.items", "bootVolume");
        assert_eq!(
            Value::Object(root),
            json!({"entities": {"volumes": {"items": [
                {"name": "system"},
                {"name": "data"},
            ]}}})
        );
    }

    #[test]
    fn form_body_is_built_from_mappings() {
        let op = Operation::new("contract", "updateName", Method::PUT, "/contracts/{contractId}")
            .path_params(&["contractId"])
            .body(BodyKind::Form)
            .field(FieldMapping::required("contractName", "contractName"));

        let bag = ParamBag::new().with("contractId", "31415").with("contractName", "prod account");
        let plan = build_plan(&test_node(), &op, &bag).expect("a plan");
        assert_eq!(
            plan.body,
            Payload::Form(vec![("contractName".to_string(), "prod account".to_string())])
        );
    }

    #[test]
    fn text_body_takes_the_field_verbatim() {
        let op = Operation::new("zone", "import", Method::POST, "/zones/{zoneId}/zonefile")
            .path_params(&["zoneId"])
            .body(BodyKind::Text { source: "zoneFile" });

        let bag = ParamBag::new()
            .with("zoneId", "z-1")
            .with("zoneFile", "$ORIGIN example.com.");
        let plan = build_plan(&test_node(), &op, &bag).expect("a plan");
        assert_eq!(plan.body, Payload::Text("$ORIGIN example.com.".to_string()));
    }

    #[test]
    fn transforms_apply_on_the_way_into_the_body() {
        let op = Operation::new("cluster", "create", Method::POST, "/clusters")
            .field(
                FieldMapping::required("storageSize", "properties.storageSize")
                    .transform(Transform::MbToGb),
            )
            .field(
                FieldMapping::optional("sshKeys", "properties.sshKeys")
                    .transform(Transform::CommaList),
            );

        let bag = ParamBag::new()
            .with("storageSize", 20480)
            .with("sshKeys", "ssh-rsa AAA, ssh-rsa BBB");
        let plan = build_plan(&test_node(), &op, &bag).expect("a plan");
        assert_eq!(
            plan.body,
            Payload::Json(json!({"properties": {
                "storageSize": 20,
                "sshKeys": ["ssh-rsa AAA", "ssh-rsa BBB"],
            }}))
        );
    }

    #[test]
    fn refetch_derives_a_bare_get() {
        let op = Operation::new("replicaset", "update", Method::PUT, "/replicasets/{replicaSetId}")
            .path_params(&["replicaSetId"])
            .field(FieldMapping::optional("replicas", "properties.replicas"));

        let bag = ParamBag::new().with("replicaSetId", "rs-1").with("replicas", 3);
        let plan = build_plan(&test_node(), &op, &bag).expect("a plan");

        let fetch = plan.refetch();
        assert_eq!(fetch.method, Method::GET);
        assert_eq!(fetch.url.path(), plan.url.path());
        assert!(fetch.body.is_empty());
    }

    #[test]
    fn merge_keeps_unchanged_overrides_changed_strips_credentials() {
        let current = json!({
            "id": "rs-1",
            "metadata": {"state": "AVAILABLE"},
            "properties": {
                "displayName": "cache",
                "replicas": 2,
                "credentials": {"username": "admin"},
                "resources": {"cores": 2, "ram": 4},
            },
        });
        let updates = json!({
            "properties": {
                "replicas": 3,
                "resources": {"cores": 4},
            },
        });

        let merged = merge_for_update(&current, &updates, &["credentials", "metadata"]);
        assert_eq!(
            merged,
            json!({
                "id": "rs-1",
                "properties": {
                    "displayName": "cache",
                    "replicas": 3,
                    "resources": {"cores": 4, "ram": 4},
                },
            })
        );
    }

    #[test]
    fn merge_strips_nested_write_once_fields() {
        let current = json!({"properties": {"credentials": {"username": "admin"}, "name": "a"}});
        let merged = merge_for_update(&current, &json!({}), &["credentials"]);
        assert_eq!(merged, json!({"properties": {"name": "a"}}));
    }
}

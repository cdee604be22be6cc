//! VM Auto Scaling node: scaling groups, their actions, and replica servers.

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Property, PropertyKind, ShapeRule, Transform,
};

const GROUP_SCOPED: &[(&str, &str)] = &[
    ("group", "get"),
    ("group", "update"),
    ("group", "delete"),
    ("action", "get"),
    ("action", "getMany"),
    ("server", "get"),
    ("server", "getMany"),
];

/// Builds the VM Auto Scaling node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosVmAutoscaling",
        display_name: "IONOS VM Auto Scaling",
        description: "Manage auto-scaling groups and inspect their actions and servers",
        base_url: "https://api.ionos.com/autoscaling",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required("groupId", "Group ID", PropertyKind::String, GROUP_SCOPED),
        Property::required(
            "actionId",
            "Action ID",
            PropertyKind::String,
            &[("action", "get")],
        ),
        Property::required(
            "serverId",
            "Server ID",
            PropertyKind::String,
            &[("server", "get")],
        ),
        Property::required(
            "name",
            "Name",
            PropertyKind::String,
            &[("group", "create"), ("group", "update")],
        ),
        Property::required("datacenterId", "Datacenter ID", PropertyKind::String, &[(
            "group",
            "create",
        )]),
        Property::optional(
            "minReplicaCount",
            "Min Replicas",
            PropertyKind::Number,
            &[("group", "create"), ("group", "update")],
        ),
        Property::optional(
            "maxReplicaCount",
            "Max Replicas",
            PropertyKind::Number,
            &[("group", "create"), ("group", "update")],
        ),
        Property::required(
            "scalingPolicy",
            "Scaling Policy",
            PropertyKind::Json,
            &[("group", "create"), ("group", "update")],
        )
        .describe(
            r#"JSON policy object, e.g. {"metric": "INSTANCE_CPU_UTILIZATION_AVERAGE", "scaleInThreshold": 33, "scaleOutThreshold": 77, "unit": "PER_MINUTE"}"#,
        ),
        Property::required(
            "replicaConfiguration",
            "Replica Configuration",
            PropertyKind::Json,
            &[("group", "create"), ("group", "update")],
        )
        .describe("JSON template for replica servers (cores, ram, nics, volumes)"),
        Property::optional("offset", "Offset", PropertyKind::Number, &[]),
        Property::optional("limit", "Limit", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("group", "create", Method::POST, "/groups")
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::required("datacenterId", "properties.datacenter.id"))
            .field(FieldMapping::optional("minReplicaCount", "properties.minReplicaCount"))
            .field(FieldMapping::optional("maxReplicaCount", "properties.maxReplicaCount"))
            .field(
                FieldMapping::required("scalingPolicy", "properties.policy")
                    .transform(Transform::JsonText),
            )
            .field(
                FieldMapping::required("replicaConfiguration", "properties.replicaConfiguration")
                    .transform(Transform::JsonText),
            ),
        Operation::new("group", "get", Method::GET, "/groups/{groupId}").path_params(&["groupId"]),
        Operation::new("group", "getMany", Method::GET, "/groups")
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("group", "update", Method::PUT, "/groups/{groupId}")
            .path_params(&["groupId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("minReplicaCount", "properties.minReplicaCount"))
            .field(FieldMapping::optional("maxReplicaCount", "properties.maxReplicaCount"))
            .field(
                FieldMapping::required("scalingPolicy", "properties.policy")
                    .transform(Transform::JsonText),
            )
            .field(
                FieldMapping::required("replicaConfiguration", "properties.replicaConfiguration")
                    .transform(Transform::JsonText),
            ),
        Operation::new("group", "delete", Method::DELETE, "/groups/{groupId}")
            .path_params(&["groupId"])
            .shape(ShapeRule::Success),
        Operation::new("action", "get", Method::GET, "/groups/{groupId}/actions/{actionId}")
            .path_params(&["groupId", "actionId"]),
        Operation::new("action", "getMany", Method::GET, "/groups/{groupId}/actions")
            .path_params(&["groupId"])
            .shape(ShapeRule::Items),
        Operation::new("server", "get", Method::GET, "/groups/{groupId}/servers/{serverId}")
            .path_params(&["groupId", "serverId"]),
        Operation::new("server", "getMany", Method::GET, "/groups/{groupId}/servers")
            .path_params(&["groupId"])
            .shape(ShapeRule::Items),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ionos_connect_core::{ParamBag, Payload, build_plan};
    use serde_json::json;

    #[test]
    fn catalog_is_consistent() {
        let node = node();
        let violations = node.catalog_violations();
        assert!(violations.is_empty(), "{}", violations.join("\n"));
    }

    #[test]
    fn group_create_nests_the_datacenter_reference_and_parses_policies() {
        let node = node();
        let op = node.find("group", "create").expect("in catalog");
        let bag = ParamBag::new()
            .with("name", "web-fleet")
            .with("datacenterId", "dc-1")
            .with("minReplicaCount", 2)
            .with("scalingPolicy", r#"{"metric": "INSTANCE_CPU_UTILIZATION_AVERAGE"}"#)
            .with("replicaConfiguration", r#"{"cores": 2, "ram": 2048}"#);

        let plan = build_plan(&node, op, &bag).expect("a plan");
        assert_eq!(
            plan.body,
            Payload::Json(json!({"properties": {
                "name": "web-fleet",
                "datacenter": {"id": "dc-1"},
                "minReplicaCount": 2,
                "policy": {"metric": "INSTANCE_CPU_UTILIZATION_AVERAGE"},
                "replicaConfiguration": {"cores": 2, "ram": 2048},
            }}))
        );
    }
}

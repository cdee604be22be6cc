//! Application Load Balancer node: balancers and forwarding rules.

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Property, PropertyKind, ShapeRule, Transform,
};

const DATACENTER_SCOPED: &[(&str, &str)] = &[
    ("applicationLoadBalancer", "create"),
    ("applicationLoadBalancer", "get"),
    ("applicationLoadBalancer", "getMany"),
    ("applicationLoadBalancer", "update"),
    ("applicationLoadBalancer", "delete"),
    ("forwardingRule", "create"),
    ("forwardingRule", "get"),
    ("forwardingRule", "getMany"),
    ("forwardingRule", "update"),
    ("forwardingRule", "delete"),
];

const BALANCER_SCOPED: &[(&str, &str)] = &[
    ("applicationLoadBalancer", "get"),
    ("applicationLoadBalancer", "update"),
    ("applicationLoadBalancer", "delete"),
    ("forwardingRule", "create"),
    ("forwardingRule", "get"),
    ("forwardingRule", "getMany"),
    ("forwardingRule", "update"),
    ("forwardingRule", "delete"),
];

/// Builds the Application Load Balancer node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosApplicationLoadBalancer",
        display_name: "IONOS Application Load Balancer",
        description: "Manage application load balancers and their forwarding rules",
        base_url: "https://api.ionos.com/cloudapi/v6",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required("datacenterId", "Datacenter ID", PropertyKind::String, DATACENTER_SCOPED),
        Property::required(
            "applicationLoadBalancerId",
            "Load Balancer ID",
            PropertyKind::String,
            BALANCER_SCOPED,
        ),
        Property::required(
            "forwardingRuleId",
            "Forwarding Rule ID",
            PropertyKind::String,
            &[
                ("forwardingRule", "get"),
                ("forwardingRule", "update"),
                ("forwardingRule", "delete"),
            ],
        ),
        Property::required(
            "name",
            "Name",
            PropertyKind::String,
            &[
                ("applicationLoadBalancer", "create"),
                ("applicationLoadBalancer", "update"),
                ("forwardingRule", "create"),
                ("forwardingRule", "update"),
            ],
        ),
        Property::required(
            "listenerLan",
            "Listener LAN",
            PropertyKind::Number,
            &[
                ("applicationLoadBalancer", "create"),
                ("applicationLoadBalancer", "update"),
            ],
        ),
        Property::required(
            "targetLan",
            "Target LAN",
            PropertyKind::Number,
            &[
                ("applicationLoadBalancer", "create"),
                ("applicationLoadBalancer", "update"),
            ],
        ),
        Property::optional(
            "ips",
            "Listener IPs",
            PropertyKind::String,
            &[
                ("applicationLoadBalancer", "create"),
                ("applicationLoadBalancer", "update"),
            ],
        )
        .describe("Comma-separated list of listener IP addresses"),
        Property::optional(
            "lbPrivateIps",
            "Private IPs",
            PropertyKind::String,
            &[
                ("applicationLoadBalancer", "create"),
                ("applicationLoadBalancer", "update"),
            ],
        )
        .describe("Comma-separated list of private IPs on the target LAN"),
        Property::required(
            "protocol",
            "Protocol",
            PropertyKind::String,
            &[("forwardingRule", "create"), ("forwardingRule", "update")],
        )
        .choices(&["HTTP"]),
        Property::required(
            "listenerIp",
            "Listener IP",
            PropertyKind::String,
            &[("forwardingRule", "create"), ("forwardingRule", "update")],
        ),
        Property::required(
            "listenerPort",
            "Listener Port",
            PropertyKind::Number,
            &[("forwardingRule", "create"), ("forwardingRule", "update")],
        ),
        Property::optional(
            "httpRules",
            "HTTP Rules",
            PropertyKind::Json,
            &[("forwardingRule", "create"), ("forwardingRule", "update")],
        )
        .describe("JSON array of HTTP rules (forwarding, redirect, static responses)"),
        Property::optional("depth", "Depth", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new(
            "applicationLoadBalancer",
            "create",
            Method::POST,
            "/datacenters/{datacenterId}/applicationloadbalancers",
        )
        .path_params(&["datacenterId"])
        .field(FieldMapping::required("name", "properties.name"))
        .field(FieldMapping::required("listenerLan", "properties.listenerLan"))
        .field(FieldMapping::required("targetLan", "properties.targetLan"))
        .field(FieldMapping::optional("ips", "properties.ips").transform(Transform::CommaList))
        .field(
            FieldMapping::optional("lbPrivateIps", "properties.lbPrivateIps")
                .transform(Transform::CommaList),
        ),
        Operation::new(
            "applicationLoadBalancer",
            "get",
            Method::GET,
            "/datacenters/{datacenterId}/applicationloadbalancers/{applicationLoadBalancerId}",
        )
        .path_params(&["datacenterId", "applicationLoadBalancerId"])
        .query(FieldMapping::optional("depth", "depth")),
        Operation::new(
            "applicationLoadBalancer",
            "getMany",
            Method::GET,
            "/datacenters/{datacenterId}/applicationloadbalancers",
        )
        .path_params(&["datacenterId"])
        .query(FieldMapping::optional("depth", "depth"))
        .shape(ShapeRule::Items),
        Operation::new(
            "applicationLoadBalancer",
            "update",
            Method::PATCH,
            "/datacenters/{datacenterId}/applicationloadbalancers/{applicationLoadBalancerId}",
        )
        .path_params(&["datacenterId", "applicationLoadBalancerId"])
        .field(FieldMapping::optional("name", "name"))
        .field(FieldMapping::optional("listenerLan", "listenerLan"))
        .field(FieldMapping::optional("targetLan", "targetLan"))
        .field(FieldMapping::optional("ips", "ips").transform(Transform::CommaList))
        .field(FieldMapping::optional("lbPrivateIps", "lbPrivateIps").transform(Transform::CommaList)),
        Operation::new(
            "applicationLoadBalancer",
            "delete",
            Method::DELETE,
            "/datacenters/{datacenterId}/applicationloadbalancers/{applicationLoadBalancerId}",
        )
        .path_params(&["datacenterId", "applicationLoadBalancerId"])
        .shape(ShapeRule::Success),
        Operation::new(
            "forwardingRule",
            "create",
            Method::POST,
            "/datacenters/{datacenterId}/applicationloadbalancers/{applicationLoadBalancerId}/forwardingrules",
        )
        .path_params(&["datacenterId", "applicationLoadBalancerId"])
        .field(FieldMapping::required("name", "properties.name"))
        .field(FieldMapping::required("protocol", "properties.protocol").transform(Transform::UpperCase))
        .field(FieldMapping::required("listenerIp", "properties.listenerIp"))
        .field(FieldMapping::required("listenerPort", "properties.listenerPort"))
        .field(FieldMapping::optional("httpRules", "properties.httpRules").transform(Transform::JsonText)),
        Operation::new(
            "forwardingRule",
            "get",
            Method::GET,
            "/datacenters/{datacenterId}/applicationloadbalancers/{applicationLoadBalancerId}/forwardingrules/{forwardingRuleId}",
        )
        .path_params(&["datacenterId", "applicationLoadBalancerId", "forwardingRuleId"])
        .query(FieldMapping::optional("depth", "depth")),
        Operation::new(
            "forwardingRule",
            "getMany",
            Method::GET,
            "/datacenters/{datacenterId}/applicationloadbalancers/{applicationLoadBalancerId}/forwardingrules",
        )
        .path_params(&["datacenterId", "applicationLoadBalancerId"])
        .query(FieldMapping::optional("depth", "depth"))
        .shape(ShapeRule::Items),
        Operation::new(
            "forwardingRule",
            "update",
            Method::PATCH,
            "/datacenters/{datacenterId}/applicationloadbalancers/{applicationLoadBalancerId}/forwardingrules/{forwardingRuleId}",
        )
        .path_params(&["datacenterId", "applicationLoadBalancerId", "forwardingRuleId"])
        .field(FieldMapping::optional("name", "name"))
        .field(FieldMapping::optional("protocol", "protocol").transform(Transform::UpperCase))
        .field(FieldMapping::optional("listenerIp", "listenerIp"))
        .field(FieldMapping::optional("listenerPort", "listenerPort"))
        .field(FieldMapping::optional("httpRules", "httpRules").transform(Transform::JsonText)),
        Operation::new(
            "forwardingRule",
            "delete",
            Method::DELETE,
            "/datacenters/{datacenterId}/applicationloadbalancers/{applicationLoadBalancerId}/forwardingrules/{forwardingRuleId}",
        )
        .path_params(&["datacenterId", "applicationLoadBalancerId", "forwardingRuleId"])
        .shape(ShapeRule::Success),
    ]
}

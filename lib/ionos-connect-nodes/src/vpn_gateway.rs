//! VPN Gateway node: WireGuard gateways and peers.
//!
//! The VPN API is served per region; the base URL carries a `{location}`
//! placeholder resolved once per invocation from the `location` parameter.

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Property, PropertyKind, ShapeRule, Transform,
};

const GATEWAY_SCOPED: &[(&str, &str)] = &[
    ("wireguardGateway", "get"),
    ("wireguardGateway", "update"),
    ("wireguardGateway", "delete"),
    ("wireguardPeer", "create"),
    ("wireguardPeer", "get"),
    ("wireguardPeer", "getMany"),
    ("wireguardPeer", "update"),
    ("wireguardPeer", "delete"),
];

/// Builds the VPN Gateway node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosVpnGateway",
        display_name: "IONOS VPN Gateway",
        description: "Manage WireGuard gateways and peers",
        base_url: "https://vpn.{location}.ionos.com/v1",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required("location", "Location", PropertyKind::String, &[])
            .describe("Region hosting the gateway, e.g. de-fra")
            .choices(&["de-fra", "de-txl", "es-vit", "fr-par", "gb-lhr", "us-ewr", "us-las"]),
        Property::required("gatewayId", "Gateway ID", PropertyKind::String, GATEWAY_SCOPED),
        Property::required(
            "peerId",
            "Peer ID",
            PropertyKind::String,
            &[
                ("wireguardPeer", "get"),
                ("wireguardPeer", "update"),
                ("wireguardPeer", "delete"),
            ],
        ),
        Property::required(
            "name",
            "Name",
            PropertyKind::String,
            &[
                ("wireguardGateway", "create"),
                ("wireguardGateway", "update"),
                ("wireguardPeer", "create"),
                ("wireguardPeer", "update"),
            ],
        ),
        Property::optional(
            "description",
            "Description",
            PropertyKind::String,
            &[
                ("wireguardGateway", "create"),
                ("wireguardGateway", "update"),
                ("wireguardPeer", "create"),
                ("wireguardPeer", "update"),
            ],
        ),
        Property::required("gatewayIP", "Gateway IP", PropertyKind::String, &[
            ("wireguardGateway", "create"),
            ("wireguardGateway", "update"),
        ])
        .describe("Public IP the gateway listens on"),
        Property::required(
            "interfaceIPv4CIDR",
            "Interface IPv4 CIDR",
            PropertyKind::String,
            &[("wireguardGateway", "create"), ("wireguardGateway", "update")],
        ),
        Property::required("privateKey", "Private Key", PropertyKind::String, &[(
            "wireguardGateway",
            "create",
        )]),
        Property::optional("listenPort", "Listen Port", PropertyKind::Number, &[
            ("wireguardGateway", "create"),
            ("wireguardGateway", "update"),
        ]),
        Property::required("connections", "Connections", PropertyKind::Json, &[
            ("wireguardGateway", "create"),
            ("wireguardGateway", "update"),
        ])
        .describe(
            r#"JSON array of LAN connections, e.g. [{"datacenterId": "...", "lanId": "2", "ipv4CIDR": "10.7.222.0/24"}]"#,
        ),
        Property::required("publicKey", "Public Key", PropertyKind::String, &[
            ("wireguardPeer", "create"),
            ("wireguardPeer", "update"),
        ]),
        Property::required("allowedIPs", "Allowed IPs", PropertyKind::String, &[
            ("wireguardPeer", "create"),
            ("wireguardPeer", "update"),
        ])
        .describe("Comma-separated list of CIDRs routed to this peer"),
        Property::optional("endpointHost", "Endpoint Host", PropertyKind::String, &[
            ("wireguardPeer", "create"),
            ("wireguardPeer", "update"),
        ]),
        Property::optional("endpointPort", "Endpoint Port", PropertyKind::Number, &[
            ("wireguardPeer", "create"),
            ("wireguardPeer", "update"),
        ]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("wireguardGateway", "create", Method::POST, "/wireguardgateways")
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("description", "properties.description"))
            .field(FieldMapping::required("gatewayIP", "properties.gatewayIP"))
            .field(FieldMapping::required("interfaceIPv4CIDR", "properties.interfaceIPv4CIDR"))
            .field(FieldMapping::required("privateKey", "properties.privateKey"))
            .field(FieldMapping::optional("listenPort", "properties.listenPort"))
            .field(
                FieldMapping::required("connections", "properties.connections")
                    .transform(Transform::JsonText),
            ),
        Operation::new("wireguardGateway", "get", Method::GET, "/wireguardgateways/{gatewayId}")
            .path_params(&["gatewayId"]),
        Operation::new("wireguardGateway", "getMany", Method::GET, "/wireguardgateways")
            .shape(ShapeRule::Items),
        Operation::new("wireguardGateway", "update", Method::PUT, "/wireguardgateways/{gatewayId}")
            .path_params(&["gatewayId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("description", "properties.description"))
            .field(FieldMapping::required("gatewayIP", "properties.gatewayIP"))
            .field(FieldMapping::required("interfaceIPv4CIDR", "properties.interfaceIPv4CIDR"))
            .field(FieldMapping::optional("listenPort", "properties.listenPort"))
            .field(
                FieldMapping::required("connections", "properties.connections")
                    .transform(Transform::JsonText),
            ),
        Operation::new(
            "wireguardGateway",
            "delete",
            Method::DELETE,
            "/wireguardgateways/{gatewayId}",
        )
        .path_params(&["gatewayId"])
        .shape(ShapeRule::Success),
        Operation::new(
            "wireguardPeer",
            "create",
            Method::POST,
            "/wireguardgateways/{gatewayId}/peers",
        )
        .path_params(&["gatewayId"])
        .field(FieldMapping::required("name", "properties.name"))
        .field(FieldMapping::optional("description", "properties.description"))
        .field(FieldMapping::required("publicKey", "properties.publicKey"))
        .field(
            FieldMapping::required("allowedIPs", "properties.allowedIPs")
                .transform(Transform::CommaList),
        )
        .field(FieldMapping::optional("endpointHost", "properties.endpoint.host"))
        .field(FieldMapping::optional("endpointPort", "properties.endpoint.port")),
        Operation::new(
            "wireguardPeer",
            "get",
            Method::GET,
            "/wireguardgateways/{gatewayId}/peers/{peerId}",
        )
        .path_params(&["gatewayId", "peerId"]),
        Operation::new(
            "wireguardPeer",
            "getMany",
            Method::GET,
            "/wireguardgateways/{gatewayId}/peers",
        )
        .path_params(&["gatewayId"])
        .shape(ShapeRule::Items),
        Operation::new(
            "wireguardPeer",
            "update",
            Method::PUT,
            "/wireguardgateways/{gatewayId}/peers/{peerId}",
        )
        .path_params(&["gatewayId", "peerId"])
        .field(FieldMapping::required("name", "properties.name"))
        .field(FieldMapping::optional("description", "properties.description"))
        .field(FieldMapping::required("publicKey", "properties.publicKey"))
        .field(
            FieldMapping::required("allowedIPs", "properties.allowedIPs")
                .transform(Transform::CommaList),
        )
        .field(FieldMapping::optional("endpointHost", "properties.endpoint.host"))
        .field(FieldMapping::optional("endpointPort", "properties.endpoint.port")),
        Operation::new(
            "wireguardPeer",
            "delete",
            Method::DELETE,
            "/wireguardgateways/{gatewayId}/peers/{peerId}",
        )
        .path_params(&["gatewayId", "peerId"])
        .shape(ShapeRule::Success),
    ]
}

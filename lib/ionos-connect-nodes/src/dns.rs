//! Cloud DNS node: zones, records, and zone-file transfer.
//!
//! Zone-file import is the one text-bodied operation in the catalog; the API
//! takes the BIND zone file verbatim. Export returns the zone file as a bare
//! string, wrapped under `zoneFile` in the output.

use http::Method;
use ionos_connect_core::{
    BodyKind, FieldMapping, NodeDef, Operation, Property, PropertyKind, ShapeRule,
};

const ZONE_SCOPED: &[(&str, &str)] = &[
    ("zone", "get"),
    ("zone", "update"),
    ("zone", "delete"),
    ("zone", "import"),
    ("zone", "export"),
    ("record", "create"),
    ("record", "get"),
    ("record", "getMany"),
    ("record", "update"),
    ("record", "delete"),
];

/// Builds the Cloud DNS node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosDns",
        display_name: "IONOS Cloud DNS",
        description: "Manage DNS zones and records",
        base_url: "https://dns.de-fra.ionos.com",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required("zoneId", "Zone ID", PropertyKind::String, ZONE_SCOPED),
        Property::required(
            "recordId",
            "Record ID",
            PropertyKind::String,
            &[("record", "get"), ("record", "update"), ("record", "delete")],
        ),
        Property::required(
            "zoneName",
            "Zone Name",
            PropertyKind::String,
            &[("zone", "create"), ("zone", "update")],
        )
        .describe("Fully qualified zone name, e.g. example.com"),
        Property::optional(
            "description",
            "Description",
            PropertyKind::String,
            &[("zone", "create"), ("zone", "update")],
        ),
        Property::optional(
            "enabled",
            "Enabled",
            PropertyKind::Boolean,
            &[
                ("zone", "create"),
                ("zone", "update"),
                ("record", "create"),
                ("record", "update"),
            ],
        ),
        Property::required(
            "recordName",
            "Record Name",
            PropertyKind::String,
            &[("record", "create"), ("record", "update")],
        )
        .describe("Record name relative to the zone; use @ for the apex"),
        Property::required(
            "recordType",
            "Record Type",
            PropertyKind::String,
            &[("record", "create"), ("record", "update")],
        )
        .choices(&["A", "AAAA", "CAA", "CNAME", "MX", "NS", "SRV", "TXT"]),
        Property::required(
            "content",
            "Content",
            PropertyKind::String,
            &[("record", "create"), ("record", "update")],
        ),
        Property::optional(
            "ttl",
            "TTL",
            PropertyKind::Number,
            &[("record", "create"), ("record", "update")],
        ),
        Property::optional(
            "priority",
            "Priority",
            PropertyKind::Number,
            &[("record", "create"), ("record", "update")],
        )
        .describe("Only meaningful for MX and SRV records"),
        Property::required("zoneFile", "Zone File", PropertyKind::String, &[("zone", "import")])
            .describe("BIND zone file content, sent verbatim"),
        Property::optional("filterZoneName", "Filter by Zone Name", PropertyKind::String, &[(
            "zone",
            "getMany",
        )]),
        Property::optional("offset", "Offset", PropertyKind::Number, &[]),
        Property::optional("limit", "Limit", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("zone", "create", Method::POST, "/zones")
            .field(FieldMapping::required("zoneName", "properties.zoneName"))
            .field(FieldMapping::optional("description", "properties.description"))
            .field(FieldMapping::optional("enabled", "properties.enabled")),
        Operation::new("zone", "get", Method::GET, "/zones/{zoneId}").path_params(&["zoneId"]),
        Operation::new("zone", "getMany", Method::GET, "/zones")
            .query(FieldMapping::optional("filterZoneName", "filter.zoneName"))
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("zone", "update", Method::PUT, "/zones/{zoneId}")
            .path_params(&["zoneId"])
            .field(FieldMapping::required("zoneName", "properties.zoneName"))
            .field(FieldMapping::optional("description", "properties.description"))
            .field(FieldMapping::optional("enabled", "properties.enabled")),
        Operation::new("zone", "delete", Method::DELETE, "/zones/{zoneId}")
            .path_params(&["zoneId"])
            .shape(ShapeRule::Success),
        Operation::new("zone", "import", Method::POST, "/zones/{zoneId}/zonefile")
            .path_params(&["zoneId"])
            .body(BodyKind::Text { source: "zoneFile" }),
        Operation::new("zone", "export", Method::GET, "/zones/{zoneId}/zonefile")
            .path_params(&["zoneId"])
            .shape(ShapeRule::Scalar("zoneFile")),
        Operation::new("record", "create", Method::POST, "/zones/{zoneId}/records")
            .path_params(&["zoneId"])
            .field(FieldMapping::required("recordName", "properties.name"))
            .field(FieldMapping::required("recordType", "properties.type"))
            .field(FieldMapping::required("content", "properties.content"))
            .field(FieldMapping::optional("ttl", "properties.ttl"))
            .field(FieldMapping::optional("priority", "properties.priority"))
            .field(FieldMapping::optional("enabled", "properties.enabled")),
        Operation::new("record", "get", Method::GET, "/zones/{zoneId}/records/{recordId}")
            .path_params(&["zoneId", "recordId"]),
        Operation::new("record", "getMany", Method::GET, "/zones/{zoneId}/records")
            .path_params(&["zoneId"])
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("record", "update", Method::PUT, "/zones/{zoneId}/records/{recordId}")
            .path_params(&["zoneId", "recordId"])
            .field(FieldMapping::required("recordName", "properties.name"))
            .field(FieldMapping::required("recordType", "properties.type"))
            .field(FieldMapping::required("content", "properties.content"))
            .field(FieldMapping::optional("ttl", "properties.ttl"))
            .field(FieldMapping::optional("priority", "properties.priority"))
            .field(FieldMapping::optional("enabled", "properties.enabled")),
        Operation::new("record", "delete", Method::DELETE, "/zones/{zoneId}/records/{recordId}")
            .path_params(&["zoneId", "recordId"])
            .shape(ShapeRule::Success),
    ]
}

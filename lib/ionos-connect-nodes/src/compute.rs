//! Compute Engine node: datacenters, servers, volumes, LANs, and NICs.
//!
//! Servers and volumes carry the two non-uniform rules of the Compute API:
//! the volume flagged as boot volume must sit at index 0 of the list sent at
//! server creation, and a new volume must name exactly one image source
//! (image ID, image alias, or licence type for an empty volume).

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Policy, Property, PropertyKind, ShapeRule, Transform,
};

const DATACENTER_SCOPED: &[(&str, &str)] = &[
    ("datacenter", "get"),
    ("datacenter", "update"),
    ("datacenter", "delete"),
    ("server", "create"),
    ("server", "get"),
    ("server", "getMany"),
    ("server", "update"),
    ("server", "delete"),
    ("server", "start"),
    ("server", "stop"),
    ("server", "reboot"),
    ("volume", "create"),
    ("volume", "get"),
    ("volume", "getMany"),
    ("volume", "update"),
    ("volume", "delete"),
    ("lan", "create"),
    ("lan", "get"),
    ("lan", "getMany"),
    ("lan", "update"),
    ("lan", "delete"),
    ("nic", "create"),
    ("nic", "get"),
    ("nic", "getMany"),
    ("nic", "update"),
    ("nic", "delete"),
];

const SERVER_SCOPED: &[(&str, &str)] = &[
    ("server", "get"),
    ("server", "update"),
    ("server", "delete"),
    ("server", "start"),
    ("server", "stop"),
    ("server", "reboot"),
    ("nic", "create"),
    ("nic", "get"),
    ("nic", "getMany"),
    ("nic", "update"),
    ("nic", "delete"),
];

const NAMEABLE: &[(&str, &str)] = &[
    ("datacenter", "create"),
    ("datacenter", "update"),
    ("server", "create"),
    ("server", "update"),
    ("volume", "create"),
    ("volume", "update"),
    ("lan", "create"),
    ("lan", "update"),
    ("nic", "create"),
    ("nic", "update"),
];

/// Builds the Compute Engine node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosCompute",
        display_name: "IONOS Compute Engine",
        description: "Manage datacenters, servers, volumes, LANs and NICs",
        base_url: "https://api.ionos.com/cloudapi/v6",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required("datacenterId", "Datacenter ID", PropertyKind::String, DATACENTER_SCOPED),
        Property::required("serverId", "Server ID", PropertyKind::String, SERVER_SCOPED),
        Property::required(
            "volumeId",
            "Volume ID",
            PropertyKind::String,
            &[("volume", "get"), ("volume", "update"), ("volume", "delete")],
        ),
        Property::required(
            "lanId",
            "LAN ID",
            PropertyKind::String,
            &[("lan", "get"), ("lan", "update"), ("lan", "delete")],
        ),
        Property::required(
            "nicId",
            "NIC ID",
            PropertyKind::String,
            &[("nic", "get"), ("nic", "update"), ("nic", "delete")],
        ),
        Property::required("name", "Name", PropertyKind::String, NAMEABLE),
        Property::required("location", "Location", PropertyKind::String, &[("datacenter", "create")])
            .describe("Physical location of the datacenter, e.g. de/fra")
            .choices(&["de/fra", "de/txl", "es/vit", "fr/par", "gb/lhr", "us/ewr", "us/las"]),
        Property::optional(
            "description",
            "Description",
            PropertyKind::String,
            &[("datacenter", "create"), ("datacenter", "update")],
        ),
        Property::required(
            "cores",
            "Cores",
            PropertyKind::Number,
            &[("server", "create"), ("server", "update")],
        ),
        Property::required(
            "ram",
            "RAM (MB)",
            PropertyKind::Number,
            &[("server", "create"), ("server", "update")],
        )
        .describe("Memory in MB, in multiples of 256"),
        Property::optional(
            "availabilityZone",
            "Availability Zone",
            PropertyKind::String,
            &[("server", "create"), ("volume", "create")],
        )
        .choices(&["AUTO", "ZONE_1", "ZONE_2", "ZONE_3"]),
        Property::optional("cpuFamily", "CPU Family", PropertyKind::String, &[("server", "create")])
            .choices(&["AMD_OPTERON", "INTEL_SKYLAKE", "INTEL_XEON"]),
        Property::optional("volumes", "Volumes", PropertyKind::Collection, &[("server", "create")])
            .describe("Volumes created with the server; flag one as boot volume"),
        Property::required(
            "size",
            "Size (GB)",
            PropertyKind::Number,
            &[("volume", "create"), ("volume", "update")],
        ),
        Property::optional("volumeType", "Volume Type", PropertyKind::String, &[("volume", "create")])
            .choices(&["HDD", "SSD", "SSD Standard", "SSD Premium", "DAS"]),
        Property::optional("image", "Image ID", PropertyKind::String, &[("volume", "create")])
            .describe("ID of an existing image; alternative to an image alias or licence type"),
        Property::optional("imageAlias", "Image Alias", PropertyKind::String, &[("volume", "create")])
            .describe("Image alias such as ubuntu:latest"),
        Property::optional(
            "licenceType",
            "Licence Type",
            PropertyKind::String,
            &[("volume", "create")],
        )
        .describe("Licence for an empty volume, when no image is given")
        .choices(&["LINUX", "WINDOWS", "WINDOWS2016", "UNKNOWN", "OTHER"]),
        Property::optional("imagePassword", "Image Password", PropertyKind::String, &[("volume", "create")]),
        Property::optional("sshKeys", "SSH Keys", PropertyKind::String, &[("volume", "create")])
            .describe("Comma-separated list of public SSH keys"),
        Property::optional("public", "Public", PropertyKind::Boolean, &[("lan", "create"), ("lan", "update")]),
        Property::optional("ips", "IPs", PropertyKind::String, &[("nic", "create"), ("nic", "update")])
            .describe("Comma-separated list of IP addresses"),
        Property::optional("dhcp", "DHCP", PropertyKind::Boolean, &[("nic", "create"), ("nic", "update")]),
        Property::required("lan", "LAN", PropertyKind::Number, &[("nic", "create")]),
        Property::optional("depth", "Depth", PropertyKind::Number, &[])
            .describe("Level of detail of the response objects"),
        Property::optional("offset", "Offset", PropertyKind::Number, &[]),
        Property::optional("limit", "Limit", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        // Datacenter
        Operation::new("datacenter", "create", Method::POST, "/datacenters")
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::required("location", "properties.location"))
            .field(FieldMapping::optional("description", "properties.description")),
        Operation::new("datacenter", "get", Method::GET, "/datacenters/{datacenterId}")
            .path_params(&["datacenterId"])
            .query(FieldMapping::optional("depth", "depth")),
        Operation::new("datacenter", "getMany", Method::GET, "/datacenters")
            .query(FieldMapping::optional("depth", "depth"))
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("datacenter", "update", Method::PATCH, "/datacenters/{datacenterId}")
            .path_params(&["datacenterId"])
            .field(FieldMapping::optional("name", "name"))
            .field(FieldMapping::optional("description", "description")),
        Operation::new("datacenter", "delete", Method::DELETE, "/datacenters/{datacenterId}")
            .path_params(&["datacenterId"])
            .shape(ShapeRule::Success),
        // Server
        Operation::new("server", "create", Method::POST, "/datacenters/{datacenterId}/servers")
            .path_params(&["datacenterId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::required("cores", "properties.cores"))
            .field(FieldMapping::required("ram", "properties.ram"))
            .field(FieldMapping::optional("availabilityZone", "properties.availabilityZone"))
            .field(FieldMapping::optional("cpuFamily", "properties.cpuFamily"))
            .field(FieldMapping::optional("volumes", "entities.volumes.items"))
            .policy(Policy::BootVolumeReorder {
                list: "entities.volumes.items",
                flag: "bootVolume",
            }),
        Operation::new("server", "get", Method::GET, "/datacenters/{datacenterId}/servers/{serverId}")
            .path_params(&["datacenterId", "serverId"])
            .query(FieldMapping::optional("depth", "depth")),
        Operation::new("server", "getMany", Method::GET, "/datacenters/{datacenterId}/servers")
            .path_params(&["datacenterId"])
            .query(FieldMapping::optional("depth", "depth"))
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new(
            "server",
            "update",
            Method::PATCH,
            "/datacenters/{datacenterId}/servers/{serverId}",
        )
        .path_params(&["datacenterId", "serverId"])
        .field(FieldMapping::optional("name", "name"))
        .field(FieldMapping::optional("cores", "cores"))
        .field(FieldMapping::optional("ram", "ram")),
        Operation::new(
            "server",
            "delete",
            Method::DELETE,
            "/datacenters/{datacenterId}/servers/{serverId}",
        )
        .path_params(&["datacenterId", "serverId"])
        .shape(ShapeRule::Success),
        Operation::new(
            "server",
            "start",
            Method::POST,
            "/datacenters/{datacenterId}/servers/{serverId}/start",
        )
        .path_params(&["datacenterId", "serverId"])
        .shape(ShapeRule::Success),
        Operation::new(
            "server",
            "stop",
            Method::POST,
            "/datacenters/{datacenterId}/servers/{serverId}/stop",
        )
        .path_params(&["datacenterId", "serverId"])
        .shape(ShapeRule::Success),
        Operation::new(
            "server",
            "reboot",
            Method::POST,
            "/datacenters/{datacenterId}/servers/{serverId}/reboot",
        )
        .path_params(&["datacenterId", "serverId"])
        .shape(ShapeRule::Success),
        // Volume
        Operation::new("volume", "create", Method::POST, "/datacenters/{datacenterId}/volumes")
            .path_params(&["datacenterId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::required("size", "properties.size"))
            .field(FieldMapping::optional("volumeType", "properties.type"))
            .field(FieldMapping::optional("availabilityZone", "properties.availabilityZone"))
            .field(FieldMapping::optional("image", "properties.image"))
            .field(FieldMapping::optional("imageAlias", "properties.imageAlias"))
            .field(
                FieldMapping::optional("licenceType", "properties.licenceType")
                    .transform(Transform::UpperCase),
            )
            .field(FieldMapping::optional("imagePassword", "properties.imagePassword"))
            .field(
                FieldMapping::optional("sshKeys", "properties.sshKeys")
                    .transform(Transform::CommaList),
            )
            .exactly_one_of(&["image", "imageAlias", "licenceType"]),
        Operation::new(
            "volume",
            "get",
            Method::GET,
            "/datacenters/{datacenterId}/volumes/{volumeId}",
        )
        .path_params(&["datacenterId", "volumeId"])
        .query(FieldMapping::optional("depth", "depth")),
        Operation::new("volume", "getMany", Method::GET, "/datacenters/{datacenterId}/volumes")
            .path_params(&["datacenterId"])
            .query(FieldMapping::optional("depth", "depth"))
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new(
            "volume",
            "update",
            Method::PATCH,
            "/datacenters/{datacenterId}/volumes/{volumeId}",
        )
        .path_params(&["datacenterId", "volumeId"])
        .field(FieldMapping::optional("name", "name"))
        .field(FieldMapping::optional("size", "size")),
        Operation::new(
            "volume",
            "delete",
            Method::DELETE,
            "/datacenters/{datacenterId}/volumes/{volumeId}",
        )
        .path_params(&["datacenterId", "volumeId"])
        .shape(ShapeRule::Success),
        // LAN
        Operation::new("lan", "create", Method::POST, "/datacenters/{datacenterId}/lans")
            .path_params(&["datacenterId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("public", "properties.public")),
        Operation::new("lan", "get", Method::GET, "/datacenters/{datacenterId}/lans/{lanId}")
            .path_params(&["datacenterId", "lanId"])
            .query(FieldMapping::optional("depth", "depth")),
        Operation::new("lan", "getMany", Method::GET, "/datacenters/{datacenterId}/lans")
            .path_params(&["datacenterId"])
            .query(FieldMapping::optional("depth", "depth"))
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("lan", "update", Method::PATCH, "/datacenters/{datacenterId}/lans/{lanId}")
            .path_params(&["datacenterId", "lanId"])
            .field(FieldMapping::optional("name", "name"))
            .field(FieldMapping::optional("public", "public")),
        Operation::new("lan", "delete", Method::DELETE, "/datacenters/{datacenterId}/lans/{lanId}")
            .path_params(&["datacenterId", "lanId"])
            .shape(ShapeRule::Success),
        // NIC
        Operation::new(
            "nic",
            "create",
            Method::POST,
            "/datacenters/{datacenterId}/servers/{serverId}/nics",
        )
        .path_params(&["datacenterId", "serverId"])
        .field(FieldMapping::required("name", "properties.name"))
        .field(FieldMapping::required("lan", "properties.lan"))
        .field(FieldMapping::optional("ips", "properties.ips").transform(Transform::CommaList))
        .field(FieldMapping::optional("dhcp", "properties.dhcp")),
        Operation::new(
            "nic",
            "get",
            Method::GET,
            "/datacenters/{datacenterId}/servers/{serverId}/nics/{nicId}",
        )
        .path_params(&["datacenterId", "serverId", "nicId"])
        .query(FieldMapping::optional("depth", "depth")),
        Operation::new(
            "nic",
            "getMany",
            Method::GET,
            "/datacenters/{datacenterId}/servers/{serverId}/nics",
        )
        .path_params(&["datacenterId", "serverId"])
        .query(FieldMapping::optional("depth", "depth"))
        .query(FieldMapping::optional("offset", "offset"))
        .query(FieldMapping::optional("limit", "limit"))
        .shape(ShapeRule::Items),
        Operation::new(
            "nic",
            "update",
            Method::PATCH,
            "/datacenters/{datacenterId}/servers/{serverId}/nics/{nicId}",
        )
        .path_params(&["datacenterId", "serverId", "nicId"])
        .field(FieldMapping::optional("name", "name"))
        .field(FieldMapping::optional("ips", "ips").transform(Transform::CommaList))
        .field(FieldMapping::optional("dhcp", "dhcp")),
        Operation::new(
            "nic",
            "delete",
            Method::DELETE,
            "/datacenters/{datacenterId}/servers/{serverId}/nics/{nicId}",
        )
        .path_params(&["datacenterId", "serverId", "nicId"])
        .shape(ShapeRule::Success),
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
    fn server_create_moves_the_boot_volume_to_the_front() {
        let node = node();
        let op = node.find("server", "create").expect("in catalog");
        let bag = ParamBag::new()
            .with("datacenterId", "dc-1")
            .with("name", "web-01")
            .with("cores", 2)
            .with("ram", 2048)
            .with(
                "volumes",
                json!([
                    {"properties": {"name": "data", "size": 50}},
                    {"properties": {"name": "system", "size": 20}, "bootVolume": true},
                ]),
            );

        let plan = build_plan(&node, op, &bag).expect("a plan");
        let Payload::Json(body) = plan.body else {
            panic!("expected a JSON body");
        };
        assert_eq!(
            body["entities"]["volumes"]["items"],
            json!([
                {"properties": {"name": "system", "size": 20}},
                {"properties": {"name": "data", "size": 50}},
            ])
        );
        assert_eq!(body["properties"]["cores"], json!(2));
    }

    #[test]
    fn volume_create_needs_exactly_one_image_source() {
        let node = node();
        let op = node.find("volume", "create").expect("in catalog");
        let bag = ParamBag::new()
            .with("datacenterId", "dc-1")
            .with("name", "empty-vol")
            .with("size", 100);

        let error = build_plan(&node, op, &bag).expect_err("no image source");
        assert!(error.to_string().contains("exactly one of"));

        let bag = bag.with("licenceType", "linux");
        let plan = build_plan(&node, op, &bag).expect("a plan");
        let Payload::Json(body) = plan.body else {
            panic!("expected a JSON body");
        };
        // Licence types are upper-cased for the API
        assert_eq!(body["properties"]["licenceType"], json!("LINUX"));
    }

    #[test]
    fn update_sends_a_flat_patch_body() {
        let node = node();
        let op = node.find("server", "update").expect("in catalog");
        let bag = ParamBag::new()
            .with("datacenterId", "dc-1")
            .with("serverId", "srv-1")
            .with("cores", 8);

        let plan = build_plan(&node, op, &bag).expect("a plan");
        assert_eq!(plan.method, Method::PATCH);
        assert_eq!(plan.body, Payload::Json(json!({"cores": 8})));
    }

    #[test]
    fn server_start_has_no_body() {
        let node = node();
        let op = node.find("server", "start").expect("in catalog");
        let bag = ParamBag::new().with("datacenterId", "dc-1").with("serverId", "srv-1");

        let plan = build_plan(&node, op, &bag).expect("a plan");
        assert!(plan.body.is_empty());
        assert!(plan.url.as_str().ends_with("/servers/srv%2D1/start"));
    }
}

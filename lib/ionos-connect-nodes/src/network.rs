//! Network node: reserved IP blocks and cross-connects.

use http::Method;
use ionos_connect_core::{FieldMapping, NodeDef, Operation, Property, PropertyKind, ShapeRule};

/// Builds the Network node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosNetwork",
        display_name: "IONOS Network",
        description: "Reserve IP blocks and manage cross-connects",
        base_url: "https://api.ionos.com/cloudapi/v6",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required(
            "ipBlockId",
            "IP Block ID",
            PropertyKind::String,
            &[("ipBlock", "get"), ("ipBlock", "update"), ("ipBlock", "delete")],
        ),
        Property::required(
            "crossConnectId",
            "Cross Connect ID",
            PropertyKind::String,
            &[
                ("crossConnect", "get"),
                ("crossConnect", "update"),
                ("crossConnect", "delete"),
            ],
        ),
        Property::required(
            "name",
            "Name",
            PropertyKind::String,
            &[
                ("ipBlock", "reserve"),
                ("ipBlock", "update"),
                ("crossConnect", "create"),
                ("crossConnect", "update"),
            ],
        ),
        Property::required("location", "Location", PropertyKind::String, &[("ipBlock", "reserve")])
            .choices(&["de/fra", "de/txl", "es/vit", "fr/par", "gb/lhr", "us/ewr", "us/las"]),
        Property::required("size", "Size", PropertyKind::Number, &[("ipBlock", "reserve")])
            .describe("Number of IP addresses to reserve"),
        Property::optional(
            "description",
            "Description",
            PropertyKind::String,
            &[("crossConnect", "create"), ("crossConnect", "update")],
        ),
        Property::optional("depth", "Depth", PropertyKind::Number, &[]),
        Property::optional("offset", "Offset", PropertyKind::Number, &[]),
        Property::optional("limit", "Limit", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("ipBlock", "reserve", Method::POST, "/ipblocks")
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::required("location", "properties.location"))
            .field(FieldMapping::required("size", "properties.size")),
        Operation::new("ipBlock", "get", Method::GET, "/ipblocks/{ipBlockId}")
            .path_params(&["ipBlockId"])
            .query(FieldMapping::optional("depth", "depth")),
        Operation::new("ipBlock", "getMany", Method::GET, "/ipblocks")
            .query(FieldMapping::optional("depth", "depth"))
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("ipBlock", "update", Method::PATCH, "/ipblocks/{ipBlockId}")
            .path_params(&["ipBlockId"])
            .field(FieldMapping::optional("name", "name")),
        Operation::new("ipBlock", "delete", Method::DELETE, "/ipblocks/{ipBlockId}")
            .path_params(&["ipBlockId"])
            .shape(ShapeRule::Success),
        Operation::new("crossConnect", "create", Method::POST, "/pccs")
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("description", "properties.description")),
        Operation::new("crossConnect", "get", Method::GET, "/pccs/{crossConnectId}")
            .path_params(&["crossConnectId"])
            .query(FieldMapping::optional("depth", "depth")),
        Operation::new("crossConnect", "getMany", Method::GET, "/pccs")
            .query(FieldMapping::optional("depth", "depth"))
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("crossConnect", "update", Method::PATCH, "/pccs/{crossConnectId}")
            .path_params(&["crossConnectId"])
            .field(FieldMapping::optional("name", "name"))
            .field(FieldMapping::optional("description", "description")),
        Operation::new("crossConnect", "delete", Method::DELETE, "/pccs/{crossConnectId}")
            .path_params(&["crossConnectId"])
            .shape(ShapeRule::Success),
    ]
}

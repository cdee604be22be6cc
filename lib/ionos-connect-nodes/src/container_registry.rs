//! Container Registry node: registries, access tokens, and the registry
//! name availability check.
//!
//! The availability check is the one place a 404 is good news: the names
//! endpoint answers 404 when the name is free and 2xx when it is taken.

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Policy, Property, PropertyKind, ShapeRule, Transform,
};

const REGISTRY_SCOPED: &[(&str, &str)] = &[
    ("registry", "get"),
    ("registry", "update"),
    ("registry", "delete"),
    ("token", "create"),
    ("token", "get"),
    ("token", "getMany"),
    ("token", "update"),
    ("token", "delete"),
];

/// Builds the Container Registry node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosContainerRegistry",
        display_name: "IONOS Container Registry",
        description: "Manage container registries and access tokens",
        base_url: "https://api.ionos.com/containerregistries",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required("registryId", "Registry ID", PropertyKind::String, REGISTRY_SCOPED),
        Property::required(
            "tokenId",
            "Token ID",
            PropertyKind::String,
            &[("token", "get"), ("token", "update"), ("token", "delete")],
        ),
        Property::required(
            "name",
            "Name",
            PropertyKind::String,
            &[("registry", "create"), ("name", "checkAvailability"), ("token", "create")],
        )
        .describe("Registry names are globally unique per location"),
        Property::required("location", "Location", PropertyKind::String, &[("registry", "create")])
            .choices(&["de/fra", "de/txl", "es/vit", "fr/par", "gb/lhr", "us/ewr", "us/las"]),
        Property::optional(
            "garbageCollectionSchedule",
            "Garbage Collection Schedule",
            PropertyKind::Json,
            &[("registry", "create"), ("registry", "update")],
        )
        .describe(r#"JSON object such as {"days": ["Saturday"], "time": "01:00:00+00:00"}"#),
        Property::optional(
            "expiryDate",
            "Expiry Date",
            PropertyKind::String,
            &[("token", "create"), ("token", "update")],
        ),
        Property::optional(
            "status",
            "Status",
            PropertyKind::String,
            &[("token", "create"), ("token", "update")],
        )
        .choices(&["enabled", "disabled"]),
        Property::optional(
            "scopes",
            "Scopes",
            PropertyKind::Json,
            &[("token", "create"), ("token", "update")],
        )
        .describe(r#"JSON array of scopes, e.g. [{"name": "app", "type": "repository", "actions": ["pull"]}]"#),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("registry", "create", Method::POST, "/registries")
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::required("location", "properties.location"))
            .field(
                FieldMapping::optional(
                    "garbageCollectionSchedule",
                    "properties.garbageCollectionSchedule",
                )
                .transform(Transform::JsonText),
            ),
        Operation::new("registry", "get", Method::GET, "/registries/{registryId}")
            .path_params(&["registryId"]),
        Operation::new("registry", "getMany", Method::GET, "/registries").shape(ShapeRule::Items),
        Operation::new("registry", "update", Method::PATCH, "/registries/{registryId}")
            .path_params(&["registryId"])
            .field(
                FieldMapping::optional("garbageCollectionSchedule", "garbageCollectionSchedule")
                    .transform(Transform::JsonText),
            ),
        Operation::new("registry", "delete", Method::DELETE, "/registries/{registryId}")
            .path_params(&["registryId"])
            .shape(ShapeRule::Success),
        // 404 here means the name is free; anything else non-2xx is an error
        Operation::new("name", "checkAvailability", Method::HEAD, "/names/{name}")
            .path_params(&["name"])
            .policy(Policy::Expect404IsAvailable { field: "name" }),
        Operation::new("token", "create", Method::POST, "/registries/{registryId}/tokens")
            .path_params(&["registryId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("expiryDate", "properties.expiryDate"))
            .field(FieldMapping::optional("status", "properties.status"))
            .field(FieldMapping::optional("scopes", "properties.scopes").transform(Transform::JsonText)),
        Operation::new("token", "get", Method::GET, "/registries/{registryId}/tokens/{tokenId}")
            .path_params(&["registryId", "tokenId"]),
        Operation::new("token", "getMany", Method::GET, "/registries/{registryId}/tokens")
            .path_params(&["registryId"])
            .shape(ShapeRule::Items),
        Operation::new(
            "token",
            "update",
            Method::PATCH,
            "/registries/{registryId}/tokens/{tokenId}",
        )
        .path_params(&["registryId", "tokenId"])
        .field(FieldMapping::optional("expiryDate", "expiryDate"))
        .field(FieldMapping::optional("status", "status"))
        .field(FieldMapping::optional("scopes", "scopes").transform(Transform::JsonText)),
        Operation::new(
            "token",
            "delete",
            Method::DELETE,
            "/registries/{registryId}/tokens/{tokenId}",
        )
        .path_params(&["registryId", "tokenId"])
        .shape(ShapeRule::Success),
    ]
}

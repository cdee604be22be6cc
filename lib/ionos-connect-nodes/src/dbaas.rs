//! Database-as-a-Service node: PostgreSQL and MariaDB clusters plus
//! in-memory (Redis-compatible) replica sets.
//!
//! Two rules set this catalog apart. MariaDB and replica-set sizing is
//! entered in MB but the API is sized in GB, so those fields carry the
//! MB-to-GB transform. Replica-set update is the one read-modify-write
//! operation: the current entity is fetched, changed fields are merged in
//! (including the `resources` sub-object), and the write-once `credentials`
//! are stripped before the full object goes back out.

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Policy, Property, PropertyKind, ShapeRule, Transform,
};

const CREDENTIALED_CREATES: &[(&str, &str)] = &[
    ("postgresCluster", "create"),
    ("mariadbCluster", "create"),
    ("replicaSet", "create"),
];

const DISPLAY_NAMED: &[(&str, &str)] = &[
    ("postgresCluster", "create"),
    ("postgresCluster", "update"),
    ("mariadbCluster", "create"),
    ("replicaSet", "create"),
    ("replicaSet", "update"),
];

/// Builds the DBaaS node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosDbaas",
        display_name: "IONOS DBaaS",
        description: "Manage PostgreSQL and MariaDB clusters and in-memory replica sets",
        base_url: "https://api.ionos.com/databases",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required(
            "clusterId",
            "Cluster ID",
            PropertyKind::String,
            &[
                ("postgresCluster", "get"),
                ("postgresCluster", "update"),
                ("postgresCluster", "delete"),
                ("mariadbCluster", "get"),
                ("mariadbCluster", "delete"),
            ],
        ),
        Property::required(
            "replicaSetId",
            "Replica Set ID",
            PropertyKind::String,
            &[("replicaSet", "get"), ("replicaSet", "update"), ("replicaSet", "delete")],
        ),
        Property::required("displayName", "Display Name", PropertyKind::String, DISPLAY_NAMED),
        Property::optional(
            "postgresVersion",
            "PostgreSQL Version",
            PropertyKind::String,
            &[("postgresCluster", "create"), ("postgresCluster", "update")],
        ),
        Property::optional("mariadbVersion", "MariaDB Version", PropertyKind::String, &[(
            "mariadbCluster",
            "create",
        )]),
        Property::optional(
            "version",
            "Version",
            PropertyKind::String,
            &[("replicaSet", "create"), ("replicaSet", "update")],
        ),
        Property::required(
            "instances",
            "Instances",
            PropertyKind::Number,
            &[
                ("postgresCluster", "create"),
                ("postgresCluster", "update"),
                ("mariadbCluster", "create"),
            ],
        ),
        Property::optional(
            "replicas",
            "Replicas",
            PropertyKind::Number,
            &[("replicaSet", "create"), ("replicaSet", "update")],
        ),
        Property::required(
            "cores",
            "Cores",
            PropertyKind::Number,
            &[
                ("postgresCluster", "create"),
                ("postgresCluster", "update"),
                ("mariadbCluster", "create"),
                ("replicaSet", "create"),
                ("replicaSet", "update"),
            ],
        ),
        Property::required(
            "ram",
            "RAM (MB)",
            PropertyKind::Number,
            &[
                ("postgresCluster", "create"),
                ("postgresCluster", "update"),
                ("mariadbCluster", "create"),
                ("replicaSet", "create"),
                ("replicaSet", "update"),
            ],
        )
        .describe("Memory per instance in MB"),
        Property::required(
            "storageSize",
            "Storage Size (MB)",
            PropertyKind::Number,
            &[("postgresCluster", "create"), ("mariadbCluster", "create")],
        )
        .describe("Storage per instance in MB"),
        Property::optional("storageType", "Storage Type", PropertyKind::String, &[(
            "postgresCluster",
            "create",
        )])
        .choices(&["HDD", "SSD", "SSD Standard", "SSD Premium"]),
        Property::required("connections", "Connections", PropertyKind::Json, &[
            ("postgresCluster", "create"),
            ("mariadbCluster", "create"),
            ("replicaSet", "create"),
        ])
        .describe(
            r#"JSON array of datacenter connections, e.g. [{"datacenterId": "...", "lanId": "2", "cidr": "10.0.0.1/24"}]"#,
        ),
        Property::required("location", "Location", PropertyKind::String, &[
            ("postgresCluster", "create"),
            ("mariadbCluster", "create"),
            ("replicaSet", "create"),
        ])
        .choices(&["de/fra", "de/txl", "es/vit", "fr/par", "gb/lhr", "us/ewr", "us/las"]),
        Property::required("username", "Username", PropertyKind::String, CREDENTIALED_CREATES)
            .describe("Initial database user; write-once, never sent on update"),
        Property::required("password", "Password", PropertyKind::String, CREDENTIALED_CREATES),
        Property::optional(
            "maintenanceWindow",
            "Maintenance Window",
            PropertyKind::Json,
            &[
                ("postgresCluster", "create"),
                ("postgresCluster", "update"),
                ("mariadbCluster", "create"),
            ],
        ),
        Property::optional("persistenceMode", "Persistence Mode", PropertyKind::String, &[(
            "replicaSet",
            "create",
        )])
        .choices(&["None", "AOF", "RDB", "RDB_AOF"]),
        Property::optional("evictionPolicy", "Eviction Policy", PropertyKind::String, &[(
            "replicaSet",
            "create",
        )]),
        Property::optional("limit", "Limit", PropertyKind::Number, &[]),
        Property::optional("offset", "Offset", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        // PostgreSQL
        Operation::new("postgresCluster", "create", Method::POST, "/postgresql/clusters")
            .field(FieldMapping::required("displayName", "properties.displayName"))
            .field(FieldMapping::optional("postgresVersion", "properties.postgresVersion"))
            .field(FieldMapping::required("instances", "properties.instances"))
            .field(FieldMapping::required("cores", "properties.cores"))
            .field(FieldMapping::required("ram", "properties.ram").transform(Transform::MbToGb))
            .field(
                FieldMapping::required("storageSize", "properties.storageSize")
                    .transform(Transform::MbToGb),
            )
            .field(FieldMapping::optional("storageType", "properties.storageType"))
            .field(
                FieldMapping::required("connections", "properties.connections")
                    .transform(Transform::JsonText),
            )
            .field(FieldMapping::required("location", "properties.location"))
            .field(FieldMapping::required("username", "properties.credentials.username"))
            .field(FieldMapping::required("password", "properties.credentials.password"))
            .field(
                FieldMapping::optional("maintenanceWindow", "properties.maintenanceWindow")
                    .transform(Transform::JsonText),
            ),
        Operation::new("postgresCluster", "get", Method::GET, "/postgresql/clusters/{clusterId}")
            .path_params(&["clusterId"]),
        Operation::new("postgresCluster", "getMany", Method::GET, "/postgresql/clusters")
            .query(FieldMapping::optional("limit", "limit"))
            .query(FieldMapping::optional("offset", "offset"))
            .shape(ShapeRule::Items),
        Operation::new(
            "postgresCluster",
            "update",
            Method::PATCH,
            "/postgresql/clusters/{clusterId}",
        )
        .path_params(&["clusterId"])
        .field(FieldMapping::optional("displayName", "properties.displayName"))
        .field(FieldMapping::optional("postgresVersion", "properties.postgresVersion"))
        .field(FieldMapping::optional("instances", "properties.instances"))
        .field(FieldMapping::optional("cores", "properties.cores"))
        .field(FieldMapping::optional("ram", "properties.ram").transform(Transform::MbToGb))
        .field(
            FieldMapping::optional("maintenanceWindow", "properties.maintenanceWindow")
                .transform(Transform::JsonText),
        ),
        Operation::new(
            "postgresCluster",
            "delete",
            Method::DELETE,
            "/postgresql/clusters/{clusterId}",
        )
        .path_params(&["clusterId"])
        .shape(ShapeRule::Success),
        // MariaDB
        Operation::new("mariadbCluster", "create", Method::POST, "/mariadb/clusters")
            .field(FieldMapping::required("displayName", "properties.displayName"))
            .field(FieldMapping::optional("mariadbVersion", "properties.mariadbVersion"))
            .field(FieldMapping::required("instances", "properties.instances"))
            .field(FieldMapping::required("cores", "properties.cores"))
            .field(FieldMapping::required("ram", "properties.ram").transform(Transform::MbToGb))
            .field(
                FieldMapping::required("storageSize", "properties.storageSize")
                    .transform(Transform::MbToGb),
            )
            .field(
                FieldMapping::required("connections", "properties.connections")
                    .transform(Transform::JsonText),
            )
            .field(FieldMapping::required("location", "properties.location"))
            .field(FieldMapping::required("username", "properties.credentials.username"))
            .field(FieldMapping::required("password", "properties.credentials.password"))
            .field(
                FieldMapping::optional("maintenanceWindow", "properties.maintenanceWindow")
                    .transform(Transform::JsonText),
            ),
        Operation::new("mariadbCluster", "get", Method::GET, "/mariadb/clusters/{clusterId}")
            .path_params(&["clusterId"]),
        Operation::new("mariadbCluster", "getMany", Method::GET, "/mariadb/clusters")
            .query(FieldMapping::optional("limit", "limit"))
            .query(FieldMapping::optional("offset", "offset"))
            .shape(ShapeRule::Items),
        Operation::new(
            "mariadbCluster",
            "delete",
            Method::DELETE,
            "/mariadb/clusters/{clusterId}",
        )
        .path_params(&["clusterId"])
        .shape(ShapeRule::Success),
        // In-memory replica sets
        Operation::new("replicaSet", "create", Method::POST, "/in-memory-db/replicasets")
            .field(FieldMapping::required("displayName", "properties.displayName"))
            .field(FieldMapping::optional("version", "properties.version"))
            .field(FieldMapping::optional("replicas", "properties.replicas"))
            .field(FieldMapping::required("cores", "properties.resources.cores"))
            .field(
                FieldMapping::required("ram", "properties.resources.ram")
                    .transform(Transform::MbToGb),
            )
            .field(FieldMapping::optional("persistenceMode", "properties.persistenceMode"))
            .field(FieldMapping::optional("evictionPolicy", "properties.evictionPolicy"))
            .field(
                FieldMapping::required("connections", "properties.connections")
                    .transform(Transform::JsonText),
            )
            .field(FieldMapping::required("location", "properties.location"))
            .field(FieldMapping::required("username", "properties.credentials.username"))
            .field(FieldMapping::required("password", "properties.credentials.password")),
        Operation::new("replicaSet", "get", Method::GET, "/in-memory-db/replicasets/{replicaSetId}")
            .path_params(&["replicaSetId"]),
        Operation::new("replicaSet", "getMany", Method::GET, "/in-memory-db/replicasets")
            .query(FieldMapping::optional("limit", "limit"))
            .query(FieldMapping::optional("offset", "offset"))
            .shape(ShapeRule::Items),
        // Full-object PUT: fetch, merge, strip write-once fields, resubmit
        Operation::new(
            "replicaSet",
            "update",
            Method::PUT,
            "/in-memory-db/replicasets/{replicaSetId}",
        )
        .path_params(&["replicaSetId"])
        .field(FieldMapping::optional("displayName", "properties.displayName"))
        .field(FieldMapping::optional("version", "properties.version"))
        .field(FieldMapping::optional("replicas", "properties.replicas"))
        .field(FieldMapping::optional("cores", "properties.resources.cores"))
        .field(
            FieldMapping::optional("ram", "properties.resources.ram")
                .transform(Transform::MbToGb),
        )
        .policy(Policy::ReadModifyWrite {
            strip: &["credentials", "metadata"],
        }),
        Operation::new(
            "replicaSet",
            "delete",
            Method::DELETE,
            "/in-memory-db/replicasets/{replicaSetId}",
        )
        .path_params(&["replicaSetId"])
        .shape(ShapeRule::Success),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ionos_connect_core::{ParamBag, Payload, build_plan, merge_for_update};
    use serde_json::json;

    #[test]
    fn catalog_is_consistent() {
        let node = node();
        let violations = node.catalog_violations();
        assert!(violations.is_empty(), "{}", violations.join("\n"));
    }

    #[test]
    fn mariadb_create_converts_mb_to_gb() {
        let node = node();
        let op = node.find("mariadbCluster", "create").expect("in catalog");
        let bag = ParamBag::new()
            .with("displayName", "orders-db")
            .with("instances", 1)
            .with("cores", 4)
            .with("ram", 4096)
            .with("storageSize", 20480)
            .with("connections", r#"[{"datacenterId": "dc-1", "lanId": "2", "cidr": "10.0.0.1/24"}]"#)
            .with("location", "de/txl")
            .with("username", "admin")
            .with("password", "hunter2hunter2");

        let plan = build_plan(&node, op, &bag).expect("a plan");
        let Payload::Json(body) = plan.body else {
            panic!("expected a JSON body");
        };
        assert_eq!(body["properties"]["ram"], json!(4));
        assert_eq!(body["properties"]["storageSize"], json!(20));
        assert_eq!(body["properties"]["credentials"]["username"], json!("admin"));
    }

    #[test]
    fn replica_set_update_declares_read_modify_write() {
        let node = node();
        let op = node.find("replicaSet", "update").expect("in catalog");
        assert_eq!(
            op.policy,
            Some(Policy::ReadModifyWrite {
                strip: &["credentials", "metadata"],
            })
        );

        let bag = ParamBag::new()
            .with("replicaSetId", "rs-1")
            .with("replicas", 5)
            .with("cores", 4);
        let plan = build_plan(&node, op, &bag).expect("a plan");
        assert_eq!(
            plan.body,
            Payload::Json(json!({"properties": {
                "replicas": 5,
                "resources": {"cores": 4},
            }}))
        );
    }

    #[test]
    fn replica_set_merge_keeps_ram_when_only_cores_change() {
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
        let updates = json!({"properties": {"resources": {"cores": 8}}});

        let merged = merge_for_update(&current, &updates, &["credentials", "metadata"]);
        assert_eq!(merged["properties"]["resources"], json!({"cores": 8, "ram": 4}));
        assert_eq!(merged["properties"].get("credentials"), None);
    }
}

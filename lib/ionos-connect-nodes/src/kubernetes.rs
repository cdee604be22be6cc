//! Managed Kubernetes node: clusters, node pools, and kubeconfig download.

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Property, PropertyKind, ShapeRule, Transform,
};

const CLUSTER_SCOPED: &[(&str, &str)] = &[
    ("cluster", "get"),
    ("cluster", "update"),
    ("cluster", "delete"),
    ("cluster", "getKubeconfig"),
    ("nodepool", "create"),
    ("nodepool", "get"),
    ("nodepool", "getMany"),
    ("nodepool", "update"),
    ("nodepool", "delete"),
];

/// Builds the Managed Kubernetes node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosKubernetes",
        display_name: "IONOS Managed Kubernetes",
        description: "Manage Kubernetes clusters and node pools",
        base_url: "https://api.ionos.com/cloudapi/v6",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required("clusterId", "Cluster ID", PropertyKind::String, CLUSTER_SCOPED),
        Property::required(
            "nodepoolId",
            "Node Pool ID",
            PropertyKind::String,
            &[("nodepool", "get"), ("nodepool", "update"), ("nodepool", "delete")],
        ),
        Property::required(
            "name",
            "Name",
            PropertyKind::String,
            &[("cluster", "create"), ("cluster", "update"), ("nodepool", "create")],
        ),
        Property::optional(
            "k8sVersion",
            "Kubernetes Version",
            PropertyKind::String,
            &[
                ("cluster", "create"),
                ("cluster", "update"),
                ("nodepool", "create"),
                ("nodepool", "update"),
            ],
        ),
        Property::optional(
            "maintenanceWindow",
            "Maintenance Window",
            PropertyKind::Json,
            &[
                ("cluster", "create"),
                ("cluster", "update"),
                ("nodepool", "create"),
                ("nodepool", "update"),
            ],
        )
        .describe(r#"JSON object such as {"dayOfTheWeek": "Sunday", "time": "03:00:00"}"#),
        Property::optional(
            "apiSubnetAllowList",
            "API Subnet Allow List",
            PropertyKind::String,
            &[("cluster", "create"), ("cluster", "update")],
        )
        .describe("Comma-separated list of CIDRs allowed to reach the API server"),
        Property::required("datacenterId", "Datacenter ID", PropertyKind::String, &[(
            "nodepool",
            "create",
        )]),
        Property::required(
            "nodeCount",
            "Node Count",
            PropertyKind::Number,
            &[("nodepool", "create"), ("nodepool", "update")],
        ),
        Property::optional("cpuFamily", "CPU Family", PropertyKind::String, &[("nodepool", "create")])
            .choices(&["AMD_OPTERON", "INTEL_SKYLAKE", "INTEL_XEON"]),
        Property::required("coresCount", "Cores per Node", PropertyKind::Number, &[(
            "nodepool",
            "create",
        )]),
        Property::required("ramSize", "RAM per Node (MB)", PropertyKind::Number, &[(
            "nodepool",
            "create",
        )]),
        Property::optional("storageType", "Storage Type", PropertyKind::String, &[(
            "nodepool",
            "create",
        )])
        .choices(&["HDD", "SSD"]),
        Property::optional("storageSize", "Storage Size (GB)", PropertyKind::Number, &[(
            "nodepool",
            "create",
        )]),
        Property::optional("lans", "LANs", PropertyKind::Json, &[
            ("nodepool", "create"),
            ("nodepool", "update"),
        ])
        .describe(r#"JSON array of LAN attachments, e.g. [{"id": 2, "dhcp": true}]"#),
        Property::optional("depth", "Depth", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("cluster", "create", Method::POST, "/k8s")
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("k8sVersion", "properties.k8sVersion"))
            .field(
                FieldMapping::optional("maintenanceWindow", "properties.maintenanceWindow")
                    .transform(Transform::JsonText),
            )
            .field(
                FieldMapping::optional("apiSubnetAllowList", "properties.apiSubnetAllowList")
                    .transform(Transform::CommaList),
            ),
        Operation::new("cluster", "get", Method::GET, "/k8s/{clusterId}")
            .path_params(&["clusterId"])
            .query(FieldMapping::optional("depth", "depth")),
        Operation::new("cluster", "getMany", Method::GET, "/k8s")
            .query(FieldMapping::optional("depth", "depth"))
            .shape(ShapeRule::Items),
        Operation::new("cluster", "update", Method::PUT, "/k8s/{clusterId}")
            .path_params(&["clusterId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("k8sVersion", "properties.k8sVersion"))
            .field(
                FieldMapping::optional("maintenanceWindow", "properties.maintenanceWindow")
                    .transform(Transform::JsonText),
            )
            .field(
                FieldMapping::optional("apiSubnetAllowList", "properties.apiSubnetAllowList")
                    .transform(Transform::CommaList),
            ),
        Operation::new("cluster", "delete", Method::DELETE, "/k8s/{clusterId}")
            .path_params(&["clusterId"])
            .shape(ShapeRule::Success),
        // The kubeconfig endpoint answers with a bare YAML string
        Operation::new("cluster", "getKubeconfig", Method::GET, "/k8s/{clusterId}/kubeconfig")
            .path_params(&["clusterId"])
            .shape(ShapeRule::Scalar("kubeconfig")),
        Operation::new("nodepool", "create", Method::POST, "/k8s/{clusterId}/nodepools")
            .path_params(&["clusterId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::required("datacenterId", "properties.datacenterId"))
            .field(FieldMapping::required("nodeCount", "properties.nodeCount"))
            .field(FieldMapping::required("coresCount", "properties.coresCount"))
            .field(FieldMapping::required("ramSize", "properties.ramSize"))
            .field(FieldMapping::optional("cpuFamily", "properties.cpuFamily"))
            .field(FieldMapping::optional("storageType", "properties.storageType"))
            .field(FieldMapping::optional("storageSize", "properties.storageSize"))
            .field(FieldMapping::optional("k8sVersion", "properties.k8sVersion"))
            .field(
                FieldMapping::optional("maintenanceWindow", "properties.maintenanceWindow")
                    .transform(Transform::JsonText),
            )
            .field(FieldMapping::optional("lans", "properties.lans").transform(Transform::JsonText)),
        Operation::new(
            "nodepool",
            "get",
            Method::GET,
            "/k8s/{clusterId}/nodepools/{nodepoolId}",
        )
        .path_params(&["clusterId", "nodepoolId"])
        .query(FieldMapping::optional("depth", "depth")),
        Operation::new("nodepool", "getMany", Method::GET, "/k8s/{clusterId}/nodepools")
            .path_params(&["clusterId"])
            .query(FieldMapping::optional("depth", "depth"))
            .shape(ShapeRule::Items),
        Operation::new(
            "nodepool",
            "update",
            Method::PUT,
            "/k8s/{clusterId}/nodepools/{nodepoolId}",
        )
        .path_params(&["clusterId", "nodepoolId"])
        .field(FieldMapping::required("nodeCount", "properties.nodeCount"))
        .field(FieldMapping::optional("k8sVersion", "properties.k8sVersion"))
        .field(
            FieldMapping::optional("maintenanceWindow", "properties.maintenanceWindow")
                .transform(Transform::JsonText),
        )
        .field(FieldMapping::optional("lans", "properties.lans").transform(Transform::JsonText)),
        Operation::new(
            "nodepool",
            "delete",
            Method::DELETE,
            "/k8s/{clusterId}/nodepools/{nodepoolId}",
        )
        .path_params(&["clusterId", "nodepoolId"])
        .shape(ShapeRule::Success),
    ]
}

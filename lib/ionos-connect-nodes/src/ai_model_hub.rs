//! AI Model Hub node: document collections and retrieval queries.
//!
//! Document content is free text on the way in; the API stores base64, so
//! the `content` field is encoded before dispatch.

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Property, PropertyKind, ShapeRule, Transform,
};

const COLLECTION_SCOPED: &[(&str, &str)] = &[
    ("collection", "get"),
    ("collection", "delete"),
    ("document", "add"),
    ("document", "get"),
    ("document", "getMany"),
    ("document", "delete"),
    ("query", "run"),
];

/// Builds the AI Model Hub node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosAiModelHub",
        display_name: "IONOS AI Model Hub",
        description: "Manage document collections and run retrieval queries",
        base_url: "https://inference.de-txl.ionos.com",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required("collectionId", "Collection ID", PropertyKind::String, COLLECTION_SCOPED),
        Property::required(
            "documentId",
            "Document ID",
            PropertyKind::String,
            &[("document", "get"), ("document", "delete")],
        ),
        Property::required("name", "Name", PropertyKind::String, &[
            ("collection", "create"),
            ("document", "add"),
        ]),
        Property::optional("description", "Description", PropertyKind::String, &[(
            "collection",
            "create",
        )]),
        Property::optional("chunking", "Chunking", PropertyKind::Json, &[("collection", "create")])
            .describe(r#"JSON chunking configuration, e.g. {"enabled": true, "strategy": {"config": {"chunk_size": 512}}}"#),
        Property::required("content", "Content", PropertyKind::String, &[("document", "add")])
            .describe("Document text; base64-encoded before upload"),
        Property::optional("contentType", "Content Type", PropertyKind::String, &[(
            "document",
            "add",
        )])
        .choices(&["text/plain", "text/markdown", "application/pdf"]),
        Property::optional("labels", "Labels", PropertyKind::Json, &[("document", "add")]),
        Property::required("query", "Query", PropertyKind::String, &[("query", "run")]),
        Property::optional("queryLimit", "Result Limit", PropertyKind::Number, &[("query", "run")]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("collection", "create", Method::POST, "/collections")
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::optional("description", "properties.description"))
            .field(FieldMapping::optional("chunking", "properties.chunking").transform(Transform::JsonText)),
        Operation::new("collection", "get", Method::GET, "/collections/{collectionId}")
            .path_params(&["collectionId"]),
        Operation::new("collection", "getMany", Method::GET, "/collections").shape(ShapeRule::Items),
        Operation::new("collection", "delete", Method::DELETE, "/collections/{collectionId}")
            .path_params(&["collectionId"])
            .shape(ShapeRule::Success),
        Operation::new("document", "add", Method::POST, "/collections/{collectionId}/documents")
            .path_params(&["collectionId"])
            .field(FieldMapping::required("name", "properties.name"))
            .field(FieldMapping::required("content", "properties.content").transform(Transform::Base64))
            .field(FieldMapping::optional("contentType", "properties.contentType"))
            .field(FieldMapping::optional("labels", "properties.labels").transform(Transform::JsonText)),
        Operation::new(
            "document",
            "get",
            Method::GET,
            "/collections/{collectionId}/documents/{documentId}",
        )
        .path_params(&["collectionId", "documentId"]),
        Operation::new("document", "getMany", Method::GET, "/collections/{collectionId}/documents")
            .path_params(&["collectionId"])
            .shape(ShapeRule::Items),
        Operation::new(
            "document",
            "delete",
            Method::DELETE,
            "/collections/{collectionId}/documents/{documentId}",
        )
        .path_params(&["collectionId", "documentId"])
        .shape(ShapeRule::Success),
        Operation::new("query", "run", Method::POST, "/collections/{collectionId}/query")
            .path_params(&["collectionId"])
            .field(FieldMapping::required("query", "query"))
            .field(FieldMapping::optional("queryLimit", "limit")),
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
    fn document_add_encodes_content_as_base64() {
        let node = node();
        let op = node.find("document", "add").expect("in catalog");
        let bag = ParamBag::new()
            .with("collectionId", "col-1")
            .with("name", "notes.txt")
            .with("content", "hello");

        let plan = build_plan(&node, op, &bag).expect("a plan");
        assert_eq!(
            plan.body,
            Payload::Json(json!({"properties": {
                "name": "notes.txt",
                "content": "aGVsbG8=",
            }}))
        );
    }

    #[test]
    fn query_body_is_flat() {
        let node = node();
        let op = node.find("query", "run").expect("in catalog");
        let bag = ParamBag::new()
            .with("collectionId", "col-1")
            .with("query", "maintenance windows")
            .with("queryLimit", 5);

        let plan = build_plan(&node, op, &bag).expect("a plan");
        assert_eq!(
            plan.body,
            Payload::Json(json!({"query": "maintenance windows", "limit": 5}))
        );
    }
}

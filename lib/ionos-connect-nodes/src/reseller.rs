//! Reseller node: contracts and managed users.
//!
//! The contract-name update is the one form-encoded operation in the
//! catalog; the legacy endpoint takes `contractName` as a form field rather
//! than JSON.

use http::Method;
use ionos_connect_core::{
    BodyKind, FieldMapping, NodeDef, Operation, Property, PropertyKind, ShapeRule,
};

/// Builds the Reseller node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosReseller",
        display_name: "IONOS Reseller",
        description: "Manage reseller contracts and users",
        base_url: "https://api.ionos.com/reseller/v2",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required(
            "contractId",
            "Contract ID",
            PropertyKind::String,
            &[("contract", "get"), ("contract", "updateName")],
        ),
        Property::required("contractName", "Contract Name", PropertyKind::String, &[(
            "contract",
            "updateName",
        )]),
        Property::required(
            "userId",
            "User ID",
            PropertyKind::String,
            &[("user", "get"), ("user", "update"), ("user", "delete")],
        ),
        Property::required(
            "firstName",
            "First Name",
            PropertyKind::String,
            &[("user", "create"), ("user", "update")],
        ),
        Property::required(
            "lastName",
            "Last Name",
            PropertyKind::String,
            &[("user", "create"), ("user", "update")],
        ),
        Property::required(
            "email",
            "Email",
            PropertyKind::String,
            &[("user", "create"), ("user", "update")],
        ),
        Property::optional("password", "Password", PropertyKind::String, &[("user", "create")]),
        Property::optional(
            "administrator",
            "Administrator",
            PropertyKind::Boolean,
            &[("user", "create"), ("user", "update")],
        ),
        Property::optional("offset", "Offset", PropertyKind::Number, &[]),
        Property::optional("limit", "Limit", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("contract", "get", Method::GET, "/contracts/{contractId}")
            .path_params(&["contractId"]),
        Operation::new("contract", "getMany", Method::GET, "/contracts")
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        // Legacy endpoint: the new name travels as a form field
        Operation::new("contract", "updateName", Method::PUT, "/contracts/{contractId}")
            .path_params(&["contractId"])
            .body(BodyKind::Form)
            .field(FieldMapping::required("contractName", "contractName")),
        Operation::new("user", "create", Method::POST, "/users")
            .field(FieldMapping::required("firstName", "properties.firstName"))
            .field(FieldMapping::required("lastName", "properties.lastName"))
            .field(FieldMapping::required("email", "properties.email"))
            .field(FieldMapping::optional("password", "properties.password"))
            .field(FieldMapping::optional("administrator", "properties.administrator")),
        Operation::new("user", "get", Method::GET, "/users/{userId}").path_params(&["userId"]),
        Operation::new("user", "getMany", Method::GET, "/users")
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("user", "update", Method::PUT, "/users/{userId}")
            .path_params(&["userId"])
            .field(FieldMapping::required("firstName", "properties.firstName"))
            .field(FieldMapping::required("lastName", "properties.lastName"))
            .field(FieldMapping::required("email", "properties.email"))
            .field(FieldMapping::optional("administrator", "properties.administrator")),
        Operation::new("user", "delete", Method::DELETE, "/users/{userId}")
            .path_params(&["userId"])
            .shape(ShapeRule::Success),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ionos_connect_core::{ParamBag, Payload, build_plan};

    #[test]
    fn catalog_is_consistent() {
        let node = node();
        let violations = node.catalog_violations();
        assert!(violations.is_empty(), "{}", violations.join("\n"));
    }

    #[test]
    fn contract_name_update_is_form_encoded() {
        let node = node();
        let op = node.find("contract", "updateName").expect("in catalog");
        let bag = ParamBag::new()
            .with("contractId", "31415926")
            .with("contractName", "production account");

        let plan = build_plan(&node, op, &bag).expect("a plan");
        assert_eq!(plan.method, Method::PUT);
        assert_eq!(
            plan.body,
            Payload::Form(vec![(
                "contractName".to_string(),
                "production account".to_string()
            )])
        );
    }
}

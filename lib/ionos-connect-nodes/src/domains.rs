//! Domains node: domain registration, lookup, and availability checks.
//!
//! Availability shares the 404-is-good-news rule with registry names: the
//! lookup endpoint answers 404 when the domain is unregistered.

use http::Method;
use ionos_connect_core::{
    FieldMapping, NodeDef, Operation, Policy, Property, PropertyKind, ShapeRule, Transform,
};

/// Builds the Domains node definition.
pub fn node() -> NodeDef {
    NodeDef {
        name: "ionosDomains",
        display_name: "IONOS Domains",
        description: "Register and manage domains",
        base_url: "https://api.hosting.ionos.com/domains",
        default_credential: "ionosCloudApi",
        properties: properties(),
        operations: operations(),
    }
}

fn properties() -> Vec<Property> {
    vec![
        Property::required(
            "domainId",
            "Domain ID",
            PropertyKind::String,
            &[("domain", "get"), ("domain", "delete"), ("dnsRecord", "getMany")],
        ),
        Property::required(
            "domainName",
            "Domain Name",
            PropertyKind::String,
            &[("domain", "register"), ("domain", "checkAvailability")],
        )
        .describe("Fully qualified domain name, e.g. example.com"),
        Property::optional("duration", "Duration (Years)", PropertyKind::Number, &[(
            "domain",
            "register",
        )]),
        Property::optional("autoRenew", "Auto Renew", PropertyKind::Boolean, &[(
            "domain",
            "register",
        )]),
        Property::required("contacts", "Contacts", PropertyKind::Json, &[("domain", "register")])
            .describe(r#"JSON object with owner, admin and tech contacts"#),
        Property::optional("nameservers", "Nameservers", PropertyKind::String, &[(
            "domain",
            "register",
        )])
        .describe("Comma-separated list of nameservers"),
        Property::optional("offset", "Offset", PropertyKind::Number, &[]),
        Property::optional("limit", "Limit", PropertyKind::Number, &[]),
    ]
}

fn operations() -> Vec<Operation> {
    vec![
        Operation::new("domain", "register", Method::POST, "/v1/domainitems")
            .field(FieldMapping::required("domainName", "name"))
            .field(FieldMapping::optional("duration", "duration"))
            .field(FieldMapping::optional("autoRenew", "autoRenew"))
            .field(FieldMapping::required("contacts", "contacts").transform(Transform::JsonText))
            .field(
                FieldMapping::optional("nameservers", "nameservers").transform(Transform::CommaList),
            ),
        Operation::new("domain", "get", Method::GET, "/v1/domainitems/{domainId}")
            .path_params(&["domainId"]),
        Operation::new("domain", "getMany", Method::GET, "/v1/domainitems")
            .query(FieldMapping::optional("offset", "offset"))
            .query(FieldMapping::optional("limit", "limit"))
            .shape(ShapeRule::Items),
        Operation::new("domain", "delete", Method::DELETE, "/v1/domainitems/{domainId}")
            .path_params(&["domainId"])
            .shape(ShapeRule::Success),
        // 404 means the domain is unregistered and free to take
        Operation::new("domain", "checkAvailability", Method::GET, "/v1/availability/{domainName}")
            .path_params(&["domainName"])
            .policy(Policy::Expect404IsAvailable {
                field: "domainName",
            }),
        Operation::new("dnsRecord", "getMany", Method::GET, "/v1/domainitems/{domainId}/records")
            .path_params(&["domainId"])
            .shape(ShapeRule::Items),
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
    fn register_builds_a_flat_body_with_parsed_contacts() {
        let node = node();
        let op = node.find("domain", "register").expect("in catalog");
        let bag = ParamBag::new()
            .with("domainName", "example.com")
            .with("duration", 1)
            .with("contacts", r#"{"owner": {"email": "jane@example.com"}}"#)
            .with("nameservers", "ns1.example.net, ns2.example.net");

        let plan = build_plan(&node, op, &bag).expect("a plan");
        assert_eq!(
            plan.body,
            Payload::Json(json!({
                "name": "example.com",
                "duration": 1,
                "contacts": {"owner": {"email": "jane@example.com"}},
                "nameservers": ["ns1.example.net", "ns2.example.net"],
            }))
        );
    }

    #[test]
    fn availability_check_uses_the_404_policy() {
        let node = node();
        let op = node.find("domain", "checkAvailability").expect("in catalog");
        assert_eq!(
            op.policy,
            Some(Policy::Expect404IsAvailable {
                field: "domainName",
            })
        );
    }
}

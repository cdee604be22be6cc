use http::Method;

use crate::error::NodeError;
use crate::params::{ParamBag, Transform};
use crate::schema::Property;
use crate::shape::ShapeRule;

/// Maps one bag field onto a body or query target.
///
/// The builder applies mappings in declared order and only when the source
/// field carries a value, so optional fields are omitted entirely rather than
/// sent as `null`.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    /// Bag field the value is read from.
    pub source: &'static str,
    /// Dotted path inside the body (`properties.name`,
    /// `properties.resources.cores`) or the query parameter name.
    pub target: &'static str,
    /// Transform applied before insertion.
    pub transform: Transform,
    /// Whether absence is a configuration error.
    pub required: bool,
}

impl FieldMapping {
    /// A mapping whose source must be supplied.
    pub fn required(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            target,
            transform: Transform::None,
            required: true,
        }
    }

    /// A mapping applied only when the source is supplied.
    pub fn optional(source: &'static str, target: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(source, target)
        }
    }

    /// Sets the value transform.
    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// How the request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    /// JSON document assembled from the field mappings (the default).
    #[default]
    Json,
    /// Plain text taken verbatim from one bag field.
    Text {
        /// Bag field holding the document.
        source: &'static str,
    },
    /// Form-encoded pairs assembled from the field mappings.
    Form,
}

/// Non-uniform behavior attached to a few operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Move the volume flagged as boot volume to index 0 of the list before
    /// sending; the API treats position 0 as the implicit boot volume.
    BootVolumeReorder {
        /// Dotted path of the volume array inside the body.
        list: &'static str,
        /// Flag field marking the boot volume; stripped before dispatch.
        flag: &'static str,
    },
    /// Fetch the current entity, merge the updated fields into it, strip the
    /// listed write-once fields, and send the whole object back.
    ReadModifyWrite {
        /// Field names removed (at any depth) before resubmission.
        strip: &'static [&'static str],
    },
    /// Availability check: HTTP 404 means "available" and is a success; any
    /// other error status is rethrown.
    Expect404IsAvailable {
        /// Bag field holding the checked name, echoed into the output.
        field: &'static str,
    },
}

/// One (resource, operation) entry of a node's catalog.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Resource selector value.
    pub resource: &'static str,
    /// Operation selector value.
    pub operation: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path template with `{param}` placeholders.
    pub path: &'static str,
    /// Bag fields substituted into the path, in template order.
    pub path_params: &'static [&'static str],
    /// Body field mappings.
    pub fields: Vec<FieldMapping>,
    /// Query parameter mappings.
    pub query: Vec<FieldMapping>,
    /// Body encoding.
    pub body: BodyKind,
    /// Response shaping rule.
    pub shape: ShapeRule,
    /// Attached special behavior, if any.
    pub policy: Option<Policy>,
    /// Field names of which exactly one must be supplied (discriminants such
    /// as image vs. image alias vs. licence type).
    pub exactly_one_of: &'static [&'static str],
}

impl Operation {
    /// Creates an operation entry with no mappings and the default shape.
    pub fn new(
        resource: &'static str,
        operation: &'static str,
        method: Method,
        path: &'static str,
    ) -> Self {
        Self {
            resource,
            operation,
            method,
            path,
            path_params: &[],
            fields: Vec::new(),
            query: Vec::new(),
            body: BodyKind::default(),
            shape: ShapeRule::default(),
            policy: None,
            exactly_one_of: &[],
        }
    }

    /// Declares the bag fields substituted into the path template.
    #[must_use]
    pub fn path_params(mut self, params: &'static [&'static str]) -> Self {
        self.path_params = params;
        self
    }

    /// Adds a body field mapping.
    #[must_use]
    pub fn field(mut self, mapping: FieldMapping) -> Self {
        self.fields.push(mapping);
        self
    }

    /// Adds a query parameter mapping.
    #[must_use]
    pub fn query(mut self, mapping: FieldMapping) -> Self {
        self.query.push(mapping);
        self
    }

    /// Sets the body encoding.
    #[must_use]
    pub fn body(mut self, body: BodyKind) -> Self {
        self.body = body;
        self
    }

    /// Sets the response shaping rule.
    #[must_use]
    pub fn shape(mut self, shape: ShapeRule) -> Self {
        self.shape = shape;
        self
    }

    /// Attaches a special policy.
    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Declares a mutually-exclusive discriminant group.
    #[must_use]
    pub fn exactly_one_of(mut self, fields: &'static [&'static str]) -> Self {
        self.exactly_one_of = fields;
        self
    }
}

/// A connector node: parameter schema plus resource/operation catalog.
///
/// Nodes are pure data over the core engine; building one performs no I/O.
#[derive(Debug, Clone)]
pub struct NodeDef {
    /// Machine name of the node.
    pub name: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Short description of the covered product.
    pub description: &'static str,
    /// Product base URL; may contain a `{location}` placeholder resolved from
    /// the bag's `location` parameter once per invocation.
    pub base_url: &'static str,
    /// Name of the credential the transport should resolve by default.
    pub default_credential: &'static str,
    /// User-facing parameter schema.
    pub properties: Vec<Property>,
    /// Resource/operation catalog.
    pub operations: Vec<Operation>,
}

impl NodeDef {
    /// Looks up the catalog entry for a (resource, operation) pair.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::UnknownOperation`] when the pair is not part of
    /// the catalog.
    pub fn find(&self, resource: &str, operation: &str) -> Result<&Operation, NodeError> {
        self.operations
            .iter()
            .find(|op| op.resource == resource && op.operation == operation)
            .ok_or_else(|| NodeError::UnknownOperation {
                resource: resource.to_string(),
                operation: operation.to_string(),
            })
    }

    /// Resolves the base URL, substituting `{location}` when present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the URL needs a location and the
    /// bag does not supply one.
    pub fn resolve_base_url(&self, bag: &ParamBag) -> Result<String, NodeError> {
        if !self.base_url.contains("{location}") {
            return Ok(self.base_url.to_string());
        }
        let location = bag
            .get_str("location")
            .ok_or_else(|| NodeError::missing("location"))?;
        Ok(self.base_url.replace("{location}", location))
    }

    /// Checks that the catalog and the property schema agree.
    ///
    /// Every path parameter and required mapping source must be declared as a
    /// property visible for its (resource, operation) pair. Returns the list
    /// of violations; used by catalog sanity tests.
    pub fn catalog_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        for op in &self.operations {
            let mut check = |field: &str, required: bool| {
                let Some(property) = self.properties.iter().find(|p| p.name == field) else {
                    violations.push(format!(
                        "{}/{}: field '{field}' has no property declaration",
                        op.resource, op.operation
                    ));
                    return;
                };
                if !property.visible_for(op.resource, op.operation) {
                    violations.push(format!(
                        "{}/{}: property '{field}' is not visible for this pair",
                        op.resource, op.operation
                    ));
                }
                if required && !property.required {
                    violations.push(format!(
                        "{}/{}: property '{field}' must be declared required",
                        op.resource, op.operation
                    ));
                }
            };

            for param in op.path_params {
                check(param, true);
            }
            for mapping in op.fields.iter().chain(&op.query) {
                check(mapping.source, mapping.required);
            }
            for field in op.exactly_one_of {
                check(field, false);
            }
            if let BodyKind::Text { source } = op.body {
                check(source, true);
            }
            if let Some(Policy::Expect404IsAvailable { field }) = op.policy {
                check(field, true);
            }
        }
        violations
    }
}

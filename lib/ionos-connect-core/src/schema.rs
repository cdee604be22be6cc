use serde::Serialize;

/// Value kind of a user-facing node property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    /// Free-text value.
    String,
    /// Numeric value.
    Number,
    /// Boolean toggle.
    Boolean,
    /// One of a fixed set of choices.
    Options,
    /// JSON text, parsed before use.
    Json,
    /// A list of nested objects (e.g. volumes at server creation).
    Collection,
}

/// A user-facing field in a node's parameter schema.
///
/// Properties carry conditional visibility: a field tagged with
/// `(resource, operation)` pairs is only shown, and only validated, for
/// those combinations. An empty tag list means the field applies everywhere
/// (like the resource/operation selectors themselves).
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    /// Parameter name, as found in the bag.
    pub name: &'static str,
    /// Human-readable label.
    pub display_name: &'static str,
    /// Value kind.
    pub kind: PropertyKind,
    /// Whether the field must be supplied when visible.
    pub required: bool,
    /// Short help text.
    pub description: &'static str,
    /// Fixed choices for [`PropertyKind::Options`] fields.
    pub options: &'static [&'static str],
    /// `(resource, operation)` pairs under which the field is visible.
    pub show_for: &'static [(&'static str, &'static str)],
}

impl Property {
    /// Creates a required property visible for the given combinations.
    pub fn required(
        name: &'static str,
        display_name: &'static str,
        kind: PropertyKind,
        show_for: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            name,
            display_name,
            kind,
            required: true,
            description: "",
            options: &[],
            show_for,
        }
    }

    /// Creates an optional property visible for the given combinations.
    pub fn optional(
        name: &'static str,
        display_name: &'static str,
        kind: PropertyKind,
        show_for: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, display_name, kind, show_for)
        }
    }

    /// Attaches help text.
    #[must_use]
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Restricts the field to a fixed set of choices.
    #[must_use]
    pub fn choices(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self.kind = PropertyKind::Options;
        self
    }

    /// Returns `true` when the field applies to `(resource, operation)`.
    pub fn visible_for(&self, resource: &str, operation: &str) -> bool {
        self.show_for.is_empty()
            || self
                .show_for
                .iter()
                .any(|(res, op)| *res == resource && *op == operation)
    }
}

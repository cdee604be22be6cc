use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// One record of node output.
///
/// Every response element, synthesized success marker, or captured per-item
/// error becomes exactly one of these; a record's payload is always a JSON
/// object, never a bare primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    /// The record payload.
    pub json: Value,
}

impl OutputRecord {
    /// Wraps a JSON object as an output record.
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// Builds the error record emitted under failure isolation.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            json: json!({ "error": message.into() }),
        }
    }
}

/// How an operation's response envelope is turned into output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeRule {
    /// List endpoints: unwrap `items` into one record per element; when
    /// `items` is absent or empty, fall back to the whole envelope so a
    /// non-list success response is never dropped.
    Items,
    /// Singular endpoints: the whole envelope as one record.
    #[default]
    Whole,
    /// Delete/action endpoints with no meaningful body: synthesize
    /// `{"success": true}` plus the correlating ids.
    Success,
    /// Scalar-valued endpoints: wrap each bare value under the given field
    /// name.
    Scalar(&'static str),
}

/// Applies a shape rule to a response envelope.
///
/// `correlation` carries the path parameters of the request (e.g.
/// `datacenterId`), attached to synthesized success records so the caller can
/// match them back to inputs.
pub fn shape_response(
    rule: ShapeRule,
    envelope: Value,
    correlation: &IndexMap<String, String>,
) -> Vec<OutputRecord> {
    match rule {
        ShapeRule::Items => match envelope {
            Value::Object(ref object) => match object.get("items").and_then(Value::as_array) {
                Some(items) if !items.is_empty() => {
                    items.iter().cloned().map(OutputRecord::new).collect()
                }
                _ => vec![OutputRecord::new(envelope)],
            },
            other => vec![OutputRecord::new(other)],
        },
        ShapeRule::Whole => vec![OutputRecord::new(envelope)],
        ShapeRule::Success => {
            let mut object = Map::new();
            object.insert("success".to_string(), Value::Bool(true));
            for (name, value) in correlation {
                object.insert(name.clone(), Value::String(value.clone()));
            }
            vec![OutputRecord::new(Value::Object(object))]
        }
        ShapeRule::Scalar(field) => match envelope {
            Value::Array(values) => values
                .into_iter()
                .map(|value| OutputRecord::new(json!({ field: value })))
                .collect(),
            Value::Null => vec![OutputRecord::new(json!({ field: Value::Null }))],
            value => vec![OutputRecord::new(json!({ field: value }))],
        },
    }
}

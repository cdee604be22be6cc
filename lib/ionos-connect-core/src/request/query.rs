use indexmap::IndexMap;
use serde_json::Value;

use crate::error::NodeError;

/// Query string parameters for one request, in declaration order.
///
/// Values are JSON scalars or arrays; arrays are repeated form-style
/// (`?filter=a&filter=b`). Absent, `null`, and empty-string values are never
/// added, so the query string carries exactly the parameters the user
/// supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMap {
    params: IndexMap<String, Value>,
}

impl QueryMap {
    /// Creates an empty query map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, skipping `null` and empty-string values.
    pub fn add(&mut self, name: impl Into<String>, value: Value) {
        match value {
            Value::Null => {}
            Value::String(ref s) if s.is_empty() => {}
            value => {
                self.params.insert(name.into(), value);
            }
        }
    }

    /// Returns `true` when no parameters were added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Serializes the parameters to a URL-encoded query string.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for object values (nested structures are
    /// not valid query parameters) or a serialization error from the encoder.
    pub fn to_query_string(&self) -> Result<String, NodeError> {
        let mut pairs: Vec<(&str, String)> = Vec::with_capacity(self.params.len());
        for (name, value) in &self.params {
            match value {
                Value::Array(entries) => {
                    for entry in entries {
                        pairs.push((name, scalar_to_string(name, entry)?));
                    }
                }
                value => pairs.push((name, scalar_to_string(name, value)?)),
            }
        }
        let encoded = serde_urlencoded::to_string(pairs)?;
        Ok(encoded)
    }
}

fn scalar_to_string(name: &str, value: &Value) -> Result<String, NodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(NodeError::config(format!(
            "query parameter '{name}' must be a scalar or array of scalars, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_a_query_string_in_declaration_order() {
        let mut query = QueryMap::new();
        query.add("depth", json!(2));
        query.add("pretty", json!(false));
        query.add("offset", json!(10));

        let encoded = query.to_query_string().expect("a query string");
        assert_eq!(encoded, "depth=2&pretty=false&offset=10");
    }

    #[test]
    fn arrays_are_repeated_form_style() {
        let mut query = QueryMap::new();
        query.add("filter", json!(["a", "b"]));

        let encoded = query.to_query_string().expect("a query string");
        assert_eq!(encoded, "filter=a&filter=b");
    }

    #[test]
    fn null_and_empty_values_are_skipped() {
        let mut query = QueryMap::new();
        query.add("depth", json!(null));
        query.add("name", json!(""));
        assert!(query.is_empty());
    }

    #[test]
    fn values_are_url_encoded() {
        let mut query = QueryMap::new();
        query.add("filter.name", json!("web server"));

        let encoded = query.to_query_string().expect("a query string");
        assert_eq!(encoded, "filter.name=web+server");
    }

    #[test]
    fn objects_are_rejected() {
        let mut query = QueryMap::new();
        query.add("filter", json!({"name": "x"}));

        let error = query.to_query_string().expect_err("objects not supported");
        assert!(matches!(error, NodeError::Config { .. }));
    }
}

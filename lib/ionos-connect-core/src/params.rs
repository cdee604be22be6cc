use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};

use crate::error::NodeError;

/// Resolved user input for one item's invocation, keyed by field name.
///
/// A bag is read-only once built. Absent keys, `null` values, and empty
/// strings are all treated as "not supplied" so that optional fields are
/// omitted from request bodies instead of being sent as placeholders.
///
/// # Examples
///
/// ```rust
/// use ionos_connect_core::ParamBag;
/// use serde_json::json;
///
/// let bag = ParamBag::from_value(json!({
///     "name": "web-01",
///     "cores": 4,
///     "description": "",
/// })).expect("an object");
///
/// assert_eq!(bag.get_str("name"), Some("web-01"));
/// assert_eq!(bag.get_u64("cores"), Some(4));
/// // Empty strings count as absent
/// assert_eq!(bag.get_str("description"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBag(Map<String, Value>);

impl ParamBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag from a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, NodeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NodeError::config(format!(
                "parameters must be a JSON object, got {other}"
            ))),
        }
    }

    /// Inserts a value, used by hosts assembling a bag field by field.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the value for `name`, treating `null` and `""` as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.0.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        }
    }

    /// Returns `true` when `name` carries a usable value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the string value for `name`, if supplied.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns the boolean value for `name`, if supplied.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Returns the unsigned integer value for `name`, if supplied.
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_u64)
    }

    /// Returns the float value for `name`, if supplied.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Returns the string value for `name` or a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::Config`] naming the field when it is absent or
    /// not a string.
    pub fn require_str(&self, name: &str) -> Result<&str, NodeError> {
        self.get_str(name).ok_or_else(|| NodeError::missing(name))
    }

    /// Returns the raw value for `name` or a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::Config`] naming the field when it is absent.
    pub fn require(&self, name: &str) -> Result<&Value, NodeError> {
        self.get(name).ok_or_else(|| NodeError::missing(name))
    }
}

impl From<Map<String, Value>> for ParamBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Value transforms applied between a bag field and its body/query target.
///
/// These cover every reshaping the provider APIs require beyond plain
/// copying; anything else is a straight value move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    /// Copy the value unchanged.
    #[default]
    None,
    /// Split a comma-separated string into an array, trimming whitespace and
    /// dropping empty entries (CIDR lists, SSH keys, IP lists).
    CommaList,
    /// Parse a JSON text field into a structured value (health checks,
    /// maintenance windows, scaling policies).
    JsonText,
    /// Convert a megabyte count into gigabytes for APIs sized in GB.
    MbToGb,
    /// Base64-encode free-text document content.
    Base64,
    /// Upper-case an enum-like string (licence types, protocols).
    UpperCase,
}

impl Transform {
    /// Applies the transform to a supplied value.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the value does not fit the
    /// transform, e.g. unparsable JSON text or a non-integer megabyte count.
    pub fn apply(self, field: &str, value: &Value) -> Result<Value, NodeError> {
        match self {
            Self::None => Ok(value.clone()),
            Self::CommaList => {
                let text = value.as_str().ok_or_else(|| {
                    NodeError::config(format!("parameter '{field}' must be a comma-separated string"))
                })?;
                let entries: Vec<Value> = split_comma_list(text)
                    .into_iter()
                    .map(Value::String)
                    .collect();
                Ok(Value::Array(entries))
            }
            Self::JsonText => {
                let text = value.as_str().ok_or_else(|| {
                    NodeError::config(format!("parameter '{field}' must be a JSON string"))
                })?;
                serde_json::from_str(text).map_err(|err| {
                    NodeError::config(format!("parameter '{field}' is not valid JSON: {err}"))
                })
            }
            Self::MbToGb => {
                let megabytes = value.as_u64().ok_or_else(|| {
                    NodeError::config(format!("parameter '{field}' must be an integer megabyte count"))
                })?;
                Ok(Value::from(megabytes / 1024))
            }
            Self::Base64 => {
                let text = value.as_str().ok_or_else(|| {
                    NodeError::config(format!("parameter '{field}' must be a string"))
                })?;
                Ok(Value::String(STANDARD.encode(text)))
            }
            Self::UpperCase => {
                let text = value.as_str().ok_or_else(|| {
                    NodeError::config(format!("parameter '{field}' must be a string"))
                })?;
                Ok(Value::String(text.to_uppercase()))
            }
        }
    }
}

/// Splits a comma-separated list, trimming whitespace and dropping empties.
pub fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bag_treats_null_and_empty_string_as_absent() {
        let bag = ParamBag::from_value(json!({
            "name": "db-01",
            "empty": "",
            "nothing": null,
            "flag": false,
        }))
        .expect("an object");

        assert!(bag.contains("name"));
        assert!(!bag.contains("empty"));
        assert!(!bag.contains("nothing"));
        // A false boolean is a real value, not an absent one
        assert_eq!(bag.get_bool("flag"), Some(false));
    }

    #[test]
    fn require_names_the_missing_field() {
        let bag = ParamBag::new();
        let error = bag.require_str("datacenterId").expect_err("missing");
        assert_eq!(
            error.to_string(),
            "Configuration error: required parameter 'datacenterId' is missing"
        );
    }

    #[test]
    fn from_value_rejects_non_objects() {
        let error = ParamBag::from_value(json!([1, 2])).expect_err("not an object");
        assert!(matches!(error, NodeError::Config { .. }));
    }

    #[test]
    fn comma_list_round_trip_trims_and_drops_empties() {
        let entries = split_comma_list(" 10.0.0.0/24 ,  192.168.1.0/24 ,, ");
        assert_eq!(entries, vec!["10.0.0.0/24", "192.168.1.0/24"]);

        let joined = entries.join(",");
        assert_eq!(split_comma_list(&joined), entries);
    }

    #[test]
    fn comma_list_transform_builds_an_array() {
        let value = Transform::CommaList
            .apply("cidrs", &json!("10.0.0.0/24, 10.0.1.0/24"))
            .expect("an array");
        assert_eq!(value, json!(["10.0.0.0/24", "10.0.1.0/24"]));
    }

    #[test]
    fn json_text_transform_parses_or_fails_loudly() {
        let value = Transform::JsonText
            .apply("maintenanceWindow", &json!(r#"{"dayOfTheWeek":"Sunday"}"#))
            .expect("an object");
        assert_eq!(value, json!({"dayOfTheWeek": "Sunday"}));

        let error = Transform::JsonText
            .apply("maintenanceWindow", &json!("{nope"))
            .expect_err("invalid JSON");
        assert!(error.to_string().contains("maintenanceWindow"));
    }

    #[test]
    fn mb_to_gb_divides_by_1024() {
        let value = Transform::MbToGb.apply("storageSize", &json!(4096)).expect("a number");
        assert_eq!(value, json!(4));
    }

    #[test]
    fn base64_and_uppercase_transforms() {
        let value = Transform::Base64
            .apply("content", &json!("hello"))
            .expect("a string");
        assert_eq!(value, json!("aGVsbG8="));

        let value = Transform::UpperCase
            .apply("licenceType", &json!("linux"))
            .expect("a string");
        assert_eq!(value, json!("LINUX"));
    }
}

use serde_json::Value;

/// Maximum number of response-body bytes kept on an API error.
pub(crate) const BODY_MAX_LENGTH: usize = 1024;

/// Errors raised while translating parameters into requests or dispatching them.
///
/// Configuration problems (missing fields, unparsable JSON text, unset
/// discriminants) are surfaced before any network call. Transport and API
/// failures carry the HTTP status and the most specific message the provider
/// body offered.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum NodeError {
    /// HTTP client error from the underlying reqwest library.
    Http(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// JSON serialization/deserialization error.
    JsonValueError(serde_json::Error),

    /// Query string or form body serialization error.
    QuerySerializationError(serde_urlencoded::ser::Error),

    /// Invalid HTTP header value, e.g. a credential containing control characters.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// A required parameter is missing or a supplied value is unusable.
    ///
    /// Raised before dispatch; the request is never sent.
    #[display("Configuration error: {message}")]
    #[from(skip)]
    Config {
        /// Human-readable description naming the offending field.
        message: String,
    },

    /// Path template contains placeholders with no matching parameter.
    #[display("Path '{path}' is missing required arguments: {missing:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The path template that could not be resolved.
        path: String,
        /// Names of the unresolved placeholders.
        missing: Vec<String>,
    },

    /// The named credential is not registered with the transport.
    #[display("Unknown credential: {name}")]
    #[from(skip)]
    UnknownCredential {
        /// The credential name the node asked for.
        name: String,
    },

    /// The (resource, operation) pair is not part of the node's catalog.
    #[display("The operation '{operation}' is not supported for resource '{resource}'")]
    #[from(skip)]
    UnknownOperation {
        /// Requested resource name.
        resource: String,
        /// Requested operation name.
        operation: String,
    },

    /// The remote API answered with a non-2xx status.
    #[display("API error {status}: {message}")]
    #[from(skip)]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Most specific message extracted from the provider error body.
        message: String,
        /// Raw response body, truncated.
        body: String,
    },

    /// An error annotated with the index of the input item it belongs to.
    #[display("Item {index}: {source}")]
    #[from(skip)]
    Item {
        /// Zero-based index of the failing input item.
        index: usize,
        /// The underlying failure.
        source: Box<NodeError>,
    },
}

impl NodeError {
    /// Creates a configuration error with the given message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a configuration error for a missing required parameter.
    pub fn missing(field: &str) -> Self {
        Self::config(format!("required parameter '{field}' is missing"))
    }

    /// Attaches an input-item index to this error for batch diagnostics.
    #[must_use]
    pub fn with_item(self, index: usize) -> Self {
        match self {
            already @ Self::Item { .. } => already,
            source => Self::Item {
                index,
                source: Box::new(source),
            },
        }
    }

    /// Returns the HTTP status code when this is an API error.
    pub fn api_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Item { source, .. } => source.api_status(),
            _ => None,
        }
    }
}

/// Builds an [`NodeError::Api`] from a status code and raw response body.
///
/// The message is taken from the first extractor that matches the provider's
/// nested error structure; the raw body is kept (truncated) for diagnostics.
pub(crate) fn api_error(status: u16, body: String) -> NodeError {
    let message = extract_api_message(&body)
        .unwrap_or_else(|| format!("request failed with status code {status}"));
    let body = if body.len() > BODY_MAX_LENGTH {
        format!("{}... (truncated)", &body[..BODY_MAX_LENGTH])
    } else {
        body
    };
    NodeError::Api {
        status,
        message,
        body,
    }
}

/// Ordered extractors tried in sequence against a provider error body.
///
/// Each provider nests its error message differently; the chain covers the
/// shapes observed across the IONOS product APIs, most specific first.
const EXTRACTORS: &[fn(&Value) -> Option<String>] = &[
    messages_array,
    message_field,
    nested_error_message,
    problem_detail,
    fault_string,
];

/// Extracts the most specific human-readable message from an error body.
pub(crate) fn extract_api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    EXTRACTORS.iter().find_map(|extract| extract(&value))
}

/// `{"messages": [{"message": "..."}, ...]}`, the cloudapi envelope.
fn messages_array(value: &Value) -> Option<String> {
    let messages: Vec<&str> = value
        .get("messages")?
        .as_array()?
        .iter()
        .filter_map(|entry| entry.get("message").and_then(Value::as_str))
        .collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

/// `{"message": "..."}`
fn message_field(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `{"error": {"message": "..."}}` or `{"error": "..."}`
fn nested_error_message(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    if let Some(text) = error.as_str() {
        return Some(text.to_string());
    }
    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `{"detail": "..."}` from RFC 7807 problem documents.
fn problem_detail(value: &Value) -> Option<String> {
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `{"fault": {"faultstring": "..."}}` from the domains gateway.
fn fault_string(value: &Value) -> Option<String> {
    value
        .get("fault")?
        .get("faultstring")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<NodeError>();
        assert_sync::<NodeError>();
    }

    #[test]
    fn should_extract_messages_array() {
        let body = r#"{"httpStatus":422,"messages":[{"errorCode":"316","message":"Attribute cores is required"},{"errorCode":"317","message":"Attribute ram is required"}]}"#;
        let message = extract_api_message(body).expect("a message");
        assert_eq!(
            message,
            "Attribute cores is required; Attribute ram is required"
        );
    }

    #[test]
    fn should_extract_flat_message() {
        let body = r#"{"message":"zone not found"}"#;
        assert_eq!(extract_api_message(body).as_deref(), Some("zone not found"));
    }

    #[test]
    fn should_extract_nested_error_message() {
        let body = r#"{"error":{"code":401,"message":"invalid token"}}"#;
        assert_eq!(extract_api_message(body).as_deref(), Some("invalid token"));

        let body = r#"{"error":"forbidden"}"#;
        assert_eq!(extract_api_message(body).as_deref(), Some("forbidden"));
    }

    #[test]
    fn should_extract_problem_detail_and_faultstring() {
        let body = r#"{"type":"about:blank","detail":"quota exceeded"}"#;
        assert_eq!(extract_api_message(body).as_deref(), Some("quota exceeded"));

        let body = r#"{"fault":{"faultstring":"domain already registered"}}"#;
        assert_eq!(
            extract_api_message(body).as_deref(),
            Some("domain already registered")
        );
    }

    #[test]
    fn should_prefer_messages_array_over_flat_message() {
        let body = r#"{"message":"generic","messages":[{"message":"specific"}]}"#;
        assert_eq!(extract_api_message(body).as_deref(), Some("specific"));
    }

    #[test]
    fn should_fall_back_when_body_is_not_json() {
        assert_eq!(extract_api_message("<html>502</html>"), None);

        let error = api_error(502, "<html>502</html>".to_string());
        let NodeError::Api {
            status, message, ..
        } = error
        else {
            panic!("expected an API error");
        };
        assert_eq!(status, 502);
        assert_eq!(message, "request failed with status code 502");
    }

    #[test]
    fn should_truncate_long_bodies() {
        let error = api_error(500, "x".repeat(5000));
        let NodeError::Api { body, .. } = error else {
            panic!("expected an API error");
        };
        assert!(body.len() < 5000);
        assert!(body.ends_with("... (truncated)"));
    }

    #[test]
    fn with_item_attaches_index_once() {
        let error = NodeError::missing("name").with_item(2).with_item(5);
        let NodeError::Item { index, .. } = error else {
            panic!("expected an item error");
        };
        assert_eq!(index, 2);
    }
}

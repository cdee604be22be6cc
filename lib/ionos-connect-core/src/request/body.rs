use headers::ContentType;
use serde_json::Value;

use crate::error::NodeError;

/// Request body for one planned call.
///
/// Bodies are present only for mutating methods. Most operations send JSON;
/// the DNS zone-file import sends plain text and the reseller contract-name
/// update sends a form-encoded body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// No body (GET, DELETE, HEAD, and action endpoints without arguments).
    #[default]
    Empty,
    /// A JSON document.
    Json(Value),
    /// A plain-text document (zone-file import).
    Text(String),
    /// Form-encoded key/value pairs (contract-name update).
    Form(Vec<(String, String)>),
}

impl Payload {
    /// Returns `true` when there is no body to send.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The content type to declare for this body, if any.
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some(ContentType::json()),
            Self::Text(_) => Some(ContentType::text()),
            Self::Form(_) => Some(ContentType::form_url_encoded()),
        }
    }

    /// Serializes the body to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when JSON or form encoding fails.
    pub fn to_bytes(&self) -> Result<Option<Vec<u8>>, NodeError> {
        let bytes = match self {
            Self::Empty => return Ok(None),
            Self::Json(value) => serde_json::to_vec(value)?,
            Self::Text(text) => text.clone().into_bytes(),
            Self::Form(pairs) => serde_urlencoded::to_string(pairs)?.into_bytes(),
        };
        Ok(Some(bytes))
    }
}

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::HeaderValue;
use http::header::{AUTHORIZATION, HeaderName};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::NodeError;

/// Secure wrapper for sensitive string data that zeroes memory on drop.
///
/// Credentials pass through this type so that tokens and passwords are
/// cleared from memory once unused, and never leak through `Debug` or
/// `Display` output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl SecureString {
    /// Masks sensitive data for display purposes.
    fn mask_sensitive(value: &str) -> String {
        if value.len() <= 8 {
            "***".to_string()
        } else {
            format!("{}...{}", &value[..4], &value[value.len() - 4..])
        }
    }
}

/// Authentication material behind a named credential.
///
/// IONOS products accept either HTTP Basic credentials or a bearer token;
/// both map to a single `Authorization` header. Nodes never construct this
/// themselves; they pass a credential name to the transport, which looks the
/// material up in its [`CredentialStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Authentication {
    /// HTTP Basic authentication with username and password.
    Basic {
        /// Account username (usually the contract e-mail address).
        username: String,
        /// Account password.
        password: SecureString,
    },
    /// Bearer token authentication.
    Token(SecureString),
}

impl Authentication {
    /// Converts the authentication material into an HTTP header pair.
    ///
    /// # Errors
    ///
    /// Returns an error when the credential contains characters that are not
    /// valid in an HTTP header value.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), NodeError> {
        let value = match self {
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{}", password.as_str()));
                HeaderValue::from_str(&format!("Basic {encoded}"))?
            }
            Self::Token(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))?;
                value.set_sensitive(true);
                value
            }
        };
        Ok((AUTHORIZATION, value))
    }
}

/// Named credential registry consulted by the HTTP transport.
///
/// The host runtime owns credential storage; this registry is the seam it
/// fills before handing the transport to a node invocation.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: HashMap<String, Authentication>,
}

impl CredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers authentication material under the given name.
    #[must_use]
    pub fn with_credential(mut self, name: impl Into<String>, auth: Authentication) -> Self {
        self.credentials.insert(name.into(), auth);
        self
    }

    /// Looks up the authentication material for a credential name.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::UnknownCredential`] when the name is not registered.
    pub fn resolve(&self, name: &str) -> Result<&Authentication, NodeError> {
        self.credentials
            .get(name)
            .ok_or_else(|| NodeError::UnknownCredential {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_string_debug_and_display_are_redacted() {
        let secret = SecureString::from("super-secret-token-value");
        assert_eq!(format!("{secret:?}"), r#"SecureString { value: "[REDACTED]" }"#);
        assert_eq!(secret.to_string(), "supe...alue");

        let short = SecureString::from("tiny");
        assert_eq!(short.to_string(), "***");
    }

    #[test]
    fn basic_auth_builds_a_base64_header() {
        let auth = Authentication::Basic {
            username: "jane@example.com".to_string(),
            password: "hunter2".into(),
        };
        let (name, value) = auth.to_header().expect("a header");
        assert_eq!(name, AUTHORIZATION);
        let expected = format!("Basic {}", STANDARD.encode("jane@example.com:hunter2"));
        assert_eq!(value.to_str().expect("ascii"), expected);
    }

    #[test]
    fn token_auth_is_marked_sensitive() {
        let auth = Authentication::Token("abc123".into());
        let (_, value) = auth.to_header().expect("a header");
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().expect("ascii"), "Bearer abc123");
    }

    #[test]
    fn store_resolves_by_name() {
        let store = CredentialStore::new()
            .with_credential("ionosCloudApi", Authentication::Token("tok".into()));

        assert!(store.resolve("ionosCloudApi").is_ok());
        let error = store.resolve("missing").expect_err("unknown name");
        assert!(matches!(error, NodeError::UnknownCredential { .. }));
    }
}

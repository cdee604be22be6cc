use std::future::Future;

use headers::HeaderMapExt;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use crate::auth::CredentialStore;
use crate::error::{NodeError, api_error};
use crate::request::RequestPlan;

/// Dispatches a planned request under a named credential.
///
/// This is the seam between request translation and the network: the host
/// runtime supplies the real HTTP implementation, tests supply canned
/// responses. Implementations perform exactly one call per `send`: no
/// retries, no extra timeout policy.
pub trait Transport {
    /// Sends the request and returns the deserialized response envelope.
    ///
    /// 2xx responses yield the parsed body (`Null` for empty bodies, a JSON
    /// value for JSON bodies, a string otherwise). Non-2xx responses yield
    /// [`NodeError::Api`] carrying the status and extracted message.
    fn send(
        &self,
        plan: &RequestPlan,
        credential: &str,
    ) -> impl Future<Output = Result<Value, NodeError>> + Send;
}

/// Transport backed by a shared reqwest client and a credential registry.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
    credentials: CredentialStore,
}

impl HttpTransport {
    /// Creates a transport over the given credential registry.
    pub fn new(credentials: CredentialStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, plan: &RequestPlan, credential: &str) -> Result<Value, NodeError> {
        let auth = self.credentials.resolve(credential)?;
        let (auth_name, auth_value) = auth.to_header()?;

        let mut headers = HeaderMap::new();
        headers.insert(auth_name, auth_value);
        if let Some(content_type) = plan.body.content_type() {
            headers.typed_insert(content_type);
        }

        let mut request = self
            .client
            .request(plan.method.clone(), plan.url.clone())
            .headers(headers);
        if let Some(bytes) = plan.body.to_bytes()? {
            request = request.body(bytes);
        }

        debug!(method = %plan.method, url = %plan.url, "sending...");
        let response = request.send().await?;
        debug!(status = %response.status(), "...receiving");

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), text));
        }

        if text.is_empty() {
            Ok(Value::Null)
        } else if is_json {
            Ok(serde_json::from_str(&text)?)
        } else {
            Ok(Value::String(text))
        }
    }
}

use crate::errors::TransportError;
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::future::Future;
use url::Url;

/// A single call against the auth backend
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    pub body: Option<Value>,
    pub bearer: Option<SecretString>,
}

impl ApiRequest {
    pub fn get(path: &'static str) -> Self {
        ApiRequest {
            method: Method::GET,
            path,
            body: None,
            bearer: None,
        }
    }

    pub fn post(path: &'static str, body: Value) -> Self {
        ApiRequest {
            method: Method::POST,
            path,
            body: Some(body),
            bearer: None,
        }
    }

    pub fn with_bearer(mut self, token: SecretString) -> Self {
        self.bearer = Some(token);
        self
    }
}

/// Raw backend reply. The body is left unparsed so callers can decide how
/// to interpret error payloads.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing backend requests, allowing the network layer to be replaced in tests
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

/// reqwest-backed transport rooted at the configured base URL
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(format!("magic-link/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ClientInit {
                reason: e.to_string(),
            })?;

        Ok(HttpTransport { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        // Keep any path prefix on the base URL (e.g. https://host/api)
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.endpoint(request.path)?;
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method, url);

        if let Some(body) = request.body {
            builder = builder.json(&body);
        }

        if let Some(token) = request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                TransportError::Unreachable {
                    reason: e.to_string(),
                }
            } else {
                TransportError::from(e)
            }
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("Backend responded with status {}", status);

        Ok(ApiResponse { status, body })
    }
}

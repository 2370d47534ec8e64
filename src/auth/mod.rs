//! Magic-link authentication client
//!
//! This module exchanges magic-link tokens with the auth backend, persists the
//! resulting credential in a key-value store and attaches it as a bearer
//! token to authenticated calls. The credential is re-read and re-validated
//! from storage on every query; nothing is cached in memory.

mod core;
mod operations;
mod token_management;
mod validation;

pub use core::MagicLinkClient;
pub use validation::{TokenStatus, decode_payload, token_status};

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key holding the email the token was issued for
pub const EMAIL_KEY: &str = "auth_email";

#[cfg(test)]
pub(crate) mod test_support {
    use crate::errors::TransportError;
    use crate::transport::{ApiRequest, ApiResponse, Transport};
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use secrecy::ExposeSecret;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// What the mock saw for one call
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: reqwest::Method,
        pub path: &'static str,
        pub body: Option<Value>,
        pub bearer: Option<String>,
    }

    /// Transport that replays canned responses and records every call
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, String>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: Value) -> Self {
            self.respond_raw(status, &body.to_string())
        }

        pub fn respond_raw(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(ApiResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn fail_with(self, reason: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(reason.to_string()));
            self
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method: request.method.clone(),
                path: request.path,
                body: request.body.clone(),
                bearer: request.bearer.as_ref().map(|t| t.expose_secret().clone()),
            });

            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(Ok(response)) => Ok(response),
                Some(Err(reason)) => Err(TransportError::Unreachable { reason }),
                None => panic!("MockTransport received an unexpected request"),
            }
        }
    }

    /// Builds an unsigned three-segment token around the given claims
    pub fn make_token(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    pub fn now_secs() -> i64 {
        chrono::Utc::now().timestamp()
    }
}

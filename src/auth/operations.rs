use crate::errors::AuthError;
use crate::models::ErrorResponse;
use crate::storage::KeyValueStore;
use crate::transport::{ApiRequest, Transport};
use serde::Serialize;
use serde_json::{Map, Value, json};

const REQUEST_FAILED: &str = "Failed to request magic link";
const VERIFICATION_FAILED: &str = "Failed to verify magic link";
const SYNC_FAILED: &str = "Failed to sync reviews";
const FETCH_FAILED: &str = "Failed to fetch user data";

type Failure = fn(String) -> AuthError;

impl<T: Transport, S: KeyValueStore> super::MagicLinkClient<T, S> {
    /// Asks the backend to email a magic link. Returns the backend's reply unchanged.
    pub async fn request_magic_link(&self, email: &str) -> Result<Value, AuthError> {
        tracing::info!("Requesting magic link for {}", email);
        let request = ApiRequest::post("/auth/request", json!({ "email": email }));
        self.call(request, |message| AuthError::RequestFailed { message }, REQUEST_FAILED)
            .await
    }

    /// Exchanges a magic-link token for a session credential and stores it
    pub async fn verify_magic_link(&self, token: &str) -> Result<Value, AuthError> {
        let failure: Failure = |message| AuthError::VerificationFailed { message };
        let request = ApiRequest::post("/auth/verify", json!({ "token": token }));
        let response = self.call(request, failure, VERIFICATION_FAILED).await?;

        let session_token = response.get("token").and_then(Value::as_str);
        let email = response.get("email").and_then(Value::as_str);
        let (Some(session_token), Some(email)) = (session_token, email) else {
            return Err(failure(
                "Verification response is missing token or email".to_string(),
            ));
        };

        self.save_credential(session_token, email)?;
        tracing::info!("Magic link verified for {}", email);
        Ok(response)
    }

    /// Uploads the caller's reviews. The caller keeps ownership of local review state.
    pub async fn sync_reviews<R>(&self, reviews: &R) -> Result<Value, AuthError>
    where
        R: Serialize + ?Sized,
    {
        let failure: Failure = |message| AuthError::SyncFailed { message };
        let credential = self.get_auth().ok_or(AuthError::NotAuthenticated)?;

        let reviews = serde_json::to_value(reviews)
            .map_err(|e| failure(format!("Failed to encode reviews: {}", e)))?;
        let mut body = Map::new();
        body.insert("reviews".to_string(), reviews);

        let request = ApiRequest::post("/sync", Value::Object(body)).with_bearer(credential.token);
        self.call(request, failure, SYNC_FAILED).await
    }

    /// Fetches the signed-in user's data from the backend
    pub async fn get_user_data(&self) -> Result<Value, AuthError> {
        let credential = self.get_auth().ok_or(AuthError::NotAuthenticated)?;
        let request = ApiRequest::get("/data").with_bearer(credential.token);
        self.call(request, |message| AuthError::FetchFailed { message }, FETCH_FAILED)
            .await
    }

    async fn call(
        &self,
        request: ApiRequest,
        failure: Failure,
        default_message: &str,
    ) -> Result<Value, AuthError> {
        let path = request.path;
        let response = self.transport.execute(request).await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", path, e);
            failure(e.to_string())
        })?;

        if !response.is_success() {
            let message = error_message(&response.body, default_message);
            tracing::warn!(
                "Backend rejected {} with status {}: {}",
                path,
                response.status,
                message
            );
            return Err(failure(message));
        }

        parse_body(&response.body)
            .map_err(|e| failure(format!("Invalid response from backend: {}", e)))
    }
}

/// Picks the backend's `error` field when present and non-empty, else the per-operation default
fn error_message(body: &str, default_message: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| default_message.to_string())
}

fn parse_body(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
}

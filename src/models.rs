use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Session credential obtained by exchanging a magic link.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: SecretString,
    pub email: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Credential {
            token: SecretString::new(token.into()),
            email: email.into(),
        }
    }
}

/// Claims decoded from the middle segment of a credential token.
/// Only `exp` is interpreted; everything else is kept for display.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    #[serde(default)]
    pub exp: Option<f64>, // Unix timestamp (seconds)
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

/// Error body returned by the backend on non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
}

// --- モックGitHubログイン ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockUser {
    pub username: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl MockUser {
    /// Fixed record written by the mock login
    pub fn placeholder() -> Self {
        MockUser {
            username: "github-user".to_string(),
            name: "GitHub User".to_string(),
            avatar: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_credential_new() {
        let credential = Credential::new("a.b.c", "x@y.com");
        assert_eq!(credential.token.expose_secret(), "a.b.c");
        assert_eq!(credential.email, "x@y.com");
    }

    #[test]
    fn test_credential_debug_redacts_token() {
        let credential = Credential::new("super-secret-token", "x@y.com");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("x@y.com"));
    }

    #[test]
    fn test_token_payload_with_integer_exp() {
        let payload: TokenPayload =
            serde_json::from_str(r#"{"exp": 1700000000, "sub": "user-1"}"#).unwrap();
        assert_eq!(payload.exp, Some(1700000000.0));
        assert_eq!(payload.claims.get("sub").unwrap(), "user-1");
    }

    #[test]
    fn test_token_payload_without_exp() {
        let payload: TokenPayload = serde_json::from_str(r#"{"email": "x@y.com"}"#).unwrap();
        assert!(payload.exp.is_none());
    }

    #[test]
    fn test_token_payload_rejects_string_exp() {
        let result = serde_json::from_str::<TokenPayload>(r#"{"exp": "tomorrow"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_response_parsing() {
        let body: ErrorResponse = serde_json::from_str(r#"{"error": "invalid email"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("invalid email"));

        let body: ErrorResponse = serde_json::from_str(r#"{"detail": "nope"}"#).unwrap();
        assert!(body.error.is_none());
    }

    #[test]
    fn test_mock_user_serialization() {
        let user = MockUser::placeholder();
        let serialized = serde_json::to_string(&user).unwrap();
        assert!(serialized.contains("\"avatar\":null"));

        let deserialized: MockUser = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, user);
    }
}

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use magic_link_client::{AuthError, FileStore, HttpTransport, MagicLinkClient, MemoryStore};
use secrecy::ExposeSecret;
use serde_json::json;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "user-1", "exp": exp}).to_string());
    format!("{}.{}.sig", header, payload)
}

fn client_for(server: &MockServer) -> MagicLinkClient<HttpTransport, MemoryStore> {
    let transport = HttpTransport::new(Url::parse(&server.uri()).unwrap()).unwrap();
    MagicLinkClient::new(transport, MemoryStore::new())
}

#[tokio::test]
async fn test_request_magic_link_reports_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/request"))
        .and(body_json(json!({"email": "bad"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid email"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.request_magic_link("bad").await.unwrap_err();

    assert!(matches!(err, AuthError::RequestFailed { .. }));
    assert_eq!(err.to_string(), "invalid email");
}

#[tokio::test]
async fn test_empty_backend_error_uses_default_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/request"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": ""})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.request_magic_link("x@y.com").await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to request magic link");
}

#[tokio::test]
async fn test_full_session_flow() {
    let server = MockServer::start().await;
    let token = session_token(chrono::Utc::now().timestamp() + 3600);
    let bearer = format!("Bearer {}", token);

    Mock::given(method("POST"))
        .and(path("/auth/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "sent"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .and(body_json(json!({"token": "linktok"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": token, "email": "x@y.com"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sync"))
        .and(header("authorization", bearer.as_str()))
        .and(body_json(json!({"reviews": [{"card_id": 1, "grade": 4}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"synced": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reviews": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let response = client.request_magic_link("x@y.com").await.unwrap();
    assert_eq!(response, json!({"message": "sent"}));
    assert!(!client.is_authenticated());

    client.verify_magic_link("linktok").await.unwrap();
    let credential = client.get_auth().unwrap();
    assert_eq!(credential.token.expose_secret(), &token);
    assert_eq!(credential.email, "x@y.com");

    let synced = client
        .sync_reviews(&json!([{"card_id": 1, "grade": 4}]))
        .await
        .unwrap();
    assert_eq!(synced, json!({"synced": 1}));

    let data = client.get_user_data().await.unwrap();
    assert_eq!(data, json!({"reviews": []}));

    client.logout();
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_verify_with_unparseable_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "a.b.c", "email": "x@y.com"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.verify_magic_link("linktok").await.unwrap();

    assert!(client.get_auth().is_none());
}

#[tokio::test]
async fn test_unauthenticated_calls_never_reach_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.sync_reviews(&json!([])).await.unwrap_err();
    assert!(matches!(err, AuthError::NotAuthenticated));
    let err = client.get_user_data().await.unwrap_err();
    assert!(matches!(err, AuthError::NotAuthenticated));
}

#[tokio::test]
async fn test_backend_prefix_path_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = MagicLinkClient::new(HttpTransport::new(base).unwrap(), MemoryStore::new());

    client.request_magic_link("x@y.com").await.unwrap();
}

#[tokio::test]
async fn test_unreachable_backend_is_operation_error() {
    // Reserve a free port, then release it so nothing is listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let uri = format!("http://127.0.0.1:{}", port);
    let transport = HttpTransport::new(Url::parse(&uri).unwrap()).unwrap();
    let client = MagicLinkClient::new(transport, MemoryStore::new());

    let err = client.verify_magic_link("linktok").await.unwrap_err();
    assert!(matches!(err, AuthError::VerificationFailed { .. }));
    assert!(err.to_string().starts_with("Backend unreachable"));
}

#[tokio::test]
async fn test_logout_recovers_from_corrupt_storage_file() {
    let server = MockServer::start().await;
    let token = session_token(chrono::Utc::now().timestamp() + 3600);
    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": token, "email": "x@y.com"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let storage_path = dir.path().join("storage.json");
    std::fs::write(&storage_path, r#"{"auth_token": "#).unwrap();

    let transport = HttpTransport::new(Url::parse(&server.uri()).unwrap()).unwrap();
    let client = MagicLinkClient::new(transport, FileStore::new(&storage_path).unwrap());
    assert!(!client.is_authenticated());

    client.logout();
    let contents = std::fs::read_to_string(&storage_path).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&contents).is_ok());

    client.verify_magic_link("linktok").await.unwrap();
    assert!(client.is_authenticated());
}

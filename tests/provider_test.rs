//! Integration tests for the Identity Toolkit provider against a mock server.

use filxconnect_admin::auth::{AdminProfile, AuthError, AuthProvider, Identity, IdentityToolkitProvider};
use filxconnect_admin::config::Config;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> IdentityToolkitProvider {
    let mut config = Config::for_testing();
    config.auth_api_url = format!("{}/v1", server.uri());
    config.profile_db_url = server.uri();
    IdentityToolkitProvider::new(&config).expect("provider")
}

fn provider_error(code: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error": {"code": 400, "message": code}
    }))
}

fn identity(token: Option<&str>) -> Identity {
    Identity {
        uid: "uid-7".to_string(),
        email: Some("ada@filxconnect.com".to_string()),
        display_name: None,
        id_token: token.map(str::to_string),
    }
}

#[tokio::test]
async fn test_sign_in_returns_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "test-api-key"))
        .and(body_json(json!({
            "email": "ada@filxconnect.com",
            "password": "correct horse",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-7",
            "email": "ada@filxconnect.com",
            "displayName": "",
            "idToken": "tok-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = provider_for(&server)
        .sign_in("ada@filxconnect.com", "correct horse")
        .await
        .unwrap();

    assert_eq!(identity.uid, "uid-7");
    assert_eq!(identity.email.as_deref(), Some("ada@filxconnect.com"));
    assert_eq!(identity.display_name, None);
    assert_eq!(identity.id_token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_error_codes_map_to_auth_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(provider_error("INVALID_LOGIN_CREDENTIALS"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(provider_error("EMAIL_EXISTS"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:sendOobCode"))
        .respond_with(provider_error("TOO_MANY_ATTEMPTS_TRY_LATER"))
        .mount(&server)
        .await;
    let provider = provider_for(&server);

    let err = provider.sign_in("a@b.com", "x").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = provider.sign_up("a@b.com", "longenough").await.unwrap_err();
    assert!(matches!(err, AuthError::EmailExists));

    let err = provider.send_password_reset("a@b.com").await.unwrap_err();
    assert_eq!(err.to_string(), "too many attempts, try again later");
}

#[tokio::test]
async fn test_unreadable_error_body_names_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = provider_for(&server).sign_in("a@b.com", "x").await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(ref m) if m.contains("503")));
}

#[tokio::test]
async fn test_password_reset_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:sendOobCode"))
        .and(body_json(json!({"requestType": "PASSWORD_RESET", "email": "ada@filxconnect.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "ada@filxconnect.com"})))
        .expect(1)
        .mount(&server)
        .await;

    provider_for(&server)
        .send_password_reset("ada@filxconnect.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_profile_read_uses_id_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/uid-7.json"))
        .and(query_param("auth", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "uid-7",
            "fullName": "Ada Admin",
            "email": "ada@filxconnect.com",
            "role": "SUPER_ADMIN",
            "createdAt": 1_740_000_000_000_u64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = provider_for(&server)
        .profile(&identity(Some("tok-1")))
        .await
        .unwrap()
        .expect("profile record");

    assert_eq!(profile.full_name.as_deref(), Some("Ada Admin"));
    assert_eq!(profile.role.as_deref(), Some("SUPER_ADMIN"));
}

#[tokio::test]
async fn test_missing_profile_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/uid-7.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let profile = provider_for(&server).profile(&identity(None)).await.unwrap();
    assert_eq!(profile, None);
}

#[tokio::test]
async fn test_denied_profile_read_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/uid-7.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = provider_for(&server).profile(&identity(None)).await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(ref m) if m.contains("401")));
}

#[tokio::test]
async fn test_save_profile_stamps_server_time() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/uid-7.json"))
        .and(query_param("auth", "tok-1"))
        .and(body_partial_json(json!({
            "id": "uid-7",
            "fullName": "Ada Admin",
            "role": "SUPER_ADMIN",
            "createdAt": {".sv": "timestamp"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let identity = identity(Some("tok-1"));
    let profile = AdminProfile::new_admin(&identity, "Ada Admin");
    provider_for(&server)
        .save_profile(&identity, &profile)
        .await
        .unwrap();
}

//! Integration tests for the merx-link library.
//!
//! These tests drive the public API without a server: stored-session round
//! trips through the client, error classification, auth header injection,
//! and validation-payload normalization.

use merx_link::{
    json_id, normalize_validation, record_id, AuthProvider, MemoryTokenStore, MerxClient,
    MerxLinkError, Profile, Realm, Record, SessionTokens, TokenPair, TokenStore,
    DEFAULT_BASE_URL,
};
use serde_json::json;

fn pair(access: &str, refresh: Option<&str>) -> TokenPair {
    TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
    }
}

#[test]
fn test_stored_session_round_trip_through_client() {
    // Simulates the console flow: authenticate, persist, restart, restore.
    let mut tokens = SessionTokens::default();
    tokens.apply(Realm::Platform, &pair("p_acc", Some("p_ref")));
    tokens.active_realm = Some(Realm::Platform);

    let mut store = MemoryTokenStore::new();
    store.save(&tokens).unwrap();
    assert!(store.has_session().unwrap());

    let restored = store.load().unwrap();
    let client = MerxClient::builder()
        .base_url("http://localhost:3001/")
        .session(restored)
        .build()
        .unwrap();

    assert_eq!(client.base_url(), "http://localhost:3001");
    assert_eq!(client.active_realm(), Some(Realm::Platform));
    assert_eq!(client.session_snapshot().active_access_token(), Some("p_acc"));

    // Realm switches on the client are visible in the next snapshot
    client.set_active_realm(None);
    let snapshot = client.session_snapshot();
    assert_eq!(snapshot.active_realm, None);
    assert_eq!(snapshot.access_token(Realm::Platform), Some("p_acc"));

    store.save(&snapshot).unwrap();
    assert_eq!(store.load().unwrap(), snapshot);
}

#[test]
fn test_builder_defaults() {
    let client = MerxClient::builder().build().unwrap();
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    assert_eq!(client.active_realm(), None);
    assert!(client.session_snapshot().is_empty());
}

#[test]
fn test_login_response_merges_into_session() {
    // Wire shape with extra keys, as real login endpoints return
    let value = json!({
        "access_token": "acc1",
        "refresh_token": "ref1",
        "token_type": "Bearer",
        "expires_in": 900
    });
    let first: TokenPair = serde_json::from_value(value).unwrap();

    let mut tokens = SessionTokens::default();
    tokens.apply(Realm::Merchant, &first);
    assert_eq!(tokens.access_token(Realm::Merchant), Some("acc1"));
    assert_eq!(tokens.refresh_token(Realm::Merchant), Some("ref1"));

    // A refresh that rotates only the access token keeps the refresh token
    let second: TokenPair = serde_json::from_value(json!({"access_token": "acc2"})).unwrap();
    tokens.apply(Realm::Merchant, &second);
    assert_eq!(tokens.access_token(Realm::Merchant), Some("acc2"));
    assert_eq!(tokens.refresh_token(Realm::Merchant), Some("ref1"));
}

#[test]
fn test_server_error_body_normalizes_to_field_errors() {
    let err = MerxLinkError::ServerError {
        status_code: 400,
        message: "Validation failed".to_string(),
        body: Some(json!({
            "message": "Validation failed",
            "errors": [
                {"field": "email", "message": "Email is already registered"},
                {"field": "merchant_code", "message": "Code must be unique"}
            ]
        })),
    };

    assert_eq!(err.status_code(), Some(400));
    assert!(err.is_client_error());
    assert!(!err.is_unauthorized());

    let body = err.server_body().unwrap();
    let report = normalize_validation(body, &["email", "merchant_code", "name"]);
    assert_eq!(report.message.as_deref(), Some("Validation failed"));
    assert_eq!(
        report.field_errors.get("email").map(String::as_str),
        Some("Email is already registered")
    );
    assert_eq!(
        report.field_errors.get("merchant_code").map(String::as_str),
        Some("Code must be unique")
    );
}

#[test]
fn test_error_classification() {
    let unauthorized = MerxLinkError::ServerError {
        status_code: 401,
        message: "Token expired".to_string(),
        body: None,
    };
    assert!(unauthorized.is_unauthorized());
    assert!(unauthorized.is_client_error());

    let server_down = MerxLinkError::ServerError {
        status_code: 503,
        message: "Service unavailable".to_string(),
        body: None,
    };
    assert!(!server_down.is_unauthorized());
    assert!(!server_down.is_client_error());

    let network = MerxLinkError::NetworkError("connection refused".to_string());
    assert_eq!(network.status_code(), None);
    assert!(network.server_body().is_none());
    assert!(!network.is_unauthorized());
}

#[test]
fn test_auth_provider_header_injection() {
    let http = reqwest::Client::new();

    let request = AuthProvider::from_token(Some("tok123".to_string()))
        .apply_to_request(http.get("http://localhost:3001/api/v1/merchants"))
        .build()
        .unwrap();
    let header = request.headers().get(reqwest::header::AUTHORIZATION);
    assert_eq!(header.and_then(|v| v.to_str().ok()), Some("Bearer tok123"));

    let request = AuthProvider::from_token(None)
        .apply_to_request(http.get("http://localhost:3001/api/v1/merchants"))
        .build()
        .unwrap();
    assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    assert!(!AuthProvider::none().is_authenticated());
}

#[test]
fn test_profile_shapes_from_both_realms() {
    // Platform admins come back with a name split and permission grants
    let platform: Profile = serde_json::from_value(json!({
        "id": 1,
        "email": "ada@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "permissions": ["merchants.read", "merchants.create"]
    }))
    .unwrap();
    assert_eq!(platform.display_name(), "Ada Lovelace");
    assert_eq!(platform.permissions.len(), 2);

    // Merchant accounts carry a single display name and no grants
    let merchant: Profile = serde_json::from_value(json!({
        "id": 7,
        "name": "Acme Retail",
        "email": "owner@acme.example"
    }))
    .unwrap();
    assert_eq!(merchant.display_name(), "Acme Retail");
    assert!(merchant.permissions.is_empty());
}

#[test]
fn test_realm_addressing() {
    assert_eq!(Realm::Platform.auth_path("login"), "/platform/auth/login");
    assert_eq!(Realm::Merchant.auth_path("me"), "/merchant/auth/me");
    assert_eq!(Realm::parse("Platform"), Some(Realm::Platform));
    assert_eq!(Realm::parse(Realm::Merchant.as_str()), Some(Realm::Merchant));
    assert_eq!(Realm::parse("root"), None);
}

#[test]
fn test_record_id_tolerates_string_ids() {
    let row: Record = serde_json::from_value(json!({"id": "42", "name": "Acme"})).unwrap();
    assert_eq!(record_id(&row), Some(42));
    assert_eq!(json_id(&json!(13)), Some(13));
    assert_eq!(json_id(&json!("x")), None);
}

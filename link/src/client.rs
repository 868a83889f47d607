//! HTTP client for the Merx back-office API.
//!
//! One client instance serves both resource CRUD and the two-realm auth
//! endpoints. The client owns a [`SessionTokens`] context: auth calls update
//! it, resource calls read the active realm's access token from it. Hosts
//! that want persistence snapshot the session after auth operations.

use crate::auth::AuthProvider;
use crate::error::{MerxLinkError, Result};
use crate::models::{LoginRequest, Profile, Record, RegisterRequest, TokenPair};
use crate::realm::Realm;
use crate::session::SessionTokens;
use log::{debug, warn};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Server address used when the builder gets no explicit URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Path prefix shared by every API endpoint
const API_PREFIX: &str = "/api/v1";

/// Client for the Merx REST API
///
/// # Examples
///
/// ```rust,no_run
/// use merx_link::{MerxClient, Realm};
/// use std::time::Duration;
///
/// # async fn example() -> merx_link::Result<()> {
/// let client = MerxClient::builder()
///     .base_url("http://localhost:3001")
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// client.login(Realm::Platform, "admin@example.com", "secret").await?;
/// let merchants = client.list("merchants").await?;
/// println!("{} merchants", merchants.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MerxClient {
    base_url: String,
    http_client: reqwest::Client,
    session: Arc<Mutex<SessionTokens>>,
}

impl MerxClient {
    /// Create a builder for configuring the client
    pub fn builder() -> MerxClientBuilder {
        MerxClientBuilder::new()
    }

    /// Server base URL without the API prefix
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Copy of the current session context
    pub fn session_snapshot(&self) -> SessionTokens {
        self.session().clone()
    }

    /// Realm whose access token authenticates resource calls
    pub fn active_realm(&self) -> Option<Realm> {
        self.session().active_realm
    }

    /// Switch (or clear) the active realm
    pub fn set_active_realm(&self, realm: Option<Realm>) {
        self.session().active_realm = realm;
    }

    /// List all rows of a resource
    ///
    /// A response that is not a JSON array degrades to an empty list rather
    /// than failing the caller.
    pub async fn list(&self, resource: &str) -> Result<Vec<Record>> {
        let auth = AuthProvider::from_token(self.active_token());
        let value = self
            .request(Method::GET, &format!("/{}", resource), auth, None)
            .await?;
        Ok(records_from(value))
    }

    /// Fetch a single row by id
    pub async fn get(&self, resource: &str, id: i64) -> Result<Option<Record>> {
        let auth = AuthProvider::from_token(self.active_token());
        let value = self
            .request(Method::GET, &format!("/{}/{}", resource, id), auth, None)
            .await?;
        Ok(value.and_then(into_record))
    }

    /// Create a row
    pub async fn create(&self, resource: &str, payload: &Record) -> Result<Option<Record>> {
        let auth = AuthProvider::from_token(self.active_token());
        let body = Value::Object(payload.clone());
        let value = self
            .request(Method::POST, &format!("/{}", resource), auth, Some(body))
            .await?;
        Ok(value.and_then(into_record))
    }

    /// Update a row by id
    pub async fn update(&self, resource: &str, id: i64, payload: &Record) -> Result<Option<Record>> {
        let auth = AuthProvider::from_token(self.active_token());
        let body = Value::Object(payload.clone());
        let value = self
            .request(Method::PUT, &format!("/{}/{}", resource, id), auth, Some(body))
            .await?;
        Ok(value.and_then(into_record))
    }

    /// Delete a row by id
    pub async fn remove(&self, resource: &str, id: i64) -> Result<()> {
        let auth = AuthProvider::from_token(self.active_token());
        self.request(Method::DELETE, &format!("/{}/{}", resource, id), auth, None)
            .await?;
        Ok(())
    }

    /// Authenticate against a realm's login endpoint
    ///
    /// On success the realm's token slot is updated and the realm becomes
    /// active.
    pub async fn login(&self, realm: Realm, email: &str, password: &str) -> Result<TokenPair> {
        debug!("[LINK_AUTH] Login attempt: realm={}", realm);
        let body = to_body(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let auth = AuthProvider::from_token(self.active_token());
        let value = self
            .request(Method::POST, &realm.auth_path("login"), auth, Some(body))
            .await?;
        let pair = parse_token_pair(value)?;
        {
            let mut session = self.session();
            session.apply(realm, &pair);
            session.active_realm = Some(realm);
        }
        debug!("[LINK_AUTH] Login succeeded: realm={}", realm);
        Ok(pair)
    }

    /// Register a new merchant with its first admin account
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        debug!("[LINK_AUTH] Registering merchant \"{}\"", request.name);
        let body = to_body(request)?;
        let auth = AuthProvider::from_token(self.active_token());
        self.request(
            Method::POST,
            &Realm::Merchant.auth_path("register"),
            auth,
            Some(body),
        )
        .await?;
        Ok(())
    }

    /// Exchange a realm's refresh token for fresh tokens
    ///
    /// The refresh token itself goes out as the Bearer credential. When no
    /// refresh token is stored the request goes out unauthenticated and the
    /// server rejects it.
    pub async fn refresh(&self, realm: Realm) -> Result<TokenPair> {
        let refresh_token = self.session().refresh_token(realm).map(str::to_string);
        let auth = AuthProvider::from_token(refresh_token);
        let value = self
            .request(Method::POST, &realm.auth_path("refresh"), auth, None)
            .await?;
        let pair = parse_token_pair(value)?;
        self.session().apply(realm, &pair);
        debug!("[LINK_AUTH] Refreshed tokens: realm={}", realm);
        Ok(pair)
    }

    /// Fetch the authenticated profile for a realm
    pub async fn me(&self, realm: Realm) -> Result<Profile> {
        let token = self.session().access_token(realm).map(str::to_string);
        let value = self
            .request(Method::GET, &realm.auth_path("me"), AuthProvider::from_token(token), None)
            .await?;
        serde_json::from_value(value.unwrap_or(Value::Null))
            .map_err(|e| MerxLinkError::SerializationError(format!("Invalid profile response: {}", e)))
    }

    /// End a realm's session on the server, then drop its local tokens
    ///
    /// Tokens are only cleared after the server call succeeds; a failed
    /// logout leaves the stored session intact.
    pub async fn logout(&self, realm: Realm) -> Result<()> {
        let token = self.session().access_token(realm).map(str::to_string);
        self.request(
            Method::POST,
            &realm.auth_path("logout"),
            AuthProvider::from_token(token),
            None,
        )
        .await?;
        self.session().clear_realm(realm);
        debug!("[LINK_AUTH] Logged out: realm={}", realm);
        Ok(())
    }

    fn session(&self) -> MutexGuard<'_, SessionTokens> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn active_token(&self) -> Option<String> {
        self.session().active_access_token().map(str::to_string)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Send one HTTP request and decode the response
    ///
    /// Non-success statuses become [`MerxLinkError::ServerError`] carrying
    /// the parsed body. 204 and empty bodies resolve to `None`.
    async fn request(
        &self,
        method: Method,
        path: &str,
        auth: AuthProvider,
        body: Option<Value>,
    ) -> Result<Option<Value>> {
        let url = self.api_url(path);
        debug!("[LINK_HTTP] {} {}", method, path);
        let started = Instant::now();

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .header("Accept", "application/json");
        request = auth.apply_to_request(request);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let body = parse_error_body(&raw);
            let message = server_error_message(body.as_ref(), &raw, status.as_u16());
            warn!(
                "[LINK_HTTP] {} {} failed: status={} message=\"{}\" duration_ms={}",
                method,
                path,
                status.as_u16(),
                message,
                started.elapsed().as_millis()
            );
            return Err(MerxLinkError::ServerError {
                status_code: status.as_u16(),
                message,
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            debug!(
                "[LINK_HTTP] {} {} completed: status=204 duration_ms={}",
                method,
                path,
                started.elapsed().as_millis()
            );
            return Ok(None);
        }

        let text = response.text().await?;
        debug!(
            "[LINK_HTTP] {} {} completed: status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            started.elapsed().as_millis()
        );
        if text.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| MerxLinkError::SerializationError(format!("Invalid JSON response: {}", e)))
    }
}

/// Builder for [`MerxClient`]
///
/// # Examples
///
/// ```rust,no_run
/// use merx_link::MerxClient;
/// use std::time::Duration;
///
/// let client = MerxClient::builder()
///     .base_url("https://api.example.com")
///     .timeout(Duration::from_secs(10))
///     .connect_timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MerxClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    session: SessionTokens,
}

impl MerxClientBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            session: SessionTokens::default(),
        }
    }

    /// Server base URL, e.g. `http://localhost:3001`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Total request timeout (default 30s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// TCP connect timeout (default 10s)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Seed the client with a previously stored session
    pub fn session(mut self, tokens: SessionTokens) -> Self {
        self.session = tokens;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<MerxClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| MerxLinkError::ConfigurationError(e.to_string()))?;

        Ok(MerxClient {
            base_url,
            http_client,
            session: Arc::new(Mutex::new(self.session)),
        })
    }
}

impl Default for MerxClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| MerxLinkError::SerializationError(e.to_string()))
}

fn parse_token_pair(value: Option<Value>) -> Result<TokenPair> {
    serde_json::from_value(value.unwrap_or(Value::Null))
        .map_err(|e| MerxLinkError::SerializationError(format!("Invalid token response: {}", e)))
}

fn into_record(value: Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Keep only object rows; non-array responses become an empty list
fn records_from(value: Option<Value>) -> Vec<Record> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Error bodies are JSON when possible, raw text otherwise
fn parse_error_body(raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Best human-readable message for a failed request
///
/// Precedence: body `message`, then `error`, then `title`, then the raw body
/// text, then a generic fallback with the status code.
fn server_error_message(body: Option<&Value>, raw: &str, status: u16) -> String {
    if let Some(Value::Object(map)) = body {
        for key in ["message", "error", "title"] {
            if let Some(Value::String(text)) = map.get(key) {
                if !text.is_empty() {
                    return text.clone();
                }
            }
        }
    }
    if !raw.is_empty() {
        return raw.to_string();
    }
    format!("Request failed: {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenPair;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let client = MerxClient::builder().build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.active_realm(), None);
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = MerxClient::builder()
            .base_url("http://localhost:3001/")
            .build()
            .unwrap();
        assert_eq!(client.api_url("/merchants"), "http://localhost:3001/api/v1/merchants");
    }

    #[test]
    fn test_builder_seeds_session() {
        let mut tokens = SessionTokens::default();
        tokens.apply(
            Realm::Platform,
            &TokenPair {
                access_token: "acc".to_string(),
                refresh_token: Some("ref".to_string()),
            },
        );
        tokens.active_realm = Some(Realm::Platform);

        let client = MerxClient::builder().session(tokens.clone()).build().unwrap();
        assert_eq!(client.active_realm(), Some(Realm::Platform));
        assert_eq!(client.session_snapshot(), tokens);
        assert_eq!(client.active_token(), Some("acc".to_string()));
    }

    #[test]
    fn test_set_active_realm() {
        let client = MerxClient::builder().build().unwrap();
        client.set_active_realm(Some(Realm::Merchant));
        assert_eq!(client.active_realm(), Some(Realm::Merchant));
        // No merchant token stored, so resource calls go out unauthenticated
        assert_eq!(client.active_token(), None);
        client.set_active_realm(None);
        assert_eq!(client.active_realm(), None);
    }

    #[test]
    fn test_records_from_filters_non_objects() {
        let value = json!([{"id": 1}, "junk", 42, {"id": 2}]);
        let records = records_from(Some(value));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("id"), Some(&json!(2)));
    }

    #[test]
    fn test_records_from_non_array_is_empty() {
        assert!(records_from(Some(json!({"message": "ok"}))).is_empty());
        assert!(records_from(Some(json!(null))).is_empty());
        assert!(records_from(None).is_empty());
    }

    #[test]
    fn test_server_error_message_precedence() {
        let body = json!({"message": "from message", "error": "from error"});
        assert_eq!(server_error_message(Some(&body), "raw", 400), "from message");

        let body = json!({"error": "from error", "title": "from title"});
        assert_eq!(server_error_message(Some(&body), "raw", 400), "from error");

        let body = json!({"title": "from title"});
        assert_eq!(server_error_message(Some(&body), "raw", 400), "from title");

        let body = json!({"unrelated": true});
        assert_eq!(server_error_message(Some(&body), "raw text", 400), "raw text");

        assert_eq!(server_error_message(None, "", 503), "Request failed: 503");
    }

    #[test]
    fn test_parse_error_body() {
        assert_eq!(parse_error_body(""), None);
        assert_eq!(parse_error_body("{\"message\":\"x\"}"), Some(json!({"message": "x"})));
        // Plain text bodies are kept verbatim for validation reporting
        assert_eq!(parse_error_body("boom"), Some(json!("boom")));
    }
}

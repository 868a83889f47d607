//! Authentication provider for the Merx client.
//!
//! Attaches Bearer tokens to HTTP requests. The client computes the provider
//! per request from the session context, so requests made without a stored
//! token simply go out unauthenticated and let the server answer 401.

/// Authentication applied to a single HTTP request
///
/// # Examples
///
/// ```rust
/// use merx_link::AuthProvider;
///
/// // Bearer token authentication
/// let auth = AuthProvider::bearer("eyJhbGc...".to_string());
///
/// // No authentication (login, register, expired session)
/// let auth = AuthProvider::none();
/// ```
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// Bearer token (access or refresh, depending on the endpoint)
    Bearer(String),

    /// No authentication header
    None,
}

impl AuthProvider {
    /// Create Bearer token authentication
    pub fn bearer(token: String) -> Self {
        Self::Bearer(token)
    }

    /// No authentication
    pub fn none() -> Self {
        Self::None
    }

    /// Build a provider from an optional token
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) => Self::Bearer(token),
            None => Self::None,
        }
    }

    /// Attach the Authorization header to an HTTP request builder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Bearer(token) => request.bearer_auth(token),
            Self::None => request,
        }
    }

    /// Check if authentication is configured
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

use serde::{Deserialize, Serialize};

/// Token set returned by login and refresh endpoints
///
/// Servers may rotate only the access token, so the refresh token is
/// optional. Session state merges the pair instead of overwriting the slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token for subsequent API calls
    #[serde(default)]
    pub access_token: String,

    /// Refresh token for obtaining new access tokens (longer-lived)
    #[serde(default)]
    pub refresh_token: Option<String>,
}

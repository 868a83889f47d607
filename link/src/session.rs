//! Session token state shared between the client and its host application.
//!
//! A session carries one token slot per [`Realm`] plus the realm that is
//! currently active. The client reads and updates this state as auth calls
//! complete; hosts persist it through a [`TokenStore`] implementation.
//!
//! Token updates are merges: a refresh that rotates only the access token
//! must not wipe the stored refresh token.

use crate::error::Result;
use crate::models::TokenPair;
use crate::realm::Realm;
use serde::{Deserialize, Serialize};

/// Tokens held for a single realm
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmTokens {
    /// Short-lived access token sent as `Authorization: Bearer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Long-lived refresh token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl RealmTokens {
    /// True when neither token is stored
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    /// Merge a token pair into this slot
    ///
    /// Empty tokens in the pair leave the stored value untouched.
    pub fn apply(&mut self, pair: &TokenPair) {
        if !pair.access_token.is_empty() {
            self.access_token = Some(pair.access_token.clone());
        }
        if let Some(refresh) = &pair.refresh_token {
            if !refresh.is_empty() {
                self.refresh_token = Some(refresh.clone());
            }
        }
    }

    /// Drop both tokens
    pub fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }
}

/// Complete session context: both realm slots and the active realm
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Realm whose access token authenticates resource calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_realm: Option<Realm>,

    /// Platform operator tokens
    #[serde(default)]
    pub platform: RealmTokens,

    /// Merchant account tokens
    #[serde(default)]
    pub merchant: RealmTokens,
}

impl SessionTokens {
    /// Token slot for a realm
    pub fn realm(&self, realm: Realm) -> &RealmTokens {
        match realm {
            Realm::Platform => &self.platform,
            Realm::Merchant => &self.merchant,
        }
    }

    /// Mutable token slot for a realm
    pub fn realm_mut(&mut self, realm: Realm) -> &mut RealmTokens {
        match realm {
            Realm::Platform => &mut self.platform,
            Realm::Merchant => &mut self.merchant,
        }
    }

    /// Access token stored for a realm
    pub fn access_token(&self, realm: Realm) -> Option<&str> {
        self.realm(realm).access_token.as_deref()
    }

    /// Refresh token stored for a realm
    pub fn refresh_token(&self, realm: Realm) -> Option<&str> {
        self.realm(realm).refresh_token.as_deref()
    }

    /// Access token of the active realm, if any
    pub fn active_access_token(&self) -> Option<&str> {
        self.active_realm.and_then(|realm| self.access_token(realm))
    }

    /// Merge a token pair into a realm's slot
    pub fn apply(&mut self, realm: Realm, pair: &TokenPair) {
        self.realm_mut(realm).apply(pair);
    }

    /// Drop a realm's tokens; deactivates the realm if it was active
    pub fn clear_realm(&mut self, realm: Realm) {
        self.realm_mut(realm).clear();
        if self.active_realm == Some(realm) {
            self.active_realm = None;
        }
    }

    /// True when no realm holds any token
    pub fn is_empty(&self) -> bool {
        self.platform.is_empty() && self.merchant.is_empty()
    }
}

/// Persistence backend for session tokens
///
/// Implementations decide where tokens live (file, keyring, memory). The
/// client itself only mutates in-memory state; hosts call `save` after auth
/// operations complete.
pub trait TokenStore {
    /// Load the stored session, or an empty one when nothing is stored
    fn load(&self) -> Result<SessionTokens>;

    /// Persist the session
    fn save(&mut self, tokens: &SessionTokens) -> Result<()>;

    /// Remove all stored tokens
    fn clear(&mut self) -> Result<()>;

    /// True when any realm has a stored token
    fn has_session(&self) -> Result<bool> {
        Ok(!self.load()?.is_empty())
    }
}

/// In-memory token store for tests and short-lived tools
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: SessionTokens,
}

impl MemoryTokenStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<SessionTokens> {
        Ok(self.tokens.clone())
    }

    fn save(&mut self, tokens: &SessionTokens) -> Result<()> {
        self.tokens = tokens.clone();
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.tokens = SessionTokens::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: Option<&str>) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
        }
    }

    #[test]
    fn test_apply_stores_both_tokens() {
        let mut tokens = SessionTokens::default();
        tokens.apply(Realm::Platform, &pair("acc1", Some("ref1")));

        assert_eq!(tokens.access_token(Realm::Platform), Some("acc1"));
        assert_eq!(tokens.refresh_token(Realm::Platform), Some("ref1"));
        assert!(tokens.merchant.is_empty());
    }

    #[test]
    fn test_apply_keeps_refresh_token_on_rotation() {
        let mut tokens = SessionTokens::default();
        tokens.apply(Realm::Platform, &pair("acc1", Some("ref1")));

        // Refresh responses often rotate only the access token
        tokens.apply(Realm::Platform, &pair("acc2", None));
        assert_eq!(tokens.access_token(Realm::Platform), Some("acc2"));
        assert_eq!(tokens.refresh_token(Realm::Platform), Some("ref1"));

        // Empty strings are treated as absent
        tokens.apply(Realm::Platform, &pair("", Some("")));
        assert_eq!(tokens.access_token(Realm::Platform), Some("acc2"));
        assert_eq!(tokens.refresh_token(Realm::Platform), Some("ref1"));
    }

    #[test]
    fn test_realms_are_independent() {
        let mut tokens = SessionTokens::default();
        tokens.apply(Realm::Platform, &pair("p_acc", Some("p_ref")));
        tokens.apply(Realm::Merchant, &pair("m_acc", Some("m_ref")));

        tokens.clear_realm(Realm::Platform);
        assert!(tokens.platform.is_empty());
        assert_eq!(tokens.access_token(Realm::Merchant), Some("m_acc"));
    }

    #[test]
    fn test_clear_realm_deactivates() {
        let mut tokens = SessionTokens::default();
        tokens.apply(Realm::Merchant, &pair("m_acc", None));
        tokens.active_realm = Some(Realm::Merchant);

        tokens.clear_realm(Realm::Merchant);
        assert_eq!(tokens.active_realm, None);

        // Clearing the inactive realm leaves the active one alone
        let mut tokens = SessionTokens::default();
        tokens.active_realm = Some(Realm::Platform);
        tokens.clear_realm(Realm::Merchant);
        assert_eq!(tokens.active_realm, Some(Realm::Platform));
    }

    #[test]
    fn test_active_access_token() {
        let mut tokens = SessionTokens::default();
        tokens.apply(Realm::Platform, &pair("p_acc", None));
        assert_eq!(tokens.active_access_token(), None);

        tokens.active_realm = Some(Realm::Platform);
        assert_eq!(tokens.active_access_token(), Some("p_acc"));

        tokens.active_realm = Some(Realm::Merchant);
        assert_eq!(tokens.active_access_token(), None);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryTokenStore::new();
        assert!(!store.has_session().unwrap());

        let mut tokens = SessionTokens::default();
        tokens.apply(Realm::Platform, &pair("acc", Some("ref")));
        store.save(&tokens).unwrap();

        assert!(store.has_session().unwrap());
        assert_eq!(store.load().unwrap(), tokens);

        store.clear().unwrap();
        assert!(!store.has_session().unwrap());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut tokens = SessionTokens::default();
        tokens.apply(Realm::Platform, &pair("acc", Some("ref")));
        tokens.active_realm = Some(Realm::Platform);

        let serialized = toml::to_string(&tokens).unwrap();
        let parsed: SessionTokens = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, tokens);
    }
}

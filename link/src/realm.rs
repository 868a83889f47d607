//! Authentication realms.
//!
//! The Merx API exposes two independent authentication surfaces: one for
//! platform operators and one for merchant accounts. Every auth endpoint and
//! token slot is addressed by its realm.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two authentication surfaces of the Merx API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    /// Platform operators (back-office administrators)
    Platform,
    /// Merchant accounts
    Merchant,
}

impl Realm {
    /// URL segment used by the auth endpoints of this realm
    pub fn as_str(&self) -> &'static str {
        match self {
            Realm::Platform => "platform",
            Realm::Merchant => "merchant",
        }
    }

    /// Path of an auth endpoint, e.g. `/platform/auth/login`
    pub fn auth_path(&self, action: &str) -> String {
        format!("/{}/auth/{}", self.as_str(), action)
    }

    /// Parse a realm name, case-insensitive
    pub fn parse(value: &str) -> Option<Realm> {
        match value.trim().to_lowercase().as_str() {
            "platform" => Some(Realm::Platform),
            "merchant" => Some(Realm::Merchant),
            _ => None,
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_path() {
        assert_eq!(Realm::Platform.auth_path("login"), "/platform/auth/login");
        assert_eq!(Realm::Merchant.auth_path("refresh"), "/merchant/auth/refresh");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Realm::parse("platform"), Some(Realm::Platform));
        assert_eq!(Realm::parse(" Merchant "), Some(Realm::Merchant));
        assert_eq!(Realm::parse("admin"), None);
    }

    #[test]
    fn test_serde_rename() {
        let json = serde_json::to_string(&Realm::Platform).unwrap();
        assert_eq!(json, "\"platform\"");
        let realm: Realm = serde_json::from_str("\"merchant\"").unwrap();
        assert_eq!(realm, Realm::Merchant);
    }
}

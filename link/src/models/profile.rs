use serde::{Deserialize, Serialize};

/// Authenticated account profile from the `me` endpoints
///
/// The two realms return different shapes, so every field is optional and
/// unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Account id
    #[serde(default)]
    pub id: Option<i64>,

    /// Account email address
    #[serde(default)]
    pub email: Option<String>,

    /// Given name (platform admins, merchant users)
    #[serde(default)]
    pub first_name: Option<String>,

    /// Family name
    #[serde(default)]
    pub last_name: Option<String>,

    /// Display name (merchant accounts)
    #[serde(default)]
    pub name: Option<String>,

    /// Permission keys granted to this account
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Profile {
    /// Best available display name for prompts and banners
    pub fn display_name(&self) -> String {
        if let (Some(first), Some(last)) = (&self.first_name, &self.last_name) {
            if !first.is_empty() || !last.is_empty() {
                return format!("{} {}", first, last).trim().to_string();
            }
        }
        if let Some(name) = &self.name {
            if !name.is_empty() {
                return name.clone();
            }
        }
        if let Some(email) = &self.email {
            if !email.is_empty() {
                return email.clone();
            }
        }
        "unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_full_name() {
        let profile = Profile {
            first_name: Some("Alice".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "Alice Smith");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let profile = Profile {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "alice@example.com");

        let profile = Profile::default();
        assert_eq!(profile.display_name(), "unknown");
    }

    #[test]
    fn test_deserializes_partial_shapes() {
        let profile: Profile =
            serde_json::from_str(r#"{"id": 3, "name": "Acme", "unknown_key": true}"#).unwrap();
        assert_eq!(profile.id, Some(3));
        assert_eq!(profile.name.as_deref(), Some("Acme"));
        assert!(profile.permissions.is_empty());
    }
}

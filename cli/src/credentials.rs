//! File-based session token storage for the CLI.
//!
//! Persists realm tokens in TOML format with secure file permissions (0600
//! on Unix) so a session survives console restarts.
//!
//! # File Location
//!
//! `~/.merx/session.toml`
//!
//! # Security
//!
//! - File permissions set to 0600 (owner read/write only) on Unix
//! - Only tokens are stored, never plaintext passwords
//!
//! # File Format
//!
//! ```toml
//! active_realm = "platform"
//!
//! [platform]
//! access_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! refresh_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//!
//! [merchant]
//! access_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! ```

use merx_link::{MerxLinkError, SessionTokens, TokenStore};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based session token store
///
/// Keeps an in-memory copy of the stored session and rewrites the file on
/// every save.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    /// Path to the session file
    file_path: PathBuf,

    /// In-memory cache of the stored session
    cache: SessionTokens,
}

impl FileTokenStore {
    /// Default session file path: `~/.merx/session.toml`
    pub fn default_path() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".merx").join("session.toml")
        } else {
            PathBuf::from(".merx").join("session.toml")
        }
    }

    /// Create a store at the default location
    pub fn new() -> merx_link::Result<Self> {
        Self::with_path(Self::default_path())
    }

    /// Create a store at a custom location
    pub fn with_path(file_path: PathBuf) -> merx_link::Result<Self> {
        let mut store = Self {
            file_path,
            cache: SessionTokens::default(),
        };
        store.load_from_disk()?;
        Ok(store)
    }

    fn load_from_disk(&mut self) -> merx_link::Result<()> {
        if !self.file_path.exists() {
            self.cache = SessionTokens::default();
            return Ok(());
        }

        let contents = fs::read_to_string(&self.file_path).map_err(|e| {
            let msg = format!(
                "\n╭─ Cannot Read Session File\n\
                 │\n\
                 │  Location: {}\n\
                 │  Problem: {}\n\
                 │\n\
                 ╰─ Check the file permissions, or delete it and sign in\n\
                 \u{20}  again with \\login\n",
                self.file_path.display(),
                e
            );
            MerxLinkError::ConfigurationError(msg)
        })?;

        let tokens: SessionTokens = toml::from_str(&contents).map_err(|e| {
            let error_msg = e.to_string();
            let simple_error = error_msg.lines().next().unwrap_or("Invalid TOML format");
            let msg = format!(
                "\n╭─ Corrupted Session File\n\
                 │\n\
                 │  Location: {}\n\
                 │  Problem: {}\n\
                 │\n\
                 ╰─ Delete the file and sign in again with \\login\n",
                self.file_path.display(),
                simple_error
            );
            MerxLinkError::ConfigurationError(msg)
        })?;

        self.cache = tokens;
        Ok(())
    }

    fn save_to_disk(&self) -> merx_link::Result<()> {
        let contents = toml::to_string_pretty(&self.cache).map_err(|e| {
            MerxLinkError::ConfigurationError(format!("Failed to serialize session: {}", e))
        })?;

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MerxLinkError::ConfigurationError(format!(
                    "Failed to create session directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&self.file_path, contents).map_err(|e| {
            MerxLinkError::ConfigurationError(format!(
                "Failed to write session file at '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        // Tokens grant account access; keep the file owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.file_path, permissions).map_err(|e| {
                MerxLinkError::ConfigurationError(format!(
                    "Failed to set file permissions for '{}': {}",
                    self.file_path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Get the file path used by this store
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> merx_link::Result<SessionTokens> {
        Ok(self.cache.clone())
    }

    fn save(&mut self, tokens: &SessionTokens) -> merx_link::Result<()> {
        self.cache = tokens.clone();
        self.save_to_disk()?;
        Ok(())
    }

    fn clear(&mut self) -> merx_link::Result<()> {
        self.cache = SessionTokens::default();
        self.save_to_disk()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merx_link::{Realm, TokenPair};
    use tempfile::TempDir;

    fn create_temp_store() -> (FileTokenStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("session.toml");
        let store = FileTokenStore::with_path(file_path).unwrap();
        (store, temp_dir)
    }

    fn sample_session() -> SessionTokens {
        let mut tokens = SessionTokens::default();
        tokens.apply(
            Realm::Platform,
            &TokenPair {
                access_token: "eyJhbGciOiJIUzI1NiJ9.access".to_string(),
                refresh_token: Some("eyJhbGciOiJIUzI1NiJ9.refresh".to_string()),
            },
        );
        tokens.active_realm = Some(Realm::Platform);
        tokens
    }

    #[test]
    fn test_file_store_basic_operations() {
        let (mut store, _temp_dir) = create_temp_store();

        // Initially empty
        assert!(!store.has_session().unwrap());

        let tokens = sample_session();
        store.save(&tokens).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, tokens);
        assert!(store.has_session().unwrap());

        store.clear().unwrap();
        assert!(!store.has_session().unwrap());
    }

    #[test]
    fn test_file_store_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("session.toml");

        {
            let mut store = FileTokenStore::with_path(file_path.clone()).unwrap();
            store.save(&sample_session()).unwrap();
        }

        assert!(file_path.exists());

        {
            let store = FileTokenStore::with_path(file_path).unwrap();
            let loaded = store.load().unwrap();
            assert_eq!(loaded.active_realm, Some(Realm::Platform));
            assert_eq!(
                loaded.access_token(Realm::Platform),
                Some("eyJhbGciOiJIUzI1NiJ9.access")
            );
        }
    }

    #[test]
    fn test_both_realms_stored() {
        let (mut store, _temp_dir) = create_temp_store();

        let mut tokens = sample_session();
        tokens.apply(
            Realm::Merchant,
            &TokenPair {
                access_token: "merchant_access".to_string(),
                refresh_token: None,
            },
        );
        store.save(&tokens).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token(Realm::Merchant), Some("merchant_access"));
        assert_eq!(loaded.refresh_token(Realm::Merchant), None);
        assert_eq!(
            loaded.refresh_token(Realm::Platform),
            Some("eyJhbGciOiJIUzI1NiJ9.refresh")
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (mut store, _temp_dir) = create_temp_store();
        store.save(&sample_session()).unwrap();

        let metadata = fs::metadata(store.path()).unwrap();
        let permissions = metadata.permissions();
        assert_eq!(permissions.mode() & 0o777, 0o600);
    }

    #[test]
    fn test_toml_format() {
        let (mut store, _temp_dir) = create_temp_store();
        store.save(&sample_session()).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("active_realm = \"platform\""));
        assert!(contents.contains("[platform]"));
        assert!(contents.contains("access_token = \"eyJhbGciOiJIUzI1NiJ9.access\""));
        assert!(contents.contains("refresh_token = \"eyJhbGciOiJIUzI1NiJ9.refresh\""));
    }

    #[test]
    fn test_corrupted_file_reports_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("session.toml");
        fs::write(&file_path, "not [valid toml").unwrap();

        let result = FileTokenStore::with_path(file_path);
        assert!(matches!(
            result,
            Err(MerxLinkError::ConfigurationError(_))
        ));
    }
}

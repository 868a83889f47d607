//! Session bootstrap: restore authentication from stored tokens.
//!
//! On startup the console does not know which realm, if any, still holds a
//! valid session. The resolver tries the platform realm first (refresh, then
//! profile), falls back to the merchant realm, and reports the outcome as an
//! [`AuthState`].

use crate::client::MerxClient;
use crate::realm::Realm;
use log::debug;

/// Authentication state of a console session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Bootstrap has not completed yet
    Pending,

    /// A realm session was restored or established
    Authenticated {
        realm: Realm,
        /// Permission keys granted to the account. Merchant sessions carry
        /// none; their access is scoped by realm instead.
        permissions: Vec<String>,
    },

    /// No realm holds a usable session
    Unauthenticated,
}

impl AuthState {
    /// True for `Authenticated`
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    /// Realm of an authenticated session
    pub fn realm(&self) -> Option<Realm> {
        match self {
            AuthState::Authenticated { realm, .. } => Some(*realm),
            _ => None,
        }
    }

    /// Granted permission keys; empty unless authenticated
    pub fn permissions(&self) -> &[String] {
        match self {
            AuthState::Authenticated { permissions, .. } => permissions,
            _ => &[],
        }
    }
}

/// Restore a session from the client's stored tokens
///
/// Platform wins when both realms could be restored. Each attempt is a
/// refresh followed by a profile fetch; any failure moves on to the next
/// candidate. The client's active realm is only set on full success.
pub async fn resolve_session(client: &MerxClient) -> AuthState {
    if let Some(state) = restore_realm(client, Realm::Platform).await {
        return state;
    }
    if let Some(state) = restore_realm(client, Realm::Merchant).await {
        return state;
    }
    client.set_active_realm(None);
    debug!("[LINK_AUTH] No restorable session");
    AuthState::Unauthenticated
}

async fn restore_realm(client: &MerxClient, realm: Realm) -> Option<AuthState> {
    if let Err(e) = client.refresh(realm).await {
        debug!("[LINK_AUTH] Refresh failed: realm={} error={}", realm, e);
        return None;
    }
    let profile = match client.me(realm).await {
        Ok(profile) => profile,
        Err(e) => {
            debug!("[LINK_AUTH] Profile fetch failed: realm={} error={}", realm, e);
            return None;
        }
    };
    client.set_active_realm(Some(realm));
    let permissions = match realm {
        Realm::Platform => profile.permissions,
        Realm::Merchant => Vec::new(),
    };
    debug!(
        "[LINK_AUTH] Restored session: realm={} permissions={}",
        realm,
        permissions.len()
    );
    Some(AuthState::Authenticated { realm, permissions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_state_helpers() {
        let state = AuthState::Authenticated {
            realm: Realm::Platform,
            permissions: vec!["merchants.read".to_string()],
        };
        assert!(state.is_authenticated());
        assert_eq!(state.realm(), Some(Realm::Platform));
        assert_eq!(state.permissions(), &["merchants.read".to_string()]);

        assert!(!AuthState::Pending.is_authenticated());
        assert_eq!(AuthState::Pending.realm(), None);
        assert!(AuthState::Unauthenticated.permissions().is_empty());
    }
}

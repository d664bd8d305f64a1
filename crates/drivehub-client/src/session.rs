//! # Session
//!
//! Who is signed in, and the token their requests carry.
//!
//! ## Storage
//! ```text
//! session.json
//! {
//!   "token": "eyJhbGciOi...",
//!   "user":  "{\"_id\":\"u1\",\"name\":\"Ana\",\"email\":\"ana@x.io\",\"role\":\"user\"}"
//! }
//! ```
//! Exactly two keys. `user` is itself JSON text. A file missing either key,
//! or whose user record does not parse, loads as signed out.
//!
//! [`Session`] is a plain value handed to each command. Nothing here is
//! global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use drivehub_core::User;

// =============================================================================
// Session
// =============================================================================

/// Token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionIdentity {
    pub token: String,
    pub user: User,
}

/// The current sign-in state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    identity: Option<SessionIdentity>,
}

impl Session {
    pub fn signed_out() -> Self {
        Session { identity: None }
    }

    pub fn signed_in(token: impl Into<String>, user: User) -> Self {
        Session {
            identity: Some(SessionIdentity {
                token: token.into(),
                user,
            }),
        }
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.identity.as_ref().map(|i| &i.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.token.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_owner(&self) -> bool {
        self.user().map(User::is_owner).unwrap_or(false)
    }

    /// The identity, or `NotAuthenticated`.
    pub fn require(&self) -> ClientResult<&SessionIdentity> {
        self.identity.as_ref().ok_or(ClientError::NotAuthenticated)
    }
}

// =============================================================================
// Session Store
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

/// Persists the session across runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    /// `session.json` in the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "drivehub", "storefront")
            .map(|dirs| dirs.data_dir().join("session.json"))
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        config
            .session
            .path
            .clone()
            .or_else(Self::default_path)
            .map(Self::new)
            .ok_or_else(|| ClientError::SessionStorage("No session path available".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session. Anything incomplete is signed out.
    pub fn load(&self) -> ClientResult<Session> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No stored session");
                return Ok(Session::signed_out());
            }
            Err(e) => return Err(ClientError::SessionStorage(e.to_string())),
        };

        let stored: StoredSession = match serde_json::from_str(&contents) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Corrupt session file, treating as signed out");
                return Ok(Session::signed_out());
            }
        };

        let (Some(token), Some(user_json)) = (stored.token, stored.user) else {
            debug!(path = ?self.path, "Stored session is incomplete");
            return Ok(Session::signed_out());
        };

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Ok(Session::signed_in(token, user)),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Stored user record is corrupt, treating as signed out");
                Ok(Session::signed_out())
            }
        }
    }

    /// Writes both keys. Saving a signed-out session is the same as `clear`.
    pub fn save(&self, session: &Session) -> ClientResult<()> {
        let Some(identity) = session.identity() else {
            return self.clear();
        };

        let stored = StoredSession {
            token: Some(identity.token.clone()),
            user: Some(serde_json::to_string(&identity.user).map_err(storage_error)?),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(storage_error)?;
        }
        let contents = serde_json::to_string_pretty(&stored).map_err(storage_error)?;
        std::fs::write(&self.path, contents).map_err(storage_error)?;

        info!(user = %identity.user.email, "Session saved");
        Ok(())
    }

    /// Removes both keys (logout).
    pub fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

fn storage_error(err: impl std::fmt::Display) -> ClientError {
    ClientError::SessionStorage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivehub_core::Role;

    fn temp_store() -> SessionStore {
        SessionStore::new(
            std::env::temp_dir().join(format!("drivehub-session-{}.json", uuid::Uuid::new_v4())),
        )
    }

    fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_round_trip() {
        let store = temp_store();
        let session = Session::signed_in("tok-123", user(Role::Owner));

        store.save(&session).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, session);
        assert_eq!(loaded.token(), Some("tok-123"));
        assert!(loaded.is_owner());

        store.clear().unwrap();
    }

    #[test]
    fn test_file_has_exactly_two_keys() {
        let store = temp_store();
        store
            .save(&Session::signed_in("tok", user(Role::Renter)))
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        let obj = raw.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["token"], "tok");
        // user is JSON text, not a nested object
        let user_text = obj["user"].as_str().unwrap();
        assert!(user_text.contains("\"_id\":\"u1\""));
        assert!(user_text.contains("\"role\":\"user\""));

        store.clear().unwrap();
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let store = temp_store();
        store
            .save(&Session::signed_in("tok", user(Role::Renter)))
            .unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(!store.load().unwrap().is_signed_in());

        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_half_present_loads_signed_out() {
        let store = temp_store();
        std::fs::write(store.path(), r#"{"token":"tok"}"#).unwrap();
        assert!(!store.load().unwrap().is_signed_in());

        let user_json = serde_json::to_string(&user(Role::Renter)).unwrap();
        let only_user = serde_json::json!({ "user": user_json }).to_string();
        std::fs::write(store.path(), only_user).unwrap();
        assert!(!store.load().unwrap().is_signed_in());

        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_signed_out() {
        let store = temp_store();
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(!store.load().unwrap().is_signed_in());

        std::fs::write(store.path(), r#"{"token":"tok","user":"[1,2]"}"#).unwrap();
        assert!(!store.load().unwrap().is_signed_in());

        store.clear().unwrap();
    }

    #[test]
    fn test_missing_file_is_signed_out() {
        let store = temp_store();
        let session = store.load().unwrap();
        assert_eq!(session, Session::signed_out());
        assert!(matches!(session.require(), Err(ClientError::NotAuthenticated)));
    }
}

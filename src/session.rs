use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::queries;
use crate::models::UserProfile;

const AUTH_TOKEN_KEY: &str = "auth_token";

/// Owns the auth credential and the signed-in profile.
///
/// The credential is cached in memory and written through to the session
/// database so it survives relaunch; the profile is memory-only. Storage
/// failures degrade to "credential absent", failing toward the
/// logged-out state rather than erroring.
pub struct SessionStore {
    db: Arc<Mutex<Connection>>,
    credential: Mutex<Option<String>>,
    current_user: Mutex<Option<UserProfile>>,
}

impl SessionStore {
    pub fn new(conn: Connection) -> Self {
        let persisted = queries::get_value(&conn, AUTH_TOKEN_KEY).unwrap_or_else(|e| {
            tracing::warn!("failed to read persisted credential: {e:#}");
            None
        });

        Self {
            db: Arc::new(Mutex::new(conn)),
            credential: Mutex::new(persisted),
            current_user: Mutex::new(None),
        }
    }

    pub fn credential(&self) -> Option<String> {
        self.credential.lock().unwrap().clone()
    }

    pub fn set_credential(&self, token: &str) {
        *self.credential.lock().unwrap() = Some(token.to_string());

        let db = self.db.lock().unwrap();
        if let Err(e) = queries::set_value(&db, AUTH_TOKEN_KEY, token) {
            tracing::warn!("failed to persist credential: {e:#}");
        }
    }

    /// Evicts the credential and the cached profile. Idempotent.
    pub fn clear_credential(&self) {
        *self.credential.lock().unwrap() = None;
        *self.current_user.lock().unwrap() = None;

        let db = self.db.lock().unwrap();
        if let Err(e) = queries::delete_value(&db, AUTH_TOKEN_KEY) {
            tracing::warn!("failed to evict persisted credential: {e:#}");
        }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.current_user.lock().unwrap().clone()
    }

    pub fn set_current_user(&self, user: UserProfile) {
        *self.current_user.lock().unwrap() = Some(user);
    }

    pub fn sign_in(&self, token: &str, user: UserProfile) {
        self.set_credential(token);
        self.set_current_user(user);
    }
}

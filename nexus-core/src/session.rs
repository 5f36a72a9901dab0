//! Session manager: authenticated-identity state and route guarding
//!
//! Owns the token/user pair, mirrors it into the key store and settles
//! one of three statuses. The in-memory copy is authoritative for the
//! process lifetime; the store is a durable mirror. Restore trusts the
//! persisted values without revalidating them against the server - a
//! known limitation of the original dashboard, kept deliberately.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::services::{ApiError, CredentialApi};
use crate::storage::{KeyStore, AUTH_TOKEN_KEY, USER_DATA_KEY};

pub const LOGIN_PATH: &str = "/login";

/// Paths reachable without a session
const PUBLIC_PATHS: [&str; 2] = ["/login", "/register"];

/// Identity record returned by the credential service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Anonymous,
}

/// Invariant: `token` and `user` are both set exactly when `status`
/// is `Authenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub user: Option<User>,
    pub token: Option<String>,
}

pub struct SessionManager {
    credentials: Arc<dyn CredentialApi>,
    store: Arc<dyn KeyStore>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(credentials: Arc<dyn CredentialApi>, store: Arc<dyn KeyStore>) -> Self {
        Self {
            credentials,
            store,
            state: Mutex::new(SessionState {
                status: SessionStatus::Loading,
                user: None,
                token: None,
            }),
        }
    }

    /// Read-only snapshot of the current session
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// Current bearer token, if authenticated
    pub fn token(&self) -> Option<String> {
        self.state.lock().token.clone()
    }

    /// Restore a session from the key store. Never contacts the
    /// network. A persisted token whose companion user record is
    /// missing or unparseable clears both keys; a corrupt record must
    /// not leave a half-restored session behind.
    pub fn restore(&self) {
        let Some(token) = self.store.get(AUTH_TOKEN_KEY) else {
            self.set_anonymous();
            return;
        };

        let user = self
            .store
            .get(USER_DATA_KEY)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("failed to parse persisted user record: {e}");
                    None
                }
            });

        match user {
            Some(user) => {
                *self.state.lock() = SessionState {
                    status: SessionStatus::Authenticated,
                    user: Some(user),
                    token: Some(token),
                };
            }
            None => {
                self.store.remove(AUTH_TOKEN_KEY);
                self.store.remove(USER_DATA_KEY);
                self.set_anonymous();
            }
        }
    }

    /// Authenticate against the credential service. On failure the
    /// prior state is left untouched and the error propagates.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self.credentials.login(email, password).await?;
        info!("session established for {}", response.user.username);
        self.establish(response.token, response.user);
        Ok(())
    }

    /// Register, then immediately log in with the same credentials.
    /// A successful registration never leaves the user unauthenticated;
    /// if the follow-up login fails, no session is established and the
    /// failure propagates.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        self.credentials.register(username, email, password).await?;
        self.login(email, password).await
    }

    /// Clear the session unconditionally. Never fails.
    pub fn logout(&self) {
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(USER_DATA_KEY);
        self.set_anonymous();
        info!("session cleared");
    }

    /// Route guard: where a navigation to `path` should be redirected,
    /// if anywhere. No decision is made while the session is loading.
    pub fn redirect_target(&self, path: &str) -> Option<&'static str> {
        match self.state.lock().status {
            SessionStatus::Loading | SessionStatus::Authenticated => None,
            SessionStatus::Anonymous => {
                if PUBLIC_PATHS.iter().any(|p| path.starts_with(p)) {
                    None
                } else {
                    Some(LOGIN_PATH)
                }
            }
        }
    }

    fn establish(&self, token: String, user: User) {
        // One batched store write for both keys, so overlapping logins
        // are last-write-wins as a pair and can never persist a token
        // from one call alongside the user record of another.
        match serde_json::to_string(&user) {
            Ok(raw) => self
                .store
                .set_many(&[(AUTH_TOKEN_KEY, &token), (USER_DATA_KEY, &raw)]),
            Err(e) => {
                warn!("failed to serialize user record: {e}");
                self.store.set(AUTH_TOKEN_KEY, &token);
            }
        }

        *self.state.lock() = SessionState {
            status: SessionStatus::Authenticated,
            user: Some(user),
            token: Some(token),
        };
    }

    fn set_anonymous(&self) {
        *self.state.lock() = SessionState {
            status: SessionStatus::Anonymous,
            user: None,
            token: None,
        };
    }
}

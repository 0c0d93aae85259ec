//! The client session: live token pair plus the current identity.
//!
//! A [`Session`] is owned by one client and shared through `Arc` with every
//! component that issues requests. Memory is authoritative; every change is
//! written through to [`TokenStorage`] so the session survives restarts.
//!
//! At most one access token is live at a time. Starting a session or
//! refreshing it replaces the stored token, never appends.

use std::sync::Arc;

use parking_lot::RwLock;
use storyline_models::{TokenResponse, User};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::storage::{ACCESS_TOKEN_KEY, MemoryStorage, REFRESH_TOKEN_KEY, TokenStorage};

/// Coarse authentication state broadcast to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
    user: Option<User>,
}

#[derive(Debug)]
pub struct Session {
    storage: Arc<dyn TokenStorage>,
    inner: RwLock<Tokens>,
    state: watch::Sender<AuthState>,
}

impl Session {
    /// Creates a session hydrated from `storage`.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let tokens = Tokens {
            access: storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty()),
            refresh: storage.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty()),
            user: None,
        };
        let initial = if tokens.access.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };
        debug!(
            has_access = tokens.access.is_some(),
            has_refresh = tokens.refresh.is_some(),
            "Session hydrated from storage"
        );
        let (state, _) = watch::channel(initial);

        Self {
            storage,
            inner: RwLock::new(tokens),
            state,
        }
    }

    /// Session backed by process-local storage.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.read().access.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.read().refresh.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().access.is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Starts a new session from a login/register/demo token response.
    ///
    /// Both tokens are replaced; a response without a refresh token leaves
    /// the session without one. The previous identity is dropped.
    pub fn begin(&self, tokens: &TokenResponse) {
        {
            let mut inner = self.inner.write();
            inner.access = Some(tokens.access_token.clone());
            inner.refresh = tokens.refresh_token.clone();
            inner.user = None;
            self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token);
            match &tokens.refresh_token {
                Some(refresh) => self.storage.set(REFRESH_TOKEN_KEY, refresh),
                None => self.storage.remove(REFRESH_TOKEN_KEY),
            }
        }
        info!("Session started");
        self.publish(AuthState::Authenticated);
    }

    /// Applies a refresh response: the access token is replaced and the
    /// refresh token only when the server rotated it.
    pub fn rotate(&self, tokens: &TokenResponse) {
        let rotated = {
            let mut inner = self.inner.write();
            inner.access = Some(tokens.access_token.clone());
            self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token);
            match &tokens.refresh_token {
                Some(refresh) if inner.refresh.as_deref() != Some(refresh.as_str()) => {
                    inner.refresh = Some(refresh.clone());
                    self.storage.set(REFRESH_TOKEN_KEY, refresh);
                    true
                }
                _ => false,
            }
        };
        debug!(rotated, "Access token replaced");
        self.publish(AuthState::Authenticated);
    }

    pub fn set_user(&self, user: User) {
        self.inner.write().user = Some(user);
    }

    /// Drops the access token only, keeping the refresh token for a later
    /// refresh. Used when the backend reports the access token as invalid.
    pub fn invalidate_access_token(&self) {
        {
            let mut inner = self.inner.write();
            inner.access = None;
            inner.user = None;
            self.storage.remove(ACCESS_TOKEN_KEY);
        }
        self.publish(AuthState::Anonymous);
    }

    /// Destroys the session in memory and in storage. Idempotent.
    pub fn clear(&self) {
        let had_tokens = {
            let mut inner = self.inner.write();
            let had = inner.access.is_some() || inner.refresh.is_some();
            *inner = Tokens::default();
            self.storage.remove(ACCESS_TOKEN_KEY);
            self.storage.remove(REFRESH_TOKEN_KEY);
            had
        };
        if had_tokens {
            info!("Session cleared");
        }
        self.publish(AuthState::Anonymous);
    }

    fn publish(&self, next: AuthState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyline_models::Role;

    fn pair(access: &str, refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            token_type: None,
        }
    }

    #[test]
    fn test_new_session_hydrates_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(REFRESH_TOKEN_KEY, "R1");

        let session = Session::new(storage);
        assert_eq!(session.access_token(), None);
        assert_eq!(session.refresh_token().as_deref(), Some("R1"));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_begin_replaces_both_tokens() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());

        session.begin(&pair("T1", Some("R1")));
        session.begin(&pair("T2", None));

        assert_eq!(session.access_token().as_deref(), Some("T2"));
        assert_eq!(session.refresh_token(), None);
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("T2"));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY), None);
    }

    #[test]
    fn test_rotate_keeps_refresh_token_unless_server_rotates() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        session.begin(&pair("T1", Some("R1")));

        session.rotate(&pair("T2", None));
        assert_eq!(session.access_token().as_deref(), Some("T2"));
        assert_eq!(session.refresh_token().as_deref(), Some("R1"));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));

        session.rotate(&pair("T3", Some("R2")));
        assert_eq!(session.refresh_token().as_deref(), Some("R2"));
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("T3"));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("R2"));
    }

    #[test]
    fn test_begin_drops_previous_user() {
        let session = Session::in_memory();
        session.begin(&pair("T1", Some("R1")));
        session.set_user(User {
            id: None,
            email: "a@b.com".into(),
            display_name: None,
            role: Role::Student,
        });
        assert!(session.user().is_some());

        session.begin(&pair("T9", Some("R9")));
        assert!(session.user().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        session.begin(&pair("T1", Some("R1")));

        session.clear();
        session.clear();

        assert_eq!(session.access_token(), None);
        assert_eq!(session.refresh_token(), None);
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
        assert_eq!(storage.get(REFRESH_TOKEN_KEY), None);
    }

    #[test]
    fn test_invalidate_access_token_keeps_refresh() {
        let session = Session::in_memory();
        session.begin(&pair("T1", Some("R1")));
        session.invalidate_access_token();
        assert_eq!(session.access_token(), None);
        assert_eq!(session.refresh_token().as_deref(), Some("R1"));
    }

    #[test]
    fn test_subscribe_sees_state_changes() {
        let session = Session::in_memory();
        let rx = session.subscribe();
        assert_eq!(*rx.borrow(), AuthState::Anonymous);

        session.begin(&pair("T1", Some("R1")));
        assert_eq!(*rx.borrow(), AuthState::Authenticated);

        session.clear();
        assert_eq!(*rx.borrow(), AuthState::Anonymous);
    }

    #[test]
    fn test_concurrent_begin_and_rotate_keep_storage_in_step() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let session = &session;
                scope.spawn(move || {
                    for round in 0..200 {
                        let token = format!("T{worker}-{round}");
                        if worker % 2 == 0 {
                            session.begin(&pair(&token, Some("R1")));
                        } else {
                            session.rotate(&pair(&token, None));
                        }
                    }
                });
            }
        });

        assert_eq!(session.access_token(), storage.get(ACCESS_TOKEN_KEY));
        assert_eq!(session.refresh_token(), storage.get(REFRESH_TOKEN_KEY));
    }
}

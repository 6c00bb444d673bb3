//! Session store: the current user and bearer token.
//!
//! The session is an explicit object handed to everything that needs it
//! (the API client, the CLI dispatcher) rather than an ambient global.
//! After [`Session::login`] returns, `user()` and `token()` read back
//! synchronously.
//!
//! The token and user id are persisted through a [`TokenStore`] under the
//! fixed keys `token` and `user_id`, so a login survives process restarts.
//! `logout` clears both; it is purely local and performs no server call.

mod token_store;

pub use token_store::TokenStore;

use parking_lot::RwLock;
use std::path::PathBuf;
use tracing::warn;

use crate::types::{AppError, Result, User};

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    token: Option<String>,
}

/// Holds the authenticated user and access token for the process lifetime.
pub struct Session {
    state: RwLock<SessionState>,
    store: TokenStore,
}

impl Session {
    /// Creates an empty, unauthenticated session backed by the given
    /// token file.
    pub fn new(token_file: PathBuf) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            store: TokenStore::new(token_file),
        }
    }

    /// Restores a previously persisted token, if any.
    ///
    /// Only the token and user id are persisted; the full profile is
    /// re-fetched from `/auth/me` when a command needs it. A corrupt or
    /// missing store degrades to an empty session.
    pub fn restore(token_file: PathBuf) -> Self {
        let store = TokenStore::new(token_file);
        let token = match store.get(TokenStore::TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                warn!("could not restore session: {}", e);
                None
            }
        };

        Self {
            state: RwLock::new(SessionState { user: None, token }),
            store,
        }
    }

    /// Whether a token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.state.read().token.is_some()
    }

    /// The current user, if one has been fetched this session.
    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// The current bearer token.
    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    /// The bearer token, or [`AppError::MissingToken`] before any network
    /// call is attempted.
    pub fn require_token(&self) -> Result<String> {
        self.token().ok_or(AppError::MissingToken)
    }

    /// Establishes the session: stores user and token, persisting the
    /// token and user id under their fixed keys.
    pub fn login(&self, user: User, token: String) -> Result<()> {
        self.store.set(TokenStore::TOKEN_KEY, &token)?;
        self.store.set(TokenStore::USER_ID_KEY, &user.id)?;

        let mut state = self.state.write();
        state.user = Some(user);
        state.token = Some(token);
        Ok(())
    }

    /// Caches a freshly fetched profile without touching the token.
    pub fn set_user(&self, user: User) {
        self.state.write().user = Some(user);
    }

    /// Clears the session and the persisted keys. Local only; the token
    /// is not invalidated server-side.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(TokenStore::TOKEN_KEY)?;
        self.store.remove(TokenStore::USER_ID_KEY)?;

        let mut state = self.state.write();
        state.user = None;
        state.token = None;
        Ok(())
    }
}

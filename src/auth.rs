//! Process-wide authentication state, persisted after every mutation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::ApiError;
use crate::api::models::{Session, SignUpReply};

const STORE_FILE: &str = "auth-storage.toml";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no data directory available")]
    NoDataDir,
    #[error("failed to write auth store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode auth store: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub token: Option<String>,
}

#[derive(Debug)]
pub struct AuthStore {
    state: AuthState,
    path: Option<PathBuf>,
}

impl AuthStore {
    fn default_path() -> Option<PathBuf> {
        Some(crate::config::project_dirs()?.data_dir().join(STORE_FILE))
    }

    /// Loads the store from the user data dir. A missing or unreadable file
    /// yields the signed-out state.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::open(path),
            None => {
                log::warn!("no data dir; auth state will not persist");
                Self { state: AuthState::default(), path: None }
            }
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::read(&path).unwrap_or_default();
        Self { state, path: Some(path) }
    }

    fn read(path: &Path) -> Option<AuthState> {
        let text = fs::read_to_string(path).ok()?;
        match toml::from_str::<AuthState>(&text) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("discarding unreadable auth store {}: {e}", path.display());
                None
            }
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let path = self.path.as_ref().ok_or(StoreError::NoDataDir)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(&self.state)?)?;
        Ok(())
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn set_authenticated(&mut self, value: bool) -> Result<(), StoreError> {
        self.state.is_authenticated = value;
        self.persist()
    }

    pub fn set_token(&mut self, token: Option<String>) -> Result<(), StoreError> {
        self.state.token = token;
        self.persist()
    }

    pub fn clear_auth(&mut self) -> Result<(), StoreError> {
        self.state = AuthState::default();
        self.persist()
    }

    fn sign_in_with(&mut self, token: String) -> Result<(), StoreError> {
        self.state = AuthState { is_authenticated: true, token: Some(token) };
        self.persist()
    }

    /// Applies a sign-in outcome: success stores the token, any failure
    /// clears the store.
    pub fn record_sign_in(&mut self, outcome: &Result<Session, ApiError>) -> Result<(), StoreError> {
        match outcome {
            Ok(session) => self.sign_in_with(session.token.clone()),
            Err(_) => self.clear_auth(),
        }
    }

    /// Returns whether the new account is now signed in. A successful
    /// sign-up without a token leaves the store untouched.
    pub fn record_sign_up(&mut self, outcome: &Result<SignUpReply, ApiError>) -> Result<bool, StoreError> {
        match outcome {
            Ok(SignUpReply { token: Some(token), .. }) => self.sign_in_with(token.clone()).map(|_| true),
            Ok(_) => Ok(false),
            Err(_) => self.clear_auth().map(|_| false),
        }
    }
}

//! Token providers backed by a fixed value or an in-memory store

use crate::auth::provider::AuthTokenProvider;
use crate::util::SecretString;
use std::sync::{Arc, RwLock};

/// Environment variables checked by [`StaticTokenProvider::from_env`], in order
const TOKEN_ENV_VARS: &[&str] = &["SERVICE_CALL_TOKEN", "AUTH_TOKEN"];

/// Provider returning the same token for every request
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    /// Create a static provider
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Create from environment variable
    ///
    /// Checks SERVICE_CALL_TOKEN and AUTH_TOKEN in order of precedence.
    /// Returns `None` if neither holds a non-empty value.
    pub fn from_env() -> Option<Self> {
        for var in TOKEN_ENV_VARS {
            if let Ok(token) = std::env::var(var)
                && !token.is_empty()
            {
                return Some(Self::new(token));
            }
        }

        None
    }
}

impl AuthTokenProvider for StaticTokenProvider {
    fn peek_token(&self) -> Option<SecretString> {
        Some(self.token.clone())
    }
}

/// A token store the application updates on sign-in and sign-out.
///
/// Clones share the same slot, so one handle can live in the HTTP client
/// while another is held by whatever manages the account.
#[derive(Debug, Clone, Default)]
pub struct SharedTokenProvider {
    slot: Arc<RwLock<Option<SecretString>>>,
}

impl SharedTokenProvider {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a token
    pub fn with_token(token: impl Into<SecretString>) -> Self {
        let provider = Self::new();
        provider.set_token(token);
        provider
    }

    /// Replace the current token
    pub fn set_token(&self, token: impl Into<SecretString>) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.into());
    }

    /// Forget the current token
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

impl AuthTokenProvider for SharedTokenProvider {
    fn peek_token(&self) -> Option<SecretString> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

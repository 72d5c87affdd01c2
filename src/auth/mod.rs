//! Authorization module
//!
//! Token providers and the interceptor that turns a token into an
//! `Authorization: Bearer` header.

pub mod interceptor;
pub mod provider;
pub mod token;

pub use interceptor::{AUTHORIZATION_HEADER, AuthRequestInterceptor, BEARER_PREFIX};
pub use provider::{AuthTokenProvider, UNAUTHORIZED, Unauthorized};
pub use token::{SharedTokenProvider, StaticTokenProvider};

use crate::config::AuthConfig;
use std::sync::Arc;
use tracing::debug;

/// Create a token provider from configuration
///
/// A configured token yields a [`StaticTokenProvider`]. Without one, the
/// token environment variables are consulted (see
/// [`StaticTokenProvider::from_env`]); if they are unset too, requests go out
/// without authorization.
pub fn create_token_provider(config: &AuthConfig) -> Arc<dyn AuthTokenProvider> {
    if let Some(token) = &config.token
        && !token.is_blank()
    {
        debug!("Using configured bearer token");
        return Arc::new(StaticTokenProvider::new(token.clone()));
    }

    match StaticTokenProvider::from_env() {
        Some(provider) => {
            debug!("Using bearer token from environment");
            Arc::new(provider)
        }
        None => {
            debug!("No token configured, requests are sent unauthorized");
            Arc::new(UNAUTHORIZED)
        }
    }
}

//! Bearer token interceptor

use crate::auth::provider::AuthTokenProvider;
use crate::error::CallResult;
use crate::http::{Chain, Interceptor, Response};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::trace;

/// Header carrying the credential
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Scheme prefix of the header value, including the separating space
pub const BEARER_PREFIX: &str = "Bearer ";

/// Attaches `Authorization: Bearer <token>` to outgoing requests whenever
/// the provider currently has a token.
///
/// The token is peeked on every request and never cached. Without a token
/// (or with a blank one) the original request is forwarded as is.
#[derive(Clone)]
pub struct AuthRequestInterceptor {
    provider: Arc<dyn AuthTokenProvider>,
}

impl AuthRequestInterceptor {
    pub fn new(provider: impl AuthTokenProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn from_shared(provider: Arc<dyn AuthTokenProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Interceptor for AuthRequestInterceptor {
    async fn intercept(&self, chain: Chain<'_>) -> CallResult<Response> {
        let original = Arc::clone(chain.request());

        let token = match self.provider.peek_token() {
            Some(token) if !token.is_blank() => token,
            _ => {
                trace!(url = %original.url(), "No token, forwarding request unchanged");
                return chain.proceed(original).await;
            }
        };

        let authorized = original
            .to_builder()
            .header(
                AUTHORIZATION_HEADER,
                &format!("{}{}", BEARER_PREFIX, token.expose_secret()),
            )
            .build()?;

        trace!(url = %original.url(), "Attached bearer token");
        chain.proceed(Arc::new(authorized)).await
    }
}

impl std::fmt::Debug for AuthRequestInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRequestInterceptor").finish_non_exhaustive()
    }
}

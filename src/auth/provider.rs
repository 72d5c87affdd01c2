//! Authorization token provider trait
//!
//! A provider answers one question on every outgoing request: is there a
//! token right now? It never acquires or refreshes one.

use crate::util::SecretString;

/// Capability for peeking the current authorization token.
///
/// Implementations must not block or perform network I/O, and must tolerate
/// concurrent calls from many in-flight requests. `None` is the ordinary
/// answer when nobody is signed in.
pub trait AuthTokenProvider: Send + Sync {
    /// Current token, or `None` if no token is available
    fn peek_token(&self) -> Option<SecretString>;
}

/// Provider for endpoints that never require authorization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unauthorized;

/// Shared instance of [`Unauthorized`]
pub const UNAUTHORIZED: Unauthorized = Unauthorized;

impl AuthTokenProvider for Unauthorized {
    fn peek_token(&self) -> Option<SecretString> {
        None
    }
}

impl<P: AuthTokenProvider + ?Sized> AuthTokenProvider for std::sync::Arc<P> {
    fn peek_token(&self) -> Option<SecretString> {
        (**self).peek_token()
    }
}

impl<P: AuthTokenProvider + ?Sized> AuthTokenProvider for Box<P> {
    fn peek_token(&self) -> Option<SecretString> {
        (**self).peek_token()
    }
}

//! Session credential sources.
//!
//! Identity is owned by an external provider; this layer only asks the
//! current session for a token. The token is re-read for every new backend
//! connection, so short-lived credentials refresh without any bookkeeping
//! here.

use async_trait::async_trait;
use secrecy::SecretString;

/// Source of the current session credential.
#[async_trait]
pub trait SessionTokens: Send + Sync {
    /// The session's current access token, or `None` when signed out.
    async fn access_token(&self) -> Option<SecretString>;
}

/// No signed-in session; the client reaches the backend with only the
/// application key.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

#[async_trait]
impl SessionTokens for Anonymous {
    async fn access_token(&self) -> Option<SecretString> {
        None
    }
}

/// A fixed, non-refreshing token. Useful for fixtures and callers that
/// manage token renewal by rebinding the client.
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

#[async_trait]
impl SessionTokens for StaticToken {
    async fn access_token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}

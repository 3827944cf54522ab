//! Bearer-token acquisition seam.

use secrecy::Secret;

use crate::scope::AuthContext;

/// Acquires bearer tokens for a resolved [`AuthContext`].
///
/// The gateway wires in a credential-chain implementation (managed identity,
/// service principal); tests use [`StaticTokenProvider`]. Token acquisition is
/// the only suspension point the auth crate introduces.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self, ctx: &AuthContext) -> anyhow::Result<Secret<String>>;
}

/// Returns the same token for every scope. For tests and fixed-credential
/// deployments.
pub struct StaticTokenProvider {
    token: Secret<String>,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
        }
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self, ctx: &AuthContext) -> anyhow::Result<Secret<String>> {
        tracing::trace!(scope = %ctx.scope, "issuing static token");
        Ok(self.token.clone())
    }
}

//! Provider and cloud vocabulary shared by the config, auth, and discovery
//! crates.
//!
//! These are closed enums on purpose: adding a provider kind or a cloud
//! environment is a compile-time-checked change, every `match` over them
//! must be updated.

use serde::{Deserialize, Serialize};

/// Kind of model/agent provider an endpoint talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// AOAI-style inference resource fronted by an API gateway.
    GatewayAoai,
    /// AOAI-style inference resource addressed directly.
    DirectAoai,
    /// AI-project agent service (project-scoped agent listings).
    AiProject,
    /// Raw-key provider; no token scopes, the key is the credential.
    ApiKey,
}

impl Provider {
    /// Wire tag, as persisted in the canonical endpoint record.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GatewayAoai => "gateway-aoai",
            Self::DirectAoai => "direct-aoai",
            Self::AiProject => "ai-project",
            Self::ApiKey => "api-key",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sovereign cloud environment an endpoint lives in.
///
/// Public and government clouds use different authority hosts, so scope
/// constants are literal per-cloud strings and must never be derived from
/// one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cloud {
    Public,
    Government,
}

impl Cloud {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Government => "government",
        }
    }
}

impl std::fmt::Display for Cloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an endpoint authenticates outbound calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthType {
    /// Static API key attached as a header; no token scopes involved.
    #[default]
    Key,
    ManagedIdentity,
    ServicePrincipal,
}

impl AuthType {
    /// Bearer-token auth types need a resolvable scope; key auth does not.
    #[must_use]
    pub fn uses_bearer_token(&self) -> bool {
        !matches!(self, Self::Key)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_wire_tags_round_trip() {
        for provider in [
            Provider::GatewayAoai,
            Provider::DirectAoai,
            Provider::AiProject,
            Provider::ApiKey,
        ] {
            let json = serde_json::to_string(&provider).unwrap();
            assert_eq!(json, format!("\"{}\"", provider.as_str()));
            let back: Provider = serde_json::from_str(&json).unwrap();
            assert_eq!(back, provider);
        }
    }

    #[test]
    fn auth_type_default_is_key() {
        assert_eq!(AuthType::default(), AuthType::Key);
        assert!(!AuthType::Key.uses_bearer_token());
        assert!(AuthType::ManagedIdentity.uses_bearer_token());
        assert!(AuthType::ServicePrincipal.uses_bearer_token());
    }

    #[test]
    fn cloud_tags_are_lowercase() {
        assert_eq!(serde_json::to_string(&Cloud::Public).unwrap(), "\"public\"");
        assert_eq!(
            serde_json::to_string(&Cloud::Government).unwrap(),
            "\"government\""
        );
    }
}

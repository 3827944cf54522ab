use parley_common::types::{Cloud, Provider};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No registry scope for this provider/cloud pair and no override given.
    /// The caller must not fall back to another provider's scope.
    #[error("no token scope for provider \"{provider}\" in the {cloud} cloud")]
    UnresolvableScope { provider: Provider, cloud: Cloud },

    /// Key-authenticated endpoint without a stored API key.
    #[error("endpoint \"{endpoint_id}\" uses key auth but has no api_key")]
    MissingApiKey { endpoint_id: String },
}

pub type Result<T> = std::result::Result<T, AuthError>;

//! Static cloud & provider registry.
//!
//! The two clouds use different authority hosts, so every scope is a literal
//! per-cloud constant. Do not parameterize these into a single template; a
//! government endpoint resolving to a public-cloud scope is a credential bug,
//! not a cosmetic one.

use parley_common::types::{Cloud, Provider};

use crate::scope::Purpose;

/// Inference scope for AOAI-style resources, public cloud.
pub const AOAI_INFERENCE_SCOPE_PUBLIC: &str = "https://cognitiveservices.azure.com/.default";
/// Inference scope for AOAI-style resources, government cloud.
pub const AOAI_INFERENCE_SCOPE_GOVERNMENT: &str = "https://cognitiveservices.azure.us/.default";

/// Management/discovery scope (deployment listings), public cloud.
pub const MANAGEMENT_SCOPE_PUBLIC: &str = "https://management.azure.com/.default";
/// Management/discovery scope (deployment listings), government cloud.
pub const MANAGEMENT_SCOPE_GOVERNMENT: &str = "https://management.usgovcloudapi.net/.default";

/// AI-project agent service scope, public cloud. Used for both per-turn
/// inference and agent listings; the registry keys the two purposes
/// separately so they can diverge without an API change.
pub const AI_PROJECT_SCOPE_PUBLIC: &str = "https://ai.azure.com/.default";
/// AI-project agent service scope, government cloud.
pub const AI_PROJECT_SCOPE_GOVERNMENT: &str = "https://ai.azure.us/.default";

/// Default token authority host, public cloud.
pub const AUTHORITY_PUBLIC: &str = "https://login.microsoftonline.com";
/// Default token authority host, government cloud.
pub const AUTHORITY_GOVERNMENT: &str = "https://login.microsoftonline.us";

/// Registry lookup: `(provider, cloud, purpose) -> default scope`.
///
/// `None` means the pair has no bearer-token story at all (the raw-key
/// provider); callers surface that as an error rather than guessing.
#[must_use]
pub fn default_scope(provider: Provider, cloud: Cloud, purpose: Purpose) -> Option<&'static str> {
    match (provider, purpose) {
        (Provider::GatewayAoai | Provider::DirectAoai, Purpose::Inference) => Some(match cloud {
            Cloud::Public => AOAI_INFERENCE_SCOPE_PUBLIC,
            Cloud::Government => AOAI_INFERENCE_SCOPE_GOVERNMENT,
        }),
        (Provider::GatewayAoai | Provider::DirectAoai, Purpose::Management) => Some(match cloud {
            Cloud::Public => MANAGEMENT_SCOPE_PUBLIC,
            Cloud::Government => MANAGEMENT_SCOPE_GOVERNMENT,
        }),
        (Provider::AiProject, Purpose::Inference | Purpose::Management) => Some(match cloud {
            Cloud::Public => AI_PROJECT_SCOPE_PUBLIC,
            Cloud::Government => AI_PROJECT_SCOPE_GOVERNMENT,
        }),
        (Provider::ApiKey, _) => None,
    }
}

/// Default token authority for a cloud, overridable per endpoint via
/// `connection.custom_authority`.
#[must_use]
pub fn default_authority(cloud: Cloud) -> &'static str {
    match cloud {
        Cloud::Public => AUTHORITY_PUBLIC,
        Cloud::Government => AUTHORITY_GOVERNMENT,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// Scopes must differ between clouds for every provider that supports both.
    #[test]
    fn clouds_never_share_scopes() {
        for provider in [
            Provider::GatewayAoai,
            Provider::DirectAoai,
            Provider::AiProject,
        ] {
            for purpose in [Purpose::Inference, Purpose::Management] {
                let public = default_scope(provider, Cloud::Public, purpose).unwrap();
                let government = default_scope(provider, Cloud::Government, purpose).unwrap();
                assert_ne!(
                    public, government,
                    "{provider}/{purpose:?} resolves to the same scope in both clouds"
                );
            }
        }
    }

    #[test]
    fn api_key_provider_has_no_scope() {
        for cloud in [Cloud::Public, Cloud::Government] {
            for purpose in [Purpose::Inference, Purpose::Management] {
                assert!(default_scope(Provider::ApiKey, cloud, purpose).is_none());
            }
        }
    }

    #[test]
    fn exact_literals() {
        assert_eq!(
            default_scope(Provider::DirectAoai, Cloud::Public, Purpose::Inference).unwrap(),
            "https://cognitiveservices.azure.com/.default"
        );
        assert_eq!(
            default_scope(Provider::DirectAoai, Cloud::Government, Purpose::Inference).unwrap(),
            "https://cognitiveservices.azure.us/.default"
        );
        assert_eq!(
            default_scope(Provider::GatewayAoai, Cloud::Government, Purpose::Management).unwrap(),
            "https://management.usgovcloudapi.net/.default"
        );
        assert_eq!(
            default_scope(Provider::AiProject, Cloud::Public, Purpose::Management).unwrap(),
            "https://ai.azure.com/.default"
        );
        assert_eq!(default_authority(Cloud::Government), "https://login.microsoftonline.us");
    }
}

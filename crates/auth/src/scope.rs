//! Scope resolution: registry defaults layered under administrator overrides.

use {
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

use parley_common::types::{AuthType, Cloud, Provider};

use crate::{
    error::{AuthError, Result},
    registry,
};

/// Why a token is being requested.
///
/// Per-turn inference calls and management/discovery calls (deployment and
/// agent listings) may use different audiences, so the purpose travels with
/// every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Inference,
    Management,
}

/// Ephemeral auth material for one outbound bearer call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// OAuth scope to request the token with.
    pub scope: String,
    /// Resource audience (the scope with the `/.default` suffix stripped).
    pub audience: String,
    /// Token authority host.
    pub authority: String,
    pub purpose: Purpose,
}

impl AuthContext {
    fn new(scope: String, authority: String, purpose: Purpose) -> Self {
        let audience = scope
            .strip_suffix("/.default")
            .unwrap_or(scope.as_str())
            .to_string();
        Self {
            scope,
            audience,
            authority,
            purpose,
        }
    }
}

/// How one outbound call authenticates.
#[derive(Debug)]
pub enum ResolvedAuth {
    /// Attach the raw key as a credential header; no token is acquired.
    ApiKey(Secret<String>),
    /// Acquire a bearer token for this context.
    Bearer(AuthContext),
}

/// Borrowed view of the auth-relevant fields of a canonical endpoint.
///
/// Built by `parley-config` so this crate does not depend on the full schema.
#[derive(Debug, Clone, Copy)]
pub struct EndpointAuth<'a> {
    pub endpoint_id: &'a str,
    pub provider: Provider,
    pub cloud: Cloud,
    /// Optional cloud override for management/discovery calls only.
    pub management_cloud: Option<Cloud>,
    pub auth_type: AuthType,
    pub api_key: Option<&'a Secret<String>>,
    /// Administrator scope override; applies to inference only.
    pub scope_override: Option<&'a str>,
    /// Distinct override for the management scope.
    pub management_scope_override: Option<&'a str>,
    pub custom_authority: Option<&'a str>,
}

/// Resolve the scope for a `(provider, cloud, purpose)` triple.
///
/// An override, when given, is returned verbatim — it wins over the registry.
/// An unresolvable pair with no override is an error; the resolver never
/// falls back to a different provider's scope.
pub fn resolve_scope(
    provider: Provider,
    cloud: Cloud,
    purpose: Purpose,
    override_scope: Option<&str>,
) -> Result<String> {
    if let Some(scope) = override_scope {
        let trimmed = scope.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
    registry::default_scope(provider, cloud, purpose)
        .map(str::to_string)
        .ok_or(AuthError::UnresolvableScope { provider, cloud })
}

/// Resolve the full auth method for one outbound call.
///
/// Key auth short-circuits: no scope resolution occurs, the stored key is the
/// credential. Bearer auth resolves the purpose-correct cloud (management
/// calls honor `management_cloud`) and override (`scope_override` is
/// inference-only; management uses its own distinct override).
pub fn resolve_auth(auth: &EndpointAuth<'_>, purpose: Purpose) -> Result<ResolvedAuth> {
    if auth.auth_type == AuthType::Key {
        return auth
            .api_key
            .cloned()
            .map(ResolvedAuth::ApiKey)
            .ok_or_else(|| AuthError::MissingApiKey {
                endpoint_id: auth.endpoint_id.to_string(),
            });
    }

    let cloud = match purpose {
        Purpose::Inference => auth.cloud,
        Purpose::Management => auth.management_cloud.unwrap_or(auth.cloud),
    };
    let override_scope = match purpose {
        Purpose::Inference => auth.scope_override,
        Purpose::Management => auth.management_scope_override,
    };

    let scope = resolve_scope(auth.provider, cloud, purpose, override_scope)?;
    let authority = auth
        .custom_authority
        .map_or_else(|| registry::default_authority(cloud).to_string(), str::to_string);
    Ok(ResolvedAuth::Bearer(AuthContext::new(scope, authority, purpose)))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn bearer_endpoint() -> EndpointAuth<'static> {
        EndpointAuth {
            endpoint_id: "ep",
            provider: Provider::DirectAoai,
            cloud: Cloud::Public,
            management_cloud: None,
            auth_type: AuthType::ManagedIdentity,
            api_key: None,
            scope_override: None,
            management_scope_override: None,
            custom_authority: None,
        }
    }

    fn bearer_scope(resolved: ResolvedAuth) -> AuthContext {
        match resolved {
            ResolvedAuth::Bearer(ctx) => ctx,
            ResolvedAuth::ApiKey(_) => panic!("expected bearer auth"),
        }
    }

    #[test]
    fn inference_and_government_differ() {
        let public =
            resolve_scope(Provider::DirectAoai, Cloud::Public, Purpose::Inference, None).unwrap();
        let government = resolve_scope(
            Provider::DirectAoai,
            Cloud::Government,
            Purpose::Inference,
            None,
        )
        .unwrap();
        assert_ne!(public, government);
    }

    #[test]
    fn override_wins_verbatim() {
        let scope = resolve_scope(
            Provider::DirectAoai,
            Cloud::Government,
            Purpose::Inference,
            Some("https://custom.contoso.example/.default"),
        )
        .unwrap();
        assert_eq!(scope, "https://custom.contoso.example/.default");
    }

    #[test]
    fn blank_override_falls_through_to_registry() {
        let scope =
            resolve_scope(Provider::DirectAoai, Cloud::Public, Purpose::Inference, Some("  "))
                .unwrap();
        assert_eq!(scope, registry::AOAI_INFERENCE_SCOPE_PUBLIC);
    }

    #[test]
    fn api_key_provider_without_override_is_unresolvable() {
        let err = resolve_scope(Provider::ApiKey, Cloud::Public, Purpose::Inference, None)
            .unwrap_err();
        assert!(matches!(err, AuthError::UnresolvableScope { .. }));
    }

    #[test]
    fn key_auth_skips_scope_resolution() {
        let key = Secret::new("abc".to_string());
        let mut auth = bearer_endpoint();
        auth.auth_type = AuthType::Key;
        auth.api_key = Some(&key);
        // Provider::ApiKey has no registry entry, so reaching the registry
        // at all would fail here.
        auth.provider = Provider::ApiKey;
        assert!(matches!(
            resolve_auth(&auth, Purpose::Inference).unwrap(),
            ResolvedAuth::ApiKey(_)
        ));
    }

    #[test]
    fn key_auth_without_key_is_reported() {
        let mut auth = bearer_endpoint();
        auth.auth_type = AuthType::Key;
        let err = resolve_auth(&auth, Purpose::Inference).unwrap_err();
        assert!(matches!(err, AuthError::MissingApiKey { .. }));
    }

    #[test]
    fn management_cloud_override_applies_to_management_only() {
        let mut auth = bearer_endpoint();
        auth.cloud = Cloud::Government;
        auth.management_cloud = Some(Cloud::Public);

        let inference = bearer_scope(resolve_auth(&auth, Purpose::Inference).unwrap());
        assert_eq!(inference.scope, registry::AOAI_INFERENCE_SCOPE_GOVERNMENT);

        let management = bearer_scope(resolve_auth(&auth, Purpose::Management).unwrap());
        assert_eq!(management.scope, registry::MANAGEMENT_SCOPE_PUBLIC);
        assert_eq!(management.authority, registry::AUTHORITY_PUBLIC);
    }

    #[test]
    fn inference_override_does_not_leak_into_management() {
        let mut auth = bearer_endpoint();
        auth.scope_override = Some("https://override.example/.default");

        let inference = bearer_scope(resolve_auth(&auth, Purpose::Inference).unwrap());
        assert_eq!(inference.scope, "https://override.example/.default");

        let management = bearer_scope(resolve_auth(&auth, Purpose::Management).unwrap());
        assert_eq!(management.scope, registry::MANAGEMENT_SCOPE_PUBLIC);
    }

    #[test]
    fn distinct_management_override_honored() {
        let mut auth = bearer_endpoint();
        auth.management_scope_override = Some("https://mgmt.example/.default");

        let management = bearer_scope(resolve_auth(&auth, Purpose::Management).unwrap());
        assert_eq!(management.scope, "https://mgmt.example/.default");
    }

    #[test]
    fn audience_strips_default_suffix() {
        let ctx = bearer_scope(resolve_auth(&bearer_endpoint(), Purpose::Inference).unwrap());
        assert_eq!(ctx.audience, "https://cognitiveservices.azure.com");
        assert_eq!(ctx.authority, registry::AUTHORITY_PUBLIC);
    }
}

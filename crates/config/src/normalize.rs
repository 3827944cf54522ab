//! Endpoint normalizer: administrator-submitted (possibly partial) endpoint
//! configurations in, canonical stable-id endpoints out.
//!
//! Pure function of its input: no network calls, no implicit global reads.
//! Applying it to its own output is a no-op (`changed = false`), which is
//! what makes the store's read-normalize-write save path safe under
//! last-writer-wins concurrency.

use std::collections::HashSet;

use parley_auth::{registry, scope::Purpose};
use parley_common::types::{Cloud, Provider};

use crate::{
    error::{ConfigError, Result},
    schema::{ModelDeploymentModel, ModelEndpoint, RawDeployment, RawEndpoint},
};

/// Result of one normalization pass.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub endpoints: Vec<ModelEndpoint>,
    /// `true` when any id, enabled flag, or structural field was synthesized
    /// rather than already present verbatim. Signals the caller to persist
    /// the normalized form.
    pub changed: bool,
}

/// Normalize a submitted endpoint list into the canonical schema.
///
/// Ids are assigned once: an explicit `id` wins, otherwise the `name` is
/// taken verbatim; a collision gets a deterministic numeric suffix. An
/// endpoint with neither is rejected rather than given a synthesized
/// colliding id.
pub fn normalize(raw: Vec<RawEndpoint>) -> Result<NormalizeOutcome> {
    let mut changed = false;
    let mut seen_ids = HashSet::new();
    let mut endpoints = Vec::with_capacity(raw.len());

    for (index, entry) in raw.into_iter().enumerate() {
        let explicit_id = entry.id.filter(|id| !id.trim().is_empty());
        let had_explicit_id = explicit_id.is_some();
        let base_id = explicit_id
            .or_else(|| entry.name.clone().filter(|name| !name.trim().is_empty()))
            .ok_or(ConfigError::MissingIdentity { index })?;
        let (id, suffixed) = claim_id(&mut seen_ids, base_id);
        if !had_explicit_id || suffixed {
            changed = true;
        }

        let name = entry.name.unwrap_or_else(|| {
            changed = true;
            id.clone()
        });
        let provider = entry.provider.unwrap_or_else(|| {
            changed = true;
            Provider::DirectAoai
        });
        let cloud = entry.cloud.unwrap_or_else(|| {
            changed = true;
            Cloud::Public
        });
        let enabled = entry.enabled.unwrap_or_else(|| {
            changed = true;
            true
        });

        let mut seen_model_ids = HashSet::new();
        let mut models = Vec::with_capacity(entry.models.len());
        for (model_index, model) in entry.models.into_iter().enumerate() {
            models.push(normalize_deployment(
                model,
                model_index,
                &id,
                &mut seen_model_ids,
                &mut changed,
            )?);
        }

        let endpoint = ModelEndpoint {
            id,
            name,
            provider,
            cloud,
            enabled,
            connection: entry.connection,
            management_cloud: entry.management_cloud,
            models,
        };
        check_scope_resolvable(&endpoint)?;
        endpoints.push(endpoint);
    }

    Ok(NormalizeOutcome { endpoints, changed })
}

fn normalize_deployment(
    model: RawDeployment,
    index: usize,
    endpoint_id: &str,
    seen: &mut HashSet<String>,
    changed: &mut bool,
) -> Result<ModelDeploymentModel> {
    let explicit_id = model.id.filter(|id| !id.trim().is_empty());
    let had_explicit_id = explicit_id.is_some();
    let base_id = explicit_id
        .or_else(|| {
            model
                .deployment_name
                .clone()
                .filter(|name| !name.trim().is_empty())
        })
        .ok_or_else(|| ConfigError::MissingDeploymentIdentity {
            endpoint_id: endpoint_id.to_string(),
            index,
        })?;
    let (id, suffixed) = claim_id(seen, base_id);
    if !had_explicit_id || suffixed {
        *changed = true;
    }

    let deployment_name = model.deployment_name.unwrap_or_else(|| {
        *changed = true;
        id.clone()
    });
    let display_name = model.display_name.unwrap_or_else(|| {
        *changed = true;
        deployment_name.clone()
    });
    let description = model.description.unwrap_or_else(|| {
        *changed = true;
        String::new()
    });
    let enabled = model.enabled.unwrap_or_else(|| {
        *changed = true;
        true
    });
    let capabilities = model.capabilities.unwrap_or_else(|| {
        *changed = true;
        crate::schema::default_capabilities()
    });

    Ok(ModelDeploymentModel {
        id,
        deployment_name,
        display_name,
        description,
        enabled,
        capabilities,
    })
}

/// Claim `base` in the seen-set, suffixing `-2`, `-3`, … deterministically on
/// collision. Returns the claimed id and whether it was suffixed.
fn claim_id(seen: &mut HashSet<String>, base: String) -> (String, bool) {
    if seen.insert(base.clone()) {
        return (base, false);
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}-{n}");
        if seen.insert(candidate.clone()) {
            return (candidate, true);
        }
        n += 1;
    }
}

/// An enabled bearer-auth endpoint must have a resolvable inference scope or
/// an explicit override; flag it, never silently disable it.
fn check_scope_resolvable(endpoint: &ModelEndpoint) -> Result<()> {
    if !endpoint.enabled || !endpoint.connection.auth_type.uses_bearer_token() {
        return Ok(());
    }
    let has_override = endpoint
        .connection
        .scope_override
        .as_deref()
        .is_some_and(|scope| !scope.trim().is_empty());
    if has_override
        || registry::default_scope(endpoint.provider, endpoint.cloud, Purpose::Inference).is_some()
    {
        return Ok(());
    }
    Err(ConfigError::UnresolvableScope {
        id: endpoint.id.clone(),
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use parley_common::types::AuthType;

    fn raw(json: serde_json::Value) -> RawEndpoint {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn foundry_endpoint_scenario() {
        let input = raw(serde_json::json!({
            "name": "Foundry Endpoint",
            "connection": { "endpoint": "https://foundry.example" },
            "models": [{ "deployment_name": "gpt-4o" }]
        }));
        let outcome = normalize(vec![input]).unwrap();
        assert!(outcome.changed);

        let endpoint = &outcome.endpoints[0];
        assert_eq!(endpoint.id, "Foundry Endpoint");
        assert!(endpoint.enabled);
        assert_eq!(endpoint.models[0].id, "gpt-4o");
        assert!(endpoint.models[0].enabled);
    }

    #[test]
    fn idempotent_on_own_output() {
        let input = vec![
            raw(serde_json::json!({
                "name": "A",
                "connection": { "endpoint": "https://a.example" },
                "models": [{ "deployment_name": "gpt-4o" }, { "deployment_name": "ada" }]
            })),
            raw(serde_json::json!({
                "name": "B",
                "cloud": "government",
                "connection": { "endpoint": "https://b.example", "auth_type": "managed-identity" }
            })),
        ];
        let first = normalize(input).unwrap();
        assert!(first.changed);

        let second =
            normalize(first.endpoints.iter().cloned().map(Into::into).collect()).unwrap();
        assert!(!second.changed, "second pass must be a no-op");
        assert_eq!(
            serde_json::to_value(&second.endpoints).unwrap(),
            serde_json::to_value(&first.endpoints).unwrap()
        );
    }

    #[test]
    fn id_survives_rename() {
        let first = normalize(vec![raw(serde_json::json!({
            "name": "Original Name",
            "connection": { "endpoint": "https://a.example" }
        }))])
        .unwrap();

        let mut renamed: RawEndpoint = first.endpoints[0].clone().into();
        renamed.name = Some("New Name".into());
        let second = normalize(vec![renamed]).unwrap();

        assert_eq!(second.endpoints[0].id, "Original Name");
        assert_eq!(second.endpoints[0].name, "New Name");
    }

    #[test]
    fn missing_identity_is_rejected() {
        let err = normalize(vec![raw(serde_json::json!({
            "connection": { "endpoint": "https://a.example" }
        }))])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentity { index: 0 }));
    }

    #[test]
    fn duplicate_names_get_deterministic_suffixes() {
        let entry = serde_json::json!({
            "name": "Dup",
            "connection": { "endpoint": "https://a.example" }
        });
        let outcome = normalize(vec![raw(entry.clone()), raw(entry.clone()), raw(entry)]).unwrap();
        let ids: Vec<_> = outcome.endpoints.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["Dup", "Dup-2", "Dup-3"]);
    }

    #[test]
    fn duplicate_deployment_names_suffixed_within_endpoint() {
        let outcome = normalize(vec![raw(serde_json::json!({
            "name": "A",
            "connection": { "endpoint": "https://a.example" },
            "models": [{ "deployment_name": "gpt-4o" }, { "deployment_name": "gpt-4o" }]
        }))])
        .unwrap();
        let ids: Vec<_> = outcome.endpoints[0]
            .models
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["gpt-4o", "gpt-4o-2"]);
    }

    #[test]
    fn deployment_without_identity_reports_parent() {
        let err = normalize(vec![raw(serde_json::json!({
            "name": "A",
            "connection": { "endpoint": "https://a.example" },
            "models": [{ "display_name": "mystery" }]
        }))])
        .unwrap_err();
        match err {
            ConfigError::MissingDeploymentIdentity { endpoint_id, index } => {
                assert_eq!(endpoint_id, "A");
                assert_eq!(index, 0);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn enabled_bearer_endpoint_without_scope_is_flagged() {
        // The raw-key provider has no registry scope; bearer auth against it
        // needs an explicit override.
        let err = normalize(vec![raw(serde_json::json!({
            "name": "Keyed",
            "provider": "api-key",
            "connection": {
                "endpoint": "https://keyed.example",
                "auth_type": "managed-identity"
            }
        }))])
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvableScope { id } if id == "Keyed"));
    }

    #[test]
    fn scope_override_satisfies_the_flag() {
        let outcome = normalize(vec![raw(serde_json::json!({
            "name": "Keyed",
            "provider": "api-key",
            "connection": {
                "endpoint": "https://keyed.example",
                "auth_type": "managed-identity",
                "scope_override": "https://keyed.example/.default"
            }
        }))]);
        assert!(outcome.is_ok());
    }

    #[test]
    fn disabled_endpoint_skips_the_scope_check() {
        let outcome = normalize(vec![raw(serde_json::json!({
            "name": "Keyed",
            "provider": "api-key",
            "enabled": false,
            "connection": {
                "endpoint": "https://keyed.example",
                "auth_type": "managed-identity"
            }
        }))]);
        assert!(outcome.is_ok());
    }

    #[test]
    fn key_auth_defaults_do_not_require_scopes() {
        let outcome = normalize(vec![raw(serde_json::json!({
            "name": "Raw",
            "provider": "api-key",
            "connection": { "endpoint": "https://raw.example", "api_key": "sk-1" }
        }))])
        .unwrap();
        assert_eq!(outcome.endpoints[0].connection.auth_type, AuthType::Key);
    }

    #[test]
    fn explicit_fields_kept_verbatim_means_unchanged() {
        let canonical = normalize(vec![raw(serde_json::json!({
            "name": "A",
            "connection": { "endpoint": "https://a.example" }
        }))])
        .unwrap()
        .endpoints;
        let outcome = normalize(canonical.into_iter().map(Into::into).collect()).unwrap();
        assert!(!outcome.changed);
    }
}

//! One-shot upgrade of the legacy flat single-endpoint settings document
//! into one canonical endpoint entry.
//!
//! Runs before the normalizer on every settings load, so the migrated entry
//! gets its id the same way newly-created ones do. Idempotent: a second run
//! sees the migrated entry in the canonical list and becomes a no-op; a
//! canonical entry with the same id but different credentials is a reported
//! conflict, never an overwrite. No credential field present in the source
//! document is ever dropped.

use secrecy::ExposeSecret;

use parley_common::types::{AuthType, Provider};

use crate::{
    error::MigrationError,
    schema::{EndpointConnection, EndpointsDocument, ModelEndpoint, RawDeployment, RawEndpoint},
};

/// Name (and therefore id, after normalization) of the endpoint synthesized
/// from legacy settings.
pub const MIGRATED_ENDPOINT_NAME: &str = "Default";

/// Map the legacy auth-type vocabulary onto the canonical enum.
fn migrated_auth_type(value: Option<&str>) -> Result<AuthType, MigrationError> {
    match value {
        None => Ok(AuthType::Key),
        Some("key" | "keys") => Ok(AuthType::Key),
        Some("msi" | "managed_identity" | "managed-identity") => Ok(AuthType::ManagedIdentity),
        Some("spn" | "service_principal" | "service-principal") => Ok(AuthType::ServicePrincipal),
        Some(other) => Err(MigrationError::UnknownAuthType {
            value: other.to_string(),
        }),
    }
}

/// Migrate the legacy flat keys of `doc` into one raw endpoint entry.
///
/// Returns `Ok(None)` when there is nothing to do: no legacy keys, or the
/// document already carries the migrated entry with matching credentials.
pub fn migrate(doc: &EndpointsDocument) -> Result<Option<RawEndpoint>, MigrationError> {
    let legacy = &doc.legacy;
    if legacy.is_empty() {
        return Ok(None);
    }

    let auth_type = migrated_auth_type(legacy.auth_type.as_deref())?;
    let connection = EndpointConnection {
        endpoint: legacy.endpoint.clone().unwrap_or_default(),
        auth_type,
        api_key: legacy.api_key.clone(),
        subscription_id: legacy.subscription_id.clone(),
        resource_group: legacy.resource_group.clone(),
        ..EndpointConnection::default()
    };

    if let Some(existing) = doc
        .endpoints
        .iter()
        .find(|e| e.id == MIGRATED_ENDPOINT_NAME)
    {
        return if matches_migrated(existing, &connection) {
            Ok(None)
        } else {
            Err(MigrationError::Conflict {
                id: existing.id.clone(),
            })
        };
    }

    let models = legacy
        .deployment
        .clone()
        .map(|deployment_name| RawDeployment {
            deployment_name: Some(deployment_name),
            ..RawDeployment::default()
        })
        .into_iter()
        .collect();

    tracing::info!("migrating legacy flat settings to a canonical endpoint entry");
    Ok(Some(RawEndpoint {
        name: Some(MIGRATED_ENDPOINT_NAME.to_string()),
        provider: Some(Provider::DirectAoai),
        connection,
        models,
        ..RawEndpoint::default()
    }))
}

/// Does the existing canonical entry carry exactly the credentials migration
/// would synthesize?
fn matches_migrated(existing: &ModelEndpoint, connection: &EndpointConnection) -> bool {
    let keys_match = match (&existing.connection.api_key, &connection.api_key) {
        (Some(a), Some(b)) => a.expose_secret() == b.expose_secret(),
        (None, None) => true,
        _ => false,
    };
    keys_match
        && existing.connection.endpoint == connection.endpoint
        && existing.connection.auth_type == connection.auth_type
        && existing.connection.subscription_id == connection.subscription_id
        && existing.connection.resource_group == connection.resource_group
}

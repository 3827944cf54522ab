//! Canonical endpoint schema: the normalized, stable-id representation of
//! administrator-configured model/agent connections, persisted in the
//! settings store after migration and normalization.

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use parley_auth::scope::EndpointAuth;
use parley_common::types::{AuthType, Cloud, Provider};

fn default_true() -> bool {
    true
}

/// What a deployment can do. Drives which UI surfaces offer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCapability {
    Chat,
    Embedding,
    Image,
}

pub(crate) fn default_capabilities() -> Vec<ModelCapability> {
    vec![ModelCapability::Chat]
}

/// One administrator-configured connection to a model/agent provider.
///
/// `id` is assigned once by the normalizer (from `name` when absent) and is
/// never recomputed afterwards, even if `name` later changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEndpoint {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    pub cloud: Cloud,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub connection: EndpointConnection,
    /// Cloud override for management/discovery calls only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_cloud: Option<Cloud>,
    /// Ordered; list order is the display order.
    #[serde(default)]
    pub models: Vec<ModelDeploymentModel>,
}

impl ModelEndpoint {
    /// Borrowed auth view consumed by the scope resolver.
    #[must_use]
    pub fn auth_view(&self) -> EndpointAuth<'_> {
        EndpointAuth {
            endpoint_id: &self.id,
            provider: self.provider,
            cloud: self.cloud,
            management_cloud: self.management_cloud,
            auth_type: self.connection.auth_type,
            api_key: self.connection.api_key.as_ref(),
            scope_override: self.connection.scope_override.as_deref(),
            management_scope_override: self.connection.management_scope_override.as_deref(),
            custom_authority: self.connection.custom_authority.as_deref(),
        }
    }
}

/// Provider-specific connection fields.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConnection {
    /// Provider root URL.
    pub endpoint: String,
    pub auth_type: AuthType,
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    /// AI-project name; agent listings are issued against
    /// `/api/projects/<project_name>/...` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Token authority override (sovereign or hybrid tenants).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_authority: Option<String>,
    /// Administrator scope override; inference calls only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_override: Option<String>,
    /// Distinct override for the management/discovery scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_scope_override: Option<String>,
}

impl std::fmt::Debug for EndpointConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConnection")
            .field("endpoint", &self.endpoint)
            .field("auth_type", &self.auth_type)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .field("project_name", &self.project_name)
            .field("custom_authority", &self.custom_authority)
            .field("scope_override", &self.scope_override)
            .field("management_scope_override", &self.management_scope_override)
            .finish()
    }
}

/// One deployment/model exposed by an endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDeploymentModel {
    /// Derived from `deployment_name` when absent; immutable once assigned.
    pub id: String,
    pub deployment_name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<ModelCapability>,
}

// ── Raw (partial) input shapes ──────────────────────────────────────────────

/// Endpoint configuration as submitted by an administrator: any subset of
/// legacy or partial shapes. Everything the normalizer may synthesize is
/// optional here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEndpoint {
    pub id: Option<String>,
    pub name: Option<String>,
    pub provider: Option<Provider>,
    pub cloud: Option<Cloud>,
    pub enabled: Option<bool>,
    pub connection: EndpointConnection,
    pub management_cloud: Option<Cloud>,
    pub models: Vec<RawDeployment>,
}

/// Deployment entry as submitted; mirror of [`ModelDeploymentModel`] with
/// optional fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDeployment {
    pub id: Option<String>,
    pub deployment_name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub capabilities: Option<Vec<ModelCapability>>,
}

impl From<ModelEndpoint> for RawEndpoint {
    fn from(endpoint: ModelEndpoint) -> Self {
        Self {
            id: Some(endpoint.id),
            name: Some(endpoint.name),
            provider: Some(endpoint.provider),
            cloud: Some(endpoint.cloud),
            enabled: Some(endpoint.enabled),
            connection: endpoint.connection,
            management_cloud: endpoint.management_cloud,
            models: endpoint.models.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ModelDeploymentModel> for RawDeployment {
    fn from(model: ModelDeploymentModel) -> Self {
        Self {
            id: Some(model.id),
            deployment_name: Some(model.deployment_name),
            display_name: Some(model.display_name),
            description: Some(model.description),
            enabled: Some(model.enabled),
            capabilities: Some(model.capabilities),
        }
    }
}

// ── Persisted settings document ─────────────────────────────────────────────

/// Legacy flat single-endpoint keys, kept at the top level of the settings
/// document. Consumed (never dropped) by the migration adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
}

impl LegacySettings {
    /// `true` when no legacy key carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.auth_type.is_none()
            && self.endpoint.is_none()
            && self.api_key.is_none()
            && self.subscription_id.is_none()
            && self.resource_group.is_none()
            && self.deployment.is_none()
    }
}

/// The settings document as persisted in the external settings store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsDocument {
    pub endpoints: Vec<ModelEndpoint>,
    /// Old flat keys live at the top level of the document.
    #[serde(flatten)]
    pub legacy: LegacySettings,
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

//! Per-request routing: the agent invocation gate and deployment selection.
//!
//! Agent invocations carry their own connection in the request; the gate
//! keeps them out of the multi-endpoint resolver entirely, so no endpoint
//! lookup or scope resolution runs for them. Everything else is resolved
//! against the canonical endpoint list.

use {
    serde::Deserialize,
    tracing::debug,
};

use parley_config::{ModelDeploymentModel, ModelEndpoint};

use crate::error::{Result, RouteError};

/// Agent connection details supplied by the caller on an agent invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentInfo {
    pub agent_id: String,
    /// Connection URL the invocation uses directly.
    pub endpoint: String,
    /// Canonical endpoint id the agent was configured against.
    #[serde(default)]
    pub model_endpoint_id: Option<String>,
    /// Older callers send `endpoint_id` instead of `model_endpoint_id`.
    #[serde(default)]
    pub endpoint_id: Option<String>,
}

impl AgentInfo {
    /// Canonical endpoint id carried by this invocation, preferring the
    /// current field name over the legacy one.
    #[must_use]
    pub fn configured_endpoint_id(&self) -> Option<&str> {
        self.model_endpoint_id
            .as_deref()
            .or(self.endpoint_id.as_deref())
    }
}

/// Routing-relevant fields of one inbound request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub agent_info: Option<AgentInfo>,
    /// Explicitly requested deployment, by model id or deployment name.
    pub deployment: Option<String>,
}

/// The agent invocation gate: multi-endpoint resolution runs only when the
/// request carries no agent connection of its own.
#[must_use]
pub fn should_resolve_multi_endpoint(ctx: &RequestContext) -> bool {
    ctx.agent_info.is_none()
}

/// A routed (endpoint, deployment) pair borrowed from the canonical list.
#[derive(Debug)]
pub struct Selected<'a> {
    pub endpoint: &'a ModelEndpoint,
    pub model: &'a ModelDeploymentModel,
}

/// Pick the deployment for a non-agent request.
///
/// An explicit request is matched by model id or deployment name among the
/// enabled deployments of enabled endpoints; without one, the first enabled
/// deployment in canonical order wins. Disabled endpoints and deployments
/// are invisible to both paths.
pub fn select_deployment<'a>(
    endpoints: &'a [ModelEndpoint],
    requested: Option<&str>,
) -> Result<Selected<'a>> {
    let mut candidates = endpoints
        .iter()
        .filter(|endpoint| endpoint.enabled)
        .flat_map(|endpoint| {
            endpoint
                .models
                .iter()
                .filter(|model| model.enabled)
                .map(move |model| Selected { endpoint, model })
        });

    match requested {
        Some(wanted) => candidates
            .find(|c| c.model.id == wanted || c.model.deployment_name == wanted)
            .ok_or_else(|| RouteError::UnknownDeployment(wanted.to_string())),
        None => {
            let selected = candidates.next().ok_or(RouteError::NoDeployment)?;
            debug!(
                endpoint = %selected.endpoint.id,
                deployment = %selected.model.deployment_name,
                "defaulted to first enabled deployment"
            );
            Ok(selected)
        },
    }
}

/// Resolve the canonical endpoint an agent invocation was configured against,
/// for callers that need its management settings (not its connection, which
/// comes from the request).
pub fn endpoint_for_agent_info<'a>(
    endpoints: &'a [ModelEndpoint],
    agent_info: &AgentInfo,
) -> Result<&'a ModelEndpoint> {
    let wanted = agent_info
        .configured_endpoint_id()
        .ok_or_else(|| RouteError::UnknownEndpoint(String::new()))?;
    endpoints
        .iter()
        .find(|endpoint| endpoint.id == wanted)
        .ok_or_else(|| RouteError::UnknownEndpoint(wanted.to_string()))
}

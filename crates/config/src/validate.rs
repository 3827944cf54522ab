//! Endpoint configuration validation.
//!
//! Non-blocking diagnostics for the admin UI: error-severity entries mirror
//! the hard `ConfigError` cases the save path enforces, warnings cover input
//! that loads but probably does not do what the administrator meant.

use parley_auth::{registry, scope::Purpose};
use parley_common::types::{AuthType, Cloud, Provider};

use crate::schema::ModelEndpoint;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "required-field", "auth", "cloud", "discovery"
    pub category: &'static str,
    /// Dotted path, e.g. `endpoints[0].connection.api_key`
    pub path: String,
    pub message: String,
}

/// Result of validating a canonical endpoint list.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Validate a canonical endpoint list.
#[must_use]
pub fn validate_endpoints(endpoints: &[ModelEndpoint]) -> ValidationResult {
    let mut diagnostics = Vec::new();
    for (index, endpoint) in endpoints.iter().enumerate() {
        check_endpoint(endpoint, index, &mut diagnostics);
    }
    ValidationResult { diagnostics }
}

fn check_endpoint(endpoint: &ModelEndpoint, index: usize, diagnostics: &mut Vec<Diagnostic>) {
    let connection = &endpoint.connection;
    let prefix = format!("endpoints[{index}]");

    if connection.endpoint.trim().is_empty() {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "required-field",
            path: format!("{prefix}.connection.endpoint"),
            message: format!("endpoint \"{}\" has no endpoint URL", endpoint.id),
        });
    }

    match connection.auth_type {
        AuthType::Key => {
            if connection.api_key.is_none() {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    category: "required-field",
                    path: format!("{prefix}.connection.api_key"),
                    message: format!(
                        "endpoint \"{}\" uses key auth but stores no api_key",
                        endpoint.id
                    ),
                });
            }
        },
        AuthType::ManagedIdentity | AuthType::ServicePrincipal => {
            if connection.api_key.is_some() {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    category: "auth",
                    path: format!("{prefix}.connection.api_key"),
                    message: format!(
                        "endpoint \"{}\" stores an api_key that is ignored under {:?} auth",
                        endpoint.id, connection.auth_type
                    ),
                });
            }
            let has_override = connection
                .scope_override
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty());
            if !has_override
                && registry::default_scope(endpoint.provider, endpoint.cloud, Purpose::Inference)
                    .is_none()
            {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    category: "auth",
                    path: format!("{prefix}.connection.scope_override"),
                    message: format!(
                        "endpoint \"{}\" has no resolvable token scope and no scope_override",
                        endpoint.id
                    ),
                });
            }
        },
    }

    if endpoint.cloud == Cloud::Government && endpoint.management_cloud == Some(Cloud::Public) {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "cloud",
            path: format!("{prefix}.management_cloud"),
            message: format!(
                "endpoint \"{}\" is a government endpoint whose discovery calls go to the public cloud",
                endpoint.id
            ),
        });
    }

    if endpoint.provider == Provider::AiProject && connection.project_name.is_none() {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "discovery",
            path: format!("{prefix}.connection.project_name"),
            message: format!(
                "endpoint \"{}\" has no project_name; agent listings will hit the bare service root",
                endpoint.id
            ),
        });
    }

    if matches!(endpoint.provider, Provider::DirectAoai)
        && (connection.subscription_id.is_none() || connection.resource_group.is_none())
    {
        diagnostics.push(Diagnostic {
            severity: Severity::Info,
            category: "discovery",
            path: format!("{prefix}.connection.subscription_id"),
            message: format!(
                "endpoint \"{}\" lacks subscription_id/resource_group; deployment discovery may be limited",
                endpoint.id
            ),
        });
    }
}

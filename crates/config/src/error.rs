use thiserror::Error;

/// Administrator input is structurally invalid. Blocks a save/load and is
/// always reported with the offending endpoint's id (or list position when
/// no id could be derived).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("endpoint at position {index} has neither an id nor a name")]
    MissingIdentity { index: usize },

    #[error("deployment at position {index} of endpoint \"{endpoint_id}\" has neither an id nor a deployment_name")]
    MissingDeploymentIdentity { endpoint_id: String, index: usize },

    /// Enabled bearer-auth endpoint whose provider/cloud pair has no registry
    /// scope and no scope_override. Flagged, never silently disabled.
    #[error("endpoint \"{id}\" is enabled but has no resolvable token scope and no scope_override")]
    UnresolvableScope { id: String },

    #[error("invalid endpoint configuration at {path}: {message}")]
    Invalid { path: String, message: String },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Legacy and canonical data disagree, or the legacy document cannot be
/// mapped. Migration skips the entry and reports; it never overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    #[error("legacy settings conflict with existing endpoint \"{id}\"; migration skipped")]
    Conflict { id: String },

    #[error("unknown legacy auth type \"{value}\"")]
    UnknownAuthType { value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

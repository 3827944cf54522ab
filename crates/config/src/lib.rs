//! Canonical endpoint configuration: schema, normalization, validation,
//! legacy migration, and settings-store access.
//!
//! The persisted document is JSON-shaped; old flat single-endpoint keys at
//! the document's top level are upgraded by `migrate` before normalization
//! on every load.

pub mod error;
pub mod migrate;
pub mod normalize;
pub mod schema;
pub mod store;
pub mod validate;

pub use {
    error::{ConfigError, MigrationError},
    migrate::{MIGRATED_ENDPOINT_NAME, migrate},
    normalize::{NormalizeOutcome, normalize},
    schema::{
        EndpointConnection, EndpointsDocument, LegacySettings, ModelCapability,
        ModelDeploymentModel, ModelEndpoint, RawDeployment, RawEndpoint,
    },
    store::{EndpointContext, JsonFileStore, LoadReport, MemoryStore, SettingsStore},
    validate::{Diagnostic, Severity, ValidationResult, validate_endpoints},
};

//! Settings store access and the endpoint configuration context.
//!
//! The store itself is an external key-value document service consumed
//! through a get/update interface. [`EndpointContext`] is the explicit,
//! passed-by-reference configuration context the rest of the system uses:
//! `load()` for the migrate-normalize-persist read path, `save()` for the
//! full-replace administrator write path. Discovery never writes canonical
//! state through this context; only an explicit save persists changes.

use std::{path::PathBuf, sync::Arc};

use tracing::{debug, warn};

use crate::{
    error::{ConfigError, MigrationError, Result},
    migrate::migrate,
    normalize::normalize,
    schema::{EndpointsDocument, ModelEndpoint, RawEndpoint},
    validate::validate_endpoints,
};

/// The external settings document store, consumed as a get/update interface.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self) -> Result<EndpointsDocument>;
    async fn update(&self, doc: &EndpointsDocument) -> Result<()>;
}

/// JSON-file-backed store. A missing file reads as the default (empty)
/// document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl SettingsStore for JsonFileStore {
    async fn get(&self) -> Result<EndpointsDocument> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings document, using defaults");
                Ok(EndpointsDocument::default())
            },
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    async fn update(&self, doc: &EndpointsDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        tokio::fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), "saved settings document");
        Ok(())
    }
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryStore {
    doc: tokio::sync::RwLock<EndpointsDocument>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_document(doc: EndpointsDocument) -> Self {
        Self {
            doc: tokio::sync::RwLock::new(doc),
        }
    }
}

#[async_trait::async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self) -> Result<EndpointsDocument> {
        Ok(self.doc.read().await.clone())
    }

    async fn update(&self, doc: &EndpointsDocument) -> Result<()> {
        *self.doc.write().await = doc.clone();
        Ok(())
    }
}

/// Result of one settings load.
#[derive(Debug)]
pub struct LoadReport {
    pub endpoints: Vec<ModelEndpoint>,
    /// The normalized form was persisted back during this load.
    pub persisted: bool,
    /// Legacy migration was skipped because canonical data disagreed.
    pub migration_conflict: Option<MigrationError>,
}

/// Explicit endpoint-configuration context, scoped to a request or a save
/// transaction rather than ambient global state.
pub struct EndpointContext {
    store: Arc<dyn SettingsStore>,
    save_lock: tokio::sync::Mutex<()>,
}

impl EndpointContext {
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            save_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Load the canonical endpoint list: get, migrate the legacy document if
    /// present, normalize, and persist back iff anything changed.
    ///
    /// A migration conflict skips the legacy entry and is reported in the
    /// returned [`LoadReport`]; it does not fail the load.
    pub async fn load(&self) -> Result<LoadReport> {
        let _guard = self.save_lock.lock().await;
        let mut doc = self.store.get().await?;

        let mut migration_conflict = None;
        let mut raw: Vec<RawEndpoint> = doc.endpoints.iter().cloned().map(Into::into).collect();
        let mut migrated = false;
        match migrate(&doc) {
            Ok(Some(entry)) => {
                raw.push(entry);
                migrated = true;
            },
            Ok(None) => {},
            Err(conflict) => {
                warn!(error = %conflict, "legacy settings migration skipped");
                migration_conflict = Some(conflict);
            },
        }

        let outcome = normalize(raw)?;
        let persisted = outcome.changed || migrated;
        if persisted {
            doc.endpoints = outcome.endpoints.clone();
            self.store.update(&doc).await?;
        }

        Ok(LoadReport {
            endpoints: outcome.endpoints,
            persisted,
            migration_conflict,
        })
    }

    /// Full replace of the canonical endpoint list.
    ///
    /// Normalizes and validates first — errors block the save and are
    /// reported with the offending endpoint's id — then performs a
    /// read-modify-write against the store under the serialization lock so
    /// two concurrent saves cannot interleave field-by-field.
    pub async fn save(&self, raw: Vec<RawEndpoint>) -> Result<Vec<ModelEndpoint>> {
        let outcome = normalize(raw)?;
        let report = validate_endpoints(&outcome.endpoints);
        if let Some(first) = report
            .diagnostics
            .iter()
            .find(|d| d.severity == crate::validate::Severity::Error)
        {
            return Err(ConfigError::Invalid {
                path: first.path.clone(),
                message: first.message.clone(),
            });
        }

        let _guard = self.save_lock.lock().await;
        let mut doc = self.store.get().await?;
        doc.endpoints = outcome.endpoints.clone();
        self.store.update(&doc).await?;
        Ok(outcome.endpoints)
    }
}

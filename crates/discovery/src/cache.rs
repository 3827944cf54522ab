//! Last-known-good listing results, per endpoint.

use std::{collections::HashMap, sync::RwLock};

use crate::DiscoveredDeployment;

/// The last successful enabled set per endpoint id. A failed or timed-out
/// listing serves this set alongside the error instead of an empty list.
#[derive(Default)]
pub struct ListingCache {
    entries: RwLock<HashMap<String, Vec<DiscoveredDeployment>>>,
}

impl ListingCache {
    pub fn put(&self, endpoint_id: &str, models: &[DiscoveredDeployment]) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(endpoint_id.to_string(), models.to_vec());
        }
    }

    #[must_use]
    pub fn get(&self, endpoint_id: &str) -> Option<Vec<DiscoveredDeployment>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(endpoint_id).cloned())
    }
}

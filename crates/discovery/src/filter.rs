//! Deployment-state filter.
//!
//! Providers report lifecycle state under different field names and casing
//! conventions. The filter is conservative, never optimistic: only an
//! explicit succeeded/enabled-equivalent value counts as usable; anything
//! else, including an absent field, is disabled.

/// State field names across provider casing conventions.
const STATE_FIELDS: &[&str] = &["status", "provisioningState", "provisioning_state", "state"];

/// Values that mean "presently usable", compared case-insensitively.
const ENABLED_STATES: &[&str] = &["succeeded", "enabled"];

/// Is this raw deployment/agent record presently usable?
#[must_use]
pub fn is_enabled(record: &serde_json::Value) -> bool {
    state_value(record)
        .is_some_and(|state| ENABLED_STATES.contains(&state.to_ascii_lowercase().as_str()))
}

/// Find the provider's state field, checking the record itself and the
/// ARM-style `properties` envelope.
fn state_value(record: &serde_json::Value) -> Option<&str> {
    for field in STATE_FIELDS {
        if let Some(state) = record.get(field).and_then(|v| v.as_str()) {
            return Some(state);
        }
    }
    record.get("properties").and_then(|properties| {
        STATE_FIELDS
            .iter()
            .find_map(|field| properties.get(field).and_then(|v| v.as_str()))
    })
}

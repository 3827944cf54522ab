//! Remote deployment/agent discovery.
//!
//! Listings are advisory: they populate pickers and health views, never
//! canonical configuration. Each enabled endpoint is paged, filtered down to
//! presently-usable records, and mapped to display models; failures degrade
//! to the last cached set per endpoint instead of failing the whole sweep.

use std::{sync::LazyLock, time::Duration};

use tracing::warn;

use parley_auth::TokenProvider;
use parley_config::ModelEndpoint;

pub mod cache;
pub mod error;
pub mod filter;
pub mod listing;
pub mod pager;

pub use {
    cache::ListingCache,
    error::RemoteListingError,
    filter::is_enabled,
    listing::{AgentsPageSource, DeploymentsPageSource, RequestAuth, page_source_for},
    pager::{DrainOutcome, PageSource, drain},
};

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// Shared connection-pooled client for all listing traffic.
#[must_use]
pub fn shared_http_client() -> &'static reqwest::Client {
    &HTTP_CLIENT
}

/// One usable deployment or agent as shown in pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDeployment {
    pub id: String,
    /// Provider-side deployment name; the value sent on inference calls.
    pub deployment_name: String,
    pub display_name: String,
}

/// Listing result for one endpoint. `models` and `error` can both be set:
/// a mid-drain failure keeps the records fetched before it.
#[derive(Debug)]
pub struct EndpointListing {
    pub endpoint_id: String,
    pub models: Vec<DiscoveredDeployment>,
    pub error: Option<RemoteListingError>,
}

/// Map one raw provider record to its display model.
///
/// Handles both wire shapes: ARM deployment records carry the deployment
/// name in `name` and the underlying model under `properties.model`; agent
/// records carry `id` plus an optional friendly `name`.
#[must_use]
pub fn to_display_model(record: &serde_json::Value) -> Option<DiscoveredDeployment> {
    let name = str_field(record, "name");
    let id = str_field(record, "id").or(name)?;
    let deployment_name = name.unwrap_or(id);
    let display_name = str_field(record, "display_name")
        .or_else(|| {
            record
                .get("properties")
                .and_then(|p| p.get("model"))
                .and_then(|model| model.get("name"))
                .and_then(|v| v.as_str())
        })
        .unwrap_or(deployment_name);
    Some(DiscoveredDeployment {
        id: id.to_string(),
        deployment_name: deployment_name.to_string(),
        display_name: display_name.to_string(),
    })
}

fn str_field<'a>(record: &'a serde_json::Value, field: &str) -> Option<&'a str> {
    record.get(field).and_then(|v| v.as_str())
}

/// List one endpoint: resolve the management credential, drain the pages,
/// filter to usable records, and map to display models.
///
/// A failure with zero fetched records serves the cached set alongside the
/// error; a mid-drain failure keeps the partial records. Only a fully
/// successful drain updates the cache.
pub async fn list_endpoint(
    endpoint: &ModelEndpoint,
    tokens: &dyn TokenProvider,
    cache: &ListingCache,
) -> EndpointListing {
    let auth = match listing::management_auth(endpoint, tokens).await {
        Ok(auth) => auth,
        Err(e) => {
            warn!(endpoint = %endpoint.id, error = %e, "listing auth failed");
            return EndpointListing {
                endpoint_id: endpoint.id.clone(),
                models: cache.get(&endpoint.id).unwrap_or_default(),
                error: Some(e),
            };
        },
    };

    let mut source = page_source_for(shared_http_client().clone(), endpoint, auth);
    let outcome = drain(source.as_mut()).await;
    let models: Vec<DiscoveredDeployment> = outcome
        .records
        .iter()
        .filter(|record| is_enabled(record))
        .filter_map(to_display_model)
        .collect();

    match outcome.error {
        None => {
            cache.put(&endpoint.id, &models);
            EndpointListing {
                endpoint_id: endpoint.id.clone(),
                models,
                error: None,
            }
        },
        Some(e) if models.is_empty() => {
            warn!(endpoint = %endpoint.id, error = %e, "listing failed, serving cached set");
            EndpointListing {
                endpoint_id: endpoint.id.clone(),
                models: cache.get(&endpoint.id).unwrap_or_default(),
                error: Some(e),
            }
        },
        Some(e) => EndpointListing {
            endpoint_id: endpoint.id.clone(),
            models,
            error: Some(e),
        },
    }
}

/// List every enabled endpoint concurrently.
///
/// Each endpoint gets its own deadline; a timed-out endpoint discards any
/// partial records and falls back to its cached set without affecting the
/// others. Results come back in canonical endpoint order, not arrival order.
pub async fn list_all(
    endpoints: &[ModelEndpoint],
    tokens: &dyn TokenProvider,
    cache: &ListingCache,
    per_endpoint_timeout: Duration,
) -> Vec<EndpointListing> {
    let listings = endpoints
        .iter()
        .filter(|endpoint| endpoint.enabled)
        .map(|endpoint| async move {
            match tokio::time::timeout(
                per_endpoint_timeout,
                list_endpoint(endpoint, tokens, cache),
            )
            .await
            {
                Ok(listing) => listing,
                Err(_) => {
                    warn!(endpoint = %endpoint.id, "listing timed out");
                    EndpointListing {
                        endpoint_id: endpoint.id.clone(),
                        models: cache.get(&endpoint.id).unwrap_or_default(),
                        error: Some(RemoteListingError::Timeout(per_endpoint_timeout)),
                    }
                },
            }
        });
    futures::future::join_all(listings).await
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arm_deployment_record_maps_to_display_model() {
        let record = json!({
            "id": "/subscriptions/sub1/deployments/gpt-4o",
            "name": "gpt-4o",
            "properties": {
                "provisioningState": "Succeeded",
                "model": { "name": "gpt-4o-2024-08-06" }
            }
        });
        let model = to_display_model(&record).unwrap();
        assert_eq!(model.deployment_name, "gpt-4o");
        assert_eq!(model.display_name, "gpt-4o-2024-08-06");
    }

    #[test]
    fn agent_record_maps_with_friendly_name() {
        let record = json!({ "id": "asst_1", "name": "Helper", "status": "enabled" });
        let model = to_display_model(&record).unwrap();
        assert_eq!(model.id, "asst_1");
        assert_eq!(model.display_name, "Helper");
    }

    #[test]
    fn record_without_any_identity_is_dropped() {
        assert!(to_display_model(&json!({ "status": "enabled" })).is_none());
    }
}

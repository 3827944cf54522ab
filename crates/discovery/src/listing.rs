//! Reqwest-backed page sources for the two listing wire shapes.
//!
//! AOAI-style providers expose deployments as an ARM-flavored collection
//! (`{ value: [...], nextLink }` with absolute continuation URLs); agent
//! services page with an explicit cursor (`{ data: [...], has_more, last_id }`
//! and an `after` query parameter).

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use parley_auth::{Purpose, ResolvedAuth, TokenProvider, resolve_auth};
use parley_common::types::Provider;
use parley_config::ModelEndpoint;

use crate::{
    error::RemoteListingError,
    pager::PageSource,
};

pub(crate) const DEPLOYMENTS_API_VERSION: &str = "2024-10-01";

/// Credential attached to every listing request.
pub enum RequestAuth {
    Bearer(Secret<String>),
    ApiKey(Secret<String>),
}

impl RequestAuth {
    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Bearer(token) => request.bearer_auth(token.expose_secret()),
            Self::ApiKey(key) => request.header("api-key", key.expose_secret()),
        }
    }
}

/// Resolve the management-purpose credential for one endpoint: the stored key
/// for key-auth endpoints, a bearer token acquired through `tokens` otherwise.
pub async fn management_auth(
    endpoint: &ModelEndpoint,
    tokens: &dyn TokenProvider,
) -> Result<RequestAuth, RemoteListingError> {
    match resolve_auth(&endpoint.auth_view(), Purpose::Management) {
        Ok(ResolvedAuth::ApiKey(key)) => Ok(RequestAuth::ApiKey(key)),
        Ok(ResolvedAuth::Bearer(ctx)) => tokens
            .bearer_token(&ctx)
            .await
            .map(RequestAuth::Bearer)
            .map_err(|e| RemoteListingError::Auth(e.to_string())),
        Err(e) => Err(RemoteListingError::Auth(e.to_string())),
    }
}

/// Choose the wire shape for this endpoint's provider.
#[must_use]
pub fn page_source_for(
    client: reqwest::Client,
    endpoint: &ModelEndpoint,
    auth: RequestAuth,
) -> Box<dyn PageSource> {
    match endpoint.provider {
        Provider::AiProject => Box::new(AgentsPageSource::new(
            client,
            auth,
            agent_listing_url(
                &endpoint.connection.endpoint,
                endpoint.connection.project_name.as_deref(),
            ),
        )),
        _ => Box::new(DeploymentsPageSource::new(
            client,
            auth,
            &endpoint.connection.endpoint,
        )),
    }
}

// ── URL construction ────────────────────────────────────────────────────────

pub(crate) fn deployments_url(root: &str) -> String {
    format!(
        "{}/deployments?api-version={DEPLOYMENTS_API_VERSION}",
        root.trim_end_matches('/')
    )
}

/// Agent listings are project-scoped when the endpoint names a project,
/// root-scoped otherwise.
pub(crate) fn agent_listing_url(root: &str, project_name: Option<&str>) -> String {
    let root = root.trim_end_matches('/');
    match project_name.map(str::trim).filter(|p| !p.is_empty()) {
        Some(project) => format!("{root}/api/projects/{project}/agents"),
        None => format!("{root}/agents"),
    }
}

async fn fetch_page<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    auth: &RequestAuth,
    url: &str,
) -> Result<T, RemoteListingError> {
    debug!(url = %url, "fetching listing page");
    let response = auth
        .apply(client.get(url))
        .send()
        .await
        .map_err(|e| RemoteListingError::Http(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteListingError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| RemoteListingError::Decode(e.to_string()))
}

// ── ARM-style deployments listing ───────────────────────────────────────────

#[derive(Deserialize)]
struct DeploymentsPage {
    #[serde(default)]
    value: Vec<serde_json::Value>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

/// Pages through `<root>/deployments`, following absolute `nextLink`
/// continuation URLs until the provider stops returning one.
pub struct DeploymentsPageSource {
    client: reqwest::Client,
    auth: RequestAuth,
    next_url: Option<String>,
}

impl DeploymentsPageSource {
    #[must_use]
    pub fn new(client: reqwest::Client, auth: RequestAuth, root: &str) -> Self {
        Self {
            client,
            auth,
            next_url: Some(deployments_url(root)),
        }
    }
}

#[async_trait::async_trait]
impl PageSource for DeploymentsPageSource {
    async fn next_page(
        &mut self,
    ) -> Result<Option<Vec<serde_json::Value>>, RemoteListingError> {
        let Some(url) = self.next_url.take() else {
            return Ok(None);
        };
        let page: DeploymentsPage = fetch_page(&self.client, &self.auth, &url).await?;
        self.next_url = page.next_link.filter(|link| !link.trim().is_empty());
        Ok(Some(page.value))
    }
}

// ── Cursor-paged agent listing ──────────────────────────────────────────────

#[derive(Deserialize)]
struct AgentsPage {
    #[serde(default)]
    data: Vec<serde_json::Value>,
    #[serde(default)]
    has_more: bool,
    last_id: Option<String>,
}

/// Pages through an agent listing with `after=<last_id>` cursor parameters.
pub struct AgentsPageSource {
    client: reqwest::Client,
    auth: RequestAuth,
    base_url: String,
    cursor: Option<String>,
    exhausted: bool,
}

impl AgentsPageSource {
    #[must_use]
    pub fn new(client: reqwest::Client, auth: RequestAuth, base_url: String) -> Self {
        Self {
            client,
            auth,
            base_url,
            cursor: None,
            exhausted: false,
        }
    }
}

#[async_trait::async_trait]
impl PageSource for AgentsPageSource {
    async fn next_page(
        &mut self,
    ) -> Result<Option<Vec<serde_json::Value>>, RemoteListingError> {
        if self.exhausted {
            return Ok(None);
        }
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| RemoteListingError::Http(e.to_string()))?;
        if let Some(cursor) = &self.cursor {
            url.query_pairs_mut().append_pair("after", cursor);
        }
        let page: AgentsPage = fetch_page(&self.client, &self.auth, url.as_str()).await?;
        // A has_more page without a cursor would loop forever; treat it as
        // the final page.
        match page.last_id.filter(|id| page.has_more && !id.is_empty()) {
            Some(last_id) => self.cursor = Some(last_id),
            None => self.exhausted = true,
        }
        Ok(Some(page.data))
    }
}

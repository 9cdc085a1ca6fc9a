//! `CatalogClient` - catalog REST client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, Request, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::error::{ApiError, ApiResult};
use super::types::{
    Ack, Categories, ContentId, ContentItem, HealthStatus, MyListEntry, NewProfile, Profile,
    ProfileId, ProgressEntry, ProgressUpdate,
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path prefix of the REST API below the service origin.
const API_PREFIX: &str = "api/";

/// Catalog/user REST client.
///
/// Logs every request and its outcome; never retries.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client (gzip, timeout).
    http_client: Client,
    /// `{origin}/api/`.
    api_base: Url,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Sets the service origin (required). `/api/` is appended to it.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `base_url` is not set or cannot be a base URL.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let origin = self.base_url.context("base_url is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;
        let api_base = api_base_for(&origin)?;

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            api_base,
        })
    }
}

/// Derives `{origin}/api/` from the service origin.
fn api_base_for(origin: &Url) -> Result<Url> {
    if origin.cannot_be_a_base() {
        bail!("base URL cannot be a base: {origin}");
    }

    let mut base = origin.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(API_PREFIX)
        .with_context(|| format!("failed to derive API URL from {origin}"))
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Returns the API base URL (`{origin}/api/`).
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Builds an endpoint URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::validation(format!("base URL cannot carry a path: {}", self.api_base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// Logs method + path on dispatch and the failure, if any, on completion.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let request = request
            .build()
            .map_err(|e| ApiError::validation(format!("failed to build request: {e}")))?;
        let method = request.method().clone();
        let path = String::from(request.url().path());

        tracing::debug!(%method, path = %path, "API request");

        let result = self.dispatch(request, &path).await;
        if let Err(ref error) = result {
            tracing::warn!(%method, path = %path, %error, "API request failed");
        }
        result
    }

    /// Executes a built request and maps the outcome onto `ApiError`.
    async fn dispatch<T: DeserializeOwned>(&self, request: Request, path: &str) -> ApiResult<T> {
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| ApiError::from_transport(path, &e))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), path, "API response");

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(path, &e))?;

        if !status.is_success() {
            return Err(ApiError::Http {
                path: String::from(path),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            path: String::from(path),
            message: e.to_string(),
        })
    }
}

impl LocalCatalogApi for CatalogClient {
    #[instrument(skip_all)]
    async fn featured(&self) -> ApiResult<Option<ContentItem>> {
        let url = self.endpoint(&["content", "featured"])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn trending(&self) -> ApiResult<Vec<ContentItem>> {
        let url = self.endpoint(&["content", "trending"])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn popular(&self) -> ApiResult<Vec<ContentItem>> {
        let url = self.endpoint(&["content", "popular"])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn by_genre(&self, genre: &str) -> ApiResult<Vec<ContentItem>> {
        let url = self.endpoint(&["content", "genre", genre])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn search(&self, query: &str) -> ApiResult<Vec<ContentItem>> {
        let url = self.endpoint(&["content", "search"])?;
        self.send(self.http_client.get(url).query(&[("q", query)]))
            .await
    }

    #[instrument(skip_all)]
    async fn content_details(&self, id: &ContentId) -> ApiResult<Option<ContentItem>> {
        let url = self.endpoint(&["content", id.as_str()])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn all_categories(&self) -> ApiResult<Categories> {
        let url = self.endpoint(&["content", "categories", "all"])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn profiles(&self) -> ApiResult<Vec<Profile>> {
        let url = self.endpoint(&["users", "profiles"])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn create_profile(&self, profile: &NewProfile) -> ApiResult<Profile> {
        let url = self.endpoint(&["users", "profiles"])?;
        self.send(self.http_client.post(url).json(profile)).await
    }

    #[instrument(skip_all)]
    async fn my_list(&self, profile_id: &ProfileId) -> ApiResult<Vec<ContentItem>> {
        let url = self.endpoint(&["users", profile_id.as_str(), "my-list"])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn add_to_my_list(&self, profile_id: &ProfileId, entry: &MyListEntry) -> ApiResult<Ack> {
        let url = self.endpoint(&["users", profile_id.as_str(), "my-list"])?;
        self.send(self.http_client.post(url).json(entry)).await
    }

    #[instrument(skip_all)]
    async fn remove_from_my_list(
        &self,
        profile_id: &ProfileId,
        content_id: &ContentId,
    ) -> ApiResult<Ack> {
        let url = self.endpoint(&["users", profile_id.as_str(), "my-list", content_id.as_str()])?;
        self.send(self.http_client.delete(url)).await
    }

    #[instrument(skip_all)]
    async fn continue_watching(&self, profile_id: &ProfileId) -> ApiResult<Vec<ContentItem>> {
        let url = self.endpoint(&["users", profile_id.as_str(), "continue-watching"])?;
        self.send(self.http_client.get(url)).await
    }

    #[instrument(skip_all)]
    async fn create_progress(
        &self,
        profile_id: &ProfileId,
        progress: &ProgressEntry,
    ) -> ApiResult<Ack> {
        let url = self.endpoint(&["users", profile_id.as_str(), "progress"])?;
        self.send(self.http_client.post(url).json(progress)).await
    }

    #[instrument(skip_all)]
    async fn update_progress(
        &self,
        profile_id: &ProfileId,
        content_id: &ContentId,
        update: &ProgressUpdate,
    ) -> ApiResult<Ack> {
        let url = self.endpoint(&["users", profile_id.as_str(), "progress", content_id.as_str()])?;
        self.send(self.http_client.put(url).json(update)).await
    }

    #[instrument(skip_all)]
    async fn health(&self) -> ApiResult<HealthStatus> {
        let url = self.endpoint(&["health"])?;
        self.send(self.http_client.get(url)).await
    }
}

//! TMDB v3 API client.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{CatalogPage, Category, DetailRecord, MediaKind, VideoList};

#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("flix/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// One page of a category list.
    pub async fn catalog(&self, category: Category, page: u32) -> Result<CatalogPage, FetchError> {
        let page = page.max(1).to_string();
        self.get_json(category.endpoint(), &[("page", page.as_str())])
            .await
    }

    pub async fn details(&self, kind: MediaKind, id: u64) -> Result<DetailRecord, FetchError> {
        let endpoint = format!("{}/{}", kind, id);
        self.get_json(&endpoint, &[]).await
    }

    pub async fn movie_details(&self, id: u64) -> Result<DetailRecord, FetchError> {
        self.details(MediaKind::Movie, id).await
    }

    pub async fn tv_details(&self, id: u64) -> Result<DetailRecord, FetchError> {
        self.details(MediaKind::Tv, id).await
    }

    pub async fn videos(&self, kind: MediaKind, id: u64) -> Result<VideoList, FetchError> {
        let endpoint = format!("{}/{}/videos", kind, id);
        self.get_json(&endpoint, &[]).await
    }

    pub async fn search(
        &self,
        kind: MediaKind,
        keyword: &str,
        page: u32,
    ) -> Result<CatalogPage, FetchError> {
        let endpoint = format!("search/{}", kind);
        let page = page.max(1).to_string();
        self.get_json(&endpoint, &[("query", keyword), ("page", page.as_str())])
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        if !self.has_api_key() {
            return Err(FetchError::MissingApiKey);
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(endpoint.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::MalformedResponse {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

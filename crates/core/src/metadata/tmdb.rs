//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access. Only the two search endpoints are
//! used: `/search/movie` and `/search/tv`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{MovieMatch, SeriesMatch};
use super::{CatalogError, MetadataCatalog};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key. Empty disables title correction.
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Result language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_language() -> String {
    "zh-CN".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

impl TmdbConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if !config.is_configured() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            language: config.language,
        })
    }

    async fn check_status(response: Response) -> Result<Response, CatalogError> {
        let status = response.status();
        if status == 401 {
            return Err(CatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, CatalogError> {
        response.json().await.map_err(|e| {
            CatalogError::Parse(format!("Failed to parse {} search response: {}", what, e))
        })
    }
}

#[async_trait]
impl MetadataCatalog for TmdbClient {
    async fn search_movies(
        &self,
        query: &str,
        year: Option<u32>,
    ) -> Result<Vec<MovieMatch>, CatalogError> {
        let url = format!("{}/search/movie", self.base_url);

        debug!("TMDB movie search: query='{}', year={:?}", query, year);

        let mut request = self.client.get(&url).query(&[
            ("api_key", self.api_key.as_str()),
            ("query", query),
            ("language", self.language.as_str()),
        ]);

        if let Some(y) = year {
            request = request.query(&[("year", &y.to_string())]);
        }

        let response = Self::check_status(request.send().await?).await?;
        let search_result: TmdbSearchResponse<TmdbMovieResult> =
            Self::parse(response, "movie").await?;

        Ok(search_result.results.into_iter().map(Into::into).collect())
    }

    async fn search_tv(&self, query: &str) -> Result<Vec<SeriesMatch>, CatalogError> {
        let url = format!("{}/search/tv", self.base_url);

        debug!("TMDB TV search: query='{}'", query);

        let request = self.client.get(&url).query(&[
            ("api_key", self.api_key.as_str()),
            ("query", query),
            ("language", self.language.as_str()),
        ]);

        let response = Self::check_status(request.send().await?).await?;
        let search_result: TmdbSearchResponse<TmdbTvResult> = Self::parse(response, "TV").await?;

        Ok(search_result.results.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u32,
    #[serde(default)]
    title: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvResult {
    id: u32,
    #[serde(default)]
    name: Option<String>,
    first_air_date: Option<String>,
}

impl From<TmdbMovieResult> for MovieMatch {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title.unwrap_or_default(),
            release_date: r.release_date.filter(|d| !d.is_empty()),
        }
    }
}

impl From<TmdbTvResult> for SeriesMatch {
    fn from(r: TmdbTvResult) -> Self {
        Self {
            id: r.id,
            name: r.name.unwrap_or_default(),
            first_air_date: r.first_air_date.filter(|d| !d.is_empty()),
        }
    }
}

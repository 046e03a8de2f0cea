//! Mock metadata catalog for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{CatalogError, MetadataCatalog, MovieMatch, SeriesMatch};

/// Mock implementation of the MetadataCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable movie/TV results (in order)
/// - Track queries for assertions
/// - Simulate failures
#[derive(Debug, Default)]
pub struct MockCatalog {
    movies: Arc<RwLock<Vec<MovieMatch>>>,
    series: Arc<RwLock<Vec<SeriesMatch>>>,
    movie_queries: Arc<RwLock<Vec<(String, Option<u32>)>>>,
    tv_queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next operation will fail with this message.
    next_error: Arc<RwLock<Option<String>>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Results returned by every movie search.
    pub async fn set_movies(&self, movies: Vec<MovieMatch>) {
        *self.movies.write().await = movies;
    }

    /// Results returned by every TV search.
    pub async fn set_series(&self, series: Vec<SeriesMatch>) {
        *self.series.write().await = series;
    }

    /// Make the next search fail.
    pub async fn fail_next(&self, message: impl Into<String>) {
        *self.next_error.write().await = Some(message.into());
    }

    /// Movie searches received so far.
    pub async fn movie_queries(&self) -> Vec<(String, Option<u32>)> {
        self.movie_queries.read().await.clone()
    }

    /// TV searches received so far.
    pub async fn tv_queries(&self) -> Vec<String> {
        self.tv_queries.read().await.clone()
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take().map(|message| CatalogError::Api {
            status: 503,
            message,
        })
    }
}

#[async_trait]
impl MetadataCatalog for MockCatalog {
    async fn search_movies(
        &self,
        query: &str,
        year: Option<u32>,
    ) -> Result<Vec<MovieMatch>, CatalogError> {
        self.movie_queries
            .write()
            .await
            .push((query.to_string(), year));

        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        Ok(self.movies.read().await.clone())
    }

    async fn search_tv(&self, query: &str) -> Result<Vec<SeriesMatch>, CatalogError> {
        self.tv_queries.write().await.push(query.to_string());

        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        Ok(self.series.read().await.clone())
    }
}

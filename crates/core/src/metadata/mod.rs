//! Metadata catalog lookups used to correct classifier output.
//!
//! The [`Corrector`] asks a [`MetadataCatalog`] (TMDB in production) for the
//! canonical title and, for movies, the release year. Lookups are
//! best-effort: every failure leaves the record unchanged.

mod corrector;
mod tmdb;
mod types;

pub use corrector::Corrector;
pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::{MovieMatch, SeriesMatch};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying a metadata catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,
}

/// A searchable movie/series catalog.
#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// Search movies by title, optionally filtered by release year.
    async fn search_movies(
        &self,
        query: &str,
        year: Option<u32>,
    ) -> Result<Vec<MovieMatch>, CatalogError>;

    /// Search TV series by title.
    async fn search_tv(&self, query: &str) -> Result<Vec<SeriesMatch>, CatalogError>;
}

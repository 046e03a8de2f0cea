//! Best-effort title and year correction.

use std::sync::Arc;

use tracing::{info, warn};

use super::tmdb::{TmdbClient, TmdbConfig};
use super::{CatalogError, MetadataCatalog};
use crate::media::MediaInfo;
use crate::metrics;

/// Replaces classifier titles with the catalog's canonical ones.
///
/// Without a catalog every call returns its input unchanged.
#[derive(Clone, Default)]
pub struct Corrector {
    catalog: Option<Arc<dyn MetadataCatalog>>,
}

impl Corrector {
    pub fn new(catalog: Arc<dyn MetadataCatalog>) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    /// A corrector that never changes anything.
    pub fn disabled() -> Self {
        Self { catalog: None }
    }

    /// Build from configuration. A missing section or empty key disables correction.
    pub fn from_config(config: Option<&TmdbConfig>) -> Result<Self, CatalogError> {
        match config {
            Some(config) if config.is_configured() => {
                let client = TmdbClient::new(config.clone())?;
                Ok(Self::new(Arc::new(client)))
            }
            _ => Ok(Self::disabled()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.catalog.is_some()
    }

    /// Correct `info` against the catalog. Never fails.
    pub async fn correct(&self, info: MediaInfo) -> MediaInfo {
        let Some(catalog) = &self.catalog else {
            return info;
        };
        let Some(title) = info.title().map(str::to_string) else {
            return info;
        };

        let kind = if info.category.is_movie() { "movie" } else { "tv" };
        info!("Catalog {} search: {} {}", kind, title, info.year);

        let (result, corrected) = if info.category.is_movie() {
            let year = info.year.parse::<u32>().ok();
            match catalog.search_movies(&title, year).await {
                Ok(movies) => match movies.into_iter().next() {
                    Some(movie) => {
                        let mut corrected = info.clone();
                        if let Some(year) = movie.release_year() {
                            corrected = corrected.with_year(year);
                        }
                        apply_name(&mut corrected, &title, &movie.title);
                        (lookup_result(&info, &corrected), corrected)
                    }
                    None => ("not_found", info.clone()),
                },
                Err(e) => {
                    warn!(error = %e, "Catalog movie search failed, keeping classifier result");
                    ("error", info.clone())
                }
            }
        } else {
            match catalog.search_tv(&title).await {
                Ok(series) => match series.into_iter().next() {
                    Some(show) => {
                        let mut corrected = info.clone();
                        apply_name(&mut corrected, &title, &show.name);
                        (lookup_result(&info, &corrected), corrected)
                    }
                    None => ("not_found", info.clone()),
                },
                Err(e) => {
                    warn!(error = %e, "Catalog TV search failed, keeping classifier result");
                    ("error", info.clone())
                }
            }
        };

        if result == "not_found" {
            info!("Catalog has no match for '{}', keeping original title", title);
        }
        metrics::CATALOG_LOOKUPS
            .with_label_values(&[kind, result])
            .inc();

        corrected
    }
}

fn apply_name(info: &mut MediaInfo, original: &str, canonical: &str) {
    let canonical = canonical.trim();
    if !canonical.is_empty() && canonical != original {
        info!("Catalog corrected title: {} -> {}", original, canonical);
        info.title = Some(canonical.to_string());
    }
}

fn lookup_result(before: &MediaInfo, after: &MediaInfo) -> &'static str {
    if before == after {
        "unchanged"
    } else {
        "corrected"
    }
}

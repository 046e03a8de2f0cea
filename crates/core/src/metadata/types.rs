//! Catalog search results.

use serde::{Deserialize, Serialize};

/// A movie search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMatch {
    /// Catalog movie ID.
    pub id: u32,
    /// Localized title.
    pub title: String,
    /// Release date (YYYY-MM-DD), possibly empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl MovieMatch {
    /// The release year, when the release date carries at least four characters.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
    }
}

/// A TV series search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMatch {
    /// Catalog series ID.
    pub id: u32,
    /// Localized name.
    pub name: String,
    /// First air date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
}

//! MediaInfo and Category types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Library category of a media file.
///
/// Decided once by the classifier and never reinterpreted downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Animation (wire code `Anime`). Also what a missing `type` key means.
    #[default]
    Anime,
    /// Feature film (wire code `Movie`).
    Movie,
    /// Documentary (wire code `Doc`).
    Doc,
    /// Live-action series (wire code `TV`).
    Tv,
    /// Anything the model returned that is not one of the codes above.
    Unknown,
}

impl Category {
    /// Parse a category code as returned by the model.
    ///
    /// Matching ignores case and surrounding whitespace; unmapped values
    /// become [`Category::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "anime" => Category::Anime,
            "movie" => Category::Movie,
            "doc" => Category::Doc,
            "tv" => Category::Tv,
            _ => Category::Unknown,
        }
    }

    /// The wire code for this category.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Anime => "Anime",
            Category::Movie => "Movie",
            Category::Doc => "Doc",
            Category::Tv => "TV",
            Category::Unknown => "Unknown",
        }
    }

    /// Movies use the single-file naming scheme; everything else is episodic.
    pub fn is_movie(&self) -> bool {
        matches!(self, Category::Movie)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Category::from_code(&code))
    }
}

/// Structured metadata inferred from a filename.
///
/// Deserialization is deliberately lenient because the input is model
/// output: `year` may be a string or a number, `season`/`episode` may be
/// numbers, numeric strings or null, and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawMediaInfo")]
pub struct MediaInfo {
    /// Display title. Absent or blank means the file is not processed.
    pub title: Option<String>,
    /// Library category.
    #[serde(rename = "type")]
    pub category: Category,
    /// Release year: empty or exactly four digits.
    pub year: String,
    /// Season number (0 when not applicable).
    pub season: u32,
    /// Episode number (0 when not applicable).
    pub episode: u32,
}

impl MediaInfo {
    /// Create a record with the given title and category and no year/season/episode.
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: Some(title.into()),
            category,
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: impl AsRef<str>) -> Self {
        self.year = normalize_year(year.as_ref());
        self
    }

    pub fn with_episode(mut self, season: u32, episode: u32) -> Self {
        self.season = season;
        self.episode = episode;
        self
    }

    /// The title if it is present and not blank.
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn has_title(&self) -> bool {
        self.title().is_some()
    }

    /// Short human-readable label used in log lines, e.g. `[Anime] Title (S4E5)`.
    pub fn label(&self) -> String {
        let title = self.title().unwrap_or("?");
        if self.category.is_movie() {
            if self.year.is_empty() {
                format!("[{}] {}", self.category, title)
            } else {
                format!("[{}] {} ({})", self.category, title, self.year)
            }
        } else {
            format!(
                "[{}] {} (S{}E{})",
                self.category, title, self.season, self.episode
            )
        }
    }
}

/// Keep a year only when it is exactly four ASCII digits.
pub(crate) fn normalize_year(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        raw.to_string()
    } else {
        String::new()
    }
}

/// A JSON scalar the model may emit where we expect a number or string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseScalar {
    fn as_year(&self) -> String {
        match self {
            LooseScalar::Int(n) => normalize_year(&n.to_string()),
            LooseScalar::Float(f) if f.fract() == 0.0 => normalize_year(&(*f as i64).to_string()),
            LooseScalar::Float(_) => String::new(),
            LooseScalar::Text(s) => normalize_year(s),
        }
    }

    fn as_count(&self) -> u32 {
        match self {
            LooseScalar::Int(n) => u32::try_from(*n).unwrap_or(0),
            LooseScalar::Float(f) if *f >= 0.0 && *f <= u32::MAX as f64 => *f as u32,
            LooseScalar::Float(_) => 0,
            LooseScalar::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMediaInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "type")]
    category: Option<String>,
    #[serde(default)]
    year: Option<LooseScalar>,
    #[serde(default)]
    season: Option<LooseScalar>,
    #[serde(default)]
    episode: Option<LooseScalar>,
}

impl From<RawMediaInfo> for MediaInfo {
    fn from(raw: RawMediaInfo) -> Self {
        Self {
            title: raw
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            category: raw
                .category
                .as_deref()
                .map(Category::from_code)
                .unwrap_or_default(),
            year: raw.year.as_ref().map(LooseScalar::as_year).unwrap_or_default(),
            season: raw.season.as_ref().map(LooseScalar::as_count).unwrap_or(0),
            episode: raw.episode.as_ref().map(LooseScalar::as_count).unwrap_or(0),
        }
    }
}

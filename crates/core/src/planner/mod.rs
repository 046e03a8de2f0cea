//! Destination path planning.
//!
//! Pure functions that turn a [`MediaInfo`] into a canonical library path.
//! Nothing here touches the filesystem; two sources mapping onto the same
//! path are a placement-time conflict, not a planning error.
//!
//! ```text
//! Movie:  root/<movie dir>/Title (2023)/Title (2023).mkv
//! Series: root/<category dir>/Title/Season 4/Title - S04E05.mkv
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::media::{Category, MediaInfo};

/// Fallback used when a record reaches the planner without a title.
const UNTITLED: &str = "Unknown";

/// Characters that are invalid in a path component on at least one
/// supported filesystem.
const INVALID_COMPONENT_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Directory names used for each category under the library root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDirs {
    #[serde(default = "default_anime")]
    pub anime: String,
    #[serde(default = "default_movie")]
    pub movie: String,
    #[serde(default = "default_doc")]
    pub doc: String,
    #[serde(default = "default_tv")]
    pub tv: String,
    /// Used for [`Category::Unknown`].
    #[serde(default = "default_other")]
    pub other: String,
}

fn default_anime() -> String {
    "Anime".to_string()
}

fn default_movie() -> String {
    "Movie".to_string()
}

fn default_doc() -> String {
    "Doc".to_string()
}

fn default_tv() -> String {
    "TV".to_string()
}

fn default_other() -> String {
    "Other".to_string()
}

impl Default for CategoryDirs {
    fn default() -> Self {
        Self {
            anime: default_anime(),
            movie: default_movie(),
            doc: default_doc(),
            tv: default_tv(),
            other: default_other(),
        }
    }
}

impl CategoryDirs {
    /// Simplified Chinese directory names.
    pub fn chinese() -> Self {
        Self {
            anime: "动漫".to_string(),
            movie: "电影".to_string(),
            doc: "纪录片".to_string(),
            tv: "电视剧".to_string(),
            other: "其他".to_string(),
        }
    }

    /// Directory name for a category.
    pub fn dir_for(&self, category: Category) -> &str {
        match category {
            Category::Anime => &self.anime,
            Category::Movie => &self.movie,
            Category::Doc => &self.doc,
            Category::Tv => &self.tv,
            Category::Unknown => &self.other,
        }
    }
}

/// Replace every character that is invalid in a path component with `_`.
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || INVALID_COMPONENT_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Plans destination paths inside one library root.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    root: PathBuf,
    dirs: CategoryDirs,
}

impl PathPlanner {
    pub fn new(root: impl Into<PathBuf>, dirs: CategoryDirs) -> Self {
        Self {
            root: root.into(),
            dirs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compute the destination for `info`, keeping the extension of `source`.
    pub fn plan_for_source(&self, info: &MediaInfo, source: &Path) -> PathBuf {
        let extension = source.extension().map(|e| e.to_string_lossy());
        self.plan(info, extension.as_deref())
    }

    /// Compute the destination for `info` with the given file extension
    /// (without the leading dot).
    pub fn plan(&self, info: &MediaInfo, extension: Option<&str>) -> PathBuf {
        let title = sanitize_component(info.title().unwrap_or(UNTITLED));
        let category_dir = self.root.join(self.dirs.dir_for(info.category));

        if info.category.is_movie() {
            let name = if info.year.is_empty() {
                title
            } else {
                format!("{} ({})", title, info.year)
            };
            category_dir
                .join(&name)
                .join(with_extension(&name, extension))
        } else {
            let stem = format!("{} - S{:02}E{:02}", title, info.season, info.episode);
            category_dir
                .join(&title)
                .join(format!("Season {}", info.season))
                .join(with_extension(&stem, extension))
        }
    }
}

fn with_extension(stem: &str, extension: Option<&str>) -> String {
    match extension.filter(|e| !e.is_empty()) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_string(),
    }
}

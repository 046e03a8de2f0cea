//! Which files the watcher and manual import accept.

use std::path::Path;

use super::config::WatchConfig;

/// Extension and name filter built from [`WatchConfig`].
#[derive(Debug, Clone)]
pub struct WatchFilter {
    extensions: Vec<String>,
    ignore_patterns: Vec<String>,
    import_extensions: Vec<String>,
}

impl WatchFilter {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            extensions: lowercase_all(&config.extensions),
            ignore_patterns: config
                .ignore_patterns
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
            import_extensions: lowercase_all(&config.import_extensions),
        }
    }

    /// Whether a watch event for `path` should start a chain.
    ///
    /// The extension must be in the watch list, and the file name must not
    /// contain any ignore pattern (matched case-sensitively).
    pub fn accepts(&self, path: &Path) -> bool {
        if !has_extension(path, &self.extensions) {
            return false;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        !self.ignore_patterns.iter().any(|p| name.contains(p.as_str()))
    }

    /// Whether `path` may be submitted through manual import.
    ///
    /// Ignore patterns do not apply here.
    pub fn accepts_import(&self, path: &Path) -> bool {
        has_extension(path, &self.import_extensions)
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect()
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}

//! Watcher configuration.

use serde::{Deserialize, Serialize};

/// Folder watching and import filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Start watching the source directory when the service starts.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds a file must stay quiet before it is processed.
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,

    /// Extensions picked up by the watcher (case-insensitive, no dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Substrings that exclude a file name from watching (case-sensitive).
    /// Used to skip partial downloads.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Extensions accepted by manual import.
    #[serde(default = "default_import_extensions")]
    pub import_extensions: Vec<String>,

    /// Watch subdirectories too.
    #[serde(default = "default_true")]
    pub recursive: bool,
}

fn default_true() -> bool {
    true
}

fn default_settle_secs() -> u64 {
    2
}

fn default_extensions() -> Vec<String> {
    vec!["mp4".to_string(), "mkv".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    vec!["part".to_string(), "!qB".to_string()]
}

fn default_import_extensions() -> Vec<String> {
    ["mp4", "mkv", "avi", "mov"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            settle_secs: default_settle_secs(),
            extensions: default_extensions(),
            ignore_patterns: default_ignore_patterns(),
            import_extensions: default_import_extensions(),
            recursive: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WatchConfig::default();
        assert!(config.enabled);
        assert_eq!(config.settle_secs, 2);
        assert_eq!(config.extensions, vec!["mp4", "mkv"]);
        assert_eq!(config.ignore_patterns, vec!["part", "!qB"]);
        assert_eq!(config.import_extensions, vec!["mp4", "mkv", "avi", "mov"]);
    }

    #[test]
    fn test_deserialize_overrides() {
        let config: WatchConfig = toml::from_str(
            r#"
            enabled = false
            extensions = ["mkv", "ts"]
            ignore_patterns = []
        "#,
        )
        .unwrap();
        assert!(!config.enabled);
        assert_eq!(config.extensions, vec!["mkv", "ts"]);
        assert!(config.ignore_patterns.is_empty());
        assert_eq!(config.settle_secs, 2);
    }
}

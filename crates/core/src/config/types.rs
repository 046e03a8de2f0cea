use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::classifier::{ClassifierConfig, LlmProvider};
use crate::metadata::TmdbConfig;
use crate::orchestrator::OrganizerConfig;
use crate::placer::PlacementMode;
use crate::planner::CategoryDirs;
use crate::watcher::WatchConfig;

/// Main configuration struct
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub classifier: ClassifierConfig,
    /// Metadata catalog (TMDB). Absent disables title correction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<TmdbConfig>,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub orchestrator: OrganizerConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    8480
}

/// Library layout configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Folder to watch for new downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    /// Library root files are placed under.
    pub target_dir: PathBuf,
    /// Hard link (default) or move.
    #[serde(default)]
    pub mode: PlacementMode,
    /// Directory name per category.
    #[serde(default)]
    pub category_dirs: CategoryDirs,
}

/// Configuration with secrets redacted, for API responses and logs.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub classifier: SanitizedClassifierConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<SanitizedCatalogConfig>,
    pub watch: WatchConfig,
    pub orchestrator: OrganizerConfig,
}

/// Sanitized classifier config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedClassifierConfig {
    pub provider: LlmProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
}

/// Sanitized catalog config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub language: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            library: config.library.clone(),
            classifier: SanitizedClassifierConfig {
                provider: config.classifier.provider,
                api_base: config.classifier.resolved_api_base(),
                model: config.classifier.resolved_model(),
                api_key_configured: !config.classifier.api_key.trim().is_empty(),
                timeout_secs: config.classifier.timeout_secs,
            },
            catalog: config.catalog.as_ref().map(|c| SanitizedCatalogConfig {
                base_url: c.base_url.clone(),
                language: c.language.clone(),
                api_key_configured: c.is_configured(),
                timeout_secs: c.timeout_secs,
            }),
            watch: config.watch.clone(),
            orchestrator: config.orchestrator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[library]
target_dir = "/library"

[classifier]
provider = "deep_seek"
api_key = "sk-secret"
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.server.port, 8480);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.library.mode, PlacementMode::HardLink);
        assert_eq!(config.library.category_dirs, CategoryDirs::default());
        assert!(config.library.source_dir.is_none());
        assert!(config.catalog.is_none());
        assert!(config.watch.enabled);
        assert_eq!(config.orchestrator.max_concurrent_classifications, 4);
    }

    #[test]
    fn test_sanitized_config_hides_keys() {
        let toml = format!(
            "{}\n[catalog]\napi_key = \"tmdb-secret\"\n",
            MINIMAL
        );
        let config: Config = toml::from_str(&toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!json.contains("tmdb-secret"));
        assert!(sanitized.classifier.api_key_configured);
        assert_eq!(sanitized.classifier.model.as_deref(), Some("deepseek-chat"));
        assert!(sanitized.catalog.unwrap().api_key_configured);
    }

    #[test]
    fn test_chinese_category_dirs_from_toml() {
        let toml = r#"
[library]
target_dir = "/library"
mode = "move"

[library.category_dirs]
anime = "动漫"
movie = "电影"
doc = "纪录片"
tv = "电视剧"
other = "其他"

[classifier]
api_base = "https://example.com/v1"
model = "m"
api_key = "k"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.library.mode, PlacementMode::Move);
        assert_eq!(config.library.category_dirs, CategoryDirs::chinese());
    }
}

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Library target directory is set
/// - Classifier endpoint, model and key resolve to non-empty values
/// - Watching is only enabled with a source directory
/// - Source and target directories do not nest (a recursive watch would
///   pick up every placed file again)
/// - A configured catalog section has a language
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    // Library validation
    if config.library.target_dir.as_os_str().is_empty() {
        return Err(invalid("library.target_dir is required"));
    }
    if let Some(source) = &config.library.source_dir {
        if source == &config.library.target_dir {
            return Err(invalid("library.source_dir and library.target_dir must differ"));
        }
    }

    // Classifier validation
    let classifier = &config.classifier;
    if classifier.resolved_api_base().is_none() {
        return Err(invalid(format!(
            "classifier.api_base is required for provider '{}'",
            classifier.provider.name()
        )));
    }
    if classifier.resolved_model().is_none() {
        return Err(invalid(format!(
            "classifier.model is required for provider '{}'",
            classifier.provider.name()
        )));
    }
    if classifier.api_key.trim().is_empty() {
        return Err(invalid("classifier.api_key is required"));
    }

    // Watch validation
    if config.watch.enabled && config.library.source_dir.is_none() {
        return Err(invalid("watch.enabled requires library.source_dir"));
    }
    if let Some(source) = &config.library.source_dir {
        let target = &config.library.target_dir;
        if config.watch.recursive && target.starts_with(source) {
            return Err(invalid(
                "library.target_dir cannot be inside library.source_dir while watch.recursive is set",
            ));
        }
        if source.starts_with(target) {
            return Err(invalid("library.source_dir cannot be inside library.target_dir"));
        }
    }

    // Catalog validation
    if let Some(catalog) = &config.catalog {
        if catalog.is_configured() && catalog.language.trim().is_empty() {
            return Err(invalid("catalog.language cannot be empty"));
        }
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn config(extra: &str) -> Config {
        let toml = format!(
            r#"
[library]
source_dir = "/downloads"
target_dir = "/library"

[classifier]
provider = "deep_seek"
api_key = "sk-test"
{extra}
"#
        );
        load_config_from_str(&toml).unwrap()
    }

    fn assert_invalid(config: &Config, needle: &str) {
        match validate_config(config) {
            Err(ConfigError::ValidationError(message)) => {
                assert!(message.contains(needle), "{message}")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config("")).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut c = config("");
        c.server.port = 0;
        assert_invalid(&c, "server.port");
    }

    #[test]
    fn test_validate_empty_target_fails() {
        let mut c = config("");
        c.library.target_dir = Default::default();
        assert_invalid(&c, "target_dir");
    }

    #[test]
    fn test_validate_custom_provider_needs_base_and_model() {
        let mut c = config("");
        c.classifier.provider = crate::classifier::LlmProvider::Custom;
        assert_invalid(&c, "api_base");

        c.classifier.api_base = Some("https://llm.example.com/v1".to_string());
        assert_invalid(&c, "model");

        c.classifier.model = Some("qwen".to_string());
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn test_validate_missing_api_key() {
        let mut c = config("");
        c.classifier.api_key = "  ".to_string();
        assert_invalid(&c, "api_key");
    }

    #[test]
    fn test_validate_watch_requires_source() {
        let mut c = config("");
        c.library.source_dir = None;
        assert_invalid(&c, "source_dir");

        c.watch.enabled = false;
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn test_validate_same_source_and_target() {
        let mut c = config("");
        c.library.source_dir = Some(c.library.target_dir.clone());
        assert_invalid(&c, "must differ");
    }

    #[test]
    fn test_validate_library_inside_recursive_watch_fails() {
        let mut c = config("");
        c.library.target_dir = "/downloads/library".into();
        assert_invalid(&c, "inside library.source_dir");

        c.watch.recursive = false;
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn test_validate_source_inside_library_fails() {
        let mut c = config("");
        c.library.source_dir = Some("/library/incoming".into());
        assert_invalid(&c, "inside library.target_dir");
    }

    #[test]
    fn test_validate_sibling_prefix_is_not_nested() {
        let mut c = config("");
        c.library.target_dir = "/downloads-library".into();
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn test_validate_catalog_language() {
        let c = config("[catalog]\napi_key = \"k\"\nlanguage = \"\"");
        assert_invalid(&c, "catalog.language");
    }
}

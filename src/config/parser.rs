use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Missing sections and keys fall back to their defaults, so a partial (or
/// empty) TOML file is valid as long as the values it does set pass
/// validation.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-depth = 2
max-pages = 50
timeout = 10
polite-delay = 250
allow-subdomains = false

[user-agent]
crawler-name = "TestSweep"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[classifier]
enable-fallback = false
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.max_pages, 50);
        assert!(!config.crawler.allow_subdomains);
        assert_eq!(config.user_agent.crawler_name, "TestSweep");
        assert!(!config.classifier.enable_fallback);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert!(config.crawler.allow_subdomains);
        assert!(config.crawler.respect_robots);
        assert!(config.classifier.enable_fallback);
        assert_eq!(config.user_agent.crawler_name, "docsweep");
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let file = create_temp_config("[crawler]\nmax-depth = 7\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 7);
        assert_eq!(config.crawler.max_pages, 500);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\ntimeout = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = create_temp_config("[crawler]\nmax-deth = 3\n");
        assert!(load_config(file.path()).is_err());
    }
}

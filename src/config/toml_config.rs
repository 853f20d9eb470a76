use crate::adapters::http::DEFAULT_API_BASE_URL;
use crate::core::batch_fetcher::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use crate::core::catalog::{DEFAULT_GENERATION, MAX_GENERATION, MIN_GENERATION};
use crate::core::ConfigProvider;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{
    validate_formats, validate_path, validate_positive_number, validate_range, validate_url,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    pub generation: Option<u32>,
    pub batch_size: Option<usize>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    #[serde(default)]
    pub compress: bool,
}

fn default_output_formats() -> Vec<String> {
    vec!["json".to_string(), "csv".to_string()]
}

fn env_placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| CatalogError::ConfigError {
                message: format!(
                    "Cannot read config file '{}': {}",
                    path.as_ref().display(),
                    e
                ),
            })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string, after `${VAR}` substitution
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // unknown variables are left as-is
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn set_generation(&mut self, generation: u32) {
        self.fetch.generation = Some(generation);
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        self.source
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    fn generation(&self) -> u32 {
        self.fetch.generation.unwrap_or(DEFAULT_GENERATION)
    }

    fn batch_size(&self) -> usize {
        self.fetch.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    fn retry_attempts(&self) -> u32 {
        self.fetch.retry_attempts.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    fn retry_delay(&self) -> Duration {
        self.fetch
            .retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_DELAY)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress_output(&self) -> bool {
        self.load.compress
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source.base_url", self.api_base_url())?;
        validate_range(
            "fetch.generation",
            self.generation(),
            MIN_GENERATION,
            MAX_GENERATION,
        )?;
        validate_positive_number("fetch.batch_size", self.batch_size(), 1)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validate_range("source.timeout_seconds", timeout, 1, u64::MAX)?;
        }
        validate_path("load.output_path", &self.load.output_path)?;
        validate_formats(
            "load.output_formats",
            &self.load.output_formats,
            &super::SUPPORTED_FORMATS,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[load]
output_path = "./catalog"
"#,
        )
        .unwrap();

        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.generation(), 2);
        assert_eq!(config.batch_size(), 5);
        assert_eq!(config.retry_attempts(), 2);
        assert_eq!(config.retry_delay(), Duration::from_millis(500));
        assert_eq!(config.output_formats(), ["json", "csv"]);
        assert!(!config.compress_output());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
base_url = "http://localhost:9000/api/v2"
timeout_seconds = 10

[fetch]
generation = 5
batch_size = 8
retry_attempts = 4
retry_delay_ms = 250

[load]
output_path = "/tmp/dex"
output_formats = ["csv"]
compress = true
"#,
        )
        .unwrap();

        assert_eq!(config.api_base_url(), "http://localhost:9000/api/v2");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.generation(), 5);
        assert_eq!(config.batch_size(), 8);
        assert_eq!(config.retry_attempts(), 4);
        assert_eq!(config.retry_delay(), Duration::from_millis(250));
        assert!(config.compress_output());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("DEX_CATALOG_TEST_OUTPUT", "/tmp/from-env");
        let config = TomlConfig::from_toml_str(
            r#"
[load]
output_path = "${DEX_CATALOG_TEST_OUTPUT}"
"#,
        )
        .unwrap();

        assert_eq!(config.output_path(), "/tmp/from-env");
    }

    #[test]
    fn test_unknown_env_var_is_left_untouched() {
        let config = TomlConfig::from_toml_str(
            r#"
[load]
output_path = "${DEX_CATALOG_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();

        assert_eq!(config.output_path(), "${DEX_CATALOG_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[load\noutput_path = 1");
        assert!(matches!(
            result,
            Err(CatalogError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = TomlConfig::from_file("/nonexistent/dex-catalog.toml");
        match result {
            Err(CatalogError::ConfigError { message }) => {
                assert!(message.contains("/nonexistent/dex-catalog.toml"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
timeout_seconds = 0

[load]
output_path = "./out"
"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(CatalogError::InvalidConfigValueError { ref field, .. }) if field == "source.timeout_seconds"
        ));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[fetch]
batch_size = 0

[load]
output_path = "./out"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        config.fetch.batch_size = Some(3);
        config.set_generation(11);
        assert!(config.validate().is_err());

        config.set_generation(9);
        assert!(config.validate().is_ok());
    }
}

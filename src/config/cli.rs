use crate::core::catalog::{MAX_GENERATION, MIN_GENERATION};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_formats, validate_path, validate_positive_number, validate_range, validate_url,
    Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "dex-catalog")]
#[command(about = "Fetch the Pokémon of one generation and export them as a catalog")]
pub struct CliConfig {
    #[arg(long, default_value = "https://pokeapi.co/api/v2")]
    pub api_base_url: String,

    #[arg(short, long, default_value = "2")]
    pub generation: u32,

    #[arg(long, default_value = "5")]
    pub batch_size: usize,

    #[arg(long, default_value = "2", help = "Additional attempts per species")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "500")]
    pub retry_delay_ms: u64,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json,csv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle the outputs into a single ZIP archive")]
    pub compress: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn generation(&self) -> u32 {
        self.generation
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compress_output(&self) -> bool {
        self.compress
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_range("generation", self.generation, MIN_GENERATION, MAX_GENERATION)?;
        validate_positive_number("batch_size", self.batch_size, 1)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, u64::MAX)?;
        }
        validate_path("output_path", &self.output_path)?;
        validate_formats("formats", &self.formats, &super::SUPPORTED_FORMATS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["dex-catalog"]);

        assert_eq!(config.api_base_url(), "https://pokeapi.co/api/v2");
        assert_eq!(config.generation(), 2);
        assert_eq!(config.batch_size(), 5);
        assert_eq!(config.retry_attempts(), 2);
        assert_eq!(config.retry_delay(), Duration::from_millis(500));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.output_formats(), ["json", "csv"]);
        assert!(!config.compress_output());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = CliConfig::parse_from([
            "dex-catalog",
            "--generation",
            "4",
            "--batch-size",
            "10",
            "--formats",
            "csv",
            "--timeout-seconds",
            "3",
            "--compress",
        ]);

        assert_eq!(config.generation(), 4);
        assert_eq!(config.batch_size(), 10);
        assert_eq!(config.output_formats(), ["csv"]);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));
        assert!(config.compress_output());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_batch = CliConfig::parse_from(["dex-catalog", "--batch-size", "0"]);
        assert!(zero_batch.validate().is_err());

        let bad_generation = CliConfig::parse_from(["dex-catalog", "--generation", "12"]);
        assert!(bad_generation.validate().is_err());

        let bad_format = CliConfig::parse_from(["dex-catalog", "--formats", "json,xml"]);
        assert!(bad_format.validate().is_err());

        let zero_timeout = CliConfig::parse_from(["dex-catalog", "--timeout-seconds", "0"]);
        assert!(zero_timeout.validate().is_err());
    }
}

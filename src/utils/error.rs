use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Failed to fetch roster for generation {generation} (HTTP {status})")]
    RosterFetchError { generation: u32, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::ApiError(_)
            | CatalogError::HttpStatusError { .. }
            | CatalogError::RosterFetchError { .. } => ErrorCategory::Network,
            CatalogError::ConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. }
            | CatalogError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CatalogError::CsvError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::ProcessingError { .. } => ErrorCategory::Data,
            CatalogError::ZipError(_) | CatalogError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CatalogError::RosterFetchError { generation, .. } => format!(
                "Check that generation {} exists and that the API is reachable, then retry",
                generation
            ),
            CatalogError::ApiError(_) | CatalogError::HttpStatusError { .. } => {
                "Check network connectivity and the API base URL, then retry".to_string()
            }
            CatalogError::InvalidConfigValueError { field, .. }
            | CatalogError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' in your configuration", field)
            }
            CatalogError::MissingConfigError { field } => {
                format!("Add '{}' to your configuration", field)
            }
            CatalogError::ConfigError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            CatalogError::CsvError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::ProcessingError { .. } => {
                "The API returned data that could not be processed; rerun with --verbose"
                    .to_string()
            }
            CatalogError::ZipError(_) | CatalogError::IoError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Failed to load pokemon: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not process catalog data: {}", self),
            ErrorCategory::System => format!("Could not write catalog output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

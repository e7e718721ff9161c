//! Configuration validation for eol-scanner.
//!
//! Provides validation traits and implementations for all configuration types.

use super::defaults::MAX_FORWARD_LOOKUP_DAYS;
use crate::error::EolScanError;
use super::types::{AppConfig, DatabaseConfig, OutputConfig, ScanConfig, SyncConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Fold every validation error into one [`EolScanError::Config`].
    fn ensure_valid(&self) -> crate::Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(EolScanError::config(details.join("; ")))
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.database.validate());
        errors.extend(self.sync.validate());
        errors.extend(self.scan.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for DatabaseConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_age_duration().is_none() {
            errors.push(ConfigError::new(
                "database.max_age",
                format!(
                    "Invalid duration '{}'. Expected format like 30s, 12h, 7d",
                    self.max_age
                ),
            ));
        }
        if let Some(path) = &self.path
            && path.as_os_str().is_empty()
        {
            errors.push(ConfigError::new("database.path", "Path must not be empty"));
        }
        errors
    }
}

impl Validatable for SyncConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.categories.is_empty() {
            errors.push(ConfigError::new(
                "sync.categories",
                "At least one category is required",
            ));
        }
        if self.categories.iter().any(|c| c.trim().is_empty()) {
            errors.push(ConfigError::new(
                "sync.categories",
                "Category names must not be empty",
            ));
        }
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "sync.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            errors.push(ConfigError::new(
                "sync.base_url",
                format!("Base URL must use http or https, got '{}'", self.base_url),
            ));
        }
        errors
    }
}

impl Validatable for ScanConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.forward_lookup_days > MAX_FORWARD_LOOKUP_DAYS {
            errors.push(ConfigError::new(
                "scan.forward_lookup_days",
                format!(
                    "Must be at most {MAX_FORWARD_LOOKUP_DAYS} days, got {}",
                    self.forward_lookup_days
                ),
            ));
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(file_path) = &self.file
            && let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ConfigError::new(
                "output.file",
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_ensure_valid_reports_config_error() {
        assert!(AppConfig::default().ensure_valid().is_ok());

        let mut config = AppConfig::default();
        config.sync.timeout_secs = 0;
        config.database.max_age = "a week".to_string();
        match config.ensure_valid() {
            Err(EolScanError::Config(msg)) => {
                assert!(msg.starts_with("database.max_age: "), "{msg}");
                assert!(msg.contains("; sync.timeout_secs: "), "{msg}");
            }
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_max_age() {
        let config = DatabaseConfig {
            max_age: "a week".to_string(),
            ..Default::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "database.max_age");
    }

    #[test]
    fn test_sync_validation() {
        let config = SyncConfig {
            categories: Vec::new(),
            timeout_secs: 0,
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            ["sync.categories", "sync.timeout_secs", "sync.base_url"]
        );
    }

    #[test]
    fn test_forward_lookup_bound() {
        let mut config = ScanConfig {
            forward_lookup_days: MAX_FORWARD_LOOKUP_DAYS,
            ..Default::default()
        };
        assert!(config.is_valid());
        config.forward_lookup_days += 1;
        assert!(!config.is_valid());
    }

    #[test]
    fn test_output_file_parent_must_exist() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/report.json")),
            ..Default::default()
        };
        assert!(!config.is_valid());

        let config = OutputConfig {
            file: Some(PathBuf::from("report.json")),
            ..Default::default()
        };
        assert!(config.is_valid());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::new("sync.timeout_secs", "too small");
        assert_eq!(err.to_string(), "sync.timeout_secs: too small");
    }
}

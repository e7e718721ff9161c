//! Configuration module for eol-scanner.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use eol_scanner::config::{AppConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::CiCd);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .max_age("12h")
//!     .forward_lookup_days(30)
//!     .build();
//!
//! // Load from file
//! use eol_scanner::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.eol-scanner.yaml` file in your project root or `~/.config/eol-scanner/`:
//!
//! ```yaml
//! database:
//!   max_age: 3d
//! scan:
//!   forward_lookup_days: 180
//!   only_eol: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

// Re-export main types
pub use defaults::{
    ConfigPreset, DEFAULT_FORWARD_LOOKUP_DAYS, DEFAULT_MAX_AGE, DEFAULT_TIMEOUT_SECS,
    MAX_FORWARD_LOOKUP_DAYS,
};
pub use types::{
    AppConfig, AppConfigBuilder, DatabaseConfig, OutputConfig, ScanConfig, SyncConfig,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, user_config_dir, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.eol-scanner.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();
        let properties = value["properties"].as_object().unwrap();
        for section in ["database", "sync", "scan", "output"] {
            assert!(properties.contains_key(section), "missing {section}");
        }
    }
}

//! Configuration types for eol-scanner operations.

use crate::reports::ReportFormat;
use crate::scan::ScanOptions;
use crate::source::{EndOfLifeConfig, DEFAULT_BASE_URL};
use crate::sync::{default_categories, SyncOptions};
use crate::utils::parse_duration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::{DEFAULT_FORWARD_LOOKUP_DAYS, DEFAULT_MAX_AGE, DEFAULT_TIMEOUT_SECS};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are merged over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog database location and freshness
    pub database: DatabaseConfig,
    /// Upstream sync settings
    pub sync: SyncConfig,
    /// Scan behavior
    pub scan: ScanConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Database path, falling back to the platform default.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(crate::store::default_db_path)
    }

    /// Scanner options derived from this config.
    ///
    /// An unparsable `max_age` falls back to the default; run validation
    /// first to surface it.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            forward_lookup_days: self.scan.forward_lookup_days,
            auto_update: self.scan.auto_update,
            max_age: self.database.max_age_duration().unwrap_or(DEFAULT_MAX_AGE),
            categories: self.sync.categories.clone(),
            sync: self.sync.options(),
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with a fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the database path.
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database.path = Some(path.into());
        self
    }

    /// Set the maximum catalog age, e.g. `7d`.
    pub fn max_age(mut self, max_age: impl Into<String>) -> Self {
        self.config.database.max_age = max_age.into();
        self
    }

    /// Set the categories to sync.
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.config.sync.categories = categories;
        self
    }

    /// Set the forward lookup window in days.
    pub const fn forward_lookup_days(mut self, days: u32) -> Self {
        self.config.scan.forward_lookup_days = days;
        self
    }

    /// Enable or disable automatic catalog updates before scans.
    pub const fn auto_update(mut self, enabled: bool) -> Self {
        self.config.scan.auto_update = enabled;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Configurations
// ============================================================================

/// Catalog database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file (default: `<data dir>/eol-scanner/eol.db`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Age after which the catalog is considered stale, e.g. `12h` or `7d`
    pub max_age: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_age: "7d".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Parsed `max_age`, or `None` if it is not a valid duration.
    #[must_use]
    pub fn max_age_duration(&self) -> Option<Duration> {
        parse_duration(&self.max_age).ok()
    }
}

/// Upstream sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SyncConfig {
    /// Categories to sync
    pub categories: Vec<String>,
    /// endoflife.date base URL
    pub base_url: String,
    /// Request timeout in seconds
    #[schemars(range(min = 1))]
    pub timeout_secs: u64,
    /// Remove identifiers that upstream no longer lists
    pub prune_identifiers: bool,
    /// Sync from a local snapshot file instead of the network
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            prune_identifiers: false,
            snapshot: None,
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub const fn options(&self) -> SyncOptions {
        SyncOptions {
            prune_identifiers: self.prune_identifiers,
        }
    }

    /// HTTP client settings for the endoflife.date source.
    #[must_use]
    pub fn client_config(&self) -> EndOfLifeConfig {
        EndOfLifeConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..EndOfLifeConfig::default()
        }
    }
}

/// Scan behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScanConfig {
    /// Days ahead within which a component counts as EOL soon
    #[schemars(range(max = 3650))]
    pub forward_lookup_days: u32,
    /// Sync automatically when the catalog is stale
    pub auto_update: bool,
    /// Only report EOL and EOL-soon components
    pub only_eol: bool,
    /// Exit with code 2 when an EOL component is found
    pub fail_on_eol: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            forward_lookup_days: DEFAULT_FORWARD_LOOKUP_DAYS,
            auto_update: true,
            only_eol: false,
            fail_on_eol: false,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.max_age, "7d");
        assert_eq!(config.scan.forward_lookup_days, 90);
        assert!(config.scan.auto_update);
        assert_eq!(config.sync.categories, default_categories());
        assert_eq!(config.sync.base_url, "https://endoflife.date");
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .db_path("/tmp/eol.db")
            .max_age("12h")
            .forward_lookup_days(30)
            .auto_update(false)
            .output_format(ReportFormat::Json)
            .build();
        assert_eq!(config.db_path(), PathBuf::from("/tmp/eol.db"));
        let options = config.scan_options();
        assert_eq!(options.forward_lookup_days, 30);
        assert!(!options.auto_update);
        assert_eq!(options.max_age, Duration::from_secs(12 * 3600));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml_ng::from_str("scan:\n  only_eol: true\n").unwrap();
        assert!(config.scan.only_eol);
        assert_eq!(config.scan.forward_lookup_days, 90);
        assert_eq!(config.sync.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_client_config() {
        let sync = SyncConfig {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        let client = sync.client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(
            client.products_url(),
            "http://localhost:8080/api/v1/products/full"
        );
    }
}

//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::{ConfigPreset, DEFAULT_FORWARD_LOOKUP_DAYS, DEFAULT_TIMEOUT_SECS};
use super::types::{AppConfig, DatabaseConfig, SyncConfig};
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".eol-scanner.yaml",
    ".eol-scanner.yml",
    "eol-scanner.yaml",
    "eol-scanner.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/eol-scanner/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // 1. Use explicit path if provided
    if let Some(path) = explicit_path
        && path.exists()
    {
        return Some(path.to_path_buf());
    }

    // 2. Search current directory
    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    // 3. Search git root (if in a repo)
    if let Some(git_root) = find_git_root()
        && let Some(path) = find_config_in_dir(&git_root)
    {
        return Some(path);
    }

    // 4. Search user config directory
    if let Some(dir) = user_config_dir()
        && let Some(path) = find_config_in_dir(&dir)
    {
        return Some(path);
    }

    // 5. Search home directory
    if let Some(home) = dirs::home_dir()
        && let Some(path) = find_config_in_dir(&home)
    {
        return Some(path);
    }

    None
}

/// Per-user config directory, e.g. `~/.config/eol-scanner`.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("eol-scanner"))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Fields of `other` still at their default value are treated as unset.
    /// This is useful for layering CLI args over file config.
    pub fn merge(&mut self, other: &Self) {
        let database = DatabaseConfig::default();
        let sync = SyncConfig::default();

        // Database config
        if other.database.path.is_some() {
            self.database.path.clone_from(&other.database.path);
        }
        if other.database.max_age != database.max_age {
            self.database.max_age.clone_from(&other.database.max_age);
        }

        // Sync config
        if other.sync.categories != sync.categories {
            self.sync.categories.clone_from(&other.sync.categories);
        }
        if other.sync.base_url != sync.base_url {
            self.sync.base_url.clone_from(&other.sync.base_url);
        }
        if other.sync.timeout_secs != DEFAULT_TIMEOUT_SECS {
            self.sync.timeout_secs = other.sync.timeout_secs;
        }
        if other.sync.prune_identifiers {
            self.sync.prune_identifiers = true;
        }
        if other.sync.snapshot.is_some() {
            self.sync.snapshot.clone_from(&other.sync.snapshot);
        }

        // Scan config
        if other.scan.forward_lookup_days != DEFAULT_FORWARD_LOOKUP_DAYS {
            self.scan.forward_lookup_days = other.scan.forward_lookup_days;
        }
        if !other.scan.auto_update {
            self.scan.auto_update = false;
        }
        if other.scan.only_eol {
            self.scan.only_eol = true;
        }
        if other.scan.fail_on_eol {
            self.scan.fail_on_eol = true;
        }

        // Output config - only override if explicitly set
        if other.output.format != ReportFormat::Auto {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate config file content for a preset.
#[must_use]
pub fn generate_example_config(preset: ConfigPreset) -> String {
    let example = AppConfig::from_preset(preset);
    format!(
        r"# eol-scanner Configuration ({} preset: {})
# Place this file at .eol-scanner.yaml in your project root or ~/.config/eol-scanner/

{}",
        preset.name(),
        preset.description(),
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# eol-scanner Configuration File
# ===============================
#
# Place it at:
#   - .eol-scanner.yaml in your project root
#   - ~/.config/eol-scanner/eol-scanner.yaml for global config
#
# CLI arguments always override file settings.

# Catalog database
database:
  # Database file (default: <data dir>/eol-scanner/eol.db)
  # path: ./eol.db
  # Re-sync when the last full sync is older than this (30s, 12h, 7d, 2w)
  max_age: 7d

# Upstream sync
sync:
  # endoflife.date categories to pull
  categories:
    - framework
    - lang
    - os
    - database
    - server-app
  base_url: https://endoflife.date
  # Request timeout in seconds
  timeout_secs: 120
  # Remove identifiers that upstream no longer lists
  prune_identifiers: false
  # Sync from a saved API response instead of the network
  # snapshot: ./products-full.json

# Scanning
scan:
  # Components whose EOL falls within this many days are 'eol_soon'
  forward_lookup_days: 90
  # Sync automatically when the catalog is stale
  auto_update: true
  # Only report EOL and EOL-soon components
  only_eol: false
  # Exit with code 2 when an EOL component is found
  fail_on_eol: false

# Output configuration
output:
  # Format: auto, table, summary, json
  format: auto
  # Output file path (omit for stdout)
  # file: report.json
  # Disable colored output
  no_color: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".eol-scanner.yaml");
        std::fs::write(&config_path, "scan:\n  only_eol: true\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_dotfile() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("eol-scanner.yml"), "").unwrap();
        std::fs::write(tmp.path().join(".eol-scanner.yml"), "").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(tmp.path().join(".eol-scanner.yml")));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
database:
  max_age: 12h
sync:
  categories: [lang]
scan:
  forward_lookup_days: 30
output:
  format: json
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.database.max_age, "12h");
        assert_eq!(config.sync.categories, vec!["lang".to_string()]);
        assert_eq!(config.scan.forward_lookup_days, 30);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.scan.auto_update);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "scan: [not, a, map]\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::default();
        base.sync.categories = vec!["lang".to_string()];
        base.scan.forward_lookup_days = 60;

        let overrides = AppConfig::builder()
            .auto_update(false)
            .output_format(ReportFormat::Summary)
            .db_path("/tmp/eol.db")
            .build();
        base.merge(&overrides);

        // Unset override fields leave the file values alone
        assert_eq!(base.sync.categories, vec!["lang".to_string()]);
        assert_eq!(base.scan.forward_lookup_days, 60);
        assert!(!base.scan.auto_update);
        assert_eq!(base.output.format, ReportFormat::Summary);
        assert_eq!(base.database.path, Some(PathBuf::from("/tmp/eol.db")));
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config(ConfigPreset::Default);
        assert!(example.contains("database:"));
        assert!(example.contains("forward_lookup_days"));

        let ci = generate_example_config(ConfigPreset::CiCd);
        assert!(ci.contains("ci-cd preset"));
        let parsed: AppConfig = serde_yaml_ng::from_str(&ci).unwrap();
        assert_eq!(parsed, AppConfig::ci_cd_preset());
    }

    #[test]
    fn test_full_example_config_parses() {
        let config: AppConfig = serde_yaml_ng::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "scan:\n  only_eol: true").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}

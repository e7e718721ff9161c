//! Default configurations and presets for eol-scanner.
//!
//! Provides named presets for common use cases and default values.

use super::types::{AppConfig, OutputConfig, ScanConfig};
use crate::reports::ReportFormat;
use std::time::Duration;

// ============================================================================
// Default Values
// ============================================================================

/// Default window for the EOL-soon classification.
pub const DEFAULT_FORWARD_LOOKUP_DAYS: u32 = crate::evaluate::DEFAULT_FORWARD_LOOKUP_DAYS;

/// Default age after which the catalog is re-synced.
pub const DEFAULT_MAX_AGE: Duration = crate::sync::DEFAULT_MAX_AGE;

/// Default upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Upper bound accepted for `scan.forward_lookup_days`.
pub const MAX_FORWARD_LOOKUP_DAYS: u32 = 3650;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Interactive use: table output, automatic catalog refresh
    Default,
    /// CI/CD: JSON output, only EOL findings, fail when EOL is found
    CiCd,
    /// Air-gapped: never contact upstream during scans
    Offline,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CiCd => "ci-cd",
            Self::Offline => "offline",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "ci-cd" | "ci" | "pipeline" => Some(Self::CiCd),
            "offline" | "air-gapped" => Some(Self::Offline),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Table output with automatic catalog refresh",
            Self::CiCd => "Machine-readable EOL findings that fail the pipeline",
            Self::Offline => "Scan against the local catalog without network access",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::CiCd, Self::Offline]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::CiCd => Self::ci_cd_preset(),
            ConfigPreset::Offline => Self::offline_preset(),
        }
    }

    /// CI/CD pipeline preset.
    ///
    /// - JSON output for machine parsing
    /// - Only EOL and EOL-soon components
    /// - Exit code 2 on EOL findings
    #[must_use]
    pub fn ci_cd_preset() -> Self {
        Self {
            scan: ScanConfig {
                only_eol: true,
                fail_on_eol: true,
                ..ScanConfig::default()
            },
            output: OutputConfig {
                format: ReportFormat::Json,
                file: None,
                no_color: true,
            },
            ..Self::default()
        }
    }

    /// Offline preset: automatic updates are disabled.
    #[must_use]
    pub fn offline_preset() -> Self {
        Self {
            scan: ScanConfig {
                auto_update: false,
                ..ScanConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
        assert_eq!(ConfigPreset::from_name("CI"), Some(ConfigPreset::CiCd));
        assert_eq!(ConfigPreset::from_name("strict"), None);
    }

    #[test]
    fn test_ci_cd_preset() {
        let config = AppConfig::from_preset(ConfigPreset::CiCd);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.scan.only_eol);
        assert!(config.scan.fail_on_eol);
        assert!(config.scan.auto_update);
    }

    #[test]
    fn test_offline_preset() {
        let config = AppConfig::from_preset(ConfigPreset::Offline);
        assert!(!config.scan.auto_update);
        assert_eq!(config.output.format, ReportFormat::Auto);
    }
}

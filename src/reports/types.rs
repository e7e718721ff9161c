//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: table if TTY, JSON otherwise
    #[default]
    Auto,
    /// Compact table for terminal (colored)
    Table,
    /// Brief summary output
    Summary,
    /// Structured JSON output
    Json,
}

impl ReportFormat {
    /// Resolve `Auto` against whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, is_tty: bool) -> Self {
        match self {
            Self::Auto if is_tty => Self::Table,
            Self::Auto => Self::Json,
            other => other,
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Auto => write!(f, "auto"),
            ReportFormat::Table => write!(f, "table"),
            ReportFormat::Summary => write!(f, "summary"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Only list components that are EOL or EOL soon
    pub only_attention: bool,
    /// Maximum rows per section
    pub max_items: Option<usize>,
    /// Title for the report
    pub title: Option<String>,
}

impl ReportConfig {
    /// Config that lists only EOL and EOL-soon components
    #[must_use]
    pub fn attention_only() -> Self {
        Self {
            only_attention: true,
            ..Default::default()
        }
    }

    /// Row cap for a section of `len` rows.
    #[must_use]
    pub fn limit(&self, len: usize) -> usize {
        self.max_items.map_or(len, |max| max.min(len))
    }
}

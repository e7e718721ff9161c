//! EOL classification results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// End-of-life status classification for components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EolStatus {
    /// Supported, or EOL beyond the forward window
    Active,
    /// EOL falls within the forward window
    EolSoon,
    /// EOL date has passed or the cycle is flagged EOL
    Eol,
    /// No product or cycle match, or no usable EOL data
    #[default]
    Unknown,
}

impl EolStatus {
    /// Get display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::EolSoon => "EOL Soon",
            Self::Eol => "EOL",
            Self::Unknown => "Unknown",
        }
    }

    /// Get severity weight (higher = worse)
    #[must_use]
    pub const fn severity(&self) -> u8 {
        match self {
            Self::Active => 1,
            Self::Unknown => 0,
            Self::EolSoon => 2,
            Self::Eol => 3,
        }
    }

    /// EOL or EOL soon.
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        matches!(self, Self::Eol | Self::EolSoon)
    }
}

impl fmt::Display for EolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of evaluating a version against a product's cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: EolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eol_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_eol: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_cycle: Option<String>,
    pub is_lts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
}

impl Evaluation {
    /// An evaluation with no match.
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&EolStatus::EolSoon).unwrap(), "\"eol_soon\"");
        assert_eq!(serde_json::to_string(&EolStatus::Eol).unwrap(), "\"eol\"");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(EolStatus::Eol.severity() > EolStatus::EolSoon.severity());
        assert!(EolStatus::EolSoon.severity() > EolStatus::Active.severity());
        assert!(EolStatus::Eol.needs_attention());
        assert!(!EolStatus::Unknown.needs_attention());
    }
}

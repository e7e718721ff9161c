//! Scan results.

use crate::model::{EolStatus, Evaluation};
use crate::resolve::MatchStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// EOL result for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentResult {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub purl: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub status: EolStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eol_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_until_eol: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_strategy: Option<MatchStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    #[serde(default)]
    pub is_lts: bool,
}

impl ComponentResult {
    /// Copy evaluation fields onto this result.
    pub(crate) fn apply(&mut self, eval: Evaluation) {
        self.status = eval.status;
        self.eol_date = eval.eol_date;
        self.days_until_eol = eval.days_until_eol;
        self.matched_cycle = eval.matched_cycle;
        self.latest_version = eval.latest_version;
        self.is_lts = eval.is_lts;
    }
}

/// EOL result for the image's operating system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsResult {
    pub name: String,
    pub id: String,
    pub version: String,
    pub version_id: String,
    pub pretty_name: String,
    pub status: EolStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eol_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_until_eol: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_cycle: Option<String>,
    #[serde(default)]
    pub is_lts: bool,
}

impl OsResult {
    /// The OS as a component row (type `os`).
    #[must_use]
    pub fn to_component(&self) -> ComponentResult {
        let name = if self.pretty_name.is_empty() {
            format!("{} {}", self.name, self.version).trim().to_string()
        } else {
            self.pretty_name.clone()
        };
        let version = if self.version_id.is_empty() {
            self.version.clone()
        } else {
            self.version_id.clone()
        };
        ComponentResult {
            name,
            version,
            purl: String::new(),
            kind: "os".to_string(),
            status: self.status,
            eol_date: self.eol_date.clone(),
            days_until_eol: self.days_until_eol,
            matched_product: self.matched_product.clone(),
            matched_cycle: self.matched_cycle.clone(),
            match_strategy: self.matched_product.as_ref().map(|_| MatchStrategy::Os),
            latest_version: None,
            is_lts: self.is_lts,
        }
    }
}

/// Result of scanning one inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_components: usize,
    pub eol_components: usize,
    pub eol_soon_components: usize,
    pub active_components: usize,
    pub unknown_components: usize,
    pub components: Vec<ComponentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsResult>,
    pub scan_time: DateTime<Utc>,
    #[serde(default)]
    pub image_reference: String,
    #[serde(default)]
    pub db_last_updated: String,
    pub forward_lookup_days: u32,
}

impl ScanSummary {
    pub(crate) fn new(forward_lookup_days: u32) -> Self {
        Self {
            total_components: 0,
            eol_components: 0,
            eol_soon_components: 0,
            active_components: 0,
            unknown_components: 0,
            components: Vec::new(),
            os: None,
            scan_time: Utc::now(),
            image_reference: String::new(),
            db_last_updated: String::new(),
            forward_lookup_days,
        }
    }

    /// Append a result and bump its status counter.
    pub(crate) fn push(&mut self, result: ComponentResult) {
        self.total_components += 1;
        match result.status {
            EolStatus::Eol => self.eol_components += 1,
            EolStatus::EolSoon => self.eol_soon_components += 1,
            EolStatus::Active => self.active_components += 1,
            EolStatus::Unknown => self.unknown_components += 1,
        }
        self.components.push(result);
    }

    /// Components that are EOL or EOL soon.
    pub fn eol_components(&self) -> impl Iterator<Item = &ComponentResult> {
        self.components.iter().filter(|c| c.status.needs_attention())
    }

    #[must_use]
    pub fn has_eol_components(&self) -> bool {
        self.eol_components > 0
    }

    /// Keep only components that need attention; counts are left as scanned.
    pub fn retain_attention(&mut self) {
        self.components.retain(|c| c.status.needs_attention());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_counts_statuses() {
        let mut summary = ScanSummary::new(90);
        for status in [EolStatus::Eol, EolStatus::Eol, EolStatus::EolSoon, EolStatus::Unknown] {
            summary.push(ComponentResult {
                status,
                ..Default::default()
            });
        }
        assert_eq!(summary.total_components, 4);
        assert_eq!(summary.eol_components, 2);
        assert_eq!(summary.eol_soon_components, 1);
        assert_eq!(summary.active_components, 0);
        assert_eq!(summary.eol_components().count(), 3);
        assert!(summary.has_eol_components());
    }

    #[test]
    fn test_os_component_naming() {
        let os = OsResult {
            name: "Alpine Linux".to_string(),
            version: "3.19.1".to_string(),
            ..Default::default()
        };
        let component = os.to_component();
        assert_eq!(component.name, "Alpine Linux 3.19.1");
        assert_eq!(component.version, "3.19.1");
        assert_eq!(component.kind, "os");
        assert!(component.match_strategy.is_none());
    }

    #[test]
    fn test_json_field_names() {
        let result = ComponentResult {
            name: "python".to_string(),
            kind: "binary".to_string(),
            status: EolStatus::EolSoon,
            days_until_eol: Some(12),
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "binary");
        assert_eq!(json["status"], "eol_soon");
        assert_eq!(json["days_until_eol"], 12);
        assert!(json.get("eol_date").is_none());
        assert_eq!(json["is_lts"], false);
    }
}

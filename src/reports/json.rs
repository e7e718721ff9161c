//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::model::{Cycle, EolEntry, Product};
use crate::scan::ScanSummary;
use crate::store::CatalogStats;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, ReportError> {
        let mut out = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        out.push('\n');
        Ok(out)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct CycleListing<'a> {
    product: &'a str,
    cycles: &'a [Cycle],
}

impl ReportGenerator for JsonReporter {
    fn generate_scan_report(
        &self,
        summary: &ScanSummary,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        if config.only_attention {
            let mut filtered = summary.clone();
            filtered.retain_attention();
            self.render(&filtered)
        } else {
            self.render(summary)
        }
    }

    fn generate_stats_report(&self, stats: &CatalogStats) -> Result<String, ReportError> {
        self.render(stats)
    }

    fn generate_eol_listing(&self, entries: &[EolEntry]) -> Result<String, ReportError> {
        self.render(entries)
    }

    fn generate_product_listing(&self, products: &[Product]) -> Result<String, ReportError> {
        self.render(products)
    }

    fn generate_cycle_listing(
        &self,
        product: &str,
        cycles: &[Cycle],
    ) -> Result<String, ReportError> {
        self.render(&CycleListing { product, cycles })
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EolStatus;
    use crate::scan::ComponentResult;

    fn summary() -> ScanSummary {
        let mut summary: ScanSummary = serde_json::from_value(serde_json::json!({
            "total_components": 0,
            "eol_components": 0,
            "eol_soon_components": 0,
            "active_components": 0,
            "unknown_components": 0,
            "components": [],
            "scan_time": "2025-06-01T00:00:00Z",
            "forward_lookup_days": 90
        }))
        .unwrap();
        summary.components = vec![
            ComponentResult {
                name: "python".to_string(),
                status: EolStatus::Eol,
                ..Default::default()
            },
            ComponentResult {
                name: "requests".to_string(),
                status: EolStatus::Unknown,
                ..Default::default()
            },
        ];
        summary
    }

    #[test]
    fn test_scan_report_is_valid_json() {
        let report = JsonReporter::new()
            .generate_scan_report(&summary(), &ReportConfig::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["components"].as_array().unwrap().len(), 2);
        assert_eq!(value["forward_lookup_days"], 90);
    }

    #[test]
    fn test_attention_only_filters_components() {
        let report = JsonReporter::new()
            .pretty(false)
            .generate_scan_report(&summary(), &ReportConfig::attention_only())
            .unwrap();
        assert_eq!(report.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["components"][0]["name"], "python");
        assert_eq!(value["components"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_cycle_listing_shape() {
        let cycles = vec![Cycle::new("3.12")];
        let report = JsonReporter::new()
            .generate_cycle_listing("python", &cycles)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["product"], "python");
        assert_eq!(value["cycles"][0]["name"], "3.12");
    }
}

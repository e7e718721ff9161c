//! Report generation for scan results and catalog listings.
//!
//! This module provides the output formats used by the CLI:
//! - JSON: Structured data for programmatic integration
//! - Summary: Compact shell-friendly output
//! - Table: Aligned tabular terminal output

mod json;
mod summary;
mod types;

pub use json::JsonReporter;
pub use summary::{SummaryReporter, TableReporter};
pub use types::{ReportConfig, ReportFormat};

use crate::model::{Cycle, EolEntry, Product};
use crate::scan::ScanSummary;
use crate::store::CatalogStats;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report for a scanned inventory
    fn generate_scan_report(
        &self,
        summary: &ScanSummary,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Generate a report of catalog statistics
    fn generate_stats_report(&self, stats: &CatalogStats) -> Result<String, ReportError>;

    /// List cycles that are (or will be) end of life
    fn generate_eol_listing(&self, entries: &[EolEntry]) -> Result<String, ReportError>;

    /// List catalog products
    fn generate_product_listing(&self, products: &[Product]) -> Result<String, ReportError>;

    /// List the release cycles of one product
    fn generate_cycle_listing(&self, product: &str, cycles: &[Cycle])
    -> Result<String, ReportError>;

    /// Write a scan report to a writer
    fn write_scan_report<W: Write>(
        &self,
        summary: &ScanSummary,
        config: &ReportConfig,
        writer: &mut W,
    ) -> Result<(), ReportError>
    where
        Self: Sized,
    {
        let report = self.generate_scan_report(summary, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control.
///
/// `Auto` must be resolved by the caller; it falls back to the table view.
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Auto | ReportFormat::Table => {
            if use_color {
                Box::new(TableReporter::new())
            } else {
                Box::new(TableReporter::new().no_color())
            }
        }
    }
}

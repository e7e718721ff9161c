//! Scan command handler.
//!
//! Implements the `scan` subcommand: load an inventory, make sure the catalog
//! is usable, resolve and evaluate every component, then render the report.

use super::db::{build_source, open_store};
use super::output::{auto_detect_format, exit_codes, should_use_color, write_output, OutputTarget};
use crate::config::AppConfig;
use crate::reports::{create_reporter_with_options, ReportConfig};
use crate::scan::{Inventory, Scanner};
use crate::sync::CancelToken;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the scan command.
pub fn run_scan(
    config: &AppConfig,
    inventory_path: &Path,
    cancel: &CancelToken,
    quiet: bool,
) -> Result<i32> {
    let inventory = Inventory::from_path(inventory_path)
        .with_context(|| format!("failed to read inventory {}", inventory_path.display()))?;
    tracing::info!(
        "Loaded {} components{}",
        inventory.components.len(),
        if inventory.os.is_some() { " and OS" } else { "" }
    );

    let store = open_store(config)?;
    let scanner = Scanner::new(&store, config.scan_options());

    let meta = store.sync_metadata()?;
    if meta.last_full_sync.is_none() || config.scan.auto_update {
        let source = build_source(&config.sync)?;
        if let Some(report) = scanner.ensure_catalog(source.as_ref(), cancel)?
            && !quiet
        {
            eprintln!(
                "Catalog updated: {} products, {} cycles changed",
                report.products_processed, report.cycles_processed
            );
        }
    }

    let summary = scanner.scan(&inventory)?;

    let target = OutputTarget::from_option(config.output.file.clone());
    let format = auto_detect_format(config.output.format, &target);
    let reporter =
        create_reporter_with_options(format, should_use_color(config.output.no_color, &target));
    let report_config = ReportConfig {
        only_attention: config.scan.only_eol,
        ..ReportConfig::default()
    };
    let content = reporter.generate_scan_report(&summary, &report_config)?;
    write_output(&content, &target, quiet)?;

    if config.scan.fail_on_eol && summary.has_eol_components() {
        return Ok(exit_codes::EOL_FOUND);
    }
    Ok(exit_codes::SUCCESS)
}

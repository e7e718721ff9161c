//! Catalog database command handlers.
//!
//! Implements the `db` subcommands: sync, stats, path, eol, products, cycles.

use super::output::{auto_detect_format, exit_codes, should_use_color, write_output, OutputTarget};
use crate::config::{AppConfig, SyncConfig};
use crate::reports::{create_reporter_with_options, ReportFormat, ReportGenerator};
use crate::source::{save_snapshot, CatalogSource, EndOfLifeClient, SnapshotSource};
use crate::store::CatalogStore;
use crate::sync::{CancelToken, SyncEngine, SyncReport};
use crate::utils::format_duration;
use anyhow::{bail, Context, Result};
use std::fmt::Write as _;
use std::path::Path;

/// Build the catalog source named by the sync config.
pub fn build_source(config: &SyncConfig) -> Result<Box<dyn CatalogSource>> {
    if let Some(path) = &config.snapshot {
        tracing::debug!("Using snapshot source {}", path.display());
        return Ok(Box::new(SnapshotSource::new(path.clone())));
    }
    let client = EndOfLifeClient::new(config.client_config())
        .context("failed to create endoflife.date client")?;
    Ok(Box::new(client))
}

/// Open the configured catalog, creating it if needed.
pub fn open_store(config: &AppConfig) -> Result<CatalogStore> {
    let path = config.db_path();
    CatalogStore::open(&path)
        .with_context(|| format!("failed to open catalog at {}", path.display()))
}

fn reporter(config: &AppConfig) -> (Box<dyn ReportGenerator>, OutputTarget) {
    let target = OutputTarget::from_option(config.output.file.clone());
    let format = auto_detect_format(config.output.format, &target);
    let color = should_use_color(config.output.no_color, &target);
    (create_reporter_with_options(format, color), target)
}

/// Run `db sync`.
///
/// With `save_snapshot`, the raw upstream response is written to that path
/// first and the sync reads it back, so the file can seed offline syncs.
pub fn run_db_sync(
    config: &AppConfig,
    save_to: Option<&Path>,
    cancel: &CancelToken,
    quiet: bool,
) -> Result<i32> {
    let store = open_store(config)?;

    let source: Box<dyn CatalogSource> = match save_to {
        Some(path) => {
            let client = EndOfLifeClient::new(config.sync.client_config())
                .context("failed to create endoflife.date client")?;
            let body = client.fetch_raw(cancel)?;
            save_snapshot(path, &body)?;
            if !quiet {
                eprintln!("Snapshot saved to {}", path.display());
            }
            Box::new(SnapshotSource::new(path))
        }
        None => build_source(&config.sync)?,
    };

    if !quiet {
        eprintln!("Syncing EOL catalog from {}", source.describe());
        eprintln!("Categories: {}", config.sync.categories.join(", "));
    }

    let report = SyncEngine::new(&store, source.as_ref())
        .with_options(config.sync.options())
        .full_sync(&config.sync.categories, cancel)?;

    let (_, target) = reporter(config);
    let format = auto_detect_format(config.output.format, &target);
    let content = if format == ReportFormat::Json {
        serde_json::to_string_pretty(&report)? + "\n"
    } else {
        format_sync_report(&report)?
    };
    write_output(&content, &target, quiet)?;

    Ok(if report.errors > 0 {
        exit_codes::SYNC_ERRORS
    } else {
        exit_codes::SUCCESS
    })
}

fn format_sync_report(report: &SyncReport) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", "-".repeat(50))?;
    writeln!(out, "Sync completed in {}", format_duration(report.duration))?;
    writeln!(out, "  Products processed:    {}", report.products_processed)?;
    writeln!(
        out,
        "  Cycles processed:      {} ({} unchanged)",
        report.cycles_processed, report.cycles_unchanged
    )?;
    writeln!(out, "  Identifiers processed: {}", report.identifiers_processed)?;
    if report.identifiers_pruned > 0 {
        writeln!(out, "  Identifiers pruned:    {}", report.identifiers_pruned)?;
    }
    for (category, count) in &report.categories {
        writeln!(out, "    {category:<18} {count} products")?;
    }
    if report.errors > 0 {
        writeln!(out, "  Errors:                {}", report.errors)?;
        for failure in report.failures() {
            writeln!(out, "    {}", failure.item())?;
        }
    }
    Ok(out)
}

/// Run `db stats`.
pub fn run_db_stats(config: &AppConfig, quiet: bool) -> Result<i32> {
    let store = open_store(config)?;
    let stats = store.stats()?;
    let (reporter, target) = reporter(config);
    if !quiet && reporter.format() != ReportFormat::Json {
        eprintln!("Database path: {}", config.db_path().display());
    }
    write_output(&reporter.generate_stats_report(&stats)?, &target, quiet)?;
    Ok(exit_codes::SUCCESS)
}

/// Run `db path`.
pub fn run_db_path(config: &AppConfig) -> Result<i32> {
    println!("{}", config.db_path().display());
    Ok(exit_codes::SUCCESS)
}

/// Run `db eol`: list cycles that are EOL, optionally including upcoming ones.
pub fn run_db_eol(
    config: &AppConfig,
    include_future: bool,
    days_ahead: Option<u32>,
    quiet: bool,
) -> Result<i32> {
    let store = open_store(config)?;
    let entries = store.eol_products(include_future, days_ahead)?;
    let (reporter, target) = reporter(config);
    write_output(&reporter.generate_eol_listing(&entries)?, &target, quiet)?;
    Ok(exit_codes::SUCCESS)
}

/// Run `db products`, optionally restricted to one category.
pub fn run_db_products(config: &AppConfig, category: Option<&str>, quiet: bool) -> Result<i32> {
    let store = open_store(config)?;
    let products = match category {
        Some(category) => {
            if store.category(category)?.is_none() {
                bail!("unknown category '{category}'");
            }
            store.products_by_category(category)?
        }
        None => store.products()?,
    };
    let (reporter, target) = reporter(config);
    write_output(&reporter.generate_product_listing(&products)?, &target, quiet)?;
    Ok(exit_codes::SUCCESS)
}

/// Run `db cycles` for one product.
pub fn run_db_cycles(config: &AppConfig, product: &str, quiet: bool) -> Result<i32> {
    let store = open_store(config)?;
    let Some(found) = store.product(product)? else {
        bail!("product '{product}' is not in the catalog");
    };
    let cycles = store.cycles_for_product(&found.name)?;
    let (reporter, target) = reporter(config);
    write_output(
        &reporter.generate_cycle_listing(&found.name, &cycles)?,
        &target,
        quiet,
    )?;
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportFormat;

    fn snapshot_config(dir: &Path) -> AppConfig {
        let snapshot = dir.join("products.json");
        std::fs::write(
            &snapshot,
            r#"{"total": 1, "result": [{
                "name": "python",
                "category": "lang",
                "identifiers": [{"type": "purl", "id": "pkg:generic/python"}],
                "releases": [{"name": "2.7", "isEol": true, "eolFrom": "2020-01-01"}]
            }]}"#,
        )
        .unwrap();
        let mut config = AppConfig::builder()
            .db_path(dir.join("eol.db"))
            .categories(vec!["lang".to_string()])
            .output_format(ReportFormat::Json)
            .output_file(Some(dir.join("out.json")))
            .build();
        config.sync.snapshot = Some(snapshot);
        config
    }

    #[test]
    fn test_sync_from_snapshot_then_list() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = snapshot_config(tmp.path());

        let code = run_db_sync(&config, None, &CancelToken::new(), true).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("out.json")).unwrap())
                .unwrap();
        assert_eq!(report["products_processed"], 1);

        run_db_cycles(&config, "python", true).unwrap();
        let listing: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("out.json")).unwrap())
                .unwrap();
        assert_eq!(listing["cycles"][0]["name"], "2.7");

        assert!(run_db_cycles(&config, "cobol", true).is_err());
        assert!(run_db_products(&config, Some("nope"), true).is_err());
    }

    #[test]
    fn test_format_sync_report() {
        let mut report = SyncReport::default();
        report.products_processed = 2;
        report.errors = 1;
        report.failed("nodejs@22", "boom");
        let text = format_sync_report(&report).unwrap();
        assert!(text.contains("Products processed:    2"));
        assert!(text.contains("Errors:                2"));
        assert!(text.contains("nodejs@22"));
    }
}

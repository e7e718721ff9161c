//! Catalog synchronization.
//!
//! A full sync downloads every upstream product, keeps those in the
//! configured categories and upserts them into the [`CatalogStore`]. Cycle
//! writes are gated on content hashes so repeated syncs only touch rows that
//! actually changed. Individual product or cycle failures are recorded in the
//! [`SyncReport`] and do not abort the run.
//!
//! # Example
//!
//! ```ignore
//! use eol_scanner::source::StaticSource;
//! use eol_scanner::sync::{CancelToken, SyncEngine};
//!
//! let engine = SyncEngine::new(&store, &source);
//! let report = engine.full_sync(&[], &CancelToken::new())?;
//! report.log_summary();
//! ```

mod cancel;
mod report;

pub use cancel::CancelToken;
pub use report::{ItemOutcome, SyncReport};

use crate::error::{ErrorContext, Result};
use crate::source::CatalogSource;
use crate::store::CatalogStore;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Categories synced when none are configured.
pub const DEFAULT_CATEGORIES: &[&str] = &["framework", "lang", "os", "database", "server-app"];

/// Maximum catalog age before a scan triggers an automatic sync.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 3600);

/// The default category list as owned strings.
#[must_use]
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| (*c).to_string()).collect()
}

/// Sync behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Delete identifiers that upstream no longer lists for a product.
    pub prune_identifiers: bool,
}

/// Drives a full sync from a [`CatalogSource`] into a [`CatalogStore`].
pub struct SyncEngine<'a> {
    store: &'a CatalogStore,
    source: &'a dyn CatalogSource,
    options: SyncOptions,
}

impl<'a> SyncEngine<'a> {
    pub fn new(store: &'a CatalogStore, source: &'a dyn CatalogSource) -> Self {
        Self {
            store,
            source,
            options: SyncOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Run a full sync for `categories` (the defaults when empty).
    ///
    /// Fetch and category failures abort the sync. Cancellation is observed
    /// before and after the fetch and before each product; a cancelled run
    /// keeps whatever it already wrote but does not update sync metadata.
    pub fn full_sync(&self, categories: &[String], cancel: &CancelToken) -> Result<SyncReport> {
        let start = Instant::now();
        let categories = if categories.is_empty() {
            default_categories()
        } else {
            categories.to_vec()
        };
        tracing::info!(
            "Starting full sync from {} for categories: {}",
            self.source.describe(),
            categories.join(", ")
        );

        cancel.check()?;
        let records = self
            .source
            .fetch_products(cancel)
            .context("fetching upstream catalog")?;
        cancel.check()?;

        let wanted: HashSet<&str> = categories.iter().map(String::as_str).collect();
        let products: Vec<_> = records
            .iter()
            .filter(|p| wanted.contains(p.category.as_str()))
            .collect();
        tracing::debug!(
            "{} of {} upstream products in selected categories",
            products.len(),
            records.len()
        );

        let mut report = SyncReport::default();
        for product in &products {
            *report.categories.entry(product.category.clone()).or_insert(0) += 1;
        }
        for (name, count) in &report.categories {
            let count = i64::try_from(*count).unwrap_or(i64::MAX);
            self.store
                .upsert_category(name, "", count)
                .with_context(|| format!("upserting category {name}"))?;
        }

        for (index, record) in products.iter().enumerate() {
            cancel.check()?;

            if record.name.trim().is_empty() {
                report.skipped(format!("product #{index}"), "empty name");
                continue;
            }

            let product_id = match self.store.upsert_product(&record.to_product()) {
                Ok(id) => id,
                Err(e) => {
                    report.failed(&record.name, e);
                    continue;
                }
            };
            report.products_processed += 1;
            let mut clean = true;

            let identifiers = record.to_identifiers();
            match self.store.upsert_identifiers(product_id, &identifiers) {
                Ok(count) => report.identifiers_processed += count,
                Err(e) => {
                    report.failed(format!("{} identifiers", record.name), e);
                    clean = false;
                }
            }
            if self.options.prune_identifiers {
                match self.store.prune_identifiers(product_id, &identifiers) {
                    Ok(count) => report.identifiers_pruned += count,
                    Err(e) => {
                        report.failed(format!("{} identifier pruning", record.name), e);
                        clean = false;
                    }
                }
            }

            for release in &record.releases {
                match self.store.upsert_cycle(product_id, &release.to_cycle()) {
                    Ok(true) => report.cycles_processed += 1,
                    Ok(false) => report.cycles_unchanged += 1,
                    Err(e) => {
                        report.failed(format!("{}@{}", record.name, release.name), e);
                        clean = false;
                    }
                }
            }
            // Partial products are reported only through their failed items.
            if clean {
                report.succeeded(&record.name);
            }
        }

        self.store
            .record_sync(&categories, Utc::now())
            .context("recording sync metadata")?;

        report.duration = start.elapsed();
        report.log_summary();
        Ok(report)
    }
}

/// Whether the catalog is older than `max_age` (or was never synced).
pub fn needs_refresh(store: &CatalogStore, max_age: Duration) -> Result<bool> {
    needs_refresh_at(store, max_age, Utc::now())
}

/// [`needs_refresh`] relative to `now`.
pub fn needs_refresh_at(store: &CatalogStore, max_age: Duration, now: DateTime<Utc>) -> Result<bool> {
    let meta = store.sync_metadata()?;
    let Some(last) = meta.last_full_sync.as_deref().and_then(parse_sync_timestamp) else {
        return Ok(true);
    };
    let age = now.signed_duration_since(last);
    let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
    Ok(age > max_age)
}

/// Parse a stored sync timestamp (RFC 3339, or SQLite's `YYYY-MM-DD HH:MM:SS`).
fn parse_sync_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_sync_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_sync_timestamp("2025-03-01T12:00:00Z"), Some(expected));
        assert_eq!(parse_sync_timestamp("2025-03-01 12:00:00"), Some(expected));
        assert_eq!(parse_sync_timestamp("yesterday"), None);
    }

    #[test]
    fn test_needs_refresh_without_sync() {
        let store = CatalogStore::in_memory().unwrap();
        assert!(needs_refresh(&store, DEFAULT_MAX_AGE).unwrap());
    }

    #[test]
    fn test_needs_refresh_by_age() {
        let store = CatalogStore::in_memory().unwrap();
        let synced = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        store.record_sync(&default_categories(), synced).unwrap();

        let day = Duration::from_secs(24 * 3600);
        let soon = synced + chrono::Duration::days(3);
        let later = synced + chrono::Duration::days(8);
        assert!(!needs_refresh_at(&store, DEFAULT_MAX_AGE, soon).unwrap());
        assert!(needs_refresh_at(&store, DEFAULT_MAX_AGE, later).unwrap());
        assert!(needs_refresh_at(&store, day, soon).unwrap());
    }

    #[test]
    fn test_default_categories() {
        assert_eq!(default_categories().len(), 5);
        assert!(DEFAULT_CATEGORIES.contains(&"server-app"));
    }
}

//! Inventory scanning.
//!
//! The [`Scanner`] makes sure the catalog is populated and fresh, then
//! resolves and evaluates every component of an [`Inventory`] in parallel.
//! The operating system, when present, is evaluated first and reported as
//! the first component.

mod inventory;
mod summary;

pub use inventory::{Inventory, InventoryFormat};
pub use summary::{ComponentResult, OsResult, ScanSummary};

use crate::error::{ErrorContext, Result};
use crate::evaluate::{evaluate_at, DEFAULT_FORWARD_LOOKUP_DAYS};
use crate::model::{ComponentDescriptor, OsDescriptor};
use crate::resolve::{LookupTables, Resolver};
use crate::source::CatalogSource;
use crate::store::CatalogStore;
use crate::sync::{
    default_categories, needs_refresh, CancelToken, SyncEngine, SyncOptions, SyncReport,
    DEFAULT_MAX_AGE,
};
use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use std::time::Duration;

/// Scanner settings.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Window in days for `eol_soon`
    pub forward_lookup_days: u32,
    /// Re-sync automatically when the catalog is older than `max_age`
    pub auto_update: bool,
    pub max_age: Duration,
    /// Categories used for automatic syncs
    pub categories: Vec<String>,
    pub sync: SyncOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            forward_lookup_days: DEFAULT_FORWARD_LOOKUP_DAYS,
            auto_update: true,
            max_age: DEFAULT_MAX_AGE,
            categories: default_categories(),
            sync: SyncOptions::default(),
        }
    }
}

/// Resolves and evaluates inventories against a catalog.
pub struct Scanner<'a> {
    store: &'a CatalogStore,
    tables: LookupTables,
    options: ScanOptions,
}

impl<'a> Scanner<'a> {
    pub fn new(store: &'a CatalogStore, options: ScanOptions) -> Self {
        Self {
            store,
            tables: LookupTables::builtin(),
            options,
        }
    }

    /// Replace the built-in lookup tables.
    #[must_use]
    pub fn with_tables(mut self, tables: LookupTables) -> Self {
        self.tables = tables;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Sync the catalog if it was never synced, or if it is stale and
    /// auto-update is enabled. Returns the sync report when a sync ran.
    pub fn ensure_catalog(
        &self,
        source: &dyn CatalogSource,
        cancel: &CancelToken,
    ) -> Result<Option<SyncReport>> {
        let meta = self.store.sync_metadata()?;
        let reason = if meta.last_full_sync.is_none() {
            "catalog has never been synced"
        } else if self.options.auto_update && needs_refresh(self.store, self.options.max_age)? {
            "catalog is stale"
        } else {
            tracing::debug!("Catalog is up to date");
            if !self.store.is_read_only() {
                self.store.record_update_check(Utc::now())?;
            }
            return Ok(None);
        };

        tracing::info!("Syncing: {reason}");
        let report = SyncEngine::new(self.store, source)
            .with_options(self.options.sync)
            .full_sync(&self.options.categories, cancel)
            .context("automatic catalog sync")?;
        Ok(Some(report))
    }

    /// Scan an inventory as of today.
    pub fn scan(&self, inventory: &Inventory) -> Result<ScanSummary> {
        self.scan_at(inventory, Utc::now().date_naive())
    }

    /// Scan an inventory relative to `today`.
    pub fn scan_at(&self, inventory: &Inventory, today: NaiveDate) -> Result<ScanSummary> {
        let mut summary = ScanSummary::new(self.options.forward_lookup_days);
        summary.image_reference = inventory.source.clone().unwrap_or_default();
        summary.db_last_updated = self
            .store
            .sync_metadata()?
            .last_full_sync
            .unwrap_or_default();

        if let Some(os) = &inventory.os {
            let result = self.check_os(os, today)?;
            summary.push(result.to_component());
            summary.os = Some(result);
        }

        tracing::info!("Scanning {} components", inventory.components.len());
        let results = inventory
            .components
            .par_iter()
            .map_init(
                || self.worker_store(),
                |reader, component| {
                    let store = reader.as_ref().unwrap_or(self.store);
                    self.check_component(store, component, today)
                },
            )
            .collect::<Result<Vec<_>>>()?;
        for result in results {
            summary.push(result);
        }

        tracing::info!(
            "Scan complete: {} total, {} EOL, {} EOL soon",
            summary.total_components,
            summary.eol_components,
            summary.eol_soon_components
        );
        Ok(summary)
    }

    /// A private read-only handle for a rayon worker, if the store allows one.
    fn worker_store(&self) -> Option<CatalogStore> {
        match self.store.reader() {
            Ok(reader) => reader,
            Err(e) => {
                tracing::debug!("Falling back to shared catalog handle: {e}");
                None
            }
        }
    }

    fn check_component(
        &self,
        store: &CatalogStore,
        component: &ComponentDescriptor,
        today: NaiveDate,
    ) -> Result<ComponentResult> {
        let mut result = ComponentResult {
            name: component.name.clone(),
            version: component.version.clone(),
            purl: component.purl().unwrap_or_default().to_string(),
            kind: component.kind.clone(),
            ..ComponentResult::default()
        };

        let resolver = Resolver::new(store, &self.tables);
        if let Some(hit) = resolver.resolve(component)? {
            let cycles = store.cycles_for_product(&hit.product.name)?;
            result.apply(evaluate_at(
                &cycles,
                &component.version,
                self.options.forward_lookup_days,
                today,
            ));
            result.matched_product = Some(hit.product.name);
            result.match_strategy = Some(hit.strategy);
        }
        Ok(result)
    }

    fn check_os(&self, os: &OsDescriptor, today: NaiveDate) -> Result<OsResult> {
        let mut result = OsResult {
            name: os.name.clone(),
            id: os.id.clone(),
            version: os.version.clone(),
            version_id: os.version_id.clone(),
            pretty_name: os.pretty_name.clone(),
            ..OsResult::default()
        };

        let resolver = Resolver::new(self.store, &self.tables);
        if let Some(hit) = resolver.resolve_os(os)? {
            let cycles = self.store.cycles_for_product(&hit.product.name)?;
            let eval = evaluate_at(
                &cycles,
                os.match_version(),
                self.options.forward_lookup_days,
                today,
            );
            result.status = eval.status;
            result.eol_date = eval.eol_date;
            result.days_until_eol = eval.days_until_eol;
            result.matched_cycle = eval.matched_cycle;
            result.is_lts = eval.is_lts;
            result.matched_product = Some(hit.product.name);
        }
        Ok(result)
    }
}

//! Catalog statistics.

use super::CatalogStore;
use crate::error::Result;
use crate::model::SyncMetadata;
use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// Row counts and EOL breakdown for the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_categories: i64,
    pub total_products: i64,
    pub total_cycles: i64,
    pub total_identifiers: i64,
    /// Cycles dated on or before today, or flagged EOL
    pub eol_cycles: i64,
    /// Cycles with an EOL date after today
    pub active_cycles: i64,
    pub identifiers_by_type: IndexMap<String, i64>,
    pub products_by_category: IndexMap<String, i64>,
    pub sync: SyncMetadata,
}

impl CatalogStore {
    /// Compute statistics as of today.
    pub fn stats(&self) -> Result<CatalogStats> {
        self.stats_at(Utc::now().date_naive())
    }

    /// Compute statistics relative to `today`.
    pub fn stats_at(&self, today: NaiveDate) -> Result<CatalogStats> {
        let sync = self.sync_metadata()?;
        let today = today.format("%Y-%m-%d").to_string();
        let conn = self.conn()?;

        let count = |sql: &str| -> rusqlite::Result<i64> { conn.query_row(sql, [], |row| row.get(0)) };
        let total_categories = count("SELECT COUNT(*) FROM categories")?;
        let total_products = count("SELECT COUNT(*) FROM products")?;
        let total_cycles = count("SELECT COUNT(*) FROM cycles")?;
        let total_identifiers = count("SELECT COUNT(*) FROM identifiers")?;

        let eol_cycles = conn.query_row(
            "SELECT COUNT(*) FROM cycles
             WHERE (eol IS NOT NULL AND substr(eol, 1, 10) <= ?1) OR eol_boolean = 1",
            params![today],
            |row| row.get(0),
        )?;
        let active_cycles = conn.query_row(
            "SELECT COUNT(*) FROM cycles WHERE eol IS NOT NULL AND substr(eol, 1, 10) > ?1",
            params![today],
            |row| row.get(0),
        )?;

        let grouped = |sql: &str| -> rusqlite::Result<IndexMap<String, i64>> {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
            rows.collect()
        };
        let identifiers_by_type = grouped(
            "SELECT identifier_type, COUNT(*) FROM identifiers
             GROUP BY identifier_type ORDER BY identifier_type",
        )?;
        let products_by_category = grouped(
            "SELECT category_name, COUNT(*) FROM products
             WHERE category_name IS NOT NULL
             GROUP BY category_name ORDER BY category_name",
        )?;

        Ok(CatalogStats {
            total_categories,
            total_products,
            total_cycles,
            total_identifiers,
            eol_cycles,
            active_cycles,
            identifiers_by_type,
            products_by_category,
            sync,
        })
    }
}

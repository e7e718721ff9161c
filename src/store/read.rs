//! Read path: products, cycles, EOL listings and sync metadata.

use super::schema::{CYCLE_COLUMNS, PRODUCT_COLUMNS};
use super::{cycle_from_row, decode_list, product_from_row, CatalogStore};
use crate::error::Result;
use crate::model::{Category, Cycle, EolEntry, Identifier, IdentifierType, Product, SyncMetadata};
use chrono::{Days, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

impl CatalogStore {
    /// Look up a product by its exact name.
    pub fn product(&self, name: &str) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let product = conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.name = ?1"),
                params![name],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, label, total_products FROM categories WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        label: row.get(2)?,
                        total_products: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    /// All categories, ordered by name.
    pub fn categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, label, total_products FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                label: row.get(2)?,
                total_products: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Cycles of a product, newest release first.
    ///
    /// Cycles without a release date sort last; ties keep insertion order.
    /// An unknown product yields an empty list.
    pub fn cycles_for_product(&self, product: &str) -> Result<Vec<Cycle>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {CYCLE_COLUMNS} FROM cycles c
             JOIN products p ON p.id = c.product_id
             WHERE p.name = ?1
             ORDER BY c.release_date IS NULL, c.release_date DESC, c.id"
        ))?;
        let rows = stmt.query_map(params![product], |row| cycle_from_row(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Identifiers attached to a product, ordered by type then value.
    pub fn identifiers_for_product(&self, product: &str) -> Result<Vec<Identifier>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT i.identifier_type, i.identifier_value FROM identifiers i
             JOIN products p ON p.id = i.product_id
             WHERE p.name = ?1
             ORDER BY i.identifier_type, i.identifier_value",
        )?;
        let rows = stmt.query_map(params![product], |row| {
            let kind: String = row.get(0)?;
            Ok(Identifier::new(IdentifierType::parse(&kind), row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Products in a category, ordered by name.
    pub fn products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p
             WHERE p.category_name = ?1
             ORDER BY p.name"
        ))?;
        let rows = stmt.query_map(params![category], product_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All products, ordered by name.
    pub fn products(&self) -> Result<Vec<Product>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products p ORDER BY p.name"))?;
        let rows = stmt.query_map([], product_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Cycles that are EOL as of today. See [`Self::eol_products_at`].
    pub fn eol_products(&self, include_future: bool, days_ahead: Option<u32>) -> Result<Vec<EolEntry>> {
        self.eol_products_at(include_future, days_ahead, Utc::now().date_naive())
    }

    /// Cycles that have reached end of life relative to `today`.
    ///
    /// * `days_ahead`: dated cycles whose EOL is on or before `today + days_ahead`,
    ///   plus flagged cycles, soonest first.
    /// * `include_future`: every dated or flagged cycle, soonest first.
    /// * otherwise: dated cycles whose EOL is on or before `today`, plus flagged
    ///   cycles, most recent first.
    pub fn eol_products_at(
        &self,
        include_future: bool,
        days_ahead: Option<u32>,
        today: NaiveDate,
    ) -> Result<Vec<EolEntry>> {
        let (filter, order, cutoff) = match days_ahead {
            Some(days) => {
                let cutoff = today
                    .checked_add_days(Days::new(u64::from(days)))
                    .unwrap_or(NaiveDate::MAX);
                (
                    "(c.eol IS NOT NULL AND substr(c.eol, 1, 10) <= ?1) OR c.eol_boolean = 1",
                    "ASC",
                    Some(cutoff),
                )
            }
            None if include_future => ("c.eol IS NOT NULL OR c.eol_boolean = 1", "ASC", None),
            None => (
                "(c.eol IS NOT NULL AND substr(c.eol, 1, 10) <= ?1) OR c.eol_boolean = 1",
                "DESC",
                Some(today),
            ),
        };

        let sql = format!(
            "SELECT p.name, p.category_name, {CYCLE_COLUMNS} FROM cycles c
             JOIN products p ON p.id = c.product_id
             WHERE {filter}
             ORDER BY c.eol IS NULL, c.eol {order}, p.name, c.cycle"
        );
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<EolEntry> {
            Ok(EolEntry {
                product: row.get(0)?,
                category: row.get(1)?,
                cycle: cycle_from_row(row, 2)?,
            })
        };
        let rows = match cutoff {
            Some(date) => stmt
                .query_map(params![date.format("%Y-%m-%d").to_string()], map)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], map)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
    }

    /// The singleton sync record.
    pub fn sync_metadata(&self) -> Result<SyncMetadata> {
        let conn = self.conn()?;
        let meta = conn.query_row(
            "SELECT last_full_sync, last_update_check, categories_synced,
                    products_count, cycles_count, identifiers_count
             FROM sync_metadata WHERE id = 1",
            [],
            |row| {
                Ok(SyncMetadata {
                    last_full_sync: row.get(0)?,
                    last_update_check: row.get(1)?,
                    categories_synced: decode_list(row.get(2)?),
                    products_count: row.get(3)?,
                    cycles_count: row.get(4)?,
                    identifiers_count: row.get(5)?,
                })
            },
        )?;
        Ok(meta)
    }
}

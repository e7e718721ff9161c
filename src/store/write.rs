//! Write path: idempotent upserts used by the sync engine.

use super::{encode_list, flag_to_sql, CatalogStore};
use crate::error::Result;
use crate::model::{Cycle, Identifier, ProductData};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};
use std::collections::HashSet;

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%SZ', 'now')";

impl CatalogStore {
    /// Insert or update a category by name.
    ///
    /// An empty `label` keeps whatever label is already stored; the product
    /// count is always overwritten.
    pub fn upsert_category(&self, name: &str, label: &str, total_products: i64) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO categories (name, label, total_products)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET
                     label = CASE WHEN excluded.label = '' THEN categories.label
                                  ELSE excluded.label END,
                     total_products = excluded.total_products,
                     updated_at = {NOW}"
            ),
            params![name, label, total_products],
        )?;
        let id = conn.query_row(
            "SELECT id FROM categories WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Insert or update a product by name and return its id.
    ///
    /// Scalar fields are merged: a missing or empty incoming value keeps the
    /// stored one. `aliases` and `tags` are always replaced wholesale.
    pub fn upsert_product(&self, product: &ProductData) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO products (name, category_id, category_name, label, link,
                                       version_command, aliases, tags, content_hash)
                 VALUES (?1, (SELECT id FROM categories WHERE name = ?2), NULLIF(?2, ''),
                         NULLIF(?3, ''), NULLIF(?4, ''), NULLIF(?5, ''), ?6, ?7, ?8)
                 ON CONFLICT(name) DO UPDATE SET
                     category_id = COALESCE(excluded.category_id, products.category_id),
                     category_name = COALESCE(excluded.category_name, products.category_name),
                     label = COALESCE(excluded.label, products.label),
                     link = COALESCE(excluded.link, products.link),
                     version_command = COALESCE(excluded.version_command, products.version_command),
                     aliases = excluded.aliases,
                     tags = excluded.tags,
                     content_hash = excluded.content_hash,
                     updated_at = {NOW}"
            ),
            params![
                product.name,
                product.category,
                product.label,
                product.link,
                product.version_command,
                encode_list(&product.aliases),
                encode_list(&product.tags),
                product.content_hash(),
            ],
        )?;
        let id = conn.query_row(
            "SELECT id FROM products WHERE name = ?1",
            params![product.name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Insert or update a release cycle. Returns `false` without writing when
    /// the stored row already carries the same content hash.
    pub fn upsert_cycle(&self, product_id: i64, cycle: &Cycle) -> Result<bool> {
        let hash = cycle.content_hash();
        let conn = self.conn()?;

        let existing: Option<String> = conn
            .query_row(
                "SELECT content_hash FROM cycles WHERE product_id = ?1 AND cycle = ?2",
                params![product_id, cycle.name],
                |row| row.get(0),
            )
            .optional()?;
        if existing.as_deref() == Some(hash.as_str()) {
            return Ok(false);
        }

        conn.execute(
            &format!(
                "INSERT INTO cycles (
                     product_id, cycle, cycle_label, codename, release_date,
                     eol, eol_boolean, lts, lts_from, support, support_boolean,
                     is_maintained, latest_version, latest_release_date, latest_link,
                     content_hash
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                 ON CONFLICT(product_id, cycle) DO UPDATE SET
                     cycle_label = excluded.cycle_label,
                     codename = excluded.codename,
                     release_date = excluded.release_date,
                     eol = excluded.eol,
                     eol_boolean = excluded.eol_boolean,
                     lts = excluded.lts,
                     lts_from = excluded.lts_from,
                     support = excluded.support,
                     support_boolean = excluded.support_boolean,
                     is_maintained = excluded.is_maintained,
                     latest_version = excluded.latest_version,
                     latest_release_date = excluded.latest_release_date,
                     latest_link = excluded.latest_link,
                     content_hash = excluded.content_hash,
                     updated_at = {NOW}"
            ),
            params![
                product_id,
                cycle.name,
                cycle.label,
                cycle.codename,
                cycle.release_date,
                cycle.eol.date(),
                flag_to_sql(cycle.eol.flag()),
                i64::from(cycle.is_lts),
                cycle.lts_from,
                cycle.support.date(),
                flag_to_sql(cycle.support.flag()),
                i64::from(cycle.is_maintained),
                cycle.latest_version,
                cycle.latest_release_date,
                cycle.latest_link,
                hash,
            ],
        )?;
        Ok(true)
    }

    /// Insert identifiers for a product, touching `updated_at` on existing
    /// ones. Entries with an empty type or value are skipped. Returns the
    /// number of entries written.
    pub fn upsert_identifiers(&self, product_id: i64, identifiers: &[Identifier]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO identifiers (product_id, identifier_type, identifier_value)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(product_id, identifier_type, identifier_value) DO UPDATE SET
                     updated_at = {NOW}"
            ))?;
            for ident in identifiers.iter().filter(|i| i.is_storable()) {
                stmt.execute(params![product_id, ident.kind.as_str(), ident.value])?;
                count += 1;
            }
        }
        tx.commit()?;
        Ok(count)
    }

    /// Delete identifiers of a product that are absent from `keep`.
    ///
    /// Returns the number of rows removed.
    pub fn prune_identifiers(&self, product_id: i64, keep: &[Identifier]) -> Result<usize> {
        let keep: HashSet<(&str, &str)> = keep
            .iter()
            .filter(|i| i.is_storable())
            .map(|i| (i.kind.as_str(), i.value.as_str()))
            .collect();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let stale: Vec<i64> = {
            let mut stmt = tx.prepare(
                "SELECT id, identifier_type, identifier_value FROM identifiers
                 WHERE product_id = ?1",
            )?;
            let rows = stmt.query_map(params![product_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;
            let mut stale = Vec::new();
            for row in rows {
                let (id, kind, value) = row?;
                if !keep.contains(&(kind.as_str(), value.as_str())) {
                    stale.push(id);
                }
            }
            stale
        };
        for id in &stale {
            tx.execute("DELETE FROM identifiers WHERE id = ?1", params![id])?;
        }
        tx.commit()?;
        Ok(stale.len())
    }

    /// Record a completed full sync and refresh the cached row counts.
    pub fn record_sync(&self, categories: &[String], at: DateTime<Utc>) -> Result<()> {
        let stamp = at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let conn = self.conn()?;
        conn.execute(
            "UPDATE sync_metadata SET
                 last_full_sync = ?1,
                 last_update_check = ?1,
                 categories_synced = ?2,
                 products_count = (SELECT COUNT(*) FROM products),
                 cycles_count = (SELECT COUNT(*) FROM cycles),
                 identifiers_count = (SELECT COUNT(*) FROM identifiers)
             WHERE id = 1",
            params![stamp, encode_list(categories)],
        )?;
        Ok(())
    }

    /// Record that freshness was checked without running a sync.
    pub fn record_update_check(&self, at: DateTime<Utc>) -> Result<()> {
        let stamp = at.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn()?.execute(
            "UPDATE sync_metadata SET last_update_check = ?1 WHERE id = 1",
            params![stamp],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Cycle, Identifier, IdentifierType, Milestone, ProductData};
    use crate::store::CatalogStore;

    fn store_with_product(name: &str) -> (CatalogStore, i64) {
        let store = CatalogStore::in_memory().unwrap();
        store.upsert_category("lang", "", 1).unwrap();
        let id = store
            .upsert_product(&ProductData::new(name).with_category("lang"))
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_upsert_category_keeps_label_when_empty() {
        let store = CatalogStore::in_memory().unwrap();
        let id = store.upsert_category("lang", "Languages", 3).unwrap();
        let again = store.upsert_category("lang", "", 5).unwrap();
        assert_eq!(id, again);

        let cat = store.category("lang").unwrap().unwrap();
        assert_eq!(cat.label, "Languages");
        assert_eq!(cat.total_products, 5);

        store.upsert_category("lang", "Programming languages", 5).unwrap();
        let cat = store.category("lang").unwrap().unwrap();
        assert_eq!(cat.label, "Programming languages");
    }

    #[test]
    fn test_upsert_product_merges_scalars_and_replaces_lists() {
        let (store, id) = store_with_product("python");
        let full = ProductData::new("python")
            .with_category("lang")
            .with_label("Python")
            .with_aliases(["python3", "cpython"]);
        assert_eq!(store.upsert_product(&full).unwrap(), id);

        // Empty label and missing category keep stored values, aliases are replaced.
        let sparse = ProductData {
            label: Some(String::new()),
            ..ProductData::new("python").with_aliases(["py"])
        };
        assert_eq!(store.upsert_product(&sparse).unwrap(), id);

        let product = store.product("python").unwrap().unwrap();
        assert_eq!(product.label.as_deref(), Some("Python"));
        assert_eq!(product.category.as_deref(), Some("lang"));
        assert_eq!(product.aliases, vec!["py".to_string()]);
    }

    #[test]
    fn test_upsert_product_without_known_category() {
        let store = CatalogStore::in_memory().unwrap();
        store
            .upsert_product(&ProductData::new("nginx").with_category("server-app"))
            .unwrap();
        let product = store.product("nginx").unwrap().unwrap();
        assert_eq!(product.category.as_deref(), Some("server-app"));
        assert!(store.products_by_category("server-app").unwrap().len() == 1);
    }

    #[test]
    fn test_upsert_cycle_is_hash_gated() {
        let (store, id) = store_with_product("python");
        let cycle = Cycle::new("3.12").with_eol(Milestone::Date("2028-10-31".to_string()));

        assert!(store.upsert_cycle(id, &cycle).unwrap());
        assert!(!store.upsert_cycle(id, &cycle).unwrap());

        let changed = cycle.clone().with_latest("3.12.4");
        assert!(store.upsert_cycle(id, &changed).unwrap());

        let cycles = store.cycles_for_product("python").unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].latest_version.as_deref(), Some("3.12.4"));
    }

    #[test]
    fn test_upsert_identifiers_skips_empty_and_dedupes() {
        let (store, id) = store_with_product("python");
        let idents = vec![
            Identifier::purl("pkg:pypi/python"),
            Identifier::purl(""),
            Identifier::new(IdentifierType::parse(""), "orphan"),
            Identifier::cpe("cpe:2.3:a:python:python"),
        ];
        assert_eq!(store.upsert_identifiers(id, &idents).unwrap(), 2);
        assert_eq!(store.upsert_identifiers(id, &idents).unwrap(), 2);
        assert_eq!(store.identifiers_for_product("python").unwrap().len(), 2);
    }

    #[test]
    fn test_prune_identifiers_removes_stale_only() {
        let (store, id) = store_with_product("python");
        let old = vec![
            Identifier::purl("pkg:pypi/python"),
            Identifier::repology("python"),
        ];
        store.upsert_identifiers(id, &old).unwrap();

        let keep = vec![Identifier::purl("pkg:pypi/python")];
        assert_eq!(store.prune_identifiers(id, &keep).unwrap(), 1);
        assert_eq!(
            store.identifiers_for_product("python").unwrap(),
            vec![Identifier::purl("pkg:pypi/python")]
        );
    }

    #[test]
    fn test_record_sync_updates_counts() {
        let (store, id) = store_with_product("python");
        store.upsert_cycle(id, &Cycle::new("2.7")).unwrap();
        store
            .record_sync(&["lang".to_string()], chrono::Utc::now())
            .unwrap();

        let meta = store.sync_metadata().unwrap();
        assert!(meta.last_full_sync.is_some());
        assert_eq!(meta.categories_synced, vec!["lang".to_string()]);
        assert_eq!(meta.products_count, 1);
        assert_eq!(meta.cycles_count, 1);
    }
}

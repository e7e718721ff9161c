//! Lookup primitives used by the resolver.
//!
//! Every lookup returns at most one product. When several products match,
//! the one inserted first (lowest id) wins so results are stable across runs.

use super::schema::PRODUCT_COLUMNS;
use super::{escape_like, product_from_row, CatalogStore};
use crate::error::Result;
use crate::model::{IdentifierType, Product};
use rusqlite::{params, OptionalExtension, ToSql};

impl CatalogStore {
    fn find_one(&self, filter: &str, args: &[&dyn ToSql]) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p
             WHERE p.id IN (SELECT i.product_id FROM identifiers i WHERE {filter})
             ORDER BY p.id
             LIMIT 1"
        ))?;
        Ok(stmt.query_row(args, product_from_row).optional()?)
    }

    /// Product owning an identifier with exactly this type and value.
    pub fn find_by_identifier_exact(&self, kind: &IdentifierType, value: &str) -> Result<Option<Product>> {
        self.find_one(
            "i.identifier_type = ?1 AND i.identifier_value = ?2",
            params![kind.as_str(), value],
        )
    }

    /// Product owning an identifier whose value starts with `prefix`.
    pub fn find_by_identifier_prefix(
        &self,
        kind: &IdentifierType,
        prefix: &str,
    ) -> Result<Option<Product>> {
        let pattern = format!("{}%", escape_like(prefix));
        self.find_one(
            "i.identifier_type = ?1 AND i.identifier_value LIKE ?2 ESCAPE '\\'",
            params![kind.as_str(), pattern],
        )
    }

    /// Case-insensitive variant of [`Self::find_by_identifier_exact`].
    pub fn find_by_identifier_ci(
        &self,
        kind: &IdentifierType,
        value: &str,
    ) -> Result<Option<Product>> {
        self.find_one(
            "i.identifier_type = ?1 AND LOWER(i.identifier_value) = LOWER(?2)",
            params![kind.as_str(), value],
        )
    }

    /// Case-insensitive variant of [`Self::find_by_identifier_prefix`].
    pub fn find_by_identifier_prefix_ci(
        &self,
        kind: &IdentifierType,
        prefix: &str,
    ) -> Result<Option<Product>> {
        let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
        self.find_one(
            "i.identifier_type = ?1 AND LOWER(i.identifier_value) LIKE ?2 ESCAPE '\\'",
            params![kind.as_str(), pattern],
        )
    }

    /// Product with a PURL identifier under `pkg:<purl_type>/` whose name,
    /// with or without one namespace segment, starts with `name`.
    ///
    /// `find_by_purl_namespace("deb", "openssl")` matches both
    /// `pkg:deb/openssl` and `pkg:deb/debian/openssl`. Case-insensitive.
    pub fn find_by_purl_namespace(&self, purl_type: &str, name: &str) -> Result<Option<Product>> {
        let ty = escape_like(&purl_type.to_lowercase());
        let name = escape_like(&name.to_lowercase());
        let direct = format!("pkg:{ty}/{name}%");
        let namespaced = format!("pkg:{ty}/%/{name}%");
        self.find_one(
            "i.identifier_type = 'purl'
             AND (LOWER(i.identifier_value) LIKE ?1 ESCAPE '\\'
                  OR LOWER(i.identifier_value) LIKE ?2 ESCAPE '\\')",
            params![direct, namespaced],
        )
    }

    /// Product whose name equals `name`, ignoring case.
    pub fn find_by_name_ci(&self, name: &str) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p
             WHERE LOWER(p.name) = LOWER(?1)
             ORDER BY p.id
             LIMIT 1"
        ))?;
        Ok(stmt.query_row(params![name], product_from_row).optional()?)
    }

    /// Product listing `name` among its aliases. Matches one element of the
    /// stored alias array, ignoring ASCII case.
    pub fn find_by_alias(&self, name: &str) -> Result<Option<Product>> {
        let quoted = serde_json::to_string(name).unwrap_or_default();
        let pattern = format!("%{}%", escape_like(&quoted));
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p
             WHERE p.aliases LIKE ?1 ESCAPE '\\'
             ORDER BY p.id"
        ))?;
        // LIKE also matches inside longer JSON strings; confirm on the decoded list.
        let rows = stmt.query_map(params![pattern], product_from_row)?;
        for row in rows {
            let product = row?;
            if product.aliases.iter().any(|a| a.eq_ignore_ascii_case(name)) {
                return Ok(Some(product));
            }
        }
        Ok(None)
    }
}

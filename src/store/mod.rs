//! Persistent catalog of products, release cycles and identifiers.
//!
//! The store is a single SQLite database. Writes come only from the sync
//! engine; everything else reads. A [`CatalogStore`] wraps one connection
//! behind a mutex so it can be shared across threads, and file-backed stores
//! can hand out additional read-only handles with [`CatalogStore::reader`]
//! so parallel lookups do not contend on one lock.
//!
//! ```ignore
//! let store = CatalogStore::open(&default_db_path())?;
//! let cycles = store.cycles_for_product("python")?;
//! ```

mod lookup;
mod read;
mod schema;
mod stats;
mod write;

pub use stats::CatalogStats;

use crate::error::{EolScanError, Result, StoreErrorKind};
use crate::model::{Cycle, Milestone, Product};
use rusqlite::{Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Default location of the catalog database: `<data dir>/eol-scanner/eol.db`.
#[must_use]
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eol-scanner")
        .join("eol.db")
}

/// SQLite-backed EOL catalog.
#[derive(Debug)]
pub struct CatalogStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
    read_only: bool,
}

impl CatalogStore {
    /// Open (or create) a catalog at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| EolScanError::io(parent, e))?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(path.to_path_buf()),
            read_only: false,
        };
        store.initialize()?;
        tracing::debug!("Opened catalog at {}", path.display());
        Ok(store)
    }

    /// Open an existing catalog without write access.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(path.to_path_buf()),
            read_only: true,
        })
    }

    /// Create an in-memory catalog (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
            read_only: false,
        };
        store.initialize()?;
        Ok(store)
    }

    /// An independent read-only handle on the same database file.
    ///
    /// In-memory catalogs cannot be shared across connections and yield `None`.
    pub fn reader(&self) -> Result<Option<Self>> {
        match &self.db_path {
            Some(path) => Self::open_read_only(path).map(Some),
            None => Ok(None),
        }
    }

    /// Path of the backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;
        // In-memory databases reject WAL and keep their own journal mode.
        if self.db_path.is_some() {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            tracing::trace!("journal_mode={mode}");
        }

        conn.execute_batch(schema::SCHEMA_SQL)?;

        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version < schema::SCHEMA_VERSION {
            conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        }
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| EolScanError::store("acquiring connection", StoreErrorKind::Poisoned))
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn decode_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn flag_to_sql(flag: Option<bool>) -> Option<i64> {
    flag.map(i64::from)
}

fn sql_to_flag(value: Option<i64>) -> Option<bool> {
    value.map(|v| v != 0)
}

/// Map a row selected with [`schema::PRODUCT_COLUMNS`].
fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        label: row.get(3)?,
        link: row.get(4)?,
        version_command: row.get(5)?,
        aliases: decode_list(row.get(6)?),
        tags: decode_list(row.get(7)?),
        content_hash: row.get(8)?,
    })
}

/// Map a row selected with [`schema::CYCLE_COLUMNS`], starting at `offset`.
fn cycle_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Cycle> {
    let eol_date: Option<String> = row.get(offset + 4)?;
    let eol_flag: Option<i64> = row.get(offset + 5)?;
    let support_date: Option<String> = row.get(offset + 8)?;
    let support_flag: Option<i64> = row.get(offset + 9)?;
    Ok(Cycle {
        name: row.get(offset)?,
        label: row.get(offset + 1)?,
        codename: row.get(offset + 2)?,
        release_date: row.get(offset + 3)?,
        eol: Milestone::from_parts(sql_to_flag(eol_flag), eol_date.as_deref()),
        is_lts: row.get::<_, i64>(offset + 6)? != 0,
        lts_from: row.get(offset + 7)?,
        support: Milestone::from_parts(sql_to_flag(support_flag), support_date.as_deref()),
        is_maintained: row.get::<_, i64>(offset + 10)? != 0,
        latest_version: row.get(offset + 11)?,
        latest_release_date: row.get(offset + 12)?,
        latest_link: row.get(offset + 13)?,
    })
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

//! Upstream catalog sources.
//!
//! The sync engine pulls the full product list through the
//! [`CatalogSource`] trait:
//!
//! - [`EndOfLifeClient`]: live HTTP source for endoflife.date (`remote` feature)
//! - [`SnapshotSource`]: a previously saved `products/full` response on disk
//! - [`StaticSource`]: in-memory records, mainly for tests

mod client;
mod records;
mod snapshot;

pub use client::{EndOfLifeClient, EndOfLifeConfig, DEFAULT_BASE_URL};
pub use records::{
    IdentifierRecord, LatestRecord, ProductRecord, ProductsResponse, ReleaseRecord,
};
pub use snapshot::{save_snapshot, SnapshotSource};

use crate::error::Result;
use crate::sync::CancelToken;

/// A provider of raw upstream product records.
///
/// Implementations must check `cancel` before doing any I/O and return
/// `Err(Cancelled)` when it is set.
pub trait CatalogSource: Send + Sync {
    /// Fetch the complete upstream product list.
    fn fetch_products(&self, cancel: &CancelToken) -> Result<Vec<ProductRecord>>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// A source backed by records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<ProductRecord>,
}

impl StaticSource {
    #[must_use]
    pub const fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }
}

impl CatalogSource for StaticSource {
    fn fetch_products(&self, cancel: &CancelToken) -> Result<Vec<ProductRecord>> {
        cancel.check()?;
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} products)", self.records.len())
    }
}

impl<S: CatalogSource + ?Sized> CatalogSource for Box<S> {
    fn fetch_products(&self, cancel: &CancelToken) -> Result<Vec<ProductRecord>> {
        (**self).fetch_products(cancel)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

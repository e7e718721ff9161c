//! Offline snapshots of the upstream catalog.

use super::client::parse_products;
use super::{CatalogSource, ProductRecord};
use crate::error::{EolScanError, Result};
use crate::sync::CancelToken;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a saved `products/full` response from disk.
///
/// Both the full `{result, total}` envelope and a bare array of products are
/// accepted.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for SnapshotSource {
    fn fetch_products(&self, cancel: &CancelToken) -> Result<Vec<ProductRecord>> {
        cancel.check()?;
        let body = fs::read_to_string(&self.path).map_err(|e| EolScanError::io(&self.path, e))?;
        tracing::info!("Loading product catalog from {}", self.path.display());

        let records = if body.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<ProductRecord>>(&body).map_err(|e| {
                EolScanError::upstream(
                    format!("parsing snapshot {}", self.path.display()),
                    crate::error::SourceErrorKind::InvalidResponse(e.to_string()),
                )
            })?
        } else {
            parse_products(&body)?
        };
        cancel.check()?;
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }
}

/// Write a raw upstream body to `path`, creating parent directories.
pub fn save_snapshot(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| EolScanError::io(parent, e))?;
    }
    fs::write(path, body).map_err(|e| EolScanError::io(path, e))?;
    tracing::info!("Saved catalog snapshot to {}", path.display());
    Ok(())
}

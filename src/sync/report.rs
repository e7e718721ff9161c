//! Sync outcome accounting.

use indexmap::IndexMap;
use serde::Serialize;
use std::time::Duration;

/// Per-item result recorded during a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Succeeded { item: String },
    Skipped { item: String, reason: String },
    Failed { item: String, error: String },
}

impl ItemOutcome {
    #[must_use]
    pub fn item(&self) -> &str {
        match self {
            Self::Succeeded { item } | Self::Skipped { item, .. } | Self::Failed { item, .. } => {
                item
            }
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Summary of a full sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub products_processed: usize,
    /// Cycles inserted or changed
    pub cycles_processed: usize,
    /// Cycles whose content hash was already current
    pub cycles_unchanged: usize,
    pub identifiers_processed: usize,
    pub identifiers_pruned: usize,
    pub errors: usize,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    /// Upstream product count per synced category
    pub categories: IndexMap<String, usize>,
    pub outcomes: Vec<ItemOutcome>,
}

fn serialize_duration<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl SyncReport {
    pub(crate) fn succeeded(&mut self, item: impl Into<String>) {
        self.outcomes.push(ItemOutcome::Succeeded { item: item.into() });
    }

    pub(crate) fn skipped(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        let (item, reason) = (item.into(), reason.into());
        tracing::debug!("Skipped {item}: {reason}");
        self.outcomes.push(ItemOutcome::Skipped { item, reason });
    }

    pub(crate) fn failed(&mut self, item: impl Into<String>, error: impl std::fmt::Display) {
        let item = item.into();
        let error = error.to_string();
        tracing::warn!("Failed to sync {item}: {error}");
        self.errors += 1;
        self.outcomes.push(ItemOutcome::Failed { item, error });
    }

    /// Failed items only.
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Emit the one-line completion summary.
    pub fn log_summary(&self) {
        tracing::info!(
            "Sync complete in {:.1}s: {} products, {} cycles changed ({} unchanged), {} identifiers, {} errors",
            self.duration.as_secs_f64(),
            self.products_processed,
            self.cycles_processed,
            self.cycles_unchanged,
            self.identifiers_processed,
            self.errors
        );
    }
}

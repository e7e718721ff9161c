//! **An offline end-of-life catalog for container components.**
//!
//! `eol-scanner` keeps a local SQLite copy of the [endoflife.date] catalog
//! (categories, products, release cycles and their package identifiers) and
//! uses it to decide whether the components found in a container image are
//! still supported.
//!
//! [endoflife.date]: https://endoflife.date
//!
//! ## Core Concepts & Modules
//!
//! - **[`store`]**: [`CatalogStore`], the SQLite catalog with hash-gated upserts
//!   and the identifier lookups used by resolution.
//! - **[`sync`]**: [`SyncEngine`] pulls the full upstream product list from a
//!   [`source::CatalogSource`] and writes it into the store, best effort per item.
//! - **[`resolve`]**: [`Resolver`] maps a component (name, version, PURL, CPEs)
//!   to a catalog product through an ordered chain of strategies.
//! - **[`evaluate`]**: picks the release cycle for a version and classifies it
//!   as active, EOL soon, EOL, or unknown.
//! - **[`scan`]**: [`Scanner`] ties the above together for a whole inventory.
//! - **[`reports`]**: table, summary and JSON renderers.
//!
//! ## Getting Started
//!
//! ```no_run
//! use eol_scanner::{CatalogStore, Inventory, ScanOptions, Scanner};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = CatalogStore::open(Path::new("eol.db"))?;
//!     let inventory = Inventory::from_path(Path::new("inventory.json"))?;
//!
//!     let summary = Scanner::new(&store, ScanOptions::default()).scan(&inventory)?;
//!     for component in summary.eol_components() {
//!         println!("{} {} is {}", component.name, component.version, component.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Syncing the Catalog
//!
//! ```no_run
//! use eol_scanner::source::{EndOfLifeClient, EndOfLifeConfig};
//! use eol_scanner::sync::{default_categories, CancelToken, SyncEngine};
//! use eol_scanner::CatalogStore;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = CatalogStore::open(Path::new("eol.db"))?;
//!     let client = EndOfLifeClient::new(EndOfLifeConfig::default())?;
//!
//!     let report = SyncEngine::new(&store, &client)
//!         .full_sync(&default_categories(), &CancelToken::new())?;
//!     println!("{} products synced", report.products_processed);
//!     Ok(())
//! }
//! ```

#![warn(clippy::unwrap_used)]

pub mod cli;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod reports;
pub mod resolve;
pub mod scan;
pub mod source;
pub mod store;
pub mod sync;
pub mod utils;

pub use error::{EolScanError, ErrorContext, Result};
pub use evaluate::{evaluate, evaluate_at, match_cycle, DEFAULT_FORWARD_LOOKUP_DAYS};
pub use model::{
    ComponentDescriptor, Cycle, EolStatus, Evaluation, Identifier, IdentifierType, Milestone,
    OsDescriptor, Product,
};
pub use reports::{ReportFormat, ReportGenerator};
pub use resolve::{LookupTables, MatchStrategy, Resolution, Resolver};
pub use scan::{Inventory, ScanOptions, ScanSummary, Scanner};
pub use store::{CatalogStats, CatalogStore};
pub use sync::{CancelToken, SyncEngine, SyncOptions, SyncReport};

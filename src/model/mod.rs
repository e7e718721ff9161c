//! Data model for the EOL catalog and scan inputs.
//!
//! Catalog types mirror the persisted record sets (categories, products,
//! cycles, identifiers, sync metadata). Component and OS descriptors are the
//! inputs handed over by an external SBOM generator, and [`Evaluation`] is
//! what the evaluator produces for each of them.

mod catalog;
mod component;
mod status;

pub use catalog::*;
pub use component::*;
pub use status::*;

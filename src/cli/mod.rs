//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod db;
pub mod output;
mod scan;

pub use db::{
    build_source, open_store, run_db_cycles, run_db_eol, run_db_path, run_db_products,
    run_db_stats, run_db_sync,
};
pub use output::{exit_codes, should_use_color, write_output, OutputTarget};
pub use scan::run_scan;

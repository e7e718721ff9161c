//! Shared utilities.

mod duration;
mod hash;

pub use duration::{format_duration, parse_duration, DurationParseError};
pub use hash::{content_hash, content_hash_hex};

#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz inventory parsing.
///
/// Covers format detection and both the native and syft layouts, including
/// PURL-derived package types.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = eol_scanner::Inventory::parse(s);
    }
});

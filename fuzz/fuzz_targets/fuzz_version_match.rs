#![no_main]
use eol_scanner::resolve::strip_purl_version;
use eol_scanner::{evaluate, Cycle};
use libfuzzer_sys::fuzz_target;

/// Fuzz cycle selection and PURL version stripping with arbitrary strings.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let (version, cycle) = s.split_once('\n').unwrap_or((s, ""));
    let cycles = [Cycle::new(cycle)];
    let _ = evaluate(&cycles, version, 90);
    let _ = strip_purl_version(version);
});

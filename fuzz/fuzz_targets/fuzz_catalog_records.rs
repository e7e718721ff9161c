#![no_main]
use eol_scanner::source::ProductsResponse;
use libfuzzer_sys::fuzz_target;

/// Fuzz decoding of upstream `products/full` payloads and their conversion
/// into store rows.
fuzz_target!(|data: &[u8]| {
    if let Ok(response) = serde_json::from_slice::<ProductsResponse>(data) {
        for record in &response.result {
            let product = record.to_product();
            let _ = product.content_hash();
            let _ = record.to_identifiers();
            for release in &record.releases {
                let _ = release.to_cycle().content_hash();
            }
        }
    }
});

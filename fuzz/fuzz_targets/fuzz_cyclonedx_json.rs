#![no_main]
use libfuzzer_sys::fuzz_target;
use sit::formats::CycloneDxAdapter;
use sit::FormatAdapter;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the CycloneDX decoder directly.
///
/// Also wraps the input in a minimal CycloneDX envelope so it reaches
/// component decoding instead of failing on the document header.
fuzz_target!(|data: &[u8]| {
    let adapter = CycloneDxAdapter::new();
    let _ = adapter.decode(data);

    if let Ok(s) = std::str::from_utf8(data) {
        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"{{"bomFormat":"CycloneDX","specVersion":"1.5","components":[{s}]}}"#,
            );
            let _ = adapter.decode(wrapped.as_bytes());
        }
    }
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use sit::formats::OssbomAdapter;
use sit::FormatAdapter;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the OSSBOM decoder directly.
///
/// Also wraps the input in a minimal OSSBOM envelope so it reaches
/// component decoding instead of failing on the document header.
fuzz_target!(|data: &[u8]| {
    let adapter = OssbomAdapter::new();
    let _ = adapter.decode(data);

    if let Ok(s) = std::str::from_utf8(data) {
        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"{{"Format":"OSSBOM","Version":"1.0","Components":[{s}]}}"#,
            );
            let _ = adapter.decode(wrapped.as_bytes());
        }
    }
});

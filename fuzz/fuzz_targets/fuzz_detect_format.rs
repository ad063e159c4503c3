#![no_main]
use libfuzzer_sys::fuzz_target;
use sit::FormatRegistry;

fuzz_target!(|data: &[u8]| {
    let _ = FormatRegistry::new().detect(data);
});

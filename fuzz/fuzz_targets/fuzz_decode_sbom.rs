#![no_main]
use libfuzzer_sys::fuzz_target;
use sit::formats::EncodeOptions;
use sit::model::SbomFormat;
use sit::ConversionGateway;

/// Fuzz detection plus decode, and re-encode anything that decodes.
///
/// A decoded graph must always encode to middleware without error.
fuzz_target!(|data: &[u8]| {
    let gateway = ConversionGateway::new();
    if let Ok(sbom) = gateway.decode(data, None) {
        let encoded = gateway.convert(&sbom, SbomFormat::Middleware, &EncodeOptions::default());
        assert!(encoded.is_ok(), "decoded graph failed to encode: {encoded:?}");
    }
});

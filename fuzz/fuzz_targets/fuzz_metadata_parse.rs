#![no_main]

use libfuzzer_sys::fuzz_target;

use autonomix_datashare::DataMetadata;

// Arbitrary JSON fed to the metadata parser must never panic. Accepted
// metadata is valid and re-parses to the same value.
fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(metadata) = DataMetadata::from_json(json) {
        assert!(metadata.validate().is_ok());
        let reparsed = DataMetadata::from_json(&metadata.to_json()).expect("re-encoded metadata must parse");
        assert_eq!(reparsed, metadata);
    }
});

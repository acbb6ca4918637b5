#![no_main]

use libfuzzer_sys::fuzz_target;

use autonomix_node::DposSnapshot;

// Decoding arbitrary bytes as a snapshot must return an error, not panic.
// Whatever decodes must encode back to bytes that decode identically.
fuzz_target!(|data: &[u8]| {
    if let Ok(snapshot) = DposSnapshot::from_bytes(data) {
        let bytes = snapshot.to_bytes().expect("decoded snapshot must encode");
        let again = DposSnapshot::from_bytes(&bytes).expect("re-encoded snapshot must decode");
        assert_eq!(again, snapshot);
    }
});

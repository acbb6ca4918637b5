#![no_main]

use libfuzzer_sys::fuzz_target;

use autonomix_types::{Address, DataHash};

// Parsing arbitrary text as an address or data hash must never panic, and
// anything accepted must survive a display/parse round trip.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(address) = text.parse::<Address>() {
        let reparsed: Address = address
            .to_string()
            .parse()
            .expect("displayed address must parse");
        assert_eq!(reparsed, address);
    }

    if let Ok(hash) = text.parse::<DataHash>() {
        let reparsed: DataHash = hash.to_string().parse().expect("displayed hash must parse");
        assert_eq!(reparsed, hash);
    }
});

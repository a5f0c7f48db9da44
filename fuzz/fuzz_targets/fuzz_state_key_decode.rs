#![no_main]

use libfuzzer_sys::fuzz_target;

use attest_store::StateKey;

// Decoding arbitrary bytes must never panic, and whatever decodes must
// encode back to the same bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(key) = StateKey::decode(data) {
        assert_eq!(key.encode(), data);
    }
});

#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through the decoder. Err results are expected and
    // fine; what we verify is no panics, no UB, and that every successful
    // decode satisfies the sibling-skip invariant.
    if let Ok((tags, values)) = msgpack_flat::decode(data) {
        assert_eq!(tags.len(), values.len());

        // Every container's sibling-skip must stay in bounds and land on a
        // slot index no earlier than its own.
        for (i, tag) in tags.iter().enumerate() {
            if tag.is_container() {
                let xoff = values[i].xoff() as usize;
                assert!(i + xoff <= tags.len(), "sibling-skip escapes the array");
                assert!(xoff >= 1, "sibling-skip must move forward at least one slot");
            }
        }
    }
});

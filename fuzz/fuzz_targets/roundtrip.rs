#![no_main]
use libfuzzer_sys::fuzz_target;
use msgpack_flat::{decode, encode};

fuzz_target!(|data: &[u8]| {
    // If `data` happens to be well-formed MessagePack, decoding it and
    // re-encoding (using `data` itself as bank1) must reach a fixed point
    // after at most one normalisation pass: encoding the result a second
    // time must reproduce the first encode's bytes exactly.
    let Ok((tags, values)) = decode(data) else {
        return;
    };
    let Ok(first_pass) = encode(&tags, &values, data, &[]) else {
        return;
    };

    let (tags2, values2) = decode(&first_pass).expect("encoder output must itself be valid msgpack");
    assert_eq!(tags, tags2, "tag sequence must be stable after one round-trip");

    let second_pass = encode(&tags2, &values2, &first_pass, &[])
        .expect("re-encoding a just-encoded array must not fail");
    assert_eq!(
        first_pass, second_pass,
        "encoding should reach a fixed point after the first normalisation pass"
    );
});

// Integration tests for the public encode/encode_with_capacity surface.

use msgpack_flat::{encode, encode_with_capacity, EncodeError, Tag, Value};

#[test]
fn encode_with_capacity_below_the_floor_still_succeeds() {
    let bytes = encode_with_capacity(&[Tag::Nil], &[Value::unused()], &[], &[], 0).unwrap();
    assert_eq!(bytes, vec![0xc0]);
}

#[test]
fn encode_picks_the_shortest_container_wire_form_at_every_size_boundary() {
    // 15 elements still fits fixarray; 16 forces array16.
    let small_tags: Vec<Tag> = std::iter::once(Tag::Array)
        .chain(std::iter::repeat(Tag::LongInt).take(15))
        .collect();
    let small_values: Vec<Value> = std::iter::once(Value::xlen_xoff(15, 16))
        .chain(std::iter::repeat(Value::long(1)).take(15))
        .collect();
    let bytes = encode(&small_tags, &small_values, &[], &[]).unwrap();
    assert_eq!(bytes[0], 0x9f); // fixarray with 15 elements

    let big_tags: Vec<Tag> = std::iter::once(Tag::Array)
        .chain(std::iter::repeat(Tag::LongInt).take(16))
        .collect();
    let big_values: Vec<Value> = std::iter::once(Value::xlen_xoff(16, 17))
        .chain(std::iter::repeat(Value::long(1)).take(16))
        .collect();
    let bytes = encode(&big_tags, &big_values, &[], &[]).unwrap();
    assert_eq!(bytes[0], 0xdc); // array16
    assert_eq!(&bytes[1..3], &16u16.to_be_bytes());
}

#[test]
fn encode_unknown_tag_error_is_distinguishable_from_alloc_failed() {
    assert_ne!(EncodeError::UnknownTag, EncodeError::AllocFailed);
}

#[test]
fn encode_bin_never_uses_a_fixed_short_form() {
    // Unlike Str, Bin has no "fix" form; even a 1-byte payload uses bin8.
    let bank1 = [0xaa];
    let tags = vec![Tag::Bin];
    let values = vec![Value::xlen_xoff(1, 1)];
    let bytes = encode(&tags, &values, &bank1, &[]).unwrap();
    assert_eq!(bytes[0], 0xc4);
    assert_eq!(bytes[1], 1);
    assert_eq!(bytes[2], 0xaa);
}

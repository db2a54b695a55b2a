// Integration tests for the public decode/decode_with_capacity surface.

use msgpack_flat::{decode, decode_with_capacity, DecodeError};

#[test]
fn decode_with_capacity_below_the_floor_still_succeeds() {
    // Hint of 0 is floored internally; it must not be treated as "no room".
    let (tags, values) = decode_with_capacity(&[0xc0], 0).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(values.len(), 1);
}

#[test]
fn decode_with_capacity_large_hint_does_not_change_the_result() {
    let (tags, _) = decode_with_capacity(&[0x91, 0x01], 10_000).unwrap();
    assert_eq!(tags.len(), 2);
}

#[test]
fn decode_underflow_and_reserved_byte_are_distinguishable() {
    assert_eq!(decode(&[]), Err(DecodeError::Underflow));
    assert_eq!(decode(&[0xc1]), Err(DecodeError::ReservedByte));
    assert_ne!(DecodeError::Underflow, DecodeError::ReservedByte);
}

#[test]
fn decode_handles_every_container_opcode_family() {
    // fixmap, map16, fixarray, array16 all open a container; confirm each
    // produces the expected tag/xlen without mixing up the wire forms.
    let fixmap = [0x80]; // {}
    let (tags, values) = decode(&fixmap).unwrap();
    assert_eq!(tags, vec![msgpack_flat::Tag::Map]);
    assert_eq!(values[0].xlen(), 0);

    let map16 = [0xde, 0x00, 0x00]; // {} via map16
    let (tags, values) = decode(&map16).unwrap();
    assert_eq!(tags, vec![msgpack_flat::Tag::Map]);
    assert_eq!(values[0].xlen(), 0);

    let fixarray = [0x90]; // []
    let (tags, _) = decode(&fixarray).unwrap();
    assert_eq!(tags, vec![msgpack_flat::Tag::Array]);

    let array16 = [0xdc, 0x00, 0x00]; // [] via array16
    let (tags, _) = decode(&array16).unwrap();
    assert_eq!(tags, vec![msgpack_flat::Tag::Array]);
}

#[test]
fn decode_bin_families_agree_on_xlen() {
    let bin8 = [0xc4, 0x02, 0xaa, 0xbb];
    let (tags, values) = decode(&bin8).unwrap();
    assert_eq!(tags, vec![msgpack_flat::Tag::Bin]);
    assert_eq!(values[0].xlen(), 2);
}

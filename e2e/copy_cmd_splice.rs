//! E2E Test Suite: CopyCmd Splicing
//!
//! `CopyCmd` is encoder-only: it never comes out of [`decode`], but a
//! preprocessor sitting between decode and encode can overwrite any slot with
//! one to splice in bytes from `bank2` without touching the rest of the
//! flattened array. These tests exercise that mechanism beyond the single
//! literal scenario covered in `boundary_scenarios.rs`.

use msgpack_flat::{decode, encode, Tag, Value};

#[test]
fn copy_cmd_replaces_one_element_in_a_larger_array() {
    // [1, nil, 3] — splice bank2's pre-encoded `true` over the middle slot.
    let (mut tags, mut values) = decode(&[0x93, 0x01, 0xc0, 0x03]).unwrap();
    assert_eq!(tags, vec![Tag::Array, Tag::LongInt, Tag::Nil, Tag::LongInt]);

    let bank2 = [0xc3u8];
    tags[2] = Tag::CopyCmd;
    values[2] = Value::xlen_xoff(1, 1);

    let bytes = encode(&tags, &values, &[], &bank2).unwrap();
    assert_eq!(bytes, vec![0x93, 0x01, 0xc3, 0x03]);
}

#[test]
fn copy_cmd_splices_a_multi_byte_payload_from_bank2() {
    // Splice a whole string in from bank2, replacing a Nil.
    let (mut tags, mut values) = decode(&[0x91, 0xc0]).unwrap();
    let bank2 = b"\xa5hello";
    tags[1] = Tag::CopyCmd;
    values[1] = Value::xlen_xoff(bank2.len() as u32, bank2.len() as u32);

    let bytes = encode(&tags, &values, &[], bank2).unwrap();
    assert_eq!(bytes, vec![0x91, 0xa5, b'h', b'e', b'l', b'l', b'o']);
}

#[test]
fn copy_cmd_reverts_to_bank1_for_the_following_element() {
    // A Str element right after a CopyCmd must still read from bank1, not
    // bank2 — the bank switch is one-shot.
    let tags = vec![Tag::CopyCmd, Tag::Str];
    let bank1 = b"bank1";
    let bank2 = b"\xc3";
    let values = vec![
        Value::xlen_xoff(1, bank2.len() as u32),
        Value::xlen_xoff(4, 4), // last 4 bytes of bank1: "ank1"
    ];
    let bytes = encode(&tags, &values, bank1, bank2).unwrap();
    assert_eq!(bytes[0], 0xc3);
    // Remaining bytes are the str header + the last 4 bytes of bank1.
    assert_eq!(&bytes[1..], b"\xa4ank1");
}

#[test]
fn copy_cmd_chain_of_multiple_splices() {
    // Three consecutive CopyCmds, each pulling a different slice of bank2.
    let bank2 = b"ABCDEF";
    let tags = vec![Tag::CopyCmd, Tag::CopyCmd, Tag::CopyCmd];
    let values = vec![
        Value::xlen_xoff(2, 6), // "AB"
        Value::xlen_xoff(2, 4), // "CD"
        Value::xlen_xoff(2, 2), // "EF"
    ];
    let bytes = encode(&tags, &values, &[], bank2).unwrap();
    assert_eq!(bytes, b"ABCDEF");
}

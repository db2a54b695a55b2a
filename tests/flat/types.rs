// Integration tests for the public Tag/Value surface.
//
// Exercises the parts of flat::types reachable without crate-internal
// access: discriminant round-tripping, the container/payload classifiers,
// and the packed xlen/xoff accessors.

use msgpack_flat::{Tag, Value};

#[test]
fn tag_from_u8_round_trips_every_valid_discriminant() {
    let valid = [
        (1u8, Tag::Nil),
        (2, Tag::False),
        (3, Tag::True),
        (4, Tag::LongInt),
        (5, Tag::UlongInt),
        (6, Tag::Float32),
        (7, Tag::Float64),
        (8, Tag::Str),
        (9, Tag::Bin),
        (10, Tag::Ext),
        (11, Tag::Array),
        (12, Tag::Map),
        (20, Tag::CopyCmd),
    ];
    for (byte, tag) in valid {
        assert_eq!(Tag::from_u8(byte), Some(tag));
    }
}

#[test]
fn tag_from_u8_rejects_the_reserved_gap_and_out_of_range_bytes() {
    // 13..=19 is the original source's unused gap between Map and CopyCmd.
    for byte in 13u8..=19 {
        assert_eq!(Tag::from_u8(byte), None);
    }
    assert_eq!(Tag::from_u8(0), None);
    assert_eq!(Tag::from_u8(255), None);
}

#[test]
fn is_container_is_true_only_for_array_and_map() {
    assert!(Tag::Array.is_container());
    assert!(Tag::Map.is_container());
    for tag in [
        Tag::Nil,
        Tag::False,
        Tag::True,
        Tag::LongInt,
        Tag::UlongInt,
        Tag::Float32,
        Tag::Float64,
        Tag::Str,
        Tag::Bin,
        Tag::Ext,
        Tag::CopyCmd,
    ] {
        assert!(!tag.is_container());
    }
}

#[test]
fn has_payload_is_true_only_for_bank_addressing_tags() {
    for tag in [Tag::Str, Tag::Bin, Tag::Ext, Tag::CopyCmd] {
        assert!(tag.has_payload());
    }
    for tag in [Tag::Nil, Tag::False, Tag::True, Tag::LongInt, Tag::Array, Tag::Map] {
        assert!(!tag.has_payload());
    }
}

#[test]
fn value_xlen_xoff_packs_and_unpacks_independently() {
    let v = Value::xlen_xoff(0x1234_5678, 0x9abc_def0);
    assert_eq!(v.xlen(), 0x1234_5678);
    assert_eq!(v.xoff(), 0x9abc_def0);
}

#[test]
fn value_set_xoff_preserves_xlen() {
    let mut v = Value::xlen_xoff(7, 1);
    v.set_xoff(99);
    assert_eq!(v.xlen(), 7);
    assert_eq!(v.xoff(), 99);
}

#[test]
fn value_long_and_ulong_share_bit_pattern_for_non_negative_values() {
    let v = Value::long(42);
    assert_eq!(v.as_long(), 42);
    assert_eq!(v.as_ulong(), 42);
}

#[test]
fn value_double_round_trips_through_bit_pattern() {
    let v = Value::double(std::f64::consts::PI);
    assert_eq!(v.as_double(), std::f64::consts::PI);
}

#[test]
fn value_default_is_unused() {
    assert_eq!(Value::default(), Value::unused());
}

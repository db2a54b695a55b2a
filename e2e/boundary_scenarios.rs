//! E2E Test Suite: Boundary Scenarios
//!
//! The seven literal scenarios from the codec's design notes — the smallest
//! inputs that exercise each distinct code path in the decoder and encoder.

use msgpack_flat::{decode, encode, DecodeError, Tag, Value};

// ═════════════════════════════════════════════════════════════════════════════
// Scenario 1: empty input underflows
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_1_empty_input_fails() {
    let result = decode(&[]);
    assert_eq!(result, Err(DecodeError::Underflow));
}

// ═════════════════════════════════════════════════════════════════════════════
// Scenario 2: Nil round-trips
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_2_nil_round_trips() {
    let (tags, values) = decode(&[0xc0]).expect("nil decodes");
    assert_eq!(tags, vec![Tag::Nil]);
    assert_eq!(values.len(), 1);

    let bytes = encode(&tags, &values, &[], &[]).expect("nil encodes");
    assert_eq!(bytes, vec![0xc0]);
}

// ═════════════════════════════════════════════════════════════════════════════
// Scenario 3: fixarray of one positive fixint round-trips
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_3_fixarray_of_one_fixint_round_trips() {
    let input = [0x91, 0x01];
    let (tags, values) = decode(&input).expect("fixarray decodes");
    assert_eq!(tags, vec![Tag::Array, Tag::LongInt]);
    assert_eq!(values[0].xlen(), 1);
    assert_eq!(values[0].xoff(), 2);
    assert_eq!(values[1].as_long(), 1);

    let bytes = encode(&tags, &values, &input, &[]).expect("fixarray encodes");
    assert_eq!(bytes, input);
}

// ═════════════════════════════════════════════════════════════════════════════
// Scenario 4: fixmap {"a":1,"b":2} round-trips byte-identically
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_4_fixmap_round_trips() {
    let input = [0x82, 0xa1, 0x61, 0x01, 0xa1, 0x62, 0x02];
    let (tags, values) = decode(&input).expect("fixmap decodes");
    assert_eq!(
        tags,
        vec![Tag::Map, Tag::Str, Tag::LongInt, Tag::Str, Tag::LongInt]
    );
    assert_eq!(values[0].xlen(), 2);
    assert_eq!(values[0].xoff(), 5);

    let bytes = encode(&tags, &values, &input, &[]).expect("fixmap encodes");
    assert_eq!(bytes, input);
}

// ═════════════════════════════════════════════════════════════════════════════
// Scenario 5: reserved byte 0xc1 is rejected
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_5_reserved_byte_fails() {
    let result = decode(&[0xc1]);
    assert_eq!(result, Err(DecodeError::ReservedByte));
}

// ═════════════════════════════════════════════════════════════════════════════
// Scenario 6: uint 64 max round-trips through UlongInt
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_6_uint64_max_round_trips() {
    let input = [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    let (tags, values) = decode(&input).expect("uint64 max decodes");
    assert_eq!(tags, vec![Tag::UlongInt]);
    assert_eq!(values[0].as_ulong(), u64::MAX);

    let bytes = encode(&tags, &values, &[], &[]).expect("uint64 max encodes");
    assert_eq!(bytes, input);
}

// ═════════════════════════════════════════════════════════════════════════════
// Scenario 7: CopyCmd splice replaces Nil with true using bank2
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_7_copy_cmd_splices_true_over_nil() {
    // Decode an array containing a single Nil…
    let (mut tags, mut values) = decode(&[0x91, 0xc0]).expect("array of nil decodes");
    assert_eq!(tags, vec![Tag::Array, Tag::Nil]);

    // …then a preprocessor splices in a CopyCmd pointing at bank2's
    // pre-encoded `true` byte in place of the Nil.
    let bank2 = [0xc3u8];
    tags[1] = Tag::CopyCmd;
    values[1] = Value::xlen_xoff(1, 1);

    let bytes = encode(&tags, &values, &[], &bank2).expect("spliced array encodes");
    assert_eq!(bytes, vec![0x91, 0xc3]);
}

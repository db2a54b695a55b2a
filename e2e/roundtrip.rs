//! E2E Test Suite: Round-Trip Laws
//!
//! Decode-then-encode must reproduce byte-identical output for inputs
//! already in MessagePack's minimal wire form, and encode-then-decode must be
//! the identity on `(tags, values)` — both up to the documented integer/float
//! normalisation rules (an oversize uint re-emerges as the shortest signed or
//! unsigned form that still holds its value).

use msgpack_flat::{decode, encode, Tag};

fn assert_decode_then_encode_identity(input: &[u8]) {
    let (tags, values) = decode(input).expect("input is well-formed");
    let bytes = encode(&tags, &values, input, &[]).expect("decoded form re-encodes");
    assert_eq!(bytes, input, "decode-then-encode should be byte-identical for minimal-form input");
}

fn assert_encode_then_decode_identity(tags: &[Tag], values: &[msgpack_flat::Value], bank1: &[u8]) {
    let bytes = encode(tags, values, bank1, &[]).expect("encode succeeds");
    let (decoded_tags, decoded_values) = decode(&bytes).expect("re-decode succeeds");
    assert_eq!(decoded_tags, tags);
    for (a, b) in decoded_values.iter().zip(values.iter()) {
        assert_eq!(a.xlen(), b.xlen());
        // xoff is bank-relative and may legitimately differ across a
        // round-trip through a freshly-encoded byte stream; only xlen (the
        // payload length / element count) is an invariant here.
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// decode-then-encode identity, for a spread of already-minimal inputs
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn decode_then_encode_nested_containers() {
    // [[1, 2], {"k": true}]
    let input = [0x92, 0x92, 0x01, 0x02, 0x81, 0xa1, b'k', 0xc3];
    assert_decode_then_encode_identity(&input);
}

#[test]
fn decode_then_encode_strings_and_binaries() {
    let mut input = vec![0x92];
    input.push(0xa5);
    input.extend_from_slice(b"hello");
    input.push(0xc4);
    input.push(0x03);
    input.extend_from_slice(&[1, 2, 3]);
    assert_decode_then_encode_identity(&input);
}

#[test]
fn decode_then_encode_floats() {
    let mut input = vec![0x92];
    input.push(0xca);
    input.extend_from_slice(&1.5f32.to_bits().to_be_bytes());
    input.push(0xcb);
    input.extend_from_slice(&2.5f64.to_bits().to_be_bytes());
    assert_decode_then_encode_identity(&input);
}

#[test]
fn decode_then_encode_negative_fixint() {
    assert_decode_then_encode_identity(&[0xff]);
}

#[test]
fn decode_then_encode_array16_header() {
    // array16 with 16 positive fixints (exceeds fixarray's 15-element max).
    let mut input = vec![0xdc, 0x00, 0x10];
    input.extend(std::iter::repeat(0x01).take(16));
    assert_decode_then_encode_identity(&input);
}

// ═════════════════════════════════════════════════════════════════════════════
// uint normalisation: wider wire forms collapse to their shortest equivalent
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn decode_then_encode_normalizes_oversized_uint8_to_fixint() {
    // uint8 encoding of 1 is not minimal; the codec always picks positive
    // fixint on encode regardless of the tag the decoder assigned.
    let input = [0xcc, 0x01];
    let (tags, values) = decode(&input).unwrap();
    let bytes = encode(&tags, &values, &input, &[]).unwrap();
    assert_eq!(bytes, vec![0x01]);
}

#[test]
fn decode_then_encode_normalizes_uint64_within_int64_range_to_shortest_signed() {
    let input = [0xcf, 0, 0, 0, 0, 0, 0, 0, 42];
    let (tags, values) = decode(&input).unwrap();
    assert_eq!(tags, vec![Tag::LongInt]);
    let bytes = encode(&tags, &values, &input, &[]).unwrap();
    assert_eq!(bytes, vec![42]);
}

// ═════════════════════════════════════════════════════════════════════════════
// encode-then-decode identity on (tags, values)
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn encode_then_decode_scalars() {
    use msgpack_flat::Value;
    let tags = vec![Tag::LongInt, Tag::Float64, Tag::True, Tag::Nil];
    let values = vec![
        Value::long(-100),
        Value::double(3.25),
        Value::unused(),
        Value::unused(),
    ];
    assert_encode_then_decode_identity(&tags, &values, &[]);
}

#[test]
fn encode_then_decode_string_payload() {
    use msgpack_flat::Value;
    let bank1 = b"round trip me";
    let tags = vec![Tag::Str];
    let values = vec![Value::xlen_xoff(5, 5)]; // last 5 bytes: "ip me"
    assert_encode_then_decode_identity(&tags, &values, bank1);
}

#[test]
fn encode_then_decode_container_header() {
    use msgpack_flat::Value;
    let tags = vec![Tag::Array, Tag::LongInt, Tag::LongInt];
    let values = vec![Value::xlen_xoff(2, 3), Value::long(7), Value::long(8)];
    assert_encode_then_decode_identity(&tags, &values, &[]);
}

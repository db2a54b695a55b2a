//! C-ABI shims — export fixed-capacity decode/encode entry points for callers
//! that hand this crate scratch memory instead of linking against the Rust
//! API directly.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! Every caller-visible buffer here is borrowed, not owned: on success the
//! result is written into the caller's own storage and no allocation crosses
//! the boundary. If a call would need more room than the caller supplied, the
//! shim frees whatever it grew internally and reports the single `-1`
//! sentinel rather than handing back a pointer the caller would have to free
//! with Rust's allocator — mirroring this crate's own `stock storage is never
//! freed by the core` rule one level further out.

use std::mem::MaybeUninit;
use std::os::raw::c_int;
use std::slice;

use crate::flat::buffer::ArrayStorage;
use crate::flat::encoder::tags_from_bytes;
use crate::flat::types::{Tag, Value};
use crate::flat::{decode_into, encode_into};

/// Return -1 when an i32 would be negative (error sentinel for this codec's
/// boundary, as opposed to the teacher crate's `0`-sentinel convention).
#[inline(always)]
fn ok_or_neg1(n: i32) -> c_int {
    if n >= 0 {
        n
    } else {
        -1
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// msgpack_flat_decode
//
// int msgpack_flat_decode(const uint8_t *msgpack, int msgpack_len,
//                         uint8_t *tags_out, uint64_t *values_out,
//                         int capacity);
//
// Flattens `msgpack` into `tags_out`/`values_out`, each of which must have
// room for `capacity` items. Returns the item count written, or -1 if the
// input was malformed, a pointer was null, a size was negative, or `capacity`
// was too small to hold the result.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn msgpack_flat_decode(
    msgpack: *const u8,
    msgpack_len: c_int,
    tags_out: *mut u8,
    values_out: *mut u64,
    capacity: c_int,
) -> c_int {
    if msgpack_len < 0 || capacity < 0 || msgpack.is_null() || tags_out.is_null() || values_out.is_null() {
        return -1;
    }
    let input = slice::from_raw_parts(msgpack, msgpack_len as usize);
    let stock_tags = slice::from_raw_parts_mut(tags_out as *mut MaybeUninit<Tag>, capacity as usize);
    let stock_values =
        slice::from_raw_parts_mut(values_out as *mut MaybeUninit<Value>, capacity as usize);

    match decode_into(input, stock_tags, stock_values) {
        Ok((ArrayStorage::Stock(tags), ArrayStorage::Stock(_))) => ok_or_neg1(tags.len() as i32),
        // Either array outgrew the caller's buffer; the heap copies this
        // produced are dropped here so nothing leaks, and the caller is told
        // to retry with a larger `capacity` rather than being handed a
        // pointer it would need a matching `free` shim to release.
        Ok(_) => -1,
        Err(_) => -1,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// msgpack_flat_encode
//
// int msgpack_flat_encode(const uint8_t *tags, const uint64_t *values,
//                         int item_count,
//                         const uint8_t *bank1, int bank1_len,
//                         const uint8_t *bank2, int bank2_len,
//                         uint8_t *out, int out_capacity);
//
// Re-emits MessagePack from `tags`/`values` (`item_count` entries each) into
// `out`, which must have room for `out_capacity` bytes. Returns the byte
// count written, or -1 if a tag byte was not a known discriminant, a pointer
// was null, a size was negative, or `out_capacity` was too small.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn msgpack_flat_encode(
    tags: *const u8,
    values: *const u64,
    item_count: c_int,
    bank1: *const u8,
    bank1_len: c_int,
    bank2: *const u8,
    bank2_len: c_int,
    out: *mut u8,
    out_capacity: c_int,
) -> c_int {
    if item_count < 0
        || bank1_len < 0
        || bank2_len < 0
        || out_capacity < 0
        || tags.is_null()
        || values.is_null()
        || out.is_null()
        || (bank1_len > 0 && bank1.is_null())
        || (bank2_len > 0 && bank2.is_null())
    {
        return -1;
    }

    let tag_bytes = slice::from_raw_parts(tags, item_count as usize);
    let Ok(tags) = tags_from_bytes(tag_bytes) else {
        return -1;
    };
    let values = slice::from_raw_parts(values as *const Value, item_count as usize);
    let bank1 = if bank1_len == 0 { &[][..] } else { slice::from_raw_parts(bank1, bank1_len as usize) };
    let bank2 = if bank2_len == 0 { &[][..] } else { slice::from_raw_parts(bank2, bank2_len as usize) };
    let stock_out = slice::from_raw_parts_mut(out as *mut MaybeUninit<u8>, out_capacity as usize);

    match encode_into(&tags, values, bank1, bank2, stock_out) {
        Ok(ArrayStorage::Stock(bytes)) => ok_or_neg1(bytes.len() as i32),
        // Grew past `out_capacity`; drop the heap copy and report failure,
        // same rationale as the decode path above.
        Ok(ArrayStorage::Heap(_)) => -1,
        Err(_) => -1,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // ── ok_or_neg1 ───────────────────────────────────────────────────────────

    #[test]
    fn ok_or_neg1_positive_passthrough() {
        assert_eq!(ok_or_neg1(42), 42);
    }

    #[test]
    fn ok_or_neg1_zero_passthrough() {
        assert_eq!(ok_or_neg1(0), 0);
    }

    #[test]
    fn ok_or_neg1_negative_becomes_neg1() {
        assert_eq!(ok_or_neg1(-7), -1);
    }

    // ── msgpack_flat_decode ──────────────────────────────────────────────────

    #[test]
    fn decode_nil_writes_one_item() {
        unsafe {
            let input = [0xc0u8];
            let mut tag_buf = [0u8; 4];
            let mut value_buf = [0u64; 4];
            let n = msgpack_flat_decode(
                input.as_ptr(),
                input.len() as c_int,
                tag_buf.as_mut_ptr(),
                value_buf.as_mut_ptr(),
                4,
            );
            assert_eq!(n, 1);
            assert_eq!(tag_buf[0], Tag::Nil as u8);
        }
    }

    #[test]
    fn decode_null_input_returns_neg1() {
        unsafe {
            let mut tag_buf = [0u8; 4];
            let mut value_buf = [0u64; 4];
            let n = msgpack_flat_decode(
                std::ptr::null(),
                1,
                tag_buf.as_mut_ptr(),
                value_buf.as_mut_ptr(),
                4,
            );
            assert_eq!(n, -1);
        }
    }

    #[test]
    fn decode_negative_len_returns_neg1() {
        unsafe {
            let input = [0xc0u8];
            let mut tag_buf = [0u8; 4];
            let mut value_buf = [0u64; 4];
            let n = msgpack_flat_decode(
                input.as_ptr(),
                -1,
                tag_buf.as_mut_ptr(),
                value_buf.as_mut_ptr(),
                4,
            );
            assert_eq!(n, -1);
        }
    }

    #[test]
    fn decode_reserved_byte_returns_neg1() {
        unsafe {
            let input = [0xc1u8];
            let mut tag_buf = [0u8; 4];
            let mut value_buf = [0u64; 4];
            let n = msgpack_flat_decode(
                input.as_ptr(),
                input.len() as c_int,
                tag_buf.as_mut_ptr(),
                value_buf.as_mut_ptr(),
                4,
            );
            assert_eq!(n, -1);
        }
    }

    #[test]
    fn decode_too_small_capacity_returns_neg1() {
        unsafe {
            // fixarray of two items needs capacity 3 (array + 2 ints).
            let input = [0x92u8, 0x01, 0x02];
            let mut tag_buf = [0u8; 1];
            let mut value_buf = [0u64; 1];
            let n = msgpack_flat_decode(
                input.as_ptr(),
                input.len() as c_int,
                tag_buf.as_mut_ptr(),
                value_buf.as_mut_ptr(),
                1,
            );
            assert_eq!(n, -1);
        }
    }

    // ── msgpack_flat_encode ──────────────────────────────────────────────────

    #[test]
    fn encode_nil_writes_one_byte() {
        unsafe {
            let tags = [Tag::Nil as u8];
            let values = [Value::unused()];
            let mut out = [0u8; 4];
            let n = msgpack_flat_encode(
                tags.as_ptr(),
                values.as_ptr() as *const u64,
                1,
                std::ptr::null(),
                0,
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
                4,
            );
            assert_eq!(n, 1);
            assert_eq!(out[0], 0xc0);
        }
    }

    #[test]
    fn encode_str_payload_reads_from_bank1() {
        unsafe {
            let tags = [Tag::Str as u8];
            let values = [Value::xlen_xoff(5, 5)];
            let bank1 = b"hello world";
            let mut out = [0u8; 8];
            let n = msgpack_flat_encode(
                tags.as_ptr(),
                values.as_ptr() as *const u64,
                1,
                bank1.as_ptr(),
                bank1.len() as c_int,
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
                8,
            );
            assert_eq!(n, 6);
            assert_eq!(&out[..6], b"\xa5world");
        }
    }

    #[test]
    fn encode_unknown_tag_byte_returns_neg1() {
        unsafe {
            let tags = [255u8];
            let values = [0u64];
            let mut out = [0u8; 4];
            let n = msgpack_flat_encode(
                tags.as_ptr(),
                values.as_ptr(),
                1,
                std::ptr::null(),
                0,
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
                4,
            );
            assert_eq!(n, -1);
        }
    }

    #[test]
    fn encode_null_out_returns_neg1() {
        unsafe {
            let tags = [Tag::Nil as u8];
            let values = [Value::unused()];
            let n = msgpack_flat_encode(
                tags.as_ptr(),
                values.as_ptr() as *const u64,
                1,
                std::ptr::null(),
                0,
                std::ptr::null(),
                0,
                std::ptr::null_mut(),
                4,
            );
            assert_eq!(n, -1);
        }
    }

    #[test]
    fn encode_too_small_capacity_returns_neg1() {
        unsafe {
            let tags = [Tag::Str as u8];
            let values = [Value::xlen_xoff(300, 300)];
            let bank1 = vec![b'x'; 300];
            let mut out = [0u8; 4];
            let n = msgpack_flat_encode(
                tags.as_ptr(),
                values.as_ptr() as *const u64,
                1,
                bank1.as_ptr(),
                bank1.len() as c_int,
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
                4,
            );
            assert_eq!(n, -1);
        }
    }

    #[test]
    fn decode_then_encode_round_trips() {
        unsafe {
            let input = [0x92u8, 0x01, 0x02]; // [1, 2]
            let mut tag_buf = [0u8; 4];
            let mut value_buf = [0u64; 4];
            let n = msgpack_flat_decode(
                input.as_ptr(),
                input.len() as c_int,
                tag_buf.as_mut_ptr(),
                value_buf.as_mut_ptr(),
                4,
            );
            assert_eq!(n, 3);

            let mut out = [0u8; 8];
            let m = msgpack_flat_encode(
                tag_buf.as_ptr(),
                value_buf.as_ptr(),
                n,
                std::ptr::null(),
                0,
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
                8,
            );
            assert_eq!(m, 3);
            assert_eq!(&out[..3], &input[..]);
        }
    }
}

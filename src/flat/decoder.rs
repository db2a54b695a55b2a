//! Flattens a MessagePack byte slice into parallel `tags[]`/`values[]`
//! arrays, backpatching each container's sibling-skip offset as it closes.
//!
//! Ported from `preprocess_msgpack` in `schema_util.c`. The C source threads
//! the open-container chain through the `xoff` half of each container's own
//! `Value` slot (see [`crate::flat::types::Value::xoff`]) and advances raw
//! pointers throughout; this port keeps the threading trick — the final
//! array layout depends on it — but walks the input with a bounds-checked
//! `usize` cursor rather than raw pointers, so every length prefix and
//! payload range is validated through ordinary slice indexing instead of
//! pointer comparisons the optimizer could otherwise assume never overflow.
//! `unsafe` is confined to [`GrowBuf`]'s stock/heap promotion.

use std::fmt;

use super::buffer::{AllocError, ArrayStorage, GrowBuf};
use super::types::{self, Tag, Value};
use crate::config::{DEPTH_STACK_INITIAL_CAPACITY, STOCK_CAPACITY_FLOOR};
use crate::trace::flat_trace;

/// Why a decode call failed. Collapses to a single sentinel at the `c-abi`
/// boundary (spec's "one failure channel" — see [`crate::abi`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A length prefix or payload extended past the end of the input.
    Underflow,
    /// The input contained the reserved byte `0xc1`.
    ReservedByte,
    /// Growing an internal buffer failed.
    AllocFailed,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Underflow => write!(f, "msgpack input truncated"),
            DecodeError::ReservedByte => write!(f, "msgpack input contains reserved byte 0xc1"),
            DecodeError::AllocFailed => write!(f, "allocation failed while growing decoder buffer"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<AllocError> for DecodeError {
    fn from(_: AllocError) -> Self {
        DecodeError::AllocFailed
    }
}

/// No container is currently open. Threaded through [`Value::xoff`] the
/// same way the C source overloads `patch = (uint32_t)-1`.
const NO_PATCH: u32 = u32::MAX;

/// Decode into freshly allocated heap buffers, with a heap capacity hint of
/// [`STOCK_CAPACITY_FLOOR`].
pub fn decode(input: &[u8]) -> Result<(Vec<Tag>, Vec<Value>), DecodeError> {
    decode_with_capacity(input, STOCK_CAPACITY_FLOOR)
}

/// Decode into freshly allocated heap buffers, reserving at least `hint`
/// slots up front (still floored at [`STOCK_CAPACITY_FLOOR`]).
pub fn decode_with_capacity(
    input: &[u8],
    hint: usize,
) -> Result<(Vec<Tag>, Vec<Value>), DecodeError> {
    let capacity = hint.max(STOCK_CAPACITY_FLOOR);
    let mut tags = GrowBuf::try_with_heap_capacity(capacity)?;
    let mut values = GrowBuf::try_with_heap_capacity(capacity)?;
    decode_raw(input, &mut tags, &mut values)?;
    match (tags.into_storage(), values.into_storage()) {
        (ArrayStorage::Heap(t), ArrayStorage::Heap(v)) => Ok((t, v)),
        _ => unreachable!("heap-seeded GrowBuf never reports Stock storage"),
    }
}

/// Decode using caller-supplied stock storage, falling back to the heap only
/// if either array overflows its stock capacity.
pub fn decode_into<'t, 'v>(
    input: &[u8],
    stock_tags: &'t mut [std::mem::MaybeUninit<Tag>],
    stock_values: &'v mut [std::mem::MaybeUninit<Value>],
) -> Result<(ArrayStorage<'t, Tag>, ArrayStorage<'v, Value>), DecodeError> {
    let mut tags = GrowBuf::with_stock(stock_tags);
    let mut values = GrowBuf::with_stock(stock_values);
    decode_raw(input, &mut tags, &mut values)?;
    Ok((tags.into_storage(), values.into_storage()))
}

/// Bounds-checked range read, advancing nothing itself; callers track the
/// cursor. Returns `Underflow` rather than panicking — malformed input must
/// never crash this layer.
#[inline]
fn need(input: &[u8], at: usize, n: usize) -> Result<&[u8], DecodeError> {
    let end = at.checked_add(n).ok_or(DecodeError::Underflow)?;
    input.get(at..end).ok_or(DecodeError::Underflow)
}

/// Computes `(xoff, cursor_after_payload)` for a Str/Bin/Ext payload that
/// starts at `payload_start` and is `len` bytes long. `xoff` is stored
/// bank-end-relative (distance from the input's end to the payload start)
/// per spec: a later encode pass can carry the bank around by tail pointer
/// alone.
#[inline]
fn payload_offset(input: &[u8], payload_start: usize, len: u32) -> Result<(u32, usize), DecodeError> {
    let payload_end = payload_start
        .checked_add(len as usize)
        .ok_or(DecodeError::Underflow)?;
    if payload_end > input.len() {
        return Err(DecodeError::Underflow);
    }
    let xoff = (input.len() - payload_start) as u32;
    Ok((xoff, payload_end))
}

/// The flattening pass itself. Returns the number of (tag, value) pairs
/// written.
fn decode_raw(
    input: &[u8],
    tags: &mut GrowBuf<Tag>,
    values: &mut GrowBuf<Value>,
) -> Result<usize, DecodeError> {
    let mut depth_stack = GrowBuf::<u32>::try_with_heap_capacity(DEPTH_STACK_INITIAL_CAPACITY)?;

    let mut cursor: usize = 0;
    let mut todo: i64 = 1;
    let mut patch: u32 = NO_PATCH;
    let mut count: usize = 0;

    'decode: loop {
        // Close every container whose sibling count has been exhausted by
        // the element just written, possibly cascading through several
        // ancestor levels at once (spec.md §4.1 step 1).
        loop {
            todo -= 1;
            if todo >= 0 {
                break;
            }
            let Some(parent_todo) = depth_stack.pop() else {
                flat_trace!(2, "msgpack_flat: decode complete, {} items", count);
                return Ok(count);
            };
            let patch_idx = patch as usize;
            let mut container = values.get(patch_idx);
            let grandparent_patch = container.xoff();
            container.set_xoff((count - patch_idx) as u32);
            values.set(patch_idx, container);
            patch = grandparent_patch;
            todo = parent_todo as i64;
        }

        if cursor >= input.len() {
            return Err(DecodeError::Underflow);
        }

        tags.reserve(1)?;
        values.reserve(1)?;

        let byte = input[cursor];

        // Container open: Array or Map. Shares bookkeeping (thread `patch`
        // through this slot's `xoff`, push `todo`, reset `todo` to the
        // descendant count) regardless of wire form.
        macro_rules! open_container {
            ($tag:expr, $xlen:expr, $descendants:expr, $next_cursor:expr) => {{
                let container_index = count;
                tags.push($tag)?;
                values.push(Value::xlen_xoff($xlen, patch))?;
                patch = container_index as u32;
                depth_stack.push(todo as u32)?;
                todo = $descendants;
                cursor = $next_cursor;
                count += 1;
                continue 'decode;
            }};
        }

        macro_rules! scalar {
            ($tag:expr, $value:expr, $next_cursor:expr) => {{
                tags.push($tag)?;
                values.push($value)?;
                cursor = $next_cursor;
                count += 1;
                continue 'decode;
            }};
        }

        macro_rules! payload {
            ($tag:expr, $len:expr, $prefix_end:expr) => {{
                let (xoff, next_cursor) = payload_offset(input, $prefix_end, $len)?;
                tags.push($tag)?;
                values.push(Value::xlen_xoff($len, xoff))?;
                cursor = next_cursor;
                count += 1;
                continue 'decode;
            }};
        }

        match byte {
            0x00..=types::POSITIVE_FIXINT_MAX => {
                scalar!(Tag::LongInt, Value::long(byte as i64), cursor + 1)
            }
            types::FIXMAP_MIN..=types::FIXMAP_MAX => {
                let n = (byte - types::FIXMAP_MIN) as u32;
                open_container!(Tag::Map, n, (n as i64) * 2, cursor + 1)
            }
            types::FIXARRAY_MIN..=types::FIXARRAY_MAX => {
                let n = (byte - types::FIXARRAY_MIN) as u32;
                open_container!(Tag::Array, n, n as i64, cursor + 1)
            }
            types::FIXSTR_MIN..=types::FIXSTR_MAX => {
                let len = (byte - types::FIXSTR_MIN) as u32;
                payload!(Tag::Str, len, cursor + 1)
            }
            types::NIL => scalar!(Tag::Nil, Value::unused(), cursor + 1),
            types::RESERVED => return Err(DecodeError::ReservedByte),
            types::FALSE => scalar!(Tag::False, Value::unused(), cursor + 1),
            types::TRUE => scalar!(Tag::True, Value::unused(), cursor + 1),
            types::BIN8 => {
                let len = need(input, cursor + 1, 1)?[0] as u32;
                payload!(Tag::Bin, len, cursor + 2)
            }
            types::BIN16 => {
                let len = u16::from_be_bytes(need(input, cursor + 1, 2)?.try_into().unwrap()) as u32;
                payload!(Tag::Bin, len, cursor + 3)
            }
            types::BIN32 => {
                let len = u32::from_be_bytes(need(input, cursor + 1, 4)?.try_into().unwrap());
                payload!(Tag::Bin, len, cursor + 5)
            }
            types::EXT8 => {
                let len = need(input, cursor + 1, 1)?[0] as u32 + 1;
                payload!(Tag::Ext, len, cursor + 2)
            }
            types::EXT16 => {
                let len =
                    u16::from_be_bytes(need(input, cursor + 1, 2)?.try_into().unwrap()) as u32 + 1;
                payload!(Tag::Ext, len, cursor + 3)
            }
            types::EXT32 => {
                let len = u32::from_be_bytes(need(input, cursor + 1, 4)?.try_into().unwrap()) + 1;
                payload!(Tag::Ext, len, cursor + 5)
            }
            types::FLOAT32 => {
                let bits = u32::from_be_bytes(need(input, cursor + 1, 4)?.try_into().unwrap());
                let widened = f32::from_bits(bits) as f64;
                scalar!(Tag::Float32, Value::double(widened), cursor + 5)
            }
            types::FLOAT64 => {
                let bits = u64::from_be_bytes(need(input, cursor + 1, 8)?.try_into().unwrap());
                scalar!(Tag::Float64, Value::double(f64::from_bits(bits)), cursor + 9)
            }
            types::UINT8 => {
                let v = need(input, cursor + 1, 1)?[0] as i64;
                scalar!(Tag::LongInt, Value::long(v), cursor + 2)
            }
            types::UINT16 => {
                let v = u16::from_be_bytes(need(input, cursor + 1, 2)?.try_into().unwrap()) as i64;
                scalar!(Tag::LongInt, Value::long(v), cursor + 3)
            }
            types::UINT32 => {
                let v = u32::from_be_bytes(need(input, cursor + 1, 4)?.try_into().unwrap()) as i64;
                scalar!(Tag::LongInt, Value::long(v), cursor + 5)
            }
            types::UINT64 => {
                let v = u64::from_be_bytes(need(input, cursor + 1, 8)?.try_into().unwrap());
                if v > i64::MAX as u64 {
                    scalar!(Tag::UlongInt, Value::ulong(v), cursor + 9)
                } else {
                    scalar!(Tag::LongInt, Value::long(v as i64), cursor + 9)
                }
            }
            types::INT8 => {
                let v = need(input, cursor + 1, 1)?[0] as i8 as i64;
                scalar!(Tag::LongInt, Value::long(v), cursor + 2)
            }
            types::INT16 => {
                let v = i16::from_be_bytes(need(input, cursor + 1, 2)?.try_into().unwrap()) as i64;
                scalar!(Tag::LongInt, Value::long(v), cursor + 3)
            }
            types::INT32 => {
                let v = i32::from_be_bytes(need(input, cursor + 1, 4)?.try_into().unwrap()) as i64;
                scalar!(Tag::LongInt, Value::long(v), cursor + 5)
            }
            types::INT64 => {
                let v = i64::from_be_bytes(need(input, cursor + 1, 8)?.try_into().unwrap());
                scalar!(Tag::LongInt, Value::long(v), cursor + 9)
            }
            // fixext 1/2/4/8/16: `xlen` is payload bytes including the
            // leading subtype byte, per spec.md §4.1 — 1+1, 1+2, 1+4, 1+8,
            // 1+16 respectively; the opcode byte itself is not part of the
            // prefix consumed before the payload window starts.
            types::FIXEXT1 => payload!(Tag::Ext, 2, cursor + 1),
            types::FIXEXT2 => payload!(Tag::Ext, 3, cursor + 1),
            types::FIXEXT4 => payload!(Tag::Ext, 5, cursor + 1),
            types::FIXEXT8 => payload!(Tag::Ext, 9, cursor + 1),
            types::FIXEXT16 => payload!(Tag::Ext, 17, cursor + 1),
            types::STR8 => {
                let len = need(input, cursor + 1, 1)?[0] as u32;
                payload!(Tag::Str, len, cursor + 2)
            }
            types::STR16 => {
                let len = u16::from_be_bytes(need(input, cursor + 1, 2)?.try_into().unwrap()) as u32;
                payload!(Tag::Str, len, cursor + 3)
            }
            types::STR32 => {
                let len = u32::from_be_bytes(need(input, cursor + 1, 4)?.try_into().unwrap());
                payload!(Tag::Str, len, cursor + 5)
            }
            types::ARRAY16 => {
                let n = u16::from_be_bytes(need(input, cursor + 1, 2)?.try_into().unwrap()) as u32;
                open_container!(Tag::Array, n, n as i64, cursor + 3)
            }
            types::ARRAY32 => {
                let n = u32::from_be_bytes(need(input, cursor + 1, 4)?.try_into().unwrap());
                open_container!(Tag::Array, n, n as i64, cursor + 5)
            }
            types::MAP16 => {
                let n = u16::from_be_bytes(need(input, cursor + 1, 2)?.try_into().unwrap()) as u32;
                open_container!(Tag::Map, n, (n as i64) * 2, cursor + 3)
            }
            types::MAP32 => {
                let n = u32::from_be_bytes(need(input, cursor + 1, 4)?.try_into().unwrap());
                open_container!(Tag::Map, n, (n as i64) * 2, cursor + 5)
            }
            types::NEGATIVE_FIXINT_MIN..=0xff => {
                scalar!(Tag::LongInt, Value::long(byte as i8 as i64), cursor + 1)
            }
        }
    }
}

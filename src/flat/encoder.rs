//! Re-emits a MessagePack byte stream from parallel `tags[]`/`values[]`
//! arrays, choosing the shortest wire form for every scalar.
//!
//! Ported from `create_msgpack` in `schema_util.c`. Two reference bugs in
//! that source are corrected rather than replicated (spec.md §9 Design
//! Notes (a) and (b)): the `str 16`/`str 32` branches wrote the opcode to
//! `out[1]` instead of `out[0]`, and `fixext 8` was coded with opcode
//! `0xd5` (which collides with `fixext 2`) instead of `0xd7`.

use std::fmt;

use super::buffer::{AllocError, ArrayStorage, GrowBuf};
use super::types::{self, Tag, Value};
use crate::config::{ENCODE_HEADER_RESERVE, OUTPUT_CAPACITY_FLOOR};
use crate::trace::flat_trace;

/// Why an encode call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// A tag byte did not correspond to any known [`Tag`] variant.
    UnknownTag,
    /// Growing the output buffer failed.
    AllocFailed,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnknownTag => write!(f, "unknown tag value in flattened array"),
            EncodeError::AllocFailed => write!(f, "allocation failed while growing encoder output"),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<AllocError> for EncodeError {
    fn from(_: AllocError) -> Self {
        EncodeError::AllocFailed
    }
}

/// Reconstructs `Tag`s from a raw byte array, as received across the
/// `c-abi` boundary where the typeid array is just `uint8_t*`. Rejects any
/// byte that is not a valid discriminant — this is the only place
/// [`EncodeError::UnknownTag`] can actually arise, since the safe [`encode`]
/// API takes `&[Tag]`, which the type system already guarantees is valid.
pub(crate) fn tags_from_bytes(tag_bytes: &[u8]) -> Result<Vec<Tag>, EncodeError> {
    tag_bytes
        .iter()
        .map(|&b| Tag::from_u8(b).ok_or(EncodeError::UnknownTag))
        .collect()
}

/// Encode into a freshly allocated heap buffer.
pub fn encode(tags: &[Tag], values: &[Value], bank1: &[u8], bank2: &[u8]) -> Result<Vec<u8>, EncodeError> {
    encode_with_capacity(tags, values, bank1, bank2, OUTPUT_CAPACITY_FLOOR)
}

/// Encode into a freshly allocated heap buffer, reserving at least `hint`
/// bytes up front (still floored at `max(nitems, 128)`, per spec.md §6).
pub fn encode_with_capacity(
    tags: &[Tag],
    values: &[Value],
    bank1: &[u8],
    bank2: &[u8],
    hint: usize,
) -> Result<Vec<u8>, EncodeError> {
    let capacity = hint.max(tags.len().max(OUTPUT_CAPACITY_FLOOR));
    let mut out = GrowBuf::try_with_heap_capacity(capacity)?;
    encode_raw(tags, values, bank1, bank2, &mut out)?;
    match out.into_storage() {
        ArrayStorage::Heap(bytes) => Ok(bytes),
        ArrayStorage::Stock(_) => unreachable!("heap-seeded GrowBuf never reports Stock storage"),
    }
}

/// Encode using caller-supplied stock storage, falling back to the heap
/// only if it is exhausted.
pub fn encode_into<'o>(
    tags: &[Tag],
    values: &[Value],
    bank1: &[u8],
    bank2: &[u8],
    stock_out: &'o mut [std::mem::MaybeUninit<u8>],
) -> Result<ArrayStorage<'o, u8>, EncodeError> {
    let mut out = GrowBuf::with_stock(stock_out);
    encode_raw(tags, values, bank1, bank2, &mut out)?;
    Ok(out.into_storage())
}

/// Active data bank for the next payload-bearing element. Reverts to
/// `Bank1` after every payload copy; a `CopyCmd` retargets it to `Bank2`
/// for exactly the copy that follows.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ActiveBank {
    Bank1,
    Bank2,
}

fn encode_raw(
    tags: &[Tag],
    values: &[Value],
    bank1: &[u8],
    bank2: &[u8],
    out: &mut GrowBuf<u8>,
) -> Result<(), EncodeError> {
    let mut copy_from = ActiveBank::Bank1;

    for (tag, value) in tags.iter().zip(values.iter()) {
        // Invariant on entry to every iteration: at least
        // `ENCODE_HEADER_RESERVE` free bytes in `out` (the worst case is an
        // 8-byte int64 body plus its 1-byte opcode, with a byte to spare).
        out.reserve(ENCODE_HEADER_RESERVE)?;

        match *tag {
            Tag::Nil => out.push(types::NIL)?,
            Tag::False => out.push(types::FALSE)?,
            Tag::True => out.push(types::TRUE)?,
            Tag::LongInt | Tag::UlongInt => encode_int(*value, out)?,
            Tag::Float32 => {
                out.push(types::FLOAT32)?;
                push_be_u32(out, (value.as_double() as f32).to_bits())?;
            }
            Tag::Float64 => {
                out.push(types::FLOAT64)?;
                push_be_u64(out, value.as_double().to_bits())?;
            }
            Tag::Str => {
                encode_str_header(*value, out)?;
                copy_payload(*value, bank1, bank2, copy_from, out)?;
                copy_from = ActiveBank::Bank1;
            }
            Tag::Bin => {
                encode_bin_header(*value, out)?;
                copy_payload(*value, bank1, bank2, copy_from, out)?;
                copy_from = ActiveBank::Bank1;
            }
            Tag::Ext => {
                encode_ext_header(*value, out)?;
                copy_payload(*value, bank1, bank2, copy_from, out)?;
                copy_from = ActiveBank::Bank1;
            }
            Tag::Array => encode_container_header(*value, types::FIXARRAY_MIN, types::ARRAY16, types::ARRAY32, out)?,
            Tag::Map => encode_container_header(*value, types::FIXMAP_MIN, types::MAP16, types::MAP32, out)?,
            Tag::CopyCmd => {
                copy_from = ActiveBank::Bank2;
                copy_payload(*value, bank1, bank2, copy_from, out)?;
                copy_from = ActiveBank::Bank1;
            }
        }
    }

    flat_trace!(1, "msgpack_flat: encoded {} bytes from {} items", out.len(), tags.len());
    Ok(())
}

/// Appends the shortest integer encoding for `value`'s raw 64-bit pattern.
/// Mirrors `create_msgpack`'s `LongValue`/`UlongValue` fallthrough: whether
/// the *source* tag was signed or unsigned does not affect the choice, only
/// the bit pattern does (spec.md §4.2).
fn encode_int(value: Value, out: &mut GrowBuf<u8>) -> Result<(), EncodeError> {
    let uval = value.as_ulong();
    if uval > i64::MAX as u64 {
        // Negative: two's-complement reinterpretation, shortest signed form.
        let ival = uval as i64;
        if ival >= -0x20 {
            out.push(uval as u8)?;
        } else if ival >= i8::MIN as i64 {
            out.push(types::INT8)?;
            out.push(ival as i8 as u8)?;
        } else if ival >= i16::MIN as i64 {
            out.push(types::INT16)?;
            push_be_u16(out, ival as i16 as u16)?;
        } else if ival >= i32::MIN as i64 {
            out.push(types::INT32)?;
            push_be_u32(out, ival as i32 as u32)?;
        } else {
            out.push(types::INT64)?;
            push_be_u64(out, ival as u64)?;
        }
        return Ok(());
    }
    if uval <= types::POSITIVE_FIXINT_MAX as u64 {
        out.push(uval as u8)?;
    } else if uval <= u8::MAX as u64 {
        out.push(types::UINT8)?;
        out.push(uval as u8)?;
    } else if uval <= u16::MAX as u64 {
        out.push(types::UINT16)?;
        push_be_u16(out, uval as u16)?;
    } else if uval <= u32::MAX as u64 {
        out.push(types::UINT32)?;
        push_be_u32(out, uval as u32)?;
    } else {
        out.push(types::UINT64)?;
        push_be_u64(out, uval)?;
    }
    Ok(())
}

fn encode_str_header(value: Value, out: &mut GrowBuf<u8>) -> Result<(), EncodeError> {
    let xlen = value.xlen();
    if xlen <= types::FIXSTR_LEN_MAX {
        out.push(types::FIXSTR_MIN + xlen as u8)?;
    } else if xlen <= u8::MAX as u32 {
        out.push(types::STR8)?;
        out.push(xlen as u8)?;
    } else if xlen <= u16::MAX as u32 {
        out.push(types::STR16)?;
        push_be_u16(out, xlen as u16)?;
    } else {
        out.push(types::STR32)?;
        push_be_u32(out, xlen)?;
    }
    Ok(())
}

fn encode_bin_header(value: Value, out: &mut GrowBuf<u8>) -> Result<(), EncodeError> {
    let xlen = value.xlen();
    if xlen <= u8::MAX as u32 {
        out.push(types::BIN8)?;
        out.push(xlen as u8)?;
    } else if xlen <= u16::MAX as u32 {
        out.push(types::BIN16)?;
        push_be_u16(out, xlen as u16)?;
    } else {
        out.push(types::BIN32)?;
        push_be_u32(out, xlen)?;
    }
    Ok(())
}

/// Extensions of encoded length (subtype byte included) exactly 2, 3, 5, 9,
/// or 17 pick the matching fixext; the payload copy that follows writes the
/// subtype byte along with the data, so no header byte beyond the opcode is
/// needed here.
fn encode_ext_header(value: Value, out: &mut GrowBuf<u8>) -> Result<(), EncodeError> {
    let xlen = value.xlen();
    let opcode = match xlen {
        2 => Some(types::FIXEXT1),
        3 => Some(types::FIXEXT2),
        5 => Some(types::FIXEXT4),
        9 => Some(types::FIXEXT8),
        17 => Some(types::FIXEXT16),
        _ => None,
    };
    if let Some(opcode) = opcode {
        out.push(opcode)?;
        return Ok(());
    }
    let data_len = xlen.saturating_sub(1);
    if data_len <= u8::MAX as u32 {
        out.push(types::EXT8)?;
        out.push(data_len as u8)?;
    } else if data_len <= u16::MAX as u32 {
        out.push(types::EXT16)?;
        push_be_u16(out, data_len as u16)?;
    } else {
        out.push(types::EXT32)?;
        push_be_u32(out, data_len)?;
    }
    Ok(())
}

fn encode_container_header(
    value: Value,
    fix_min: u8,
    opcode16: u8,
    opcode32: u8,
    out: &mut GrowBuf<u8>,
) -> Result<(), EncodeError> {
    let xlen = value.xlen();
    if xlen <= types::FIX_CONTAINER_MAX {
        out.push(fix_min + xlen as u8)?;
    } else if xlen <= u16::MAX as u32 {
        out.push(opcode16)?;
        push_be_u16(out, xlen as u16)?;
    } else {
        out.push(opcode32)?;
        push_be_u32(out, xlen)?;
    }
    Ok(())
}

/// Copies `value.xlen()` payload bytes from the active bank, demanding
/// `xlen + ENCODE_HEADER_RESERVE` free output bytes first (spec.md §4.2:
/// enough room for the payload plus the next iteration's header).
fn copy_payload(
    value: Value,
    bank1: &[u8],
    bank2: &[u8],
    from: ActiveBank,
    out: &mut GrowBuf<u8>,
) -> Result<(), EncodeError> {
    let xlen = value.xlen() as usize;
    out.reserve(xlen + ENCODE_HEADER_RESERVE)?;
    let bank = match from {
        ActiveBank::Bank1 => bank1,
        ActiveBank::Bank2 => bank2,
    };
    let xoff = value.xoff() as usize;
    let start = bank.len().saturating_sub(xoff);
    let end = start + xlen;
    let payload = bank.get(start..end).unwrap_or(&[]);
    out.extend_from_slice(payload)?;
    Ok(())
}

fn push_be_u16(out: &mut GrowBuf<u8>, v: u16) -> Result<(), EncodeError> {
    out.extend_from_slice(&v.to_be_bytes())?;
    Ok(())
}

fn push_be_u32(out: &mut GrowBuf<u8>, v: u32) -> Result<(), EncodeError> {
    out.extend_from_slice(&v.to_be_bytes())?;
    Ok(())
}

fn push_be_u64(out: &mut GrowBuf<u8>, v: u64) -> Result<(), EncodeError> {
    out.extend_from_slice(&v.to_be_bytes())?;
    Ok(())
}

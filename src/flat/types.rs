//! Tag/Value data model and MessagePack wire-format constants.
//!
//! Translated from `schema_util.c`'s `enum TypeId`, `struct Value`, and the
//! opcode ranges used throughout `preprocess_msgpack`/`create_msgpack`.
//!
//! `TypeId` discriminants are preserved exactly (including the 13–19 gap
//! before `CopyCommand`) so that the numbering matches the original source
//! one-for-one; nothing is assigned to the gap.

// ─────────────────────────────────────────────────────────────────────────────
// Tag
// ─────────────────────────────────────────────────────────────────────────────

/// The type of one flattened node. Paired positionally with a [`Value`] in
/// the parallel `tags`/`values` arrays produced by [`decode`](super::decoder::decode)
/// and consumed by [`encode`](super::encoder::encode).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// `nil` (`0xc0`). Value unused.
    Nil = 1,
    /// `false` (`0xc2`). Value unused.
    False = 2,
    /// `true` (`0xc3`). Value unused.
    True = 3,
    /// Signed 64-bit integer. Covers every MessagePack int/uint family except
    /// `uint 64` values that overflow `i64::MAX` (see [`Tag::UlongInt`]).
    LongInt = 4,
    /// Unsigned 64-bit integer, used only for `uint 64` payloads exceeding
    /// `i64::MAX`. The preprocessor downstream of this codec prefers
    /// `LongInt`; this variant exists only to avoid losing magnitude.
    UlongInt = 5,
    /// `float 32`, value widened to `f64` on decode, narrowed back to `f32`
    /// bits on encode.
    Float32 = 6,
    /// `float 64`.
    Float64 = 7,
    /// `fixstr`/`str 8`/`str 16`/`str 32`. Value is `(xlen, xoff)`.
    Str = 8,
    /// `bin 8`/`bin 16`/`bin 32`. Value is `(xlen, xoff)`.
    Bin = 9,
    /// `fixext N`/`ext 8`/`ext 16`/`ext 32`. Value is `(xlen, xoff)` with
    /// `xlen` counting the leading subtype byte.
    Ext = 10,
    /// `fixarray`/`array 16`/`array 32`. Value is `(xlen = element count,
    /// xoff = sibling-skip)`.
    Array = 11,
    /// `fixmap`/`map 16`/`map 32`. Value is `(xlen = pair count, xoff =
    /// sibling-skip)`.
    Map = 12,
    /// Encoder-only splice command. Value is `(xlen, xoff)` addressing
    /// `bank2`; see [`crate::flat::encoder`].
    CopyCmd = 20,
}

impl Tag {
    /// Reconstructs a `Tag` from its wire discriminant, as stored by the
    /// decoder. Returns `None` for values that are not a valid discriminant —
    /// the encoder treats that as [`EncodeError::UnknownTag`](super::encoder::EncodeError::UnknownTag).
    #[inline]
    pub fn from_u8(v: u8) -> Option<Tag> {
        Some(match v {
            1 => Tag::Nil,
            2 => Tag::False,
            3 => Tag::True,
            4 => Tag::LongInt,
            5 => Tag::UlongInt,
            6 => Tag::Float32,
            7 => Tag::Float64,
            8 => Tag::Str,
            9 => Tag::Bin,
            10 => Tag::Ext,
            11 => Tag::Array,
            12 => Tag::Map,
            20 => Tag::CopyCmd,
            _ => return None,
        })
    }

    /// `true` for [`Tag::Array`]/[`Tag::Map`] — nodes whose [`Value::xoff`]
    /// is a sibling-skip rather than a payload offset.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, Tag::Array | Tag::Map)
    }

    /// `true` for nodes whose [`Value`] is `(xlen, xoff)` addressing a data
    /// bank: [`Tag::Str`], [`Tag::Bin`], [`Tag::Ext`], [`Tag::CopyCmd`].
    #[inline]
    pub fn has_payload(self) -> bool {
        matches!(self, Tag::Str | Tag::Bin | Tag::Ext | Tag::CopyCmd)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value
// ─────────────────────────────────────────────────────────────────────────────

/// A fixed-size per-node payload, interpreted according to the companion
/// [`Tag`]. Mirrors the C `union Value { int64_t ival; uint64_t uval; double
/// dval; struct { uint32_t xlen; uint32_t xoff; }; }` — the Rust port keeps
/// the 8-byte footprint and the "interpret-by-companion-tag" discipline, but
/// stores the bits in a plain `u64` rather than a `union`, so reading it back
/// never needs an `unsafe` field projection.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Value(u64);

impl Value {
    /// Construct a [`Tag::LongInt`] value.
    #[inline]
    pub fn long(v: i64) -> Value {
        Value(v as u64)
    }

    /// Read back a [`Tag::LongInt`] value.
    #[inline]
    pub fn as_long(self) -> i64 {
        self.0 as i64
    }

    /// Construct a [`Tag::UlongInt`] value.
    #[inline]
    pub fn ulong(v: u64) -> Value {
        Value(v)
    }

    /// Read back a [`Tag::UlongInt`] value (also valid for [`Tag::LongInt`]
    /// when the caller knows the value is non-negative).
    #[inline]
    pub fn as_ulong(self) -> u64 {
        self.0
    }

    /// Construct a [`Tag::Float32`] or [`Tag::Float64`] value. The decoder
    /// widens `float 32` payloads to `f64` on the way in; the encoder
    /// narrows back to `f32` bits only for [`Tag::Float32`].
    #[inline]
    pub fn double(v: f64) -> Value {
        Value(v.to_bits())
    }

    /// Read back a [`Tag::Float32`]/[`Tag::Float64`] value.
    #[inline]
    pub fn as_double(self) -> f64 {
        f64::from_bits(self.0)
    }

    /// Construct a `(xlen, xoff)` value for [`Tag::Str`], [`Tag::Bin`],
    /// [`Tag::Ext`], [`Tag::Array`], [`Tag::Map`], or [`Tag::CopyCmd`].
    #[inline]
    pub fn xlen_xoff(xlen: u32, xoff: u32) -> Value {
        Value((u64::from(xoff) << 32) | u64::from(xlen))
    }

    /// Payload byte length (Str/Bin/Ext/CopyCmd) or element/pair count
    /// (Array/Map).
    #[inline]
    pub fn xlen(self) -> u32 {
        self.0 as u32
    }

    /// Payload offset (Str/Bin/Ext/CopyCmd, bank-end-relative) or
    /// sibling-skip distance (Array/Map, slot-relative).
    #[inline]
    pub fn xoff(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Overwrite just the `xoff` half in place. Used by the decoder to
    /// back-patch a container header once its sibling-skip distance is
    /// known, without disturbing the already-written `xlen`.
    #[inline]
    pub fn set_xoff(&mut self, xoff: u32) {
        *self = Value::xlen_xoff(self.xlen(), xoff);
    }

    /// The unused value stored alongside [`Tag::Nil`]/[`Tag::False`]/[`Tag::True`].
    #[inline]
    pub fn unused() -> Value {
        Value(0)
    }
}

impl core::fmt::Debug for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Value({:#018x})", self.0)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::unused()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire-format opcodes — schema_util.c's byte-range switch, named
// ─────────────────────────────────────────────────────────────────────────────

pub const NIL: u8 = 0xc0;
pub const RESERVED: u8 = 0xc1;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;
pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;
pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;
pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
pub const FIXEXT1: u8 = 0xd4;
pub const FIXEXT2: u8 = 0xd5;
pub const FIXEXT4: u8 = 0xd6;
pub const FIXEXT8: u8 = 0xd7;
pub const FIXEXT16: u8 = 0xd8;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Highest value a positive fixint byte can take.
pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;
/// Lowest byte value belonging to the fixmap range.
pub const FIXMAP_MIN: u8 = 0x80;
pub const FIXMAP_MAX: u8 = 0x8f;
pub const FIXARRAY_MIN: u8 = 0x90;
pub const FIXARRAY_MAX: u8 = 0x9f;
pub const FIXSTR_MIN: u8 = 0xa0;
pub const FIXSTR_MAX: u8 = 0xbf;
/// Lowest byte value belonging to the negative-fixint range (`0xe0..=0xff`).
pub const NEGATIVE_FIXINT_MIN: u8 = 0xe0;

/// Inclusive upper bound on a fixarray/fixmap element/pair count.
pub const FIX_CONTAINER_MAX: u32 = 15;
/// Inclusive upper bound on a fixstr payload length.
pub const FIXSTR_LEN_MAX: u32 = 31;

//! A two-phase codec for MessagePack: a decoder that flattens a nested
//! document into parallel `tags[]`/`values[]` arrays with sibling-skip
//! offsets precomputed on every container header, and an encoder that
//! re-emits MessagePack from such a pair, pulling variable-length payloads
//! out of one of two caller-supplied data banks.
//!
//! Designed to sit between an on-wire byte stream and a higher-level
//! preprocessor that rewrites, reorders, or splices elements without
//! recursing into nested containers — see [`flat::Tag::CopyCmd`] for the
//! splice mechanism. This crate does not itself decide what edits to make;
//! it owns only the flatten/re-emit transform and the buffer policy that
//! lets both run in place on caller-provided scratch memory.

pub mod config;
pub mod flat;
pub mod trace;

#[cfg(feature = "c-abi")]
pub mod abi;

pub use flat::{decode, decode_into, decode_with_capacity, DecodeError};
pub use flat::{encode, encode_into, encode_with_capacity, EncodeError};
pub use flat::{ArrayStorage, Tag, Value};

/// Version of the flattened wire contract this crate produces and consumes.
/// Bump only if the `(tags, values)` array layout itself changes — not on
/// ordinary bug fixes or additions to the safe API surface.
pub const FORMAT_VERSION: u32 = 1;

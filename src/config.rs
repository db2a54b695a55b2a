//! Compile-time configuration constants for the flat-array buffer policy.
//!
//! Migrated from the magic numbers in `schema_util.c`'s `preprocess_msgpack`
//! and `create_msgpack` (`ic = 32`, `nitems > 128 ? nitems : 128`, the
//! `capacity + capacity / 2` growth step, and the encoder's `out + 10 >
//! out_max` header-reserve check). Naming and layout follow the teacher
//! crate's `config.rs` (compile-time constants, one per magic number, each
//! documented with its C origin).

/// Heap-capacity floor used by the decoder when no stock storage is
/// supplied and the caller's hint is smaller than this. Corresponds to
/// `size_t ic = 32;` in `preprocess_msgpack`.
pub const STOCK_CAPACITY_FLOOR: usize = 32;

/// Heap-capacity floor used by the encoder's output buffer when no stock
/// storage is supplied. Corresponds to
/// `initial_capacity = nitems > 128 ? nitems : 128;` in `create_msgpack`.
pub const OUTPUT_CAPACITY_FLOOR: usize = 128;

/// Initial capacity of the decoder's open-container depth stack.
/// Corresponds to `uint32_t auto_stack_buf[32];` in `preprocess_msgpack`.
pub const DEPTH_STACK_INITIAL_CAPACITY: usize = 32;

/// Numerator of the 1.5x geometric growth factor shared by every buffer in
/// this crate. Corresponds to `new_capacity = capacity + capacity / 2`.
pub const GROWTH_NUMERATOR: usize = 3;
/// Denominator of the 1.5x geometric growth factor.
pub const GROWTH_DENOMINATOR: usize = 2;

/// Worst-case bytes a single header (tag byte + largest length prefix) can
/// occupy in the encoded output. The encoder demands this many free bytes
/// at the top of every loop iteration. Corresponds to the `out + 10 >
/// out_max` check in `create_msgpack`.
pub const ENCODE_HEADER_RESERVE: usize = 10;

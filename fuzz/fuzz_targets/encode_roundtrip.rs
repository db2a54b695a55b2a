#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use msgpack_flat::{encode, Tag, Value};

const TAG_POOL: &[Tag] = &[
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
    Tag::Array,
    Tag::Map,
    Tag::CopyCmd,
];

#[derive(Arbitrary, Debug)]
struct Input {
    tag_indices: Vec<u8>,
    raw_values: Vec<u64>,
    bank1: Vec<u8>,
    bank2: Vec<u8>,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = Input::arbitrary(&mut u) else {
        return;
    };

    let n = input.tag_indices.len().min(input.raw_values.len());
    if n == 0 || n > 4096 {
        return;
    }

    // Construct a syntactically valid but semantically arbitrary
    // `(tags, values)` pair — offsets and lengths are attacker-controlled
    // and need not correspond to any real document. `encode` must never
    // panic regardless: out-of-range payload windows collapse to empty
    // slices rather than indexing past a bank's end.
    let tags: Vec<Tag> = input.tag_indices[..n]
        .iter()
        .map(|&b| TAG_POOL[b as usize % TAG_POOL.len()])
        .collect();
    let values: Vec<Value> = input.raw_values[..n]
        .iter()
        .map(|&bits| Value::xlen_xoff((bits & 0xffff_ffff) as u32, (bits >> 32) as u32))
        .collect();

    let _ = encode(&tags, &values, &input.bank1, &input.bank2);
});

// Integration tests for the public ArrayStorage surface, exercised through
// decode_into/encode_into since GrowBuf itself is crate-private.

use std::mem::MaybeUninit;

use msgpack_flat::{decode_into, encode_into, Tag, Value};

#[test]
fn array_storage_reports_stock_when_capacity_is_sufficient() {
    let mut tag_storage = [MaybeUninit::<Tag>::uninit(); 8];
    let mut value_storage = [MaybeUninit::<Value>::uninit(); 8];
    let (tags, values) = decode_into(&[0xc0], &mut tag_storage, &mut value_storage).unwrap();
    assert!(tags.is_stock());
    assert!(values.is_stock());
}

#[test]
fn array_storage_reports_heap_once_stock_is_exhausted() {
    let mut tag_storage = [MaybeUninit::<Tag>::uninit(); 1];
    let mut value_storage = [MaybeUninit::<Value>::uninit(); 1];
    let (tags, values) = decode_into(&[0x91, 0x01], &mut tag_storage, &mut value_storage).unwrap();
    assert!(!tags.is_stock());
    assert!(!values.is_stock());
}

#[test]
fn array_storage_as_mut_slice_allows_in_place_edits_regardless_of_backing() {
    let mut tag_storage = [MaybeUninit::<Tag>::uninit(); 8];
    let mut value_storage = [MaybeUninit::<Value>::uninit(); 8];
    let (mut tags, mut values) = decode_into(&[0x91, 0xc0], &mut tag_storage, &mut value_storage).unwrap();

    // Splice a CopyCmd in place, the way a preprocessor sitting between
    // decode and encode would, and confirm the mutation is visible to a
    // subsequent encode.
    tags.as_mut_slice()[1] = Tag::CopyCmd;
    values.as_mut_slice()[1] = Value::xlen_xoff(1, 1);

    let bank2 = [0xc3u8];
    let mut out_storage = [MaybeUninit::<u8>::uninit(); 8];
    let out = encode_into(tags.as_slice(), values.as_slice(), &[], &bank2, &mut out_storage).unwrap();
    assert_eq!(out.as_slice(), &[0x91, 0xc3]);
}

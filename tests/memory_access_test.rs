//! Integration tests for typed reads and writes over a memory image

use pretty_assertions::assert_eq;
use process_memory_utils::memory::decode_window;
use process_memory_utils::{
    Address, ErrorKind, MemoryAccess, MemoryError, MemoryImage, MemoryReader, MemoryValue,
    MemoryWriter, ValueKind,
};
use proptest::prelude::*;

const SLOT: Address = Address::new(0x1000);

fn image() -> MemoryImage {
    let image = MemoryImage::new();
    image.map(SLOT, vec![0; 64]);
    image
}

#[test]
fn test_string_window_hi() {
    let image = image();
    MemoryWriter::new(&image).write_bytes_strict(SLOT, b"HI").unwrap();

    let reader = MemoryReader::new(&image);
    assert_eq!(reader.read_string(SLOT), "HI");
}

#[test]
fn test_string_write_overwrites_without_terminator() {
    let image = image();
    let writer = MemoryWriter::new(&image);
    assert!(writer.write_text(SLOT, "string", "LONGNAME").unwrap());
    assert!(writer.write_text(SLOT, "STRING", "Bob").unwrap());

    // the tail of the earlier string survives
    assert_eq!(MemoryReader::new(&image).read_string(SLOT), "BobGNAME");
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let image = image();
    image.map(Address::new(0x2000), vec![b'A', 0xFF, b'B', 0, 0, 0, 0, 0, 0, 0]);
    let text = MemoryReader::new(&image).read_string(Address::new(0x2000));
    assert_eq!(text, "A\u{FFFD}B");
}

#[test]
fn test_failure_modes_by_operation() {
    let image = MemoryImage::new();
    let reader = MemoryReader::new(&image);
    let writer = MemoryWriter::new(&image);
    let unmapped = Address::new(0xBAD0);

    // strings degrade, typed reads report
    assert_eq!(reader.read_string(unmapped), "");
    let err = reader.read_value(unmapped, ValueKind::Float).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MemoryAccess);

    // writes report through the flag
    assert!(!writer.write_value(unmapped, &MemoryValue::Int(1)));
    assert!(!writer.write_text(unmapped, "int", "1").unwrap());
}

#[test]
fn test_unsupported_tag_is_rejected_before_write() {
    let image = image();
    let writer = MemoryWriter::new(&image);

    for tag in ["double", "long", "", "bytes"] {
        let err = writer.write_text(SLOT, tag, "1").unwrap_err();
        assert!(matches!(err, MemoryError::UnsupportedType(_)), "{tag}");
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }
    assert_eq!(image.writes(), 0);
}

#[test]
fn test_tag_aliases() {
    let image = image();
    let writer = MemoryWriter::new(&image);
    assert!(writer.write_text(SLOT, "F32", "2.5").unwrap());

    let reader = MemoryReader::new(&image);
    assert_eq!(
        reader.read_value(SLOT, "float".parse().unwrap()).unwrap(),
        MemoryValue::Float(2.5)
    );
}

#[test]
fn test_readonly_region() {
    let image = MemoryImage::new();
    image.map_readonly(SLOT, vec![1, 2, 3, 4]);

    let writer = MemoryWriter::new(&image);
    assert!(!writer.write_value(SLOT, &MemoryValue::Byte(9)));
    assert_eq!(image.read_bytes(SLOT, 1).unwrap(), vec![1]);
}

#[test]
fn test_decode_window_trims_only_trailing_nuls() {
    assert_eq!(decode_window(b"\0HI\0\0"), "\0HI");
}

fn value_strategy() -> impl Strategy<Value = MemoryValue> {
    prop_oneof![
        any::<f32>()
            .prop_filter("NaN never compares equal", |v| !v.is_nan())
            .prop_map(MemoryValue::Float),
        any::<i32>().prop_map(MemoryValue::Int),
        any::<u8>().prop_map(MemoryValue::Byte),
        "[a-zA-Z0-9 ]{1,10}".prop_map(MemoryValue::Text),
    ]
}

proptest! {
    #[test]
    fn prop_write_then_read_round_trips(value in value_strategy()) {
        let image = image();
        prop_assert!(MemoryWriter::new(&image).write_value(SLOT, &value));

        let reader = MemoryReader::new(&image);
        let read = reader.read_value(SLOT, value.kind()).unwrap();
        prop_assert_eq!(read, value);
    }
}

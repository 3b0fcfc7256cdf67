mod common;

use common::{bx, bx64, container, ftyp, meta};
use mp4demeta::boxes::{FourCC, NodeKind};
use mp4demeta::parser::read_box;
use mp4demeta::Error;
use std::io::{Cursor, Seek};

#[test]
fn read_single_ftyp_box() {
    let mut cur = Cursor::new(ftyp());

    let node = read_box(&mut cur).expect("read_box failed").expect("no box");

    assert_eq!(node.hdr.start, 0);
    assert_eq!(node.hdr.size, 24);
    assert_eq!(node.hdr.typ, FourCC(*b"ftyp"));
    assert_eq!(node.hdr.header_size, 8);
    assert_eq!(node.payload().map(|p| p.len()), Some(16));
    assert!(node.active);
    assert_eq!(cur.stream_position().unwrap(), 24);
}

#[test]
fn container_is_left_open_at_first_child() {
    let data = container(b"moov", &[bx(b"mvhd", &[0u8; 4])]);
    let mut cur = Cursor::new(data);

    let node = read_box(&mut cur).unwrap().unwrap();

    assert!(node.is_container());
    assert!(node.payload().is_none());
    assert_eq!(node.hdr.payload_size(), 12);
    assert_eq!(cur.stream_position().unwrap(), 8);
}

#[test]
fn meta_is_read_as_opaque_leaf() {
    let mut cur = Cursor::new(meta(40));

    let node = read_box(&mut cur).unwrap().unwrap();

    assert!(matches!(node.kind, NodeKind::Leaf(ref p) if p.len() == 32));
}

#[test]
fn unlisted_box_with_nested_bytes_stays_opaque() {
    // dinf holds a dref box but is not on the container whitelist
    let data = container(b"dinf", &[bx(b"dref", &[0u8; 8])]);
    let mut cur = Cursor::new(data);

    let node = read_box(&mut cur).unwrap().unwrap();

    assert!(!node.is_container());
    assert_eq!(node.payload().unwrap().len(), 16);
}

#[test]
fn extended_size_header() {
    let mut cur = Cursor::new(bx64(b"free", &[7u8; 5]));

    let node = read_box(&mut cur).unwrap().unwrap();

    assert_eq!(node.hdr.size, 21);
    assert_eq!(node.hdr.header_size, 16);
    assert!(node.hdr.is_extended());
    assert_eq!(node.payload().unwrap(), &[7u8; 5]);
}

#[test]
fn end_of_input_is_not_an_error() {
    let mut cur = Cursor::new(Vec::new());
    assert!(read_box(&mut cur).unwrap().is_none());
}

#[test]
fn zero_size_as_last_header_ends_stream() {
    let mut data = 0u32.to_be_bytes().to_vec();
    data.extend_from_slice(b"free");
    let mut cur = Cursor::new(data);

    assert!(read_box(&mut cur).unwrap().is_none());
}

#[test]
fn zero_size_box_with_data_is_refused() {
    let mut data = 0u32.to_be_bytes().to_vec();
    data.extend_from_slice(b"mdat");
    data.extend_from_slice(&[1, 2, 3]);
    let mut cur = Cursor::new(data);

    match read_box(&mut cur) {
        Err(Error::UnboundedBox { typ, offset, trailing }) => {
            assert_eq!(typ, FourCC(*b"mdat"));
            assert_eq!(offset, 0);
            assert_eq!(trailing, 3);
        }
        other => panic!("expected UnboundedBox, got {other:?}"),
    }
}

#[test]
fn size_smaller_than_header_is_malformed() {
    let mut data = 4u32.to_be_bytes().to_vec();
    data.extend_from_slice(b"free");
    let mut cur = Cursor::new(data);

    match read_box(&mut cur) {
        Err(Error::MalformedBox { typ, size, header_size, .. }) => {
            assert_eq!(typ, FourCC(*b"free"));
            assert_eq!(size, 4);
            assert_eq!(header_size, 8);
        }
        other => panic!("expected MalformedBox, got {other:?}"),
    }
}

#[test]
fn extended_size_smaller_than_header_is_malformed() {
    let mut data = 1u32.to_be_bytes().to_vec();
    data.extend_from_slice(b"free");
    data.extend_from_slice(&12u64.to_be_bytes());
    let mut cur = Cursor::new(data);

    assert!(matches!(read_box(&mut cur), Err(Error::MalformedBox { header_size: 16, .. })));
}

#[test]
fn short_payload_is_truncated() {
    let mut data = ftyp();
    data.truncate(20);
    let mut cur = Cursor::new(data);

    match read_box(&mut cur) {
        Err(Error::TruncatedFile { offset, needed, .. }) => {
            assert_eq!(offset, 8);
            assert_eq!(needed, 16);
        }
        other => panic!("expected TruncatedFile, got {other:?}"),
    }
}

#[test]
fn partial_header_is_truncated() {
    let mut cur = Cursor::new(vec![0u8, 0, 1]);
    assert!(matches!(read_box(&mut cur), Err(Error::TruncatedFile { .. })));

    let mut data = 1u32.to_be_bytes().to_vec();
    data.extend_from_slice(b"mdat");
    data.extend_from_slice(&[0u8; 3]);
    let mut cur = Cursor::new(data);
    assert!(matches!(read_box(&mut cur), Err(Error::TruncatedFile { needed: 16, .. })));
}

//! Golden wire vectors.
//!
//! Each vector is built three ways (from wire bytes, from a raw value, from
//! children) and every representation must encode to the same bytes.

use bytes::Bytes;
use ndn_tlv_core::{make_non_negative_integer_block, make_string_block, Block, Error};

/// A known element and its decomposition.
struct Vector {
    name: &'static str,
    wire: &'static str,
    tlv_type: u32,
    value: &'static str,
    child_types: &'static [u32],
}

const VECTORS: &[Vector] = &[
    Vector {
        name: "empty value",
        wire: "0500",
        tlv_type: 0x05,
        value: "",
        child_types: &[],
    },
    Vector {
        name: "name with two components",
        wire: "070a08036e646e0803666f6f",
        tlv_type: 0x07,
        value: "08036e646e0803666f6f",
        child_types: &[0x08, 0x08],
    },
    Vector {
        name: "interest with name, nonce and lifetime",
        wire: "05100705080361626301040a0b0c0d0c0103",
        tlv_type: 0x05,
        value: "0705080361626301040a0b0c0d0c0103",
        child_types: &[0x07, 0x01, 0x0c],
    },
    Vector {
        name: "three-octet type",
        wire: "fd0100020100",
        tlv_type: 0x100,
        value: "0100",
        child_types: &[0x01],
    },
];

fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

#[test]
fn test_vectors_decode() {
    for v in VECTORS {
        let block = Block::from_bytes(Bytes::from(unhex(v.wire))).unwrap();
        assert_eq!(block.tlv_type(), v.tlv_type, "{}", v.name);
        assert_eq!(hex::encode(block.value()), v.value, "{}", v.name);

        let types: Vec<u32> = block.elements().unwrap().iter().map(Block::tlv_type).collect();
        assert_eq!(types, v.child_types, "{}", v.name);
    }
}

#[test]
fn test_three_representations_agree() {
    for v in VECTORS {
        let from_wire = Block::from_bytes(Bytes::from(unhex(v.wire))).unwrap();

        let from_value = Block::with_value(v.tlv_type, unhex(v.value))
            .encoded()
            .unwrap();

        let mut from_children = Block::with_type(v.tlv_type);
        for child in from_wire.elements().unwrap() {
            from_children.push(child.clone()).unwrap();
        }
        from_children.encode().unwrap();

        assert_eq!(from_value, from_wire, "{}", v.name);
        assert_eq!(from_children, from_wire, "{}", v.name);
        assert_eq!(hex::encode(from_children.wire().unwrap()), v.wire, "{}", v.name);
    }
}

#[test]
fn test_build_interest_bottom_up() {
    let mut name = Block::with_type(0x07);
    name.push(make_string_block(0x08, "abc")).unwrap();
    name.encode().unwrap();

    let mut interest = Block::with_type(0x05);
    interest.push(name).unwrap();
    interest
        .push(Block::with_value(0x01, vec![0x0a, 0x0b, 0x0c, 0x0d]))
        .unwrap();
    interest.push(make_non_negative_integer_block(0x0c, 3)).unwrap();
    interest.encode().unwrap();

    assert_eq!(
        hex::encode(interest.wire().unwrap()),
        "05100705080361626301040a0b0c0d0c0103"
    );
}

#[test]
fn test_remove_then_reencode() {
    let mut interest = Block::from_bytes(Bytes::from(unhex(
        "05100705080361626301040a0b0c0d0c0103",
    )))
    .unwrap();
    interest.remove(0x01).unwrap();
    assert!(interest.wire().is_none());

    interest.encode().unwrap();
    assert_eq!(
        hex::encode(interest.wire().unwrap()),
        "050a070508036162630c0103"
    );
    assert!(matches!(interest.get(0x01), Err(Error::NotFound { tlv_type: 0x01 })));
}

#[test]
fn test_stream_of_vectors() {
    let mut stream = Vec::new();
    for v in VECTORS {
        stream.extend_from_slice(&unhex(v.wire));
    }

    let mut reader = &stream[..];
    for v in VECTORS {
        let block = Block::from_reader(&mut reader).unwrap();
        assert_eq!(hex::encode(block.wire().unwrap()), v.wire, "{}", v.name);
    }
    assert!(reader.is_empty());

    let shared = Bytes::from(stream);
    let mut offset = 0;
    for v in VECTORS {
        let block = Block::try_from_shared(&shared, offset).unwrap();
        assert_eq!(hex::encode(block.wire().unwrap()), v.wire, "{}", v.name);
        offset += block.size().unwrap();
    }
    assert!(Block::try_from_shared(&shared, offset).is_none());
}

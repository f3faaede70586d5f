//! Serde support: a Block serializes as its wire bytes.

use std::fmt;

use bytes::Bytes;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::{self, Serialize, Serializer};
use serde::{Deserialize, Deserializer};

use crate::block::Block;

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.wire() {
            Some(wire) => serializer.serialize_bytes(wire),
            None => Err(ser::Error::custom("block must be encoded before serialization")),
        }
    }
}

struct BlockVisitor;

impl<'de> Visitor<'de> for BlockVisitor {
    type Value = Block;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the wire bytes of one TLV element")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Block, E> {
        self.visit_byte_buf(v.to_vec())
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Block, E> {
        Block::from_bytes(Bytes::from(v)).map_err(E::custom)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Block, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(b) = seq.next_element::<u8>()? {
            bytes.push(b);
        }
        self.visit_byte_buf(bytes)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_byte_buf(BlockVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Envelope {
        name: String,
        block: Block,
    }

    #[test]
    fn test_json_roundtrip() {
        let block = Block::with_value(0x05, vec![0x01, 0x02]).encoded().unwrap();
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, "[5,2,1,2]");

        let decoded: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_embedded_in_struct() {
        let envelope = Envelope {
            name: "interest".into(),
            block: Block::with_type(0x05).encoded().unwrap(),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let decoded: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.name, "interest");
        assert_eq!(decoded.block.wire().unwrap(), &[0x05, 0x00]);
    }

    #[test]
    fn test_unencoded_block_fails() {
        let block = Block::with_value(0x05, vec![0x01]);
        assert!(serde_json::to_string(&block).is_err());
    }

    #[test]
    fn test_malformed_bytes_rejected() {
        let result: Result<Block, _> = serde_json::from_str("[5,3,1]");
        assert!(result.is_err());
    }
}

//! Helpers for building and reading Blocks that carry typed values.
//!
//! Every `make_*` function returns a wire-backed Block.

use crate::block::Block;
use crate::error::{Error, Result};
use crate::tlv;

/// A Block whose value is a nonNegativeInteger.
pub fn make_non_negative_integer_block(tlv_type: u32, value: u64) -> Block {
    let mut buf = Vec::with_capacity(tlv::size_of_non_negative_integer(value));
    tlv::write_non_negative_integer(&mut buf, value);
    Block::encode_value(tlv_type, &buf)
}

/// Read a nonNegativeInteger value.
pub fn read_non_negative_integer(block: &Block) -> Result<u64> {
    tlv::read_non_negative_integer(block.value())
}

/// A Block with a zero-length value.
pub fn make_empty_block(tlv_type: u32) -> Block {
    Block::encode_value(tlv_type, &[])
}

/// A Block whose value is `value` verbatim.
pub fn make_binary_block(tlv_type: u32, value: &[u8]) -> Block {
    Block::encode_value(tlv_type, value)
}

/// A Block whose value is the UTF-8 bytes of `value`.
pub fn make_string_block(tlv_type: u32, value: &str) -> Block {
    Block::encode_value(tlv_type, value.as_bytes())
}

/// Read a UTF-8 string value.
pub fn read_string(block: &Block) -> Result<String> {
    String::from_utf8(block.value().to_vec())
        .map_err(|e| Error::Format(format!("value is not valid UTF-8: {}", e)))
}

/// A Block whose sole child is `inner`.
///
/// `inner` is encoded first if needed, so it must be wire-backed or carry
/// a raw value.
pub fn make_nested_block(tlv_type: u32, inner: &Block) -> Result<Block> {
    let inner = inner.clone().encoded()?;
    Block::with_block_value(tlv_type, &inner)?.encoded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_integer_block() {
        let block = make_non_negative_integer_block(0x0c, 4000);
        assert_eq!(block.wire().unwrap(), &[0x0c, 0x02, 0x0f, 0xa0]);
        assert_eq!(read_non_negative_integer(&block).unwrap(), 4000);

        let bad = make_binary_block(0x0c, &[0x01, 0x02, 0x03]);
        assert!(read_non_negative_integer(&bad).unwrap_err().is_format());
    }

    #[test]
    fn test_empty_block() {
        let block = make_empty_block(0x15);
        assert_eq!(block.wire().unwrap(), &[0x15, 0x00]);
        assert!(!block.is_empty());
        assert_eq!(block.value_size(), 0);
    }

    #[test]
    fn test_string_block() {
        let block = make_string_block(0x08, "ndn");
        assert_eq!(block.wire().unwrap(), &[0x08, 0x03, b'n', b'd', b'n']);
        assert_eq!(read_string(&block).unwrap(), "ndn");

        let bad = make_binary_block(0x08, &[0xff, 0xfe]);
        assert!(read_string(&bad).unwrap_err().is_format());
    }

    #[test]
    fn test_nested_block() {
        let inner = Block::with_value(0x08, b"a".to_vec());
        let outer = make_nested_block(0x07, &inner).unwrap();
        assert_eq!(outer.wire().unwrap(), &[0x07, 0x03, 0x08, 0x01, b'a']);
        assert_eq!(outer.get(0x08).unwrap().value(), b"a");

        let nested_again = make_nested_block(0x06, &outer).unwrap();
        assert_eq!(nested_again.block_from_value().unwrap(), outer);
    }

    #[test]
    fn test_nested_block_requires_encodable_inner() {
        let mut inner = Block::with_type(0x08);
        inner.push(Block::with_type(0x09)).unwrap();
        assert!(make_nested_block(0x07, &inner).unwrap_err().is_encoding());
    }
}

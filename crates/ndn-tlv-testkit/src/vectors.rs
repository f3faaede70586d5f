//! Golden test vectors for VAR-NUMBER boundaries.
//!
//! These vectors pin the exact header bytes produced at every width change
//! of the TYPE and LENGTH encodings.

use bytes::Bytes;
use ndn_tlv_core::Block;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// TLV type.
    pub tlv_type: u32,
    /// Length of the value (value octets are `0..len` modulo 256).
    pub value_len: usize,
    /// Expected header bytes (hex).
    pub expected_header: &'static str,
}

impl GoldenVector {
    /// The value bytes for this vector.
    pub fn value(&self) -> Vec<u8> {
        (0..self.value_len).map(|i| i as u8).collect()
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "smallest type, empty value",
            tlv_type: 0,
            value_len: 0,
            expected_header: "0000",
        },
        GoldenVector {
            name: "largest one-octet type and length",
            tlv_type: 252,
            value_len: 252,
            expected_header: "fcfc",
        },
        GoldenVector {
            name: "smallest three-octet type and length",
            tlv_type: 253,
            value_len: 253,
            expected_header: "fd00fdfd00fd",
        },
        GoldenVector {
            name: "largest three-octet length",
            tlv_type: 6,
            value_len: 0xffff,
            expected_header: "06fdffff",
        },
        GoldenVector {
            name: "smallest five-octet length",
            tlv_type: 6,
            value_len: 0x1_0000,
            expected_header: "06fe00010000",
        },
        GoldenVector {
            name: "largest valid type",
            tlv_type: 0xffff_fffe,
            value_len: 1,
            expected_header: "fefffffffe01",
        },
    ]
}

/// Encode a vector through the Block API.
pub fn generate_block_from_vector(vector: &GoldenVector) -> Block {
    Block::encode_value(vector.tlv_type, &vector.value())
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, actual_header_hex)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let block = generate_block_from_vector(v);
            let header_len = block.size().unwrap_or(0) - block.value_size();
            let header = hex::encode(&block.wire().unwrap_or_default()[..header_len]);

            let decodes = Block::from_bytes(block.wire_bytes().unwrap_or_default())
                .map(|b| b.tlv_type() == v.tlv_type && b.value() == v.value().as_slice())
                .unwrap_or(false);

            (v.name.to_string(), decodes && header == v.expected_header, header)
        })
        .collect()
}

/// Concatenate the wire bytes of every vector into one buffer.
pub fn vector_stream() -> Bytes {
    let mut stream = Vec::new();
    for v in all_vectors() {
        stream.extend_from_slice(generate_block_from_vector(&v).wire().unwrap_or_default());
    }
    Bytes::from(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, header) in verify_all_vectors() {
            assert!(matches, "vector '{}' produced header {}", name, header);
        }
    }

    #[test]
    fn test_vector_stream_splits_back() {
        let stream = vector_stream();
        let mut offset = 0;
        for v in all_vectors() {
            let block = Block::try_from_shared(&stream, offset)
                .unwrap_or_else(|| panic!("vector '{}' did not split", v.name));
            assert_eq!(block.tlv_type(), v.tlv_type);
            offset += block.size().unwrap();
        }
        assert_eq!(offset, stream.len());
    }

    #[test]
    fn test_large_vectors_exceed_stream_cap() {
        let stream = vector_stream();
        let mut reader = &stream[..];
        let mut read = 0;
        let err = loop {
            match Block::from_reader(&mut reader) {
                Ok(_) => read += 1,
                Err(e) => break e,
            }
        };
        // the 0xffff-length vector is the first above the default cap
        assert_eq!(read, 3);
        assert!(err.is_format());
    }
}

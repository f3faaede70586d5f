//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ndn_tlv_core::{tlv, Block, TYPE_INVALID};

/// Generate a TLV type, weighted towards each VAR-NUMBER width.
pub fn tlv_type() -> impl Strategy<Value = u32> {
    prop_oneof![
        0u32..253,
        253u32..=0xffff,
        0x1_0000u32..TYPE_INVALID,
    ]
}

/// Generate value bytes of specified max length.
pub fn value(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// A TLV tree description, encoded independently of [`Block`].
#[derive(Debug, Clone)]
pub enum BlockSpec {
    /// An element with a raw value.
    Leaf { tlv_type: u32, value: Vec<u8> },
    /// An element whose value is a sequence of elements.
    Nested { tlv_type: u32, children: Vec<BlockSpec> },
}

impl BlockSpec {
    /// The element's type.
    pub fn tlv_type(&self) -> u32 {
        match self {
            BlockSpec::Leaf { tlv_type, .. } | BlockSpec::Nested { tlv_type, .. } => *tlv_type,
        }
    }

    /// Reference encoding, written directly with the VAR-NUMBER codec.
    pub fn expected_wire(&self) -> Vec<u8> {
        let value = match self {
            BlockSpec::Leaf { value, .. } => value.clone(),
            BlockSpec::Nested { children, .. } => {
                children.iter().flat_map(BlockSpec::expected_wire).collect()
            }
        };

        let mut wire = Vec::new();
        tlv::write_var_number(&mut wire, u64::from(self.tlv_type()));
        tlv::write_var_number(&mut wire, value.len() as u64);
        wire.extend_from_slice(&value);
        wire
    }

    /// Build a wire-backed Block bottom-up through the Block API.
    pub fn build(&self) -> Block {
        match self {
            BlockSpec::Leaf { tlv_type, value } => Block::with_value(*tlv_type, value.clone())
                .encoded()
                .expect("raw-value blocks always encode"),
            BlockSpec::Nested { tlv_type, children } => {
                let mut block = Block::with_type(*tlv_type);
                for child in children {
                    block.push(child.build()).expect("structured blocks accept children");
                }
                block.encoded().expect("children are encoded bottom-up")
            }
        }
    }
}

impl Arbitrary for BlockSpec {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let leaf = (tlv_type(), value(64))
            .prop_map(|(tlv_type, value)| BlockSpec::Leaf { tlv_type, value });

        leaf.prop_recursive(4, 32, 6, |inner| {
            (tlv_type(), prop::collection::vec(inner, 0..6))
                .prop_map(|(tlv_type, children)| BlockSpec::Nested { tlv_type, children })
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    proptest! {
        #[test]
        fn test_build_matches_reference_encoding(spec: BlockSpec) {
            let block = spec.build();
            prop_assert_eq!(block.wire().unwrap(), &spec.expected_wire()[..]);
        }

        #[test]
        fn test_parse_recovers_direct_children(spec: BlockSpec) {
            let block = Block::from_bytes(Bytes::from(spec.expected_wire())).unwrap();
            prop_assert_eq!(block.tlv_type(), spec.tlv_type());

            if let BlockSpec::Nested { children, .. } = &spec {
                let parsed = block.elements().unwrap();
                prop_assert_eq!(parsed.len(), children.len());
                for (parsed, expected) in parsed.iter().zip(children) {
                    prop_assert_eq!(parsed.wire().unwrap(), &expected.expected_wire()[..]);
                }
            }
        }

        #[test]
        fn test_encode_twice_is_stable(spec: BlockSpec) {
            let mut block = spec.build();
            let before = block.wire_bytes().unwrap();
            block.encode().unwrap();
            prop_assert_eq!(block.wire_bytes().unwrap(), before);
        }

        #[test]
        fn test_remove_drops_only_matching(spec: BlockSpec, victim in tlv_type()) {
            prop_assume!(matches!(spec, BlockSpec::Nested { .. }));
            let BlockSpec::Nested { children, .. } = &spec else { unreachable!() };

            let mut block = spec.build();
            block.remove(victim).unwrap();
            prop_assert!(!block.has_wire());

            let survivors: Vec<u32> = children
                .iter()
                .map(BlockSpec::tlv_type)
                .filter(|t| *t != victim)
                .collect();
            let remaining: Vec<u32> = block.elements().unwrap().iter().map(Block::tlv_type).collect();
            prop_assert_eq!(remaining, survivors);
        }
    }
}

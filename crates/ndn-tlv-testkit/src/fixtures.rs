//! Test fixtures and helpers.
//!
//! Small packet-shaped TLV trees for integration tests. The type numbers
//! follow the NDN packet format but nothing here validates their meaning.

use ndn_tlv_core::{
    make_binary_block, make_non_negative_integer_block, make_string_block, Block, Result,
};

/// Interest packet type.
pub const INTEREST: u32 = 0x05;
/// Data packet type.
pub const DATA: u32 = 0x06;
/// Name type.
pub const NAME: u32 = 0x07;
/// GenericNameComponent type.
pub const NAME_COMPONENT: u32 = 0x08;
/// Nonce type.
pub const NONCE: u32 = 0x0a;
/// InterestLifetime type.
pub const INTEREST_LIFETIME: u32 = 0x0c;
/// Content type.
pub const CONTENT: u32 = 0x15;

/// Build a wire-backed Name from string components.
pub fn name(components: &[&str]) -> Result<Block> {
    let mut name = Block::with_type(NAME);
    for component in components {
        name.push(make_string_block(NAME_COMPONENT, component))?;
    }
    name.encoded()
}

/// Build a wire-backed Interest.
pub fn interest(components: &[&str], nonce: [u8; 4], lifetime_ms: u64) -> Result<Block> {
    let mut interest = Block::with_type(INTEREST);
    interest.push(name(components)?)?;
    interest.push(make_binary_block(NONCE, &nonce))?;
    interest.push(make_non_negative_integer_block(INTEREST_LIFETIME, lifetime_ms))?;
    interest.encoded()
}

/// Build a wire-backed Data packet.
pub fn data(components: &[&str], content: &[u8]) -> Result<Block> {
    let mut data = Block::with_type(DATA);
    data.push(name(components)?)?;
    data.push(Block::with_value(CONTENT, content.to_vec()))?;
    data.encoded()
}

/// Concatenate wire-backed Blocks into one byte stream.
pub fn concat(blocks: &[Block]) -> Vec<u8> {
    blocks
        .iter()
        .filter_map(Block::wire)
        .flat_map(|wire| wire.iter().copied())
        .collect()
}

//! # NDN TLV Core
//!
//! The TLV Block container used as the wire format of NDN packets.
//!
//! This crate contains no networking and interprets no TLV type numbers. It
//! decodes, holds, and re-encodes TLV elements.
//!
//! ## Key Types
//!
//! - [`Block`] - One TLV element: wire-backed, raw-value, or structured
//! - [`ReadLimits`] - Caps applied when reading a Block from a byte source
//! - [`Error`] - Format, encoding, lookup and I/O failures
//!
//! ## Wire Format
//!
//! Every element is `TYPE LENGTH VALUE`, where TYPE and LENGTH use the
//! VAR-NUMBER encoding in [`tlv`]. A value may itself be a sequence of
//! elements; [`Block::parse`] decomposes one level of it.
//!
//! ```rust
//! use bytes::Bytes;
//! use ndn_tlv_core::Block;
//!
//! let block = Block::from_bytes(Bytes::from_static(&[0x07, 0x03, 0x08, 0x01, b'a'])).unwrap();
//! let child = block.get(0x08).unwrap();
//! assert_eq!(child.value(), b"a");
//!
//! let mut outer = Block::with_type(0x07);
//! outer.push(Block::with_value(0x08, &b"a"[..])).unwrap();
//! outer.encode().unwrap();
//! assert_eq!(outer, block);
//! ```

pub mod block;
pub mod error;
pub mod helpers;
pub mod limits;
mod serde_impl;
pub mod tlv;

pub use block::{Block, TYPE_INVALID};
pub use error::{Error, Result};
pub use helpers::{
    make_binary_block, make_empty_block, make_nested_block, make_non_negative_integer_block,
    make_string_block, read_non_negative_integer, read_string,
};
pub use limits::{ReadLimits, MAX_SIZE_OF_BLOCK_FROM_STREAM};

//! # NDN TLV Testkit
//!
//! Testing utilities for `ndn-tlv-core`.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Header bytes pinned at every VAR-NUMBER width change
//! - **Generators**: Proptest strategies for TLV types, values and whole trees
//! - **Fixtures**: Packet-shaped Blocks for integration tests
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ndn_tlv_testkit::generators::BlockSpec;
//!
//! proptest! {
//!     #[test]
//!     fn encoding_matches_reference(spec: BlockSpec) {
//!         prop_assert_eq!(spec.build().wire().unwrap(), &spec.expected_wire()[..]);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ndn_tlv_testkit::fixtures;
//!
//! let interest = fixtures::interest(&["ndn", "test"], [1, 2, 3, 4], 4000).unwrap();
//! assert!(interest.has_wire());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use generators::BlockSpec;
pub use vectors::{all_vectors, generate_block_from_vector, verify_all_vectors, GoldenVector};

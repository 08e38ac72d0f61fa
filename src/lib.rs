//! A runtime codec library for simple serialize (SSZ): deterministic binary
//! encode/decode, hash-tree-root merkleisation, and a sparse Merkle tree with
//! inclusion proofs, for the schema universe of uints, bools, fixed byte
//! arrays, containers, vectors, lists, and packed bit collections.
//!
//! This crate is the runtime a generated (or hand-written) per-type stub
//! calls into — see [`codec::Encode`]/[`codec::Decode`]/[`tree_hash::TreeHash`]
//! for the dispatch contract a stub implements, and [`types`] for the two
//! generic collection wrappers (`FixedVector`, `VariableList`) most stubs
//! compose from directly. The source-level code generator that reads schema
//! declarations and emits those stubs is out of scope.

#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

pub mod codec;
pub mod error;
pub mod hasher;
pub mod primitives;
pub mod tree;
pub mod tree_hash;
pub mod types;

pub use codec::{Decode, Encode};
pub use error::Error;
pub use hasher::{Digest, Hasher, Sha256Digest};
pub use tree::Node;
pub use tree_hash::{TreeHash, TreeHashType};
pub use types::{FixedVector, VariableList};

//! The merkleisation half of the dispatch contract: [`TreeHash`], implemented by every
//! basic type and by the [`crate::types`] collection wrappers, backed by the
//! [`crate::hasher`] accumulator.

use alloc::vec::Vec;

use crate::error::Error;
use crate::hasher::{Chunk, Digest, Hasher, Sha256Digest};

/// How a type contributes chunks to its container's field-root list. Mirrors the rules in
/// `[MODULE] Hasher`: basic types pack multiple values per chunk; every other type occupies one
/// chunk per element (that element's own `tree_hash_root`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeHashType {
    Basic,
    Vector,
    List,
    Container,
}

/// Merkleisation half of the dispatch contract.
pub trait TreeHash {
    fn tree_hash_type() -> TreeHashType;

    /// The little-endian packed encoding used when this type is a `Basic` element of a
    /// `Vector`/`List`. Only meaningful for `TreeHashType::Basic` types.
    fn tree_hash_packed_encoding(&self) -> Vec<u8>;

    /// How many values of this type share one 32-byte chunk when packed. Only meaningful for
    /// `TreeHashType::Basic` types.
    fn tree_hash_packing_factor() -> usize;

    /// This value's own hash-tree-root.
    fn tree_hash_root(&self) -> Result<Chunk, Error>;
}

macro_rules! impl_basic_tree_hash {
    ($ty:ty, $bits:expr) => {
        impl TreeHash for $ty {
            fn tree_hash_type() -> TreeHashType {
                TreeHashType::Basic
            }
            fn tree_hash_packed_encoding(&self) -> Vec<u8> {
                let mut out = Vec::with_capacity($bits / 8);
                crate::primitives::encode_uint($bits, *self as u64, &mut out);
                out
            }
            fn tree_hash_packing_factor() -> usize {
                32 / ($bits / 8)
            }
            fn tree_hash_root(&self) -> Result<Chunk, Error> {
                let mut h = Hasher::<Sha256Digest>::new();
                h.append_uint($bits, *self as u64);
                h.hash_root()
            }
        }
    };
}

impl_basic_tree_hash!(u8, 8);
impl_basic_tree_hash!(u16, 16);
impl_basic_tree_hash!(u32, 32);
impl_basic_tree_hash!(u64, 64);

impl TreeHash for bool {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Basic
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        alloc::vec![if *self { 1 } else { 0 }]
    }
    fn tree_hash_packing_factor() -> usize {
        32
    }
    fn tree_hash_root(&self) -> Result<Chunk, Error> {
        let mut h = Hasher::<Sha256Digest>::new();
        h.append_bool(*self);
        h.hash_root()
    }
}

impl<const N: usize> TreeHash for [u8; N] {
    /// `FixedBytes(n <= 32)` packs like any other `Basic` type; `FixedBytes(n > 32)` spans
    /// more than one chunk, so per spec §4.3 it contributes its own root as a single chunk to
    /// its container, exactly like a `Vector`/`Container` element — never packed alongside
    /// neighboring fields.
    fn tree_hash_type() -> TreeHashType {
        if N > 32 {
            TreeHashType::Vector
        } else {
            TreeHashType::Basic
        }
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        if N > 32 {
            unreachable!("FixedBytes(n > 32) is composite, never packed")
        }
        self.to_vec()
    }
    fn tree_hash_packing_factor() -> usize {
        if N > 32 {
            unreachable!("FixedBytes(n > 32) is composite, never packed")
        } else if N == 0 {
            1
        } else {
            (32 / N).max(1)
        }
    }
    fn tree_hash_root(&self) -> Result<Chunk, Error> {
        let mut h = Hasher::<Sha256Digest>::new();
        let idx = h.index();
        h.append_chunks(self);
        if N > 32 {
            h.merkleize(idx, 0)?;
        }
        h.hash_root()
    }
}

/// The number of chunks `n` elements of a `Basic` type pack into.
fn packed_chunk_count<T: TreeHash>(n: usize) -> u64 {
    let factor = T::tree_hash_packing_factor();
    (((n + factor - 1) / factor) as u64).max(if n == 0 { 0 } else { 1 })
}

/// Hash-tree-root of a fixed-length `Vector(T, n)`, for use by [`crate::types::FixedVector`].
pub fn vector_tree_hash_root<D: Digest, T: TreeHash>(items: &[T], n: usize) -> Result<Chunk, Error> {
    let mut h = Hasher::<D>::new();
    let idx = h.index();

    let limit = match T::tree_hash_type() {
        TreeHashType::Basic => {
            for item in items {
                h.append_packed(&item.tree_hash_packed_encoding());
            }
            h.pad_to_chunk();
            packed_chunk_count::<T>(n)
        }
        _ => {
            for item in items {
                let root = item.tree_hash_root()?;
                h.append_chunks(&root);
            }
            n as u64
        }
    };

    h.merkleize(idx, limit)?;
    h.hash_root()
}

/// Hash-tree-root of a `Container` from its field roots, each already computed by the field's
/// own `tree_hash_root()`. `limit` is the field count (the spec permits rounding this up to the
/// next power of two; this crate uses the field count directly, since
/// [`crate::hasher::merkleize_chunks`] already folds in zero-hashes up to `ceil(log2(limit))`
/// regardless of whether `limit` itself is a power of two).
pub fn container_tree_hash_root<D: Digest>(field_roots: &[Chunk]) -> Result<Chunk, Error> {
    let mut h = Hasher::<D>::new();
    let idx = h.index();
    for root in field_roots {
        h.append_chunks(root);
    }
    h.merkleize(idx, field_roots.len() as u64)?;
    h.hash_root()
}

/// Hash-tree-root of a variable-length `List(T, cap)`, for use by [`crate::types::VariableList`].
pub fn list_tree_hash_root<D: Digest, T: TreeHash>(items: &[T], cap: usize) -> Result<Chunk, Error> {
    let mut h = Hasher::<D>::new();
    let idx = h.index();

    let limit = match T::tree_hash_type() {
        TreeHashType::Basic => {
            for item in items {
                h.append_packed(&item.tree_hash_packed_encoding());
            }
            h.pad_to_chunk();
            packed_chunk_count::<T>(cap)
        }
        _ => {
            for item in items {
                let root = item.tree_hash_root()?;
                h.append_chunks(&root);
            }
            cap as u64
        }
    };

    h.merkleize_with_mixin(idx, items.len() as u64, limit)?;
    h.hash_root()
}

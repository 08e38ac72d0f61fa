//! A fully materialized merkle tree over a chunk list, addressable by generalized
//! index, plus proof generation and verification in [`proof`].
//!
//! A generalized index `i` names a node by the root-to-node path encoded as a binary
//! number: the leading `1` bit is a sentinel, every bit after it is one step down
//! (`0` = left, `1` = right). `path_length(i) = floor(log2(i))` is the number of such
//! steps; `sibling(i) = i ^ 1`; `parent(i) = i >> 1`.

pub mod proof;

use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::error::Error;
use crate::hasher::{compute_zero_hashes, Chunk, Digest};
use crate::primitives::log2_ceil;

/// The precomputed zero-hash table, shared (via [`Rc`]) by every [`Node::Zero`] in a tree so a
/// lazily-represented all-zero subtree can answer [`Node::get`]/proof queries at any depth
/// without ever materializing its children.
pub type ZeroHashes = [Chunk; 65];

/// The number of root-to-`index` steps (the depth of `index` within its tree).
#[inline]
pub fn path_length(index: u64) -> u32 {
    debug_assert!(index >= 1, "generalized index 0 is not defined");
    63 - index.leading_zeros()
}

/// The other child of `index`'s parent.
#[inline]
pub fn sibling(index: u64) -> u64 {
    index ^ 1
}

/// The generalized index one step closer to the root.
#[inline]
pub fn parent(index: u64) -> u64 {
    index >> 1
}

/// A merkle tree node: a real leaf chunk, an internal node caching its own root alongside its
/// two children (so repeated [`Node::get`]/proof calls never re-hash), or [`Node::Zero`] — a
/// lazily-represented all-zero subtree of height `depth` standing in for padding. A `Zero`
/// node never materializes its children: its own root and the root of any node within it are
/// read straight out of the shared zero-hash table, so building a tree for a `List`/`Vector`
/// with a large `limit` but few real chunks costs time and space proportional to the real
/// chunks, not to `limit` (see [`tree_from_chunks`]).
pub enum Node {
    Leaf(Chunk),
    Inner { left: Box<Node>, right: Box<Node>, value: Chunk },
    Zero { depth: u32, value: Chunk, zero_hashes: Rc<ZeroHashes> },
}

impl Node {
    pub fn root(&self) -> Chunk {
        match self {
            Node::Leaf(v) => *v,
            Node::Inner { value, .. } => *value,
            Node::Zero { value, .. } => *value,
        }
    }

    /// Looks up the chunk at `index` by walking `index`'s path bits from the root down.
    pub fn get(&self, index: u64) -> Result<Chunk, Error> {
        if index == 0 {
            return Err(Error::ProofMissingNode);
        }
        Self::get_rec(self, index, path_length(index))
    }

    /// `remaining` is how many more levels to descend from `node` to reach `index`'s target.
    fn get_rec(node: &Node, index: u64, remaining: u32) -> Result<Chunk, Error> {
        if remaining == 0 {
            return Ok(node.root());
        }
        let level = remaining - 1;
        let bit = (index >> level) & 1;
        match node {
            Node::Leaf(_) => Err(Error::ProofMissingNode),
            Node::Inner { left, right, .. } => {
                let child = if bit == 1 { right } else { left };
                Self::get_rec(child, index, level)
            }
            Node::Zero { depth, zero_hashes, .. } => {
                debug_assert!(*depth >= remaining, "zero subtree too shallow for requested index");
                Ok(zero_hashes[(*depth - remaining) as usize])
            }
        }
    }
}

/// Builds a merkle tree over `chunks`, zero-padded up to `limit` leaves (`limit == 0` meaning
/// "exactly `chunks.len()` leaves, no padding"). Mirrors [`crate::hasher::merkleize_chunks`]
/// exactly, but keeps every real intermediate node instead of discarding them, so any leaf or
/// internal node can later be retrieved by generalized index. Any subtree entirely beyond
/// `chunks.len()` is represented as a single [`Node::Zero`] rather than recursed into, so
/// construction cost is `O(chunks.len() * log(limit))`, not `O(limit)`.
pub fn tree_from_chunks<D: Digest>(chunks: &[Chunk], limit: u64) -> Result<Node, Error> {
    let count = chunks.len() as u64;
    let limit = if limit == 0 { count } else { limit };
    if count > limit {
        return Err(Error::MerkleizeOverflow { count, limit });
    }

    let depth = if limit <= 1 { 0 } else { log2_ceil(limit) };
    let zero_hashes = Rc::new(compute_zero_hashes::<D>());

    Ok(build_node::<D>(chunks, 0, depth, &zero_hashes))
}

/// Builds the subtree of height `depth` whose leftmost leaf is `chunks[start]`. A subtree
/// entirely past `chunks.len()` short-circuits to a lazy [`Node::Zero`] without recursing.
fn build_node<D: Digest>(chunks: &[Chunk], start: u64, depth: u32, zero_hashes: &Rc<ZeroHashes>) -> Node {
    let count = chunks.len() as u64;
    if start >= count {
        return Node::Zero { depth, value: zero_hashes[depth as usize], zero_hashes: zero_hashes.clone() };
    }
    if depth == 0 {
        return Node::Leaf(chunks[start as usize]);
    }
    let half = 1u64 << (depth - 1);
    let left = build_node::<D>(chunks, start, depth - 1, zero_hashes);
    let right = build_node::<D>(chunks, start + half, depth - 1, zero_hashes);
    let value = D::hash_pair(left.root(), right.root());
    Node::Inner { left: Box::new(left), right: Box::new(right), value }
}

/// As [`tree_from_chunks`], with the length mixin applied at the top: the returned root has
/// exactly two children, generalized index 2 (the data subtree, built exactly as
/// `tree_from_chunks` would) and generalized index 3 (the length leaf). Used for every `List`
/// and `BitList`.
pub fn tree_from_chunks_with_mixin<D: Digest>(
    chunks: &[Chunk],
    num: u64,
    limit: u64,
) -> Result<Node, Error> {
    let data = tree_from_chunks::<D>(chunks, limit)?;
    let mut length_chunk = [0u8; 32];
    length_chunk[..8].copy_from_slice(&num.to_le_bytes());
    let length_node = Node::Leaf(length_chunk);
    let value = D::hash_pair(data.root(), length_node.root());
    Ok(Node::Inner { left: Box::new(data), right: Box::new(length_node), value })
}

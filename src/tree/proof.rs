//! Single-leaf and multi-leaf merkle proofs over generalized indices, plus zero-subtree
//! compression for proofs whose sibling hashes are themselves known zero-subtree roots.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::error::Error;
use crate::hasher::{Chunk, Digest};
use crate::tree::{parent, path_length, sibling, Node};

/// A single-leaf inclusion proof: the leaf value at `index`, and the sibling at every level
/// from the leaf up to the root, ordered leaf-adjacent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub index: u64,
    pub leaf: Chunk,
    pub branch: Vec<Chunk>,
}

/// Builds the proof for `index` by descending from `tree`'s root, recording the sibling not
/// taken at every level.
pub fn prove(tree: &Node, index: u64) -> Result<Proof, Error> {
    if index == 0 {
        return Err(Error::ProofMissingNode);
    }
    let depth = path_length(index);
    let mut cur = tree;
    let mut branch_top_down = Vec::with_capacity(depth as usize);

    for level in (0..depth).rev() {
        let bit = (index >> level) & 1;
        match cur {
            Node::Leaf(_) => return Err(Error::ProofMissingNode),
            Node::Inner { left, right, .. } => {
                if bit == 1 {
                    branch_top_down.push(left.root());
                    cur = right;
                } else {
                    branch_top_down.push(right.root());
                    cur = left;
                }
            }
            Node::Zero { depth: zero_depth, zero_hashes, .. } => {
                // `cur` is a lazily-represented all-zero subtree: every remaining level down to
                // `index` is zero too, so every remaining sibling is the zero-hash at its own
                // depth. No children to materialize or descend into.
                debug_assert_eq!(*zero_depth, level + 1, "zero subtree depth must match remaining descent");
                for l in (0..=level).rev() {
                    branch_top_down.push(zero_hashes[l as usize]);
                }
                branch_top_down.reverse();
                return Ok(Proof { index, leaf: zero_hashes[0], branch: branch_top_down });
            }
        }
    }

    branch_top_down.reverse();
    Ok(Proof { index, leaf: cur.root(), branch: branch_top_down })
}

/// Reconstructs a root from `proof` and checks it against `root`. Fails with
/// [`Error::ProofLength`] if the branch length doesn't match `path_length(proof.index)`, or
/// [`Error::ProofBadRoot`] if the reconstructed root doesn't match.
pub fn verify<D: Digest>(proof: &Proof, root: Chunk) -> Result<(), Error> {
    if proof.branch.len() as u32 != path_length(proof.index) {
        return Err(Error::ProofLength);
    }

    let mut value = proof.leaf;
    let mut idx = proof.index;
    for sib in &proof.branch {
        value = if idx & 1 == 1 { D::hash_pair(*sib, value) } else { D::hash_pair(value, *sib) };
        idx = parent(idx);
    }

    if value == root {
        Ok(())
    } else {
        Err(Error::ProofBadRoot)
    }
}

/// Every sibling needed to verify a single-leaf proof of `index`, from leaf up to (but not
/// including) the root.
fn branch_indices(index: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut i = index;
    while i > 1 {
        out.push(sibling(i));
        i = parent(i);
    }
    out
}

/// `index` and every one of its ancestors, up to and including the root.
fn path_indices(index: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut i = index;
    out.push(i);
    while i > 1 {
        i = parent(i);
        out.push(i);
    }
    out
}

/// The minimal set of extra node values needed to verify proofs for every index in `indices`
/// at once: every sibling any single-leaf proof would need, except those that are themselves
/// on the root-path of another requested index (and so are either already a requested leaf or
/// derivable from one).
pub fn helper_indices(indices: &[u64]) -> Vec<u64> {
    let mut all_branch: BTreeSet<u64> = BTreeSet::new();
    let mut all_path: BTreeSet<u64> = BTreeSet::new();
    for &idx in indices {
        all_branch.extend(branch_indices(idx));
        all_path.extend(path_indices(idx));
    }
    let mut helpers: Vec<u64> = all_branch.difference(&all_path).copied().collect();
    helpers.sort_unstable_by(|a, b| b.cmp(a));
    helpers
}

/// A minimal proof covering several leaves at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiProof {
    pub indices: Vec<u64>,
    pub leaves: Vec<Chunk>,
    pub helper_indices: Vec<u64>,
    pub helper_values: Vec<Chunk>,
}

/// Builds the minimal multi-leaf proof covering every index in `indices` (duplicates and
/// ordering are normalized away).
pub fn prove_multi(tree: &Node, indices: &[u64]) -> Result<MultiProof, Error> {
    let mut sorted: Vec<u64> = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let leaves = sorted.iter().map(|&i| tree.get(i)).collect::<Result<Vec<_>, _>>()?;
    let helpers = helper_indices(&sorted);
    let helper_values = helpers.iter().map(|&i| tree.get(i)).collect::<Result<Vec<_>, _>>()?;

    Ok(MultiProof { indices: sorted, leaves, helper_indices: helpers, helper_values })
}

/// Reconstructs a root from `proof` by repeatedly folding any pair of known siblings into
/// their parent, starting from the supplied leaves and helper values, until the root
/// (generalized index 1) is known or no further progress can be made.
pub fn verify_multi<D: Digest>(proof: &MultiProof, root: Chunk) -> Result<(), Error> {
    let mut known: BTreeMap<u64, Chunk> = BTreeMap::new();
    for (&idx, &val) in proof.indices.iter().zip(proof.leaves.iter()) {
        known.insert(idx, val);
    }
    for (&idx, &val) in proof.helper_indices.iter().zip(proof.helper_values.iter()) {
        known.insert(idx, val);
    }

    let mut queue: Vec<u64> = known.keys().copied().collect();
    queue.sort_unstable_by(|a, b| b.cmp(a));

    let mut i = 0;
    while i < queue.len() {
        let idx = queue[i];
        i += 1;
        if idx == 1 {
            continue;
        }
        let par = parent(idx);
        if known.contains_key(&par) {
            continue;
        }
        let sib = sibling(idx);
        if let Some(&sib_val) = known.get(&sib) {
            let this_val = known[&idx];
            let (left, right) = if idx & 1 == 1 { (sib_val, this_val) } else { (this_val, sib_val) };
            let parent_val = D::hash_pair(left, right);
            known.insert(par, parent_val);
            queue.push(par);
        }
    }

    match known.get(&1) {
        Some(&v) if v == root => Ok(()),
        Some(_) => Err(Error::ProofBadRoot),
        None => Err(Error::ProofMissingNode),
    }
}

/// A single-leaf proof with sibling hashes that equal a known zero-subtree root at their
/// depth omitted, to be regenerated on [`decompress`] instead of transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedProof {
    pub index: u64,
    pub leaf: Chunk,
    pub branch: Vec<Option<Chunk>>,
}

/// Replaces every branch entry that equals the zero-subtree root at its own depth with `None`.
/// `branch[k]` always corresponds to a subtree of depth `k` (`branch[0]` is the leaf's
/// immediate sibling, a depth-0 subtree; `branch[1]`'s subtree has depth 1; and so on), so the
/// expected zero hash at position `k` is always `zero_hashes[k]`.
pub fn compress(proof: &Proof, zero_hashes: &[Chunk; 65]) -> CompressedProof {
    let branch = proof
        .branch
        .iter()
        .enumerate()
        .map(|(depth, &node)| if node == zero_hashes[depth] { None } else { Some(node) })
        .collect();
    CompressedProof { index: proof.index, leaf: proof.leaf, branch }
}

/// The inverse of [`compress`]: refills every omitted entry with the zero-subtree root at its
/// depth.
pub fn decompress(compressed: &CompressedProof, zero_hashes: &[Chunk; 65]) -> Proof {
    let branch = compressed
        .branch
        .iter()
        .enumerate()
        .map(|(depth, node)| node.unwrap_or(zero_hashes[depth]))
        .collect();
    Proof { index: compressed.index, leaf: compressed.leaf, branch }
}

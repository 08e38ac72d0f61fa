//! Merkleisation: the pluggable [`Digest`], the zero-hash table, the streaming
//! depth-stack merge (`merkleize_chunks`/`merkleize_with_mixin`), and the
//! [`Hasher`] accumulator a generated stub drives field-by-field to build a
//! container's, vector's, list's, or bitfield's hash-tree-root.

pub mod pool;

use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::error::Error;
use crate::primitives::{log2_ceil, msb_position, validate_bitlist};

/// A 32-byte chunk, the unit merkleisation operates over.
pub type Chunk = [u8; 32];

/// The hash function merkleisation is built on. Always takes a fixed 64-byte input (two
/// sibling chunks concatenated) and returns a 32-byte digest; no streaming API is needed since
/// every call in this crate hashes exactly one pair.
pub trait Digest {
    fn hash64(input: &[u8; 64]) -> Chunk;

    /// Convenience wrapper: hashes `a || b`.
    #[inline]
    fn hash_pair(a: Chunk, b: Chunk) -> Chunk {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&a);
        buf[32..].copy_from_slice(&b);
        Self::hash64(&buf)
    }
}

/// The default digest: SHA-256, matching the hash function mandated for consensus-layer
/// merkleisation. Chosen over `ring` so the crate's `no_std` core stays free of `ring`'s
/// std/C-linkage requirement.
pub struct Sha256Digest;

impl Digest for Sha256Digest {
    #[inline]
    fn hash64(input: &[u8; 64]) -> Chunk {
        use sha2::{Digest as _, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(input);
        let out = hasher.finalize();
        let mut chunk = [0u8; 32];
        chunk.copy_from_slice(&out);
        chunk
    }
}

/// Builds the zero-hash table: `table[0] = [0; 32]`, `table[j+1] = hash(table[j] || table[j])`,
/// for depths `0..=64`. A process-wide constant in spirit; computed fresh per call (64 hashes,
/// negligible cost) rather than cached behind a global, since a `no_std` crate has no portable
/// one-time-init primitive without pulling in an extra dependency.
pub fn compute_zero_hashes<D: Digest>() -> [Chunk; 65] {
    let mut table = [[0u8; 32]; 65];
    for j in 0..64 {
        table[j + 1] = D::hash_pair(table[j], table[j]);
    }
    table
}

/// Looks up the depth of a zero-subtree root in the zero-hash table, for proof compression. The
/// table has only 65 entries, so a linear scan is simpler and just as fast as a map.
pub fn zero_hash_depth(zero_hashes: &[Chunk; 65], value: &Chunk) -> Option<u32> {
    zero_hashes.iter().position(|z| z == value).map(|i| i as u32)
}

/// `getDepth`: the merkle depth of a tree holding `count` leaves. `depth_for_count(0) == 0` and
/// `depth_for_count(1) == 1` are irregular base cases carried over unchanged; every other count
/// is `ceil(log2(count))`.
fn depth_for_count(count: u64) -> u32 {
    match count {
        0 => 0,
        1 => 1,
        n => log2_ceil(n),
    }
}

/// One step of the streaming depth-stack merge: folds `value` (the `i`-th leaf, or the final
/// zero-pad leaf when `i == count`) into `stack`, carrying completed subtrees upward wherever a
/// pair of siblings is ready.
fn merge_in<D: Digest>(
    stack: &mut [Option<Chunk>],
    depth: u32,
    count: u64,
    i: u64,
    mut value: Chunk,
    zero_hashes: &[Chunk; 65],
) {
    let mut j = 0u32;
    loop {
        if i & (1u64 << j) == 0 {
            if i == count && j < depth {
                value = D::hash_pair(value, zero_hashes[j as usize]);
                j += 1;
            } else {
                stack[j as usize] = Some(value);
                return;
            }
        } else {
            let left = stack[j as usize].take().expect("left sibling must be present");
            value = D::hash_pair(left, value);
            j += 1;
        }
    }
}

/// Reduces `chunks` to a single 32-byte merkle root under `limit` (the number of leaves the
/// tree is padded to; `limit == 0` means "pad to `chunks.len()`", i.e. no padding). Fails with
/// [`Error::MerkleizeOverflow`] if `chunks.len() > limit`.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip(chunks)))]
pub fn merkleize_chunks<D: Digest>(chunks: &[Chunk], limit: u64) -> Result<Chunk, Error> {
    let count = chunks.len() as u64;
    let limit = if limit == 0 { count } else { limit };

    if count > limit {
        return Err(Error::MerkleizeOverflow { count, limit });
    }
    if limit == 0 {
        return Ok([0u8; 32]);
    }
    if limit == 1 {
        return Ok(if count == 1 { chunks[0] } else { [0u8; 32] });
    }

    let zero_hashes = compute_zero_hashes::<D>();
    let depth = depth_for_count(count);
    let mut stack: Vec<Option<Chunk>> = vec![None; depth as usize + 1];

    for (i, chunk) in chunks.iter().enumerate() {
        merge_in::<D>(&mut stack, depth, count, i as u64, *chunk, &zero_hashes);
    }
    if (1u64 << depth) != count {
        merge_in::<D>(&mut stack, depth, count, count, zero_hashes[0], &zero_hashes);
    }

    let mut root = stack[depth as usize].expect("root must be filled after merge");
    for j in depth..log2_ceil(limit) {
        root = D::hash_pair(root, zero_hashes[j as usize]);
    }
    Ok(root)
}

/// `merkleize_chunks` followed by the length mixin: `hash(root || little_endian_uint256(num))`.
/// Used for every `List` and `BitList`.
pub fn merkleize_with_mixin<D: Digest>(
    chunks: &[Chunk],
    num: u64,
    limit: u64,
) -> Result<Chunk, Error> {
    let root = merkleize_chunks::<D>(chunks, limit)?;
    let mut len_chunk = [0u8; 32];
    len_chunk[..8].copy_from_slice(&num.to_le_bytes());
    Ok(D::hash_pair(root, len_chunk))
}

/// An append-and-reduce byte accumulator, reused across fields of the same container the way a
/// generated stub walks fields in declaration order. Every public method either appends whole
/// 32-byte chunks or reduces a run of chunks already in the buffer down to one.
pub struct Hasher<D: Digest = Sha256Digest> {
    buf: Vec<u8>,
    zero_hashes: [Chunk; 65],
    _digest: PhantomData<D>,
}

impl<D: Digest> Hasher<D> {
    pub fn new() -> Self {
        Self { buf: Vec::new(), zero_hashes: compute_zero_hashes::<D>(), _digest: PhantomData }
    }

    /// Clears the accumulator for reuse (the pooling path in [`pool::HasherPool`]).
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// The current write position: a bookmark to pass to [`Self::merkleize`] /
    /// [`Self::merkleize_with_mixin`] once all of a run's chunks have been appended.
    pub fn index(&self) -> usize {
        self.buf.len()
    }

    /// Appends raw bytes with no per-call padding, for packing multiple `Uint`/`Bool`/
    /// `FixedBytes(n<=32)` elements contiguously into shared chunks (a `Vector`/`List` of a
    /// basic type). Call [`Self::pad_to_chunk`] once after the last element.
    pub fn append_packed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Zero-pads the buffer up to the next 32-byte boundary. A no-op if already aligned.
    pub fn pad_to_chunk(&mut self) {
        let rem = self.buf.len() % 32;
        if rem != 0 {
            self.buf.resize(self.buf.len() + (32 - rem), 0);
        }
    }

    /// Appends one whole field's worth of already-chunk-aligned bytes (a basic value, or a
    /// `FixedBytes(n)` value), zero-padding the final chunk if `bytes.len()` isn't a multiple of
    /// 32. For `n <= 32` this yields exactly one chunk; for `n > 32` it yields `ceil(n/32)`
    /// chunks, which the caller must then reduce with [`Self::merkleize`].
    pub fn append_chunks(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.pad_to_chunk();
    }

    /// Appends a `uint` value as one padded chunk (the un-packed case: a standalone `Uint`
    /// field, not an element of a packed `Vector`/`List`).
    pub fn append_uint(&mut self, n_bits: u32, value: u64) {
        let mut tmp = Vec::with_capacity(8);
        crate::primitives::encode_uint(n_bits, value, &mut tmp);
        self.append_chunks(&tmp);
    }

    /// Appends a `bool` value as one padded chunk.
    pub fn append_bool(&mut self, value: bool) {
        self.append_chunks(&[if value { 1 } else { 0 }]);
    }

    /// Reduces the chunks appended since `index` to a single merkle root in place, under
    /// `limit` (`0` meaning "pad to however many chunks are present").
    pub fn merkleize(&mut self, index: usize, limit: u64) -> Result<(), Error> {
        let tail = &self.buf[index..];
        debug_assert_eq!(tail.len() % 32, 0, "merkleize called on a non-chunk-aligned run");
        let chunks: Vec<Chunk> = tail
            .chunks_exact(32)
            .map(|c| {
                let mut chunk = [0u8; 32];
                chunk.copy_from_slice(c);
                chunk
            })
            .collect();
        let root = merkleize_chunks::<D>(&chunks, limit)?;
        self.buf.truncate(index);
        self.buf.extend_from_slice(&root);
        Ok(())
    }

    /// As [`Self::merkleize`], with the length mixin applied afterward (every `List`/`BitList`).
    pub fn merkleize_with_mixin(&mut self, index: usize, num: u64, limit: u64) -> Result<(), Error> {
        let tail = &self.buf[index..];
        debug_assert_eq!(tail.len() % 32, 0, "merkleize_with_mixin called on a non-chunk-aligned run");
        let chunks: Vec<Chunk> = tail
            .chunks_exact(32)
            .map(|c| {
                let mut chunk = [0u8; 32];
                chunk.copy_from_slice(c);
                chunk
            })
            .collect();
        let root = merkleize_with_mixin::<D>(&chunks, num, limit)?;
        self.buf.truncate(index);
        self.buf.extend_from_slice(&root);
        Ok(())
    }

    /// Chunks and reduces a `BitList(cap)`'s wire bytes: strips the sentinel bit, packs the
    /// remaining bits into chunks, merkleizes under `limit = ceil(cap / 256)`, and mixes in the
    /// logical bit length.
    pub fn put_bitlist(&mut self, wire_bytes: &[u8], cap: usize) -> Result<(), Error> {
        let length = validate_bitlist(wire_bytes, cap)?;

        let mut trimmed = wire_bytes.to_vec();
        let last = *trimmed.last().expect("validated non-empty above");
        let msb = msb_position(last).expect("validated non-zero above");
        let last_idx = trimmed.len() - 1;
        trimmed[last_idx] &= !(1u8 << (msb - 1));
        while trimmed.last() == Some(&0) {
            trimmed.pop();
        }

        let index = self.index();
        self.append_chunks(&trimmed);
        let limit = (cap as u64 + 255) / 256;
        self.merkleize_with_mixin(index, length as u64, limit)
    }

    /// Finalizes the accumulator into its 32-byte root. Fails with
    /// [`Error::HasherNotFinalized`] if the buffer hasn't been reduced to exactly one chunk,
    /// which indicates a stub forgot a `merkleize` call, never a consequence of untrusted
    /// input.
    pub fn hash_root(&self) -> Result<Chunk, Error> {
        if self.buf.len() != 32 {
            return Err(Error::HasherNotFinalized { len: self.buf.len() });
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.buf);
        Ok(out)
    }
}

impl<D: Digest> Default for Hasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn chunk_of(byte: u8) -> Chunk {
        [byte; 32]
    }

    #[test]
    fn zero_hash_table_self_consistent() {
        let table = compute_zero_hashes::<Sha256Digest>();
        assert_eq!(table[0], [0u8; 32]);
        for j in 0..64 {
            assert_eq!(table[j + 1], Sha256Digest::hash_pair(table[j], table[j]));
        }
    }

    #[test]
    fn zero_hash_depth_lookup() {
        let table = compute_zero_hashes::<Sha256Digest>();
        assert_eq!(zero_hash_depth(&table, &table[0]), Some(0));
        assert_eq!(zero_hash_depth(&table, &table[3]), Some(3));
        assert_eq!(zero_hash_depth(&table, &[1u8; 32]), None);
    }

    #[test]
    fn merkleize_single_chunk_limit_one() {
        let c = chunk_of(7);
        assert_eq!(merkleize_chunks::<Sha256Digest>(&[c], 1).unwrap(), c);
    }

    #[test]
    fn merkleize_empty_limit_one_is_zero_chunk() {
        assert_eq!(merkleize_chunks::<Sha256Digest>(&[], 1).unwrap(), [0u8; 32]);
    }

    #[test]
    fn merkleize_two_chunks_matches_direct_hash() {
        let a = chunk_of(1);
        let b = chunk_of(2);
        let root = merkleize_chunks::<Sha256Digest>(&[a, b], 2).unwrap();
        assert_eq!(root, Sha256Digest::hash_pair(a, b));
    }

    #[test]
    fn merkleize_pads_odd_count_with_zero_chunk() {
        let a = chunk_of(1);
        let b = chunk_of(2);
        let c = chunk_of(3);
        let root = merkleize_chunks::<Sha256Digest>(&[a, b, c], 4).unwrap();
        let left = Sha256Digest::hash_pair(a, b);
        let right = Sha256Digest::hash_pair(c, [0u8; 32]);
        assert_eq!(root, Sha256Digest::hash_pair(left, right));
    }

    #[test]
    fn merkleize_extends_above_natural_depth_to_limit() {
        // two real leaves, but the declared limit is 4: one extra level of zero-hash folding.
        let a = chunk_of(1);
        let b = chunk_of(2);
        let natural = Sha256Digest::hash_pair(a, b);
        let table = compute_zero_hashes::<Sha256Digest>();
        let expected = Sha256Digest::hash_pair(natural, table[1]);
        assert_eq!(merkleize_chunks::<Sha256Digest>(&[a, b], 4).unwrap(), expected);
    }

    #[test]
    fn merkleize_rejects_overflow() {
        let chunks = vec![chunk_of(1), chunk_of(2), chunk_of(3)];
        assert_eq!(
            merkleize_chunks::<Sha256Digest>(&chunks, 2),
            Err(Error::MerkleizeOverflow { count: 3, limit: 2 })
        );
    }

    #[test]
    fn merkleize_empty_list_with_mixin_is_zero() {
        // an empty List(uint64, N): zero-chunk root mixed with length 0.
        let root = merkleize_with_mixin::<Sha256Digest>(&[], 0, 4).unwrap();
        let expected = Sha256Digest::hash_pair(merkleize_chunks::<Sha256Digest>(&[], 4).unwrap(), [0u8; 32]);
        assert_eq!(root, expected);
    }

    #[test]
    fn hasher_single_uint_field_root_is_the_padded_chunk() {
        let mut h = Hasher::<Sha256Digest>::new();
        h.append_uint(64, 0x0102030405060708);
        let root = h.hash_root().unwrap();
        let mut expected = [0u8; 32];
        expected[..8].copy_from_slice(&0x0102030405060708u64.to_le_bytes());
        assert_eq!(root, expected);
    }

    #[test]
    fn hasher_not_finalized_error() {
        let mut h = Hasher::<Sha256Digest>::new();
        h.append_uint(32, 1);
        h.append_uint(32, 2);
        assert_eq!(h.hash_root(), Err(Error::HasherNotFinalized { len: 64 }));
    }

    #[test]
    fn hasher_container_of_two_roots() {
        // two already-hashed field roots, merkleized with limit = field count (2).
        let mut h = Hasher::<Sha256Digest>::new();
        let idx = h.index();
        h.append_chunks(&chunk_of(0xaa));
        h.append_chunks(&chunk_of(0xbb));
        h.merkleize(idx, 2).unwrap();
        let root = h.hash_root().unwrap();
        assert_eq!(root, Sha256Digest::hash_pair(chunk_of(0xaa), chunk_of(0xbb)));
    }

    #[test]
    fn hasher_packed_uint_vector_shares_chunks() {
        // Vector(uint64, 4): four 8-byte elements packed into two 32-byte chunks.
        let mut h = Hasher::<Sha256Digest>::new();
        let idx = h.index();
        for v in [1u64, 2, 3, 4] {
            let mut tmp = Vec::new();
            crate::primitives::encode_uint(64, v, &mut tmp);
            h.append_packed(&tmp);
        }
        h.pad_to_chunk();
        assert_eq!(h.index() - idx, 32); // four 8-byte elements pack into exactly one chunk
    }

    #[test]
    fn bitlist_put_matches_spec_scenario_2() {
        // BitList wire form 0x0d -> logical bits [1,0,1], length 3.
        let mut h = Hasher::<Sha256Digest>::new();
        h.put_bitlist(&[0x0d], 2048).unwrap();
        let root = h.hash_root().unwrap();

        let mut data_chunk = [0u8; 32];
        data_chunk[0] = 0b0000_0101; // bits 1,0,1 packed, sentinel stripped
        let limit = (2048u64 + 255) / 256;
        let expected = merkleize_with_mixin::<Sha256Digest>(&[data_chunk], 3, limit).unwrap();
        assert_eq!(root, expected);
    }
}

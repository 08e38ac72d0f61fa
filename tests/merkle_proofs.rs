//! Property-based coverage of the tree/proof invariants in spec §8: proof
//! correctness, multi-proof minimality, and compression round-trips.

use proptest::prelude::*;

use ssz_codec::hasher::{compute_zero_hashes, Chunk, Sha256Digest};
use ssz_codec::tree::proof::{compress, decompress, prove, prove_multi, verify, verify_multi};
use ssz_codec::tree::tree_from_chunks;

fn chunk_of(byte: u8) -> Chunk {
    [byte; 32]
}

proptest! {
    #[test]
    fn single_proof_verifies_for_every_leaf(bytes in proptest::collection::vec(any::<u8>(), 8)) {
        let chunks: Vec<Chunk> = bytes.into_iter().map(chunk_of).collect();
        let tree = tree_from_chunks::<Sha256Digest>(&chunks, 8).unwrap();
        let root = tree.root();

        for index in 8..16u64 {
            let p = prove(&tree, index).unwrap();
            prop_assert!(verify::<Sha256Digest>(&p, root).is_ok());
        }
    }

    #[test]
    fn corrupting_a_proof_hash_breaks_verification(flip_at in 0usize..3) {
        let chunks: Vec<Chunk> = (0..4u8).map(chunk_of).collect();
        let tree = tree_from_chunks::<Sha256Digest>(&chunks, 4).unwrap();
        let root = tree.root();

        let mut p = prove(&tree, 4).unwrap();
        if flip_at < p.branch.len() {
            p.branch[flip_at][0] ^= 0xff;
            prop_assert!(verify::<Sha256Digest>(&p, root).is_err());
        }
    }

    #[test]
    fn multi_proof_is_subset_of_any_single_proof_helpers(
        selected in proptest::collection::hash_set(4u64..8, 1..4)
    ) {
        let chunks: Vec<Chunk> = (0..4u8).map(chunk_of).collect();
        let tree = tree_from_chunks::<Sha256Digest>(&chunks, 4).unwrap();
        let root = tree.root();

        let indices: Vec<u64> = selected.into_iter().collect();
        let mp = prove_multi(&tree, &indices).unwrap();
        prop_assert!(verify_multi::<Sha256Digest>(&mp, root).is_ok());

        // minimality: no helper hash is itself one of the requested leaves or the root.
        for h in &mp.helper_indices {
            prop_assert!(!mp.indices.contains(h));
            prop_assert_ne!(*h, 1);
        }
    }

    #[test]
    fn compression_round_trips(real_leaf_index in 0usize..8) {
        // one real leaf among 8 zero leaves: every sibling on its path compresses to a zero hash.
        let mut chunks = vec![[0u8; 32]; 8];
        chunks[real_leaf_index] = chunk_of(0xaa);
        let tree = tree_from_chunks::<Sha256Digest>(&chunks, 8).unwrap();
        let zero_hashes = compute_zero_hashes::<Sha256Digest>();

        let target = 8 + real_leaf_index as u64;
        let p = prove(&tree, target).unwrap();
        let compressed = compress(&p, &zero_hashes);
        let restored = decompress(&compressed, &zero_hashes);

        prop_assert_eq!(restored.clone(), p);
        prop_assert!(verify::<Sha256Digest>(&restored, tree.root()).is_ok());
    }
}

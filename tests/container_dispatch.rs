//! End-to-end exercise of the dispatch contract a generated stub implements:
//! a hand-written container with one fixed and one variable field, wired
//! through `Encode`/`Decode`/`TreeHash`, then built into a tree and proved.

use ssz_codec::codec::container::ContainerEncoder;
use ssz_codec::hasher::{Chunk, Sha256Digest};
use ssz_codec::tree::{proof, tree_from_chunks};
use ssz_codec::tree_hash::container_tree_hash_root;
use ssz_codec::types::VariableList;
use ssz_codec::{Decode, Digest, Encode, Error, TreeHash, TreeHashType};

/// The spec §8 scenario-1 container: `{slot: u64, data: List(u8, 2048)}`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SlotAndData {
    slot: u64,
    data: VariableList<u8, 2048>,
}

const FIXED_SIZE: usize = 8 + 4;

impl Encode for SlotAndData {
    fn is_ssz_fixed_len() -> bool {
        false
    }
    fn ssz_bytes_len(&self) -> usize {
        FIXED_SIZE + self.data.len()
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        let mut enc = ContainerEncoder::new();
        enc.fixed_field(&self.slot.to_le_bytes());
        enc.variable_field(self.data.as_ssz_bytes());
        buf.extend_from_slice(&enc.finish());
    }
}

impl Decode for SlotAndData {
    fn is_ssz_fixed_len() -> bool {
        false
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        use ssz_codec::codec::container::{read_offset_table, variable_field_ranges};

        if bytes.len() < FIXED_SIZE {
            return Err(Error::ShortBuffer);
        }
        let slot = u64::from_le_bytes(bytes[0..8].try_into().unwrap());
        let (offsets, _) = read_offset_table(&bytes[8..FIXED_SIZE], bytes.len(), FIXED_SIZE, 1)?;
        let ranges = variable_field_ranges(&offsets, bytes.len());
        let data = VariableList::from_ssz_bytes(&bytes[ranges[0].clone()])?;
        Ok(Self { slot, data })
    }
}

impl TreeHash for SlotAndData {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Container
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("Container is never itself a packed Basic element")
    }
    fn tree_hash_packing_factor() -> usize {
        unreachable!("Container is never itself a packed Basic element")
    }
    fn tree_hash_root(&self) -> Result<Chunk, Error> {
        let slot_root = self.slot.tree_hash_root()?;
        let data_root = self.data.tree_hash_root()?;
        container_tree_hash_root::<Sha256Digest>(&[slot_root, data_root])
    }
}

#[test]
fn spec_scenario_1_round_trip_and_wire_bytes() {
    let value = SlotAndData { slot: 12, data: VariableList::try_from(vec![0xaa, 0xbb]).unwrap() };
    let bytes = value.as_ssz_bytes();
    let expected: &[u8] = &[0x0c, 0, 0, 0, 0, 0, 0, 0, 0x0c, 0, 0, 0, 0xaa, 0xbb];
    assert_eq!(bytes, expected);

    let decoded = SlotAndData::from_ssz_bytes(&bytes).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn canonicity_equal_values_encode_identically() {
    let a = SlotAndData { slot: 7, data: VariableList::try_from(vec![1, 2, 3]).unwrap() };
    let b = a.clone();
    assert_eq!(a.as_ssz_bytes(), b.as_ssz_bytes());
}

#[test]
fn hash_tree_root_is_a_pure_function_of_value() {
    let a = SlotAndData { slot: 7, data: VariableList::try_from(vec![1, 2, 3]).unwrap() };
    let b = a.clone();
    assert_eq!(a.tree_hash_root().unwrap(), b.tree_hash_root().unwrap());

    let c = SlotAndData { slot: 8, data: VariableList::try_from(vec![1, 2, 3]).unwrap() };
    assert_ne!(a.tree_hash_root().unwrap(), c.tree_hash_root().unwrap());
}

#[test]
fn container_root_matches_balanced_pair_of_field_roots() {
    let value = SlotAndData { slot: 12, data: VariableList::try_from(vec![0xaa, 0xbb]).unwrap() };
    let slot_root = 12u64.tree_hash_root().unwrap();
    let data_root = value.data.tree_hash_root().unwrap();
    let expected = Sha256Digest::hash_pair(slot_root, data_root);
    assert_eq!(value.tree_hash_root().unwrap(), expected);
}

#[test]
fn proof_over_container_field_roots_verifies() {
    let value = SlotAndData { slot: 12, data: VariableList::try_from(vec![0xaa, 0xbb]).unwrap() };
    let slot_root = 12u64.tree_hash_root().unwrap();
    let data_root = value.data.tree_hash_root().unwrap();

    let tree = tree_from_chunks::<Sha256Digest>(&[slot_root, data_root], 2).unwrap();
    assert_eq!(tree.root(), value.tree_hash_root().unwrap());

    // generalized index 2 = first field (slot), 3 = second field (data).
    let p = proof::prove(&tree, 2).unwrap();
    assert_eq!(p.leaf, slot_root);
    proof::verify::<Sha256Digest>(&p, tree.root()).unwrap();

    let mut corrupted = p.clone();
    corrupted.leaf[0] ^= 0xff;
    assert!(proof::verify::<Sha256Digest>(&corrupted, tree.root()).is_err());
}

#[test]
fn invalid_first_offset_is_rejected() {
    // spec §8 scenario 6: first offset must equal 8 (fixed size); here it claims 4.
    let mut buf = Vec::new();
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&4u32.to_le_bytes());
    assert_eq!(SlotAndData::from_ssz_bytes(&buf), Err(Error::BadFirstOffset));
}

#[test]
fn list_overflow_is_rejected_at_encode_time() {
    let oversized: Vec<u8> = (0..10u16).map(|i| i as u8).collect();
    assert_eq!(
        VariableList::<u8, 4>::try_from(oversized),
        Err(Error::ListOverflow { found: 10, cap: 4 })
    );
}

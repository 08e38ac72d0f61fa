//! `FixedVector<T, N>` and `VariableList<T, CAP>`: owned, schema-bound collections over an
//! arbitrary element type `T`, generalizing the fixed/variable-length rules the container and
//! codec-collection modules already implement for bytes.

use alloc::vec::Vec;
use core::convert::TryFrom;

use crate::codec::collections::{decode_list, decode_vector, encode_list, encode_vector};
use crate::codec::{Decode, Encode};
use crate::error::Error;
use crate::hasher::Sha256Digest;
use crate::tree_hash::{list_tree_hash_root, vector_tree_hash_root, TreeHash, TreeHashType};

/// Exactly `N` elements of `T`. Construction is fallible: `TryFrom<Vec<T>>` is the only way to
/// build one, so a `FixedVector` can never hold the wrong element count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVector<T, const N: usize> {
    items: Vec<T>,
}

impl<T, const N: usize> FixedVector<T, N> {
    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T, const N: usize> TryFrom<Vec<T>> for FixedVector<T, N> {
    type Error = Error;

    fn try_from(items: Vec<T>) -> Result<Self, Error> {
        if items.len() != N {
            return Err(Error::VectorLength { found: items.len(), expected: N });
        }
        Ok(Self { items })
    }
}

impl<T: Encode, const N: usize> Encode for FixedVector<T, N> {
    fn is_ssz_fixed_len() -> bool {
        T::is_ssz_fixed_len()
    }
    fn ssz_fixed_len() -> usize {
        if T::is_ssz_fixed_len() {
            T::ssz_fixed_len() * N
        } else {
            0
        }
    }
    fn ssz_bytes_len(&self) -> usize {
        let mut out = Vec::new();
        self.ssz_append(&mut out);
        out.len()
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        encode_vector(&self.items, N, buf).expect("length invariant enforced at construction")
    }
}

impl<T: Decode, const N: usize> Decode for FixedVector<T, N> {
    fn is_ssz_fixed_len() -> bool {
        T::is_ssz_fixed_len()
    }
    fn ssz_fixed_len() -> usize {
        if T::is_ssz_fixed_len() {
            T::ssz_fixed_len() * N
        } else {
            0
        }
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self { items: decode_vector(bytes, N)? })
    }
}

impl<T: TreeHash, const N: usize> TreeHash for FixedVector<T, N> {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Vector
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("Vector is never itself a packed Basic element")
    }
    fn tree_hash_packing_factor() -> usize {
        unreachable!("Vector is never itself a packed Basic element")
    }
    fn tree_hash_root(&self) -> Result<[u8; 32], Error> {
        vector_tree_hash_root::<Sha256Digest, T>(&self.items, N)
    }
}

/// Up to `CAP` elements of `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableList<T, const CAP: usize> {
    items: Vec<T>,
}

impl<T, const CAP: usize> VariableList<T, CAP> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn push(&mut self, item: T) -> Result<(), Error> {
        if self.items.len() >= CAP {
            return Err(Error::ListOverflow { found: self.items.len() + 1, cap: CAP });
        }
        self.items.push(item);
        Ok(())
    }
}

impl<T, const CAP: usize> Default for VariableList<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAP: usize> TryFrom<Vec<T>> for VariableList<T, CAP> {
    type Error = Error;

    fn try_from(items: Vec<T>) -> Result<Self, Error> {
        if items.len() > CAP {
            return Err(Error::ListOverflow { found: items.len(), cap: CAP });
        }
        Ok(Self { items })
    }
}

impl<T: Encode, const CAP: usize> Encode for VariableList<T, CAP> {
    fn is_ssz_fixed_len() -> bool {
        false
    }
    fn ssz_bytes_len(&self) -> usize {
        let mut out = Vec::new();
        self.ssz_append(&mut out);
        out.len()
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        encode_list(&self.items, CAP, buf).expect("cap invariant enforced at construction")
    }
}

impl<T: Decode, const CAP: usize> Decode for VariableList<T, CAP> {
    fn is_ssz_fixed_len() -> bool {
        false
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self { items: decode_list(bytes, CAP)? })
    }
}

impl<T: TreeHash, const CAP: usize> TreeHash for VariableList<T, CAP> {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::List
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("List is never itself a packed Basic element")
    }
    fn tree_hash_packing_factor() -> usize {
        unreachable!("List is never itself a packed Basic element")
    }
    fn tree_hash_root(&self) -> Result<[u8; 32], Error> {
        list_tree_hash_root::<Sha256Digest, T>(&self.items, CAP)
    }
}

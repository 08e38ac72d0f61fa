//! Packed bit collections: `BitList(cap)` (variable length, sentinel-terminated) and the
//! AMBIENT-3 `Bitvector(n)` supplement (fixed length, no sentinel).

use alloc::vec;
use alloc::vec::Vec;

use crate::codec::{Decode, Encode};
use crate::error::Error;
use crate::hasher::{Chunk, Hasher, Sha256Digest};
use crate::primitives::validate_bitlist;
use crate::tree_hash::{TreeHash, TreeHashType};

/// A packed sequence of `0..=CAP` single bits, sentinel-terminated on the wire (see spec §3 /
/// §4.1 / §4.2 for the exact wire and validation rules).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitList<const CAP: usize> {
    /// Wire bytes, including the trailing sentinel bit. Never empty, last byte never zero.
    bytes: Vec<u8>,
    len: usize,
}

impl<const CAP: usize> BitList<CAP> {
    /// Builds an all-zero `BitList` of the given logical length.
    pub fn zeroed(len: usize) -> Result<Self, Error> {
        if len > CAP {
            return Err(Error::BitlistOverflow);
        }
        let mut bytes = vec![0u8; len / 8 + 1];
        let sentinel_byte = len / 8;
        let sentinel_bit = (len % 8) as u32;
        bytes[sentinel_byte] |= 1 << sentinel_bit;
        Ok(Self { bytes, len })
    }

    /// Wraps an already-encoded wire byte sequence, validating it against `CAP`.
    pub fn from_wire_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        let len = validate_bitlist(&bytes, CAP)?;
        Ok(Self { bytes, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> Result<bool, Error> {
        if i >= self.len {
            return Err(Error::ShortBuffer);
        }
        let byte = self.bytes[i / 8];
        Ok((byte >> (i % 8)) & 1 == 1)
    }

    pub fn set(&mut self, i: usize, value: bool) -> Result<(), Error> {
        if i >= self.len {
            return Err(Error::ShortBuffer);
        }
        let mask = 1u8 << (i % 8);
        if value {
            self.bytes[i / 8] |= mask;
        } else {
            self.bytes[i / 8] &= !mask;
        }
        Ok(())
    }

    /// The wire bytes, sentinel included, as stored on the wire.
    pub fn as_wire_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const CAP: usize> Encode for BitList<CAP> {
    fn is_ssz_fixed_len() -> bool {
        false
    }
    fn ssz_bytes_len(&self) -> usize {
        self.bytes.len()
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.bytes);
    }
}

impl<const CAP: usize> Decode for BitList<CAP> {
    fn is_ssz_fixed_len() -> bool {
        false
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_wire_bytes(bytes.to_vec())
    }
}

impl<const CAP: usize> TreeHash for BitList<CAP> {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::List
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("BitList is never itself a packed Basic element")
    }
    fn tree_hash_packing_factor() -> usize {
        unreachable!("BitList is never itself a packed Basic element")
    }
    fn tree_hash_root(&self) -> Result<Chunk, Error> {
        let mut h = Hasher::<Sha256Digest>::new();
        h.put_bitlist(&self.bytes, CAP)?;
        h.hash_root()
    }
}

/// A packed sequence of exactly `N` bits, no sentinel. Unused high bits of the final byte must
/// be zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitvector<const N: usize> {
    bytes: Vec<u8>,
}

impl<const N: usize> Bitvector<N> {
    const BYTE_LEN: usize = (N + 7) / 8;

    pub fn zeroed() -> Self {
        Self { bytes: vec![0u8; Self::BYTE_LEN] }
    }

    pub fn from_wire_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        Self::validate(&bytes)?;
        Ok(Self { bytes })
    }

    fn validate(bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() != Self::BYTE_LEN {
            return Err(Error::SizeMismatch { found: bytes.len(), expected: Self::BYTE_LEN });
        }
        let used_bits = (N % 8) as u32;
        if used_bits != 0 {
            let mask = !((1u8 << used_bits) - 1);
            if bytes[bytes.len() - 1] & mask != 0 {
                return Err(Error::BitvectorTrailingBits);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn get(&self, i: usize) -> Result<bool, Error> {
        if i >= N {
            return Err(Error::ShortBuffer);
        }
        Ok((self.bytes[i / 8] >> (i % 8)) & 1 == 1)
    }

    pub fn set(&mut self, i: usize, value: bool) -> Result<(), Error> {
        if i >= N {
            return Err(Error::ShortBuffer);
        }
        let mask = 1u8 << (i % 8);
        if value {
            self.bytes[i / 8] |= mask;
        } else {
            self.bytes[i / 8] &= !mask;
        }
        Ok(())
    }

    pub fn as_wire_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> Encode for Bitvector<N> {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        Self::BYTE_LEN
    }
    fn ssz_bytes_len(&self) -> usize {
        Self::BYTE_LEN
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.bytes);
    }
}

impl<const N: usize> Decode for Bitvector<N> {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        Self::BYTE_LEN
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_wire_bytes(bytes.to_vec())
    }
}

impl<const N: usize> TreeHash for Bitvector<N> {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Vector
    }
    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("Bitvector is never itself a packed Basic element")
    }
    fn tree_hash_packing_factor() -> usize {
        unreachable!("Bitvector is never itself a packed Basic element")
    }
    fn tree_hash_root(&self) -> Result<Chunk, Error> {
        let mut h = Hasher::<Sha256Digest>::new();
        let idx = h.index();
        h.append_chunks(&self.bytes);
        let limit = (N as u64 + 255) / 256;
        h.merkleize(idx, limit)?;
        h.hash_root()
    }
}

//! Vector(T, n) and List(T, cap) encode/decode orchestration, for both fixed and
//! variable element types T.

use alloc::vec::Vec;
use core::ops::Range;

use crate::codec::container::{read_offset_table, variable_field_ranges, ContainerEncoder};
use crate::codec::{Decode, Encode};
use crate::error::Error;
use crate::primitives::read_offset;

/// Byte ranges of each element in a buffer holding a variable-T Vector/List encoding (the
/// "isomorphic to a container of n identical variable fields" rule). Returns an empty vec for
/// an empty buffer (a zero-length collection).
pub fn decode_variable_element_ranges(buf: &[u8]) -> Result<Vec<Range<usize>>, Error> {
    if buf.is_empty() {
        return Ok(Vec::new());
    }
    let (off0, _) = read_offset(buf)?;
    if off0 % 4 != 0 {
        return Err(Error::BadDivision);
    }
    let count = (off0 / 4) as usize;
    let (offsets, _rest) = read_offset_table(buf, buf.len(), off0 as usize, count)?;
    Ok(variable_field_ranges(&offsets, buf.len()))
}

fn encode_elements<T: Encode>(items: &[T], out: &mut Vec<u8>) {
    if T::is_ssz_fixed_len() {
        for item in items {
            item.ssz_append(out);
        }
    } else {
        let mut enc = ContainerEncoder::new();
        for item in items {
            enc.variable_field(item.as_ssz_bytes());
        }
        out.extend_from_slice(&enc.finish());
    }
}

/// Encodes exactly `n` elements of `T`. Fails with [`Error::VectorLength`] if `items.len() !=
/// n`.
pub fn encode_vector<T: Encode>(items: &[T], n: usize, out: &mut Vec<u8>) -> Result<(), Error> {
    if items.len() != n {
        return Err(Error::VectorLength { found: items.len(), expected: n });
    }
    encode_elements(items, out);
    Ok(())
}

/// Encodes up to `cap` elements of `T`. Fails with [`Error::ListOverflow`] if `items.len() >
/// cap`.
pub fn encode_list<T: Encode>(items: &[T], cap: usize, out: &mut Vec<u8>) -> Result<(), Error> {
    if items.len() > cap {
        return Err(Error::ListOverflow { found: items.len(), cap });
    }
    encode_elements(items, out);
    Ok(())
}

fn decode_fixed_elements<T: Decode>(buf: &[u8]) -> Result<Vec<T>, Error> {
    let elem_size = T::ssz_fixed_len();
    if buf.len() % elem_size != 0 {
        return Err(Error::BadDivision);
    }
    buf.chunks(elem_size).map(T::from_ssz_bytes).collect()
}

fn decode_variable_elements<T: Decode>(buf: &[u8]) -> Result<Vec<T>, Error> {
    let ranges = decode_variable_element_ranges(buf)?;
    ranges.into_iter().map(|r| T::from_ssz_bytes(&buf[r])).collect()
}

/// Decodes exactly `n` elements of `T` from `buf`. Fails with [`Error::VectorLength`] if the
/// implied element count does not equal `n`, or with [`Error::BadDivision`] if a fixed-T
/// buffer's length is not evenly divisible by the element size.
pub fn decode_vector<T: Decode>(buf: &[u8], n: usize) -> Result<Vec<T>, Error> {
    let items = if T::is_ssz_fixed_len() {
        decode_fixed_elements::<T>(buf)?
    } else {
        decode_variable_elements::<T>(buf)?
    };
    if items.len() != n {
        return Err(Error::VectorLength { found: items.len(), expected: n });
    }
    Ok(items)
}

/// Decodes up to `cap` elements of `T` from `buf`. Fails with [`Error::ListOverflow`] if the
/// implied element count exceeds `cap`.
pub fn decode_list<T: Decode>(buf: &[u8], cap: usize) -> Result<Vec<T>, Error> {
    let items = if T::is_ssz_fixed_len() {
        decode_fixed_elements::<T>(buf)?
    } else {
        decode_variable_elements::<T>(buf)?
    };
    if items.len() > cap {
        return Err(Error::ListOverflow { found: items.len(), cap });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn vector_of_fixed_uint64_round_trip() {
        let items: Vec<u64> = vec![1, 2, 3, 4];
        let mut out = Vec::new();
        encode_vector(&items, 4, &mut out).unwrap();
        assert_eq!(out.len(), 32);
        let decoded: Vec<u64> = decode_vector(&out, 4).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn vector_rejects_wrong_length() {
        let items: Vec<u64> = vec![1, 2, 3];
        let mut out = Vec::new();
        assert_eq!(
            encode_vector(&items, 4, &mut out),
            Err(Error::VectorLength { found: 3, expected: 4 })
        );
    }

    #[test]
    fn list_rejects_overflow() {
        let items: Vec<u64> = vec![1, 2, 3, 4, 5];
        let mut out = Vec::new();
        assert_eq!(
            encode_list(&items, 4, &mut out),
            Err(Error::ListOverflow { found: 5, cap: 4 })
        );
    }

    #[test]
    fn list_of_fixed_bytes_decode_overflow() {
        // 5 u64 elements packed, but cap is 4.
        let items: Vec<u64> = vec![1, 2, 3, 4, 5];
        let mut out = Vec::new();
        encode_elements(&items, &mut out);
        assert_eq!(
            decode_list::<u64>(&out, 4),
            Err(Error::ListOverflow { found: 5, cap: 4 })
        );
    }

    /// A minimal variable-length element (a length-prefixed-by-offset byte string), used to
    /// exercise the Vector/List-of-variable-T offset table path without depending on the
    /// AMBIENT-3 collection wrapper types.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct VarBytes(Vec<u8>);

    impl Encode for VarBytes {
        fn is_ssz_fixed_len() -> bool {
            false
        }
        fn ssz_bytes_len(&self) -> usize {
            self.0.len()
        }
        fn ssz_append(&self, buf: &mut Vec<u8>) {
            buf.extend_from_slice(&self.0);
        }
    }

    impl Decode for VarBytes {
        fn is_ssz_fixed_len() -> bool {
            false
        }
        fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
            Ok(Self(bytes.to_vec()))
        }
    }

    #[test]
    fn vector_of_variable_elements_round_trip() {
        let items = vec![VarBytes(vec![1, 2, 3]), VarBytes(vec![]), VarBytes(vec![9])];
        let mut out = Vec::new();
        encode_vector(&items, 3, &mut out).unwrap();
        let decoded: Vec<VarBytes> = decode_vector(&out, 3).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn empty_variable_list_round_trips_to_empty_buffer() {
        let items: Vec<VarBytes> = vec![];
        let mut out = Vec::new();
        encode_list(&items, 16, &mut out).unwrap();
        assert!(out.is_empty());
        let decoded: Vec<VarBytes> = decode_list(&out, 16).unwrap();
        assert!(decoded.is_empty());
    }
}

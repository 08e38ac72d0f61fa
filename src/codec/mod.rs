//! The dispatch contract for generated or hand-written per-type stubs, plus the
//! codec orchestration primitives (container offset tables, vector/list layout,
//! bitfield wire rules) that stub code calls into.
//!
//! A generated stub provides exactly four operations per declared type
//! (`size_of`, `encode`, `decode`, `merkleise`); here those are the `Encode`,
//! `Decode`, and [`crate::tree_hash::TreeHash`] traits.

pub mod bitfield;
pub mod collections;
pub mod container;

use alloc::vec::Vec;

use crate::error::Error;

/// Serialization half of the dispatch contract.
pub trait Encode {
    /// Whether every value of this type has the same wire size.
    fn is_ssz_fixed_len() -> bool;

    /// The fixed wire size, valid only when [`Encode::is_ssz_fixed_len`] is `true`.
    fn ssz_fixed_len() -> usize
    where
        Self: Sized,
    {
        0
    }

    /// This particular value's wire size (equal to `ssz_fixed_len()` for fixed types).
    fn ssz_bytes_len(&self) -> usize;

    /// Appends this value's canonical encoding to `buf`.
    fn ssz_append(&self, buf: &mut Vec<u8>);

    /// Convenience: encodes into a freshly allocated buffer.
    fn as_ssz_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.ssz_bytes_len());
        self.ssz_append(&mut buf);
        buf
    }
}

/// Deserialization half of the dispatch contract.
pub trait Decode: Sized {
    /// Whether every value of this type has the same wire size.
    fn is_ssz_fixed_len() -> bool;

    /// The fixed wire size, valid only when [`Decode::is_ssz_fixed_len`] is `true`.
    fn ssz_fixed_len() -> usize
    where
        Self: Sized,
    {
        0
    }

    /// Decodes a value from exactly `bytes`. Implementations must reject any trailing
    /// bytes — the caller has already isolated this value's slice.
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error>;
}

macro_rules! impl_uint_codec {
    ($ty:ty, $bits:expr) => {
        impl Encode for $ty {
            fn is_ssz_fixed_len() -> bool {
                true
            }
            fn ssz_fixed_len() -> usize {
                $bits / 8
            }
            fn ssz_bytes_len(&self) -> usize {
                $bits / 8
            }
            fn ssz_append(&self, buf: &mut Vec<u8>) {
                crate::primitives::encode_uint($bits, *self as u64, buf)
            }
        }

        impl Decode for $ty {
            fn is_ssz_fixed_len() -> bool {
                true
            }
            fn ssz_fixed_len() -> usize {
                $bits / 8
            }
            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
                if bytes.len() != $bits / 8 {
                    return Err(Error::SizeMismatch {
                        found: bytes.len(),
                        expected: $bits / 8,
                    });
                }
                let (value, rest) = crate::primitives::decode_uint($bits, bytes)?;
                debug_assert!(rest.is_empty());
                Ok(value as $ty)
            }
        }
    };
}

impl_uint_codec!(u8, 8);
impl_uint_codec!(u16, 16);
impl_uint_codec!(u32, 32);
impl_uint_codec!(u64, 64);

impl Encode for bool {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        1
    }
    fn ssz_bytes_len(&self) -> usize {
        1
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        crate::primitives::encode_bool(*self, buf)
    }
}

impl Decode for bool {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        1
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 1 {
            return Err(Error::SizeMismatch { found: bytes.len(), expected: 1 });
        }
        let (value, _) = crate::primitives::decode_bool(bytes)?;
        Ok(value)
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        N
    }
    fn ssz_bytes_len(&self) -> usize {
        N
    }
    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self);
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn is_ssz_fixed_len() -> bool {
        true
    }
    fn ssz_fixed_len() -> usize {
        N
    }
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != N {
            return Err(Error::SizeMismatch { found: bytes.len(), expected: N });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_round_trip() {
        let v: u64 = 0x0102030405060708;
        let bytes = v.as_ssz_bytes();
        assert_eq!(bytes, vec![8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(u64::from_ssz_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn fixed_bytes_round_trip() {
        let v: [u8; 4] = [0xaa, 0xbb, 0xcc, 0xdd];
        let bytes = v.as_ssz_bytes();
        assert_eq!(bytes, v);
        assert_eq!(<[u8; 4]>::from_ssz_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn fixed_bytes_rejects_wrong_size() {
        assert_eq!(
            <[u8; 4]>::from_ssz_bytes(&[1, 2, 3]),
            Err(Error::SizeMismatch { found: 3, expected: 4 })
        );
    }
}

// src/error.rs

/// The full error taxonomy for this crate. Every decode primitive returns one of
/// these on the first failure; no partial or best-effort decode is ever returned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Decode requested more bytes than remain in the buffer.
    ShortBuffer,

    /// Decode consumed less than the entire buffer when an exact match was required.
    TrailingBytes,

    /// A fixed container's or fixed element's wire length is not the schema-expected size.
    SizeMismatch { found: usize, expected: usize },

    /// A bool byte was neither 0x00 nor 0x01.
    BadBool,

    /// A FixedBytes value's in-memory length did not match the declared size at encode time.
    BadLength { found: usize, expected: usize },

    /// A List's actual element count exceeded its declared cap.
    ListOverflow { found: usize, cap: usize },

    /// A Vector's actual element count did not equal its declared n.
    VectorLength { found: usize, expected: usize },

    /// An offset exceeded the total buffer size.
    BadOffset,

    /// A later offset in a container's offset table was less than the one before it.
    OffsetNotIncreasing,

    /// The first variable-field offset did not equal the fixed-section size.
    BadFirstOffset,

    /// An offset was not divisible by 4, or a fixed-element buffer's length was not divisible
    /// by the element size.
    BadDivision,

    /// A BitList's wire form was empty (no sentinel byte present).
    EmptyBitlist,

    /// The last byte of a BitList's wire form was zero (sentinel bit missing).
    BadBitlistTrailing,

    /// A BitList's logical bit length exceeded its declared cap.
    BitlistOverflow,

    /// A Bitvector's trailing unused bits in the final byte were not all zero.
    BitvectorTrailingBits,

    /// A single-proof's hash count did not match `path_length(index)`.
    ProofLength,

    /// A multi-proof was missing a sibling hash required to reconstruct the root.
    ProofMissingNode,

    /// A proof's reconstructed root did not equal the expected root.
    ProofBadRoot,

    /// A chunk count exceeded the declared merkleisation limit (schema violation; should never
    /// be reachable from untrusted input, only from a miswired generated stub).
    MerkleizeOverflow { count: u64, limit: u64 },

    /// `Hasher::hash_root` was called before the accumulator had been reduced to exactly one
    /// 32-byte chunk (a miswired generated stub, never a consequence of untrusted input).
    HasherNotFinalized { len: usize },
}

// Manual implementation of Display for no_std environments.
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ShortBuffer => write!(f, "buffer too short for requested read"),
            Self::TrailingBytes => write!(f, "buffer had trailing bytes after decode"),
            Self::SizeMismatch { found, expected } => {
                write!(f, "fixed size mismatch: found {}, expected {}", found, expected)
            }
            Self::BadBool => write!(f, "bool byte was neither 0x00 nor 0x01"),
            Self::BadLength { found, expected } => {
                write!(f, "fixed bytes length mismatch: found {}, expected {}", found, expected)
            }
            Self::ListOverflow { found, cap } => {
                write!(f, "list length {} exceeds cap {}", found, cap)
            }
            Self::VectorLength { found, expected } => {
                write!(f, "vector length {} does not equal expected {}", found, expected)
            }
            Self::BadOffset => write!(f, "offset exceeds buffer size"),
            Self::OffsetNotIncreasing => write!(f, "offset table is not strictly increasing"),
            Self::BadFirstOffset => write!(f, "first offset did not equal fixed-section size"),
            Self::BadDivision => write!(f, "length was not evenly divisible by element size"),
            Self::EmptyBitlist => write!(f, "bitlist wire form was empty"),
            Self::BadBitlistTrailing => write!(f, "bitlist sentinel byte was zero"),
            Self::BitlistOverflow => write!(f, "bitlist bit length exceeds cap"),
            Self::BitvectorTrailingBits => write!(f, "bitvector trailing bits were not zero"),
            Self::ProofLength => write!(f, "proof hash count did not match path length"),
            Self::ProofMissingNode => write!(f, "multi-proof missing a required sibling hash"),
            Self::ProofBadRoot => write!(f, "reconstructed root did not match expected root"),
            Self::MerkleizeOverflow { count, limit } => {
                write!(f, "chunk count {} exceeds merkleisation limit {}", count, limit)
            }
            Self::HasherNotFinalized { len } => {
                write!(f, "hasher accumulator held {} bytes, expected exactly 32", len)
            }
        }
    }
}

// Enable standard Error trait if the "std" feature is on.
#[cfg(feature = "std")]
impl std::error::Error for Error {}

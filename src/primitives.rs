//! Little-endian integer codec, bool codec, offset codec, bit-list validation,
//! buffer extension, and the bounds-checking `OffsetMarker` reader.
//!
//! Everything here is a direct primitive a generated per-type stub calls into;
//! none of it knows about containers, collections, or hashing.

use alloc::vec::Vec;

use crate::error::Error;

/// Appends `value`'s `n`-bit little-endian encoding to `out`. `n` must be 8, 16, 32, or 64.
#[inline]
pub fn encode_uint(n: u32, value: u64, out: &mut Vec<u8>) {
    match n {
        8 => out.push(value as u8),
        16 => out.extend_from_slice(&(value as u16).to_le_bytes()),
        32 => out.extend_from_slice(&(value as u32).to_le_bytes()),
        64 => out.extend_from_slice(&value.to_le_bytes()),
        other => unreachable!("unsupported uint width: {}", other),
    }
}

/// Reads the first `n/8` bytes of `buf` as a little-endian unsigned integer, returning the
/// value and the remaining slice. Fails if `buf` is shorter than `n/8` bytes.
#[inline]
pub fn decode_uint(n: u32, buf: &[u8]) -> Result<(u64, &[u8]), Error> {
    let width = (n / 8) as usize;
    if buf.len() < width {
        return Err(Error::ShortBuffer);
    }
    let (head, tail) = buf.split_at(width);
    let value = match n {
        8 => head[0] as u64,
        16 => u16::from_le_bytes([head[0], head[1]]) as u64,
        32 => u32::from_le_bytes([head[0], head[1], head[2], head[3]]) as u64,
        64 => u64::from_le_bytes(head.try_into().expect("width checked above")),
        other => unreachable!("unsupported uint width: {}", other),
    };
    Ok((value, tail))
}

/// Appends a bool's canonical byte (0x01 / 0x00) to `out`.
#[inline]
pub fn encode_bool(value: bool, out: &mut Vec<u8>) {
    out.push(if value { 0x01 } else { 0x00 });
}

/// Decodes a bool from the first byte of `buf`. Fails if the byte is neither 0x00 nor 0x01,
/// or if `buf` is empty.
#[inline]
pub fn decode_bool(buf: &[u8]) -> Result<(bool, &[u8]), Error> {
    match buf.first() {
        Some(0x00) => Ok((false, &buf[1..])),
        Some(0x01) => Ok((true, &buf[1..])),
        Some(_) => Err(Error::BadBool),
        None => Err(Error::ShortBuffer),
    }
}

/// An offset is a 32-bit little-endian unsigned integer naming an absolute byte position.
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;

/// Appends a 32-bit little-endian offset to `out`.
#[inline]
pub fn write_offset(out: &mut Vec<u8>, offset: usize) {
    out.extend_from_slice(&(offset as u32).to_le_bytes());
}

/// Reads a raw 32-bit little-endian offset from the front of `buf`, without any bounds
/// validation against a container's total size. Fails only if `buf` is too short to hold one.
#[inline]
pub fn read_offset(buf: &[u8]) -> Result<(u32, &[u8]), Error> {
    if buf.len() < BYTES_PER_LENGTH_OFFSET {
        return Err(Error::ShortBuffer);
    }
    let (head, tail) = buf.split_at(BYTES_PER_LENGTH_OFFSET);
    let offset = u32::from_le_bytes(head.try_into().expect("width checked above"));
    Ok((offset, tail))
}

/// Returns a buffer of length `new_len`, reusing `buf`'s storage when it already has spare
/// capacity and zero-filling any newly exposed tail.
#[inline]
pub fn extend(mut buf: Vec<u8>, new_len: usize) -> Vec<u8> {
    if new_len > buf.len() {
        buf.resize(new_len, 0);
    } else {
        buf.truncate(new_len);
    }
    buf
}

/// A bounds-checking reader over a container's offset table.
///
/// Constructed with `total_size` (the whole container encoding's length) and `fixed_size` (the
/// size of the container's fixed section). Each `read_next` call pulls the next offset off the
/// front of `buf` and validates it against the three security-critical rules that prevent a
/// malicious encoding from aliasing, overlapping, or escaping the variable region:
///
/// 1. the offset never exceeds `total_size` ([`Error::BadOffset`]);
/// 2. the first offset read must equal `fixed_size` exactly ([`Error::BadFirstOffset`]);
/// 3. every subsequent offset must be `>=` the previous one ([`Error::OffsetNotIncreasing`]).
pub struct OffsetMarker {
    total_size: u32,
    fixed_size: u32,
    previous: Option<u32>,
    is_first: bool,
}

impl OffsetMarker {
    pub fn new(total_size: usize, fixed_size: usize) -> Self {
        Self {
            total_size: total_size as u32,
            fixed_size: fixed_size as u32,
            previous: None,
            is_first: true,
        }
    }

    /// Reads the next offset off the front of `buf`, validates it, and returns it along with
    /// the remaining slice.
    pub fn read_next<'b>(&mut self, buf: &'b [u8]) -> Result<(u32, &'b [u8]), Error> {
        let (offset, rest) = read_offset(buf)?;

        if offset > self.total_size {
            return Err(Error::BadOffset);
        }

        if self.is_first {
            if offset != self.fixed_size {
                return Err(Error::BadFirstOffset);
            }
            self.is_first = false;
        } else if let Some(prev) = self.previous {
            if offset < prev {
                return Err(Error::OffsetNotIncreasing);
            }
        }

        self.previous = Some(offset);
        Ok((offset, rest))
    }
}

/// Returns the 1-indexed position of the highest set bit in a nonzero byte (1..=8), or `None`
/// for a zero byte.
#[inline]
pub fn msb_position(byte: u8) -> Option<u32> {
    if byte == 0 {
        None
    } else {
        Some(8 - byte.leading_zeros())
    }
}

/// Validates a BitList's wire byte sequence against a bit-cap, returning the logical bit
/// length on success. See spec §4.1 for the exact rule: `buf` non-empty, `len(buf) <=
/// floor(cap/8) + 1`, last byte non-zero, and the extracted logical length `<= cap`.
pub fn validate_bitlist(buf: &[u8], cap: usize) -> Result<usize, Error> {
    let last = *buf.last().ok_or(Error::EmptyBitlist)?;

    if buf.len() > cap / 8 + 1 {
        return Err(Error::BitlistOverflow);
    }

    let msb = msb_position(last).ok_or(Error::BadBitlistTrailing)?;
    let logical_len = 8 * (buf.len() - 1) + msb as usize - 1;

    if logical_len > cap {
        return Err(Error::BitlistOverflow);
    }

    Ok(logical_len)
}

/// Smallest power of two `>= v` (returns 1 for `v == 0`).
#[inline]
pub fn next_pow2(v: u64) -> u64 {
    if v <= 1 {
        1
    } else {
        1u64 << (64 - (v - 1).leading_zeros())
    }
}

/// `ceil(log2(v))`, with `log2_ceil(0) == 0` and `log2_ceil(1) == 0`.
#[inline]
pub fn log2_ceil(v: u64) -> u32 {
    if v <= 1 {
        0
    } else {
        64 - (v - 1).leading_zeros()
    }
}

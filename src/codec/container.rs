//! Container (ordered record) encode/decode orchestration.
//!
//! A generated stub calls these helpers field-by-field, in declaration order, the same way
//! the teacher's hand-rolled `Header::from_bytes`/`to_bytes` walk a fixed field list — except
//! here a subset of fields may be variable-length, which requires an offset table.

use alloc::vec::Vec;

use crate::error::Error;
use crate::primitives::OffsetMarker;

/// Accumulates a container's fixed section (inline bytes and offset placeholders) and its
/// variable section, then backfills the offset table on [`ContainerEncoder::finish`].
///
/// Fields must be fed in declaration order: call [`Self::fixed_field`] for every fixed field
/// and [`Self::variable_field`] for every variable field, in the order they appear in the
/// schema.
pub struct ContainerEncoder {
    fixed: Vec<u8>,
    offset_slots: Vec<usize>,
    variable_chunks: Vec<Vec<u8>>,
}

impl ContainerEncoder {
    pub fn new() -> Self {
        Self { fixed: Vec::new(), offset_slots: Vec::new(), variable_chunks: Vec::new() }
    }

    /// Emits a fixed-size field's bytes directly into the fixed section.
    pub fn fixed_field(&mut self, bytes: &[u8]) {
        self.fixed.extend_from_slice(bytes);
    }

    /// Reserves a 4-byte offset placeholder in the fixed section and stashes `bytes` to be
    /// emitted (and the placeholder backfilled) once every field has been seen.
    pub fn variable_field(&mut self, bytes: Vec<u8>) {
        self.offset_slots.push(self.fixed.len());
        self.fixed.extend_from_slice(&[0u8; 4]);
        self.variable_chunks.push(bytes);
    }

    /// Backfills the offset table and concatenates the fixed and variable sections. The first
    /// offset always equals the fixed-section size; offsets strictly increase thereafter.
    pub fn finish(self) -> Vec<u8> {
        let mut out = self.fixed;
        let fixed_size = out.len();

        let mut cursor = fixed_size;
        let mut offsets = Vec::with_capacity(self.variable_chunks.len());
        for chunk in &self.variable_chunks {
            offsets.push(cursor);
            cursor += chunk.len();
        }

        for (slot, offset) in self.offset_slots.iter().zip(offsets.iter()) {
            out[*slot..*slot + 4].copy_from_slice(&(*offset as u32).to_le_bytes());
        }

        for chunk in self.variable_chunks {
            out.extend_from_slice(&chunk);
        }

        out
    }
}

impl Default for ContainerEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Given a container's validated offset table (the first entry already checked to equal the
/// fixed-section size, every later entry already checked non-decreasing) and the buffer's
/// total size, returns the byte range of each variable field. The last field's range runs to
/// `total_size`.
pub fn variable_field_ranges(offsets: &[u32], total_size: usize) -> Vec<core::ops::Range<usize>> {
    let mut ranges = Vec::with_capacity(offsets.len());
    for i in 0..offsets.len() {
        let start = offsets[i] as usize;
        let end = if i + 1 < offsets.len() { offsets[i + 1] as usize } else { total_size };
        ranges.push(start..end);
    }
    ranges
}

/// Reads every offset out of a container's offset-table prefix (the part of the fixed section
/// following `read_from`'s current position), validating each via [`OffsetMarker`]. Returns the
/// offsets in declaration order and the remaining slice after the last offset (which is empty
/// for a container whose only variable fields are encoded here, since offsets live in the
/// fixed section and nothing follows them but the variable section itself).
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip(buf)))]
pub fn read_offset_table<'b>(
    mut buf: &'b [u8],
    total_size: usize,
    fixed_size: usize,
    count: usize,
) -> Result<(Vec<u32>, &'b [u8]), Error> {
    let mut marker = OffsetMarker::new(total_size, fixed_size);
    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        let (offset, rest) = marker.read_next(buf)?;
        offsets.push(offset);
        buf = rest;
    }
    Ok((offsets, buf))
}

// This file is part of asmforge, an assembler.
// Copyright 2024 the asmforge contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// asmforge is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// asmforge is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with asmforge.  If not, see <http://www.gnu.org/licenses/>.

//! The object-output buffer: a growing byte store partitioned into
//! address-anchored segments.

use std::io::{self, Write};

use crate::value::Value;

/// A contiguous run of bytes anchored at a target address.
///
/// A segment's length is not stored directly; it is derived from the
/// `buffer_index` of the following segment (or, for the last segment, from
/// the current write address) by [`ObjectOutput::segment_length`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment {
    /// The target address of the first byte of this segment.
    pub address: Value,

    /// The offset of the first byte of this segment within the backing
    /// buffer.
    pub buffer_index: usize,
}

/// A growing byte buffer partitioned into address-anchored segments.
///
/// Initialised with a single empty segment at address `0`. Relocating the
/// write cursor with [`ObjectOutput::set_address`] either reuses the
/// current segment in place (if nothing has been written into it yet) or
/// appends a new one; writing with [`ObjectOutput::write`] always appends to
/// the backing buffer and advances the cursor.
#[derive(Clone, Debug)]
pub struct ObjectOutput {
    buffer:          Vec<u8>,
    segments:        Vec<Segment>,
    current_address: Value,
}

impl ObjectOutput {
    /// Creates a new, empty object output with a single segment at address
    /// `0`.
    pub fn new() -> Self {
        Self {
            buffer:          Vec::with_capacity(128),
            segments:        vec![Segment { address: 0, buffer_index: 0 }],
            current_address: 0,
        }
    }

    /// Returns the current write address.
    #[inline]
    pub fn current_address(&self) -> Value {
        self.current_address
    }

    /// Returns the number of segments.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns segment `index`.
    #[inline]
    pub fn segment(&self, index: usize) -> Segment {
        self.segments[index]
    }

    /// Returns a view of the bytes written into segment `index`.
    pub fn segment_ptr(&self, index: usize) -> &[u8] {
        let start = self.segments[index].buffer_index;
        let end   = start + self.segment_length(index);
        &self.buffer[start..end]
    }

    /// Returns the number of bytes written into segment `index`.
    pub fn segment_length(&self, index: usize) -> usize {
        let last = self.segments.len() - 1;
        if index == last {
            (self.current_address - self.segments[last].address) as usize
        } else {
            self.segments[index + 1].buffer_index - self.segments[index].buffer_index
        }
    }

    /// Relocates the write cursor to `address`.
    ///
    /// If the current (last) segment is still empty — nothing has been
    /// written into it since it was created or last relocated, i.e.
    /// `current_address == last_segment.address` — its address is
    /// overwritten in place. Otherwise a new segment is appended, anchored
    /// at `address`, whose `buffer_index` equals the total number of bytes
    /// committed so far.
    pub fn set_address(&mut self, address: Value) {
        let last = self.segments.len() - 1;
        let last_segment = self.segments[last];

        if self.current_address == last_segment.address {
            self.segments[last].address = address;
            self.current_address        = address;
            return;
        }

        let buffer_index = (self.current_address - last_segment.address) as usize
            + last_segment.buffer_index;

        self.segments.push(Segment { address, buffer_index });
        self.current_address = address;
    }

    /// Appends `bytes` to the backing buffer at the current write position
    /// and advances the cursor by `bytes.len()`.
    pub fn write(&mut self, bytes: &[u8]) {
        let last = self.segments.len() - 1;
        let last_segment = self.segments[last];
        let offset = last_segment.buffer_index
            + (self.current_address - last_segment.address) as usize;

        if offset + bytes.len() > self.buffer.len() {
            self.buffer.resize(offset + bytes.len(), 0);
        }
        self.buffer[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.current_address += bytes.len() as Value;
    }

    /// Writes the bytes of every segment, concatenated in the order they
    /// were written into the buffer (not sorted by address). This is a raw
    /// concatenation: no header, no address metadata, no padding.
    pub fn emit_binary(&self, out: &mut impl Write) -> io::Result<()> {
        out.write_all(&self.buffer)
    }
}

impl Default for ObjectOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_empty_segment() {
        let obj = ObjectOutput::new();
        assert_eq!(obj.segment_count(), 1);
        assert_eq!(obj.segment(0), Segment { address: 0, buffer_index: 0 });
        assert_eq!(obj.segment_length(0), 0);
    }

    #[test]
    fn set_address_reuses_empty_last_segment() {
        let mut obj = ObjectOutput::new();
        obj.set_address(0x8000);
        assert_eq!(obj.segment_count(), 1);
        assert_eq!(obj.segment(0).address, 0x8000);
    }

    #[test]
    fn write_then_set_address_appends_new_segment() {
        let mut obj = ObjectOutput::new();
        obj.set_address(0x8000);
        obj.write(&[0xAB, 0xCD, 0xEF, 0x00, 0x12]);
        assert_eq!(obj.segment_length(0), 5);
        assert_eq!(obj.current_address(), 0x8005);

        obj.set_address(0x4000);
        assert_eq!(obj.segment_count(), 2);
        assert_eq!(obj.segment(1), Segment { address: 0x4000, buffer_index: 5 });
        assert_eq!(obj.segment_length(0), 5);

        obj.write(&[0x34, 0x56, 0x78, 0x9A, 0xBC]);
        assert_eq!(obj.segment_length(0), 5);
        assert_eq!(obj.segment_length(1), 5);
        assert_eq!(obj.segment_ptr(0), &[0xAB, 0xCD, 0xEF, 0x00, 0x12]);
        assert_eq!(obj.segment_ptr(1), &[0x34, 0x56, 0x78, 0x9A, 0xBC]);
    }

    /// Relocating an still-empty segment reuses it in place even when the
    /// new address is *lower* than the previous one — resolving the
    /// buffer's Open Question: the reuse condition is purely "is the last
    /// segment empty" (`current_address == last_segment.address`), not a
    /// comparison of old vs. new address.
    #[test]
    fn set_address_reuse_is_independent_of_direction() {
        let mut obj = ObjectOutput::new();

        obj.set_address(0x8000);
        assert_eq!(obj.segment_count(), 1);

        // Nothing has been written yet, so this reuses the same segment in
        // place even though 0x4000 < 0x8000.
        obj.set_address(0x4000);
        assert_eq!(obj.segment_count(), 1);
        assert_eq!(obj.segment(0).address, 0x4000);
    }

    #[test]
    fn emit_binary_concatenates_segments_in_creation_order() {
        let mut obj = ObjectOutput::new();
        obj.set_address(0x8002);
        obj.write(&[0x04, 0x05, 0x06]);
        obj.set_address(0x8000);
        obj.write(&[0x07, 0x08, 0x09]);

        // Segment 0 (anchored 0x8002) contributes its own 3 bytes, then
        // segment 1 (anchored 0x8000, created afterward) contributes its 3
        // bytes — concatenation follows segment creation order, not target
        // address order.
        let mut out = Vec::new();
        obj.emit_binary(&mut out).unwrap();
        assert_eq!(out, vec![0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
    }
}

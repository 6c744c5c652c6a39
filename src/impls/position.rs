/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// A byte offset plus a bit offset inside that byte.
///
/// The bit offset is always in `0..8`, and the byte offset never exceeds
/// [`MAX_BYTE`](Position::MAX_BYTE), so that the absolute bit offset fits
/// in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
pub struct Position {
    byte: u64,
    bit: u8,
}

/// The end of a range of `len` bytes starting at `start`, if it is a valid
/// byte offset.
#[inline(always)]
pub(crate) fn checked_end(start: u64, len: u64) -> Option<u64> {
    match start.checked_add(len) {
        Some(end) if end <= Position::MAX_BYTE => Some(end),
        _ => None,
    }
}

impl Position {
    /// The largest byte offset of a position.
    pub const MAX_BYTE: u64 = u64::MAX / 8;

    /// Build a position, carrying `bit / 8` into the byte offset.
    ///
    /// Byte offsets past [`MAX_BYTE`](Position::MAX_BYTE) saturate; use
    /// [`checked_new`](Position::checked_new) for untrusted offsets.
    #[must_use]
    pub const fn new(byte: u64, bit: u64) -> Self {
        let byte = byte.saturating_add(bit / 8);
        Self {
            byte: if byte > Self::MAX_BYTE { Self::MAX_BYTE } else { byte },
            bit: (bit % 8) as u8,
        }
    }

    /// Build a position, carrying `bit / 8` into the byte offset, or return
    /// `None` if the byte offset exceeds [`MAX_BYTE`](Position::MAX_BYTE).
    #[must_use]
    pub const fn checked_new(byte: u64, bit: u64) -> Option<Self> {
        match byte.checked_add(bit / 8) {
            Some(byte) if byte <= Self::MAX_BYTE => Some(Self {
                byte,
                bit: (bit % 8) as u8,
            }),
            _ => None,
        }
    }

    /// Build a position from an absolute bit offset.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            byte: bits / 8,
            bit: (bits % 8) as u8,
        }
    }

    #[must_use]
    #[inline(always)]
    pub const fn byte(&self) -> u64 {
        self.byte
    }

    /// The bit offset inside [`byte`](Position::byte), in `0..8`.
    #[must_use]
    #[inline(always)]
    pub const fn bit(&self) -> u8 {
        self.bit
    }

    /// The absolute bit offset `byte * 8 + bit`.
    #[must_use]
    #[inline(always)]
    pub const fn abs_bits(&self) -> u64 {
        self.byte * 8 + self.bit as u64
    }

    /// The number of bytes that must exist for this position to be valid,
    /// that is, the byte offset rounded up to cover a partial byte.
    #[must_use]
    #[inline(always)]
    pub const fn end_byte(&self) -> u64 {
        self.byte + (self.bit != 0) as u64
    }

    /// Move by a signed number of bytes and bits.
    ///
    /// Bit movements carry into the byte offset with floor-division
    /// semantics, so that, e.g., moving back one bit from bit 0 lands on
    /// bit 7 of the previous byte. Positions before the start clamp to 0;
    /// positions beyond the last representable bit are `None`.
    #[must_use]
    pub fn offset_by(&self, byte_delta: i64, bit_delta: i64) -> Option<Self> {
        let target = self.abs_bits() as i128 + byte_delta as i128 * 8 + bit_delta as i128;
        u64::try_from(target.max(0)).ok().map(Self::from_bits)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.byte, self.bit)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_normalization() {
        let p = Position::new(2, 19);
        assert_eq!((p.byte(), p.bit()), (4, 3));
        assert_eq!(p.abs_bits(), 35);
        assert_eq!(p.end_byte(), 5);
        assert_eq!(Position::new(4, 0).end_byte(), 4);
    }

    #[test]
    fn test_offset_by() {
        let p = Position::new(3, 2);
        // floor carry on negative bits
        let q = p.offset_by(0, -3).unwrap();
        assert_eq!((q.byte(), q.bit()), (2, 7));
        let q = p.offset_by(1, 7).unwrap();
        assert_eq!((q.byte(), q.bit()), (5, 1));
        let q = p.offset_by(-1, -9).unwrap();
        assert_eq!((q.byte(), q.bit()), (1, 1));
        // clamp at zero
        assert_eq!(p.offset_by(-10, 0), Some(Position::default()));
        let last = Position::new(Position::MAX_BYTE, 7);
        assert_eq!(last.abs_bits(), u64::MAX);
        assert_eq!(last.offset_by(0, 1), None);
        assert_eq!(last.offset_by(i64::MAX, 0), None);
    }

    #[test]
    fn test_limits() {
        assert_eq!(Position::checked_new(u64::MAX / 4, 0), None);
        assert_eq!(Position::checked_new(Position::MAX_BYTE, 8), None);
        assert_eq!(Position::checked_new(u64::MAX, 0), None);
        let p = Position::checked_new(Position::MAX_BYTE, 7).unwrap();
        assert_eq!(p.end_byte(), Position::MAX_BYTE + 1);
        // unchecked construction saturates
        assert_eq!(Position::new(u64::MAX, 9).byte(), Position::MAX_BYTE);
        assert_eq!(checked_end(Position::MAX_BYTE - 1, 1), Some(Position::MAX_BYTE));
        assert_eq!(checked_end(Position::MAX_BYTE, 1), None);
        assert_eq!(checked_end(1, u64::MAX), None);
    }
}

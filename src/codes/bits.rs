/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bit fields of 1 to 32 bits at arbitrary bit positions.
//!
//! A field is packed starting at the current absolute bit position of the
//! cursor. With [big endian](Endianness::Big) the most significant bit of
//! the field comes first and each byte is filled from its most significant
//! bit; with [little endian](Endianness::Little) the least significant bit
//! comes first and each byte is filled from its least significant bit. For
//! example, writing the 3-bit value `0b101` and then the 5-bit value
//! `0b10001` yields the byte `0b101_10001` in big endian and
//! `0b10001_101` in little endian.
//!
//! Writes are read-modify-write: bits of the first and last byte that are
//! not part of the field are preserved.
//!
//! Besides the canonical methods [`BitsRead::read_bits_with`] and
//! [`BitsWrite::write_bits_with`], both traits provide fixed-width aliases
//! such as `read_bit7`, `read_ubit7`, `read_ubit7_be`, `write_bit12_le`.

use crate::error::{Error, Result};
use crate::impls::Position;
use crate::traits::*;

/// Maximum width of a bit field.
pub const MAX_BITS: usize = 32;

/// Return the error for a width outside `1..=MAX_BITS`, if any.
#[inline(always)]
fn check_width(width: usize) -> Option<Error> {
    if width == 0 || width > MAX_BITS {
        Some(Error::InvalidWidth {
            what: "bit width (must be in [1, 32])",
            width: width as u64,
        })
    } else {
        None
    }
}

/// The admissible range of a `width`-bit field.
#[inline]
pub(crate) fn bit_range(width: usize, unsigned: bool) -> (i64, i64) {
    if unsigned {
        (0, (1_i64 << width) - 1)
    } else {
        (-(1_i64 << (width - 1)), (1_i64 << (width - 1)) - 1)
    }
}

#[inline(always)]
fn mask(n: usize) -> u8 {
    ((1_u16 << n) - 1) as u8
}

/// Number of bytes touched by a `width`-bit field starting at in-byte
/// offset `bit`.
#[inline(always)]
fn touched_bytes(bit: u8, width: usize) -> usize {
    (bit as usize + width).div_ceil(8)
}

/// Extract a `width`-bit field starting at in-byte offset `bit` of `bytes[0]`.
fn unpack(bytes: &[u8], bit: u8, width: usize, endian: Endianness) -> u32 {
    let mut value = 0_u32;
    let mut in_byte = bit as usize;
    let mut done = 0;
    for &byte in bytes {
        if done == width {
            break;
        }
        let take = (8 - in_byte).min(width - done);
        let chunk = match endian {
            Endianness::Big => (byte >> (8 - in_byte - take)) & mask(take),
            Endianness::Little => (byte >> in_byte) & mask(take),
        } as u32;
        value = match endian {
            Endianness::Big => (value << take) | chunk,
            Endianness::Little => value | (chunk << done),
        };
        done += take;
        in_byte = 0;
    }
    value
}

/// Store the lowest `width` bits of `value` starting at in-byte offset
/// `bit` of `bytes[0]`, preserving the other bits.
fn pack(bytes: &mut [u8], bit: u8, width: usize, value: u32, endian: Endianness) {
    let mut in_byte = bit as usize;
    let mut left = width;
    for byte in bytes.iter_mut() {
        if left == 0 {
            break;
        }
        let take = (8 - in_byte).min(left);
        let (chunk, shift) = match endian {
            Endianness::Big => (
                ((value >> (left - take)) as u8) & mask(take),
                8 - in_byte - take,
            ),
            Endianness::Little => (
                ((value >> (width - left)) as u8) & mask(take),
                in_byte,
            ),
        };
        *byte = (*byte & !(mask(take) << shift)) | (chunk << shift);
        left -= take;
        in_byte = 0;
    }
}

macro_rules! bit_read_aliases {
    ($($n:literal),*) => {
        paste::paste! {
            $(
                #[doc = "Read a signed " $n "-bit field with the default endianness."]
                #[inline]
                fn [<read_bit $n>](&mut self) -> Result<i64> {
                    self.read_bits($n, false)
                }

                #[doc = "Read an unsigned " $n "-bit field with the default endianness."]
                #[inline]
                fn [<read_ubit $n>](&mut self) -> Result<i64> {
                    self.read_bits($n, true)
                }

                #[inline]
                fn [<read_bit $n _be>](&mut self) -> Result<i64> {
                    self.read_bits_with($n, false, Endianness::Big)
                }

                #[inline]
                fn [<read_ubit $n _be>](&mut self) -> Result<i64> {
                    self.read_bits_with($n, true, Endianness::Big)
                }

                #[inline]
                fn [<read_bit $n _le>](&mut self) -> Result<i64> {
                    self.read_bits_with($n, false, Endianness::Little)
                }

                #[inline]
                fn [<read_ubit $n _le>](&mut self) -> Result<i64> {
                    self.read_bits_with($n, true, Endianness::Little)
                }
            )*
        }
    };
}

macro_rules! bit_write_aliases {
    ($($n:literal),*) => {
        paste::paste! {
            $(
                #[doc = "Write a signed " $n "-bit field with the default endianness."]
                #[inline]
                fn [<write_bit $n>](&mut self, value: i64) -> Result<()> {
                    self.write_bits(value, $n, false)
                }

                #[doc = "Write an unsigned " $n "-bit field with the default endianness."]
                #[inline]
                fn [<write_ubit $n>](&mut self, value: i64) -> Result<()> {
                    self.write_bits(value, $n, true)
                }

                #[inline]
                fn [<write_bit $n _be>](&mut self, value: i64) -> Result<()> {
                    self.write_bits_with(value, $n, false, Endianness::Big)
                }

                #[inline]
                fn [<write_ubit $n _be>](&mut self, value: i64) -> Result<()> {
                    self.write_bits_with(value, $n, true, Endianness::Big)
                }

                #[inline]
                fn [<write_bit $n _le>](&mut self, value: i64) -> Result<()> {
                    self.write_bits_with(value, $n, false, Endianness::Little)
                }

                #[inline]
                fn [<write_ubit $n _le>](&mut self, value: i64) -> Result<()> {
                    self.write_bits_with(value, $n, true, Endianness::Little)
                }
            )*
        }
    };
}

/// Trait for reading bit fields.
///
/// This trait is implemented for every [`BinAccess`].
pub trait BitsRead: BinAccess {
    /// Read a `width`-bit field with the given endianness and advance by
    /// exactly `width` bits.
    ///
    /// Signed fields are sign-extended from bit `width - 1`.
    fn read_bits_with(&mut self, width: usize, unsigned: bool, endian: Endianness) -> Result<i64> {
        if let Some(err) = check_width(width) {
            return self.fail(err);
        }
        let pos = self.position();
        let len = touched_bytes(pos.bit(), width);
        self.ensure_range(pos.byte(), len as u64)?;
        let mut buf = [0_u8; 5];
        self.load(pos.byte(), &mut buf[..len])?;
        let raw = unpack(&buf[..len], pos.bit(), width, endian) as i64;
        self.set_position(Position::from_bits(pos.abs_bits() + width as u64));
        Ok(if !unsigned && (raw >> (width - 1)) & 1 == 1 {
            raw - (1_i64 << width)
        } else {
            raw
        })
    }

    /// Read a `width`-bit field with the default endianness.
    #[inline]
    fn read_bits(&mut self, width: usize, unsigned: bool) -> Result<i64> {
        let endian = self.endian();
        self.read_bits_with(width, unsigned, endian)
    }

    /// Read a single bit.
    #[inline]
    fn read_bit(&mut self) -> Result<bool> {
        self.read_bits(1, true).map(|b| b == 1)
    }

    /// Read a `width`-bit field without moving the cursor.
    fn peek_bits_with(&mut self, width: usize, unsigned: bool, endian: Endianness) -> Result<i64> {
        let pos = self.position();
        let res = self.read_bits_with(width, unsigned, endian);
        self.set_position(pos);
        res
    }

    bit_read_aliases!(
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
        26, 27, 28, 29, 30, 31, 32
    );
}

/// Trait for writing bit fields.
///
/// This trait is implemented for every [`BinAccess`].
pub trait BitsWrite: BinAccess {
    /// Write `value` as a `width`-bit field with the given endianness and
    /// advance by exactly `width` bits.
    ///
    /// Unsigned values must lie in `[0, 2^width)`, signed values in
    /// `[-2^(width - 1), 2^(width - 1))`.
    fn write_bits_with(
        &mut self,
        value: i64,
        width: usize,
        unsigned: bool,
        endian: Endianness,
    ) -> Result<()> {
        if let Some(err) = check_width(width) {
            return self.fail(err);
        }
        let (min, max) = bit_range(width, unsigned);
        if let Err(err) = Error::check_range(value as i128, min as i128, max as i128) {
            return self.fail(err);
        }
        let pos = self.position();
        let len = touched_bytes(pos.bit(), width);
        self.ensure_range(pos.byte(), len as u64)?;
        let mut buf = [0_u8; 5];
        self.load(pos.byte(), &mut buf[..len])?;
        pack(&mut buf[..len], pos.bit(), width, value as u32, endian);
        self.store(pos.byte(), &buf[..len])?;
        self.set_position(Position::from_bits(pos.abs_bits() + width as u64));
        Ok(())
    }

    /// Write a `width`-bit field with the default endianness.
    #[inline]
    fn write_bits(&mut self, value: i64, width: usize, unsigned: bool) -> Result<()> {
        let endian = self.endian();
        self.write_bits_with(value, width, unsigned, endian)
    }

    /// Write a single bit.
    #[inline]
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as i64, 1, true)
    }

    bit_write_aliases!(
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
        26, 27, 28, 29, 30, 31, 32
    );
}

impl<T: BinAccess + ?Sized> BitsRead for T {}
impl<T: BinAccess + ?Sized> BitsWrite for T {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::impls::BitCursor;

    #[test]
    fn test_pack_layout() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![]);
        cursor.write_bits_with(0b101, 3, true, BE)?;
        cursor.write_bits_with(0b10001, 5, true, BE)?;
        cursor.write_bits_with(0b101, 3, true, LE)?;
        cursor.write_bits_with(0b10001, 5, true, LE)?;
        assert_eq!(cursor.into_vec(), vec![0b101_10001, 0b10001_101]);
        Ok(())
    }

    #[test]
    fn test_cross_byte() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![]);
        cursor.seek(0, 4)?;
        cursor.write_ubit12_be(0xabc)?;
        assert_eq!(cursor.get_ref().as_slice(), &[0x0a, 0xbc]);
        cursor.rewind();
        cursor.seek(0, 4)?;
        assert_eq!(cursor.read_ubit12_be()?, 0xabc);

        let mut cursor = BitCursor::from_vec(vec![]);
        cursor.seek(0, 4)?;
        cursor.write_ubit12_le(0xabc)?;
        assert_eq!(cursor.get_ref().as_slice(), &[0xc0, 0xab]);
        cursor.seek(0, 4)?;
        assert_eq!(cursor.read_ubit12_le()?, 0xabc);
        Ok(())
    }

    #[test]
    fn test_preserves_neighbours() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![0xff, 0xff]);
        cursor.seek(0, 6)?;
        cursor.write_ubit4_be(0)?;
        assert_eq!(cursor.get_ref().as_slice(), &[0b1111_1100, 0b0011_1111]);
        assert_eq!((cursor.offset(), cursor.bit_offset()), (1, 2));
        Ok(())
    }

    #[test]
    fn test_sign_extension() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![0b1110_0000]);
        assert_eq!(cursor.read_bit3_be()?, -1);
        cursor.rewind();
        assert_eq!(cursor.read_ubit3_be()?, 7);
        let mut cursor = BitCursor::from_vec(vec![0xff; 4]);
        assert_eq!(cursor.read_bit32()?, -1);
        cursor.rewind();
        assert_eq!(cursor.read_ubit32()?, u32::MAX as i64);
        Ok(())
    }

    #[test]
    fn test_errors() {
        let mut cursor = BitCursor::from_vec(vec![]);
        assert!(matches!(
            cursor.write_bits(0, 0, true),
            Err(Error::InvalidWidth { width: 0, .. })
        ));
        assert!(matches!(
            cursor.read_bits(33, true),
            Err(Error::InvalidWidth { width: 33, .. })
        ));
        assert!(matches!(
            cursor.write_ubit4(16),
            Err(Error::ValueRange {
                value: 16,
                min: 0,
                max: 15
            })
        ));
        assert!(matches!(
            cursor.write_bit4(-9),
            Err(Error::ValueRange {
                value: -9,
                min: -8,
                max: 7
            })
        ));
        // nothing was touched
        assert_eq!(cursor.size(), 0);
        assert_eq!(cursor.abs_bit_offset(), 0);
    }

    #[test]
    fn test_peek() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![0b1010_0000]);
        assert_eq!(cursor.peek_bits_with(2, true, BE)?, 0b10);
        assert_eq!(cursor.abs_bit_offset(), 0);
        assert!(cursor.read_bit()?);
        Ok(())
    }
}

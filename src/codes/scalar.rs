/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Fixed-width integers and floats.
//!
//! Scalars are byte-granular: if the cursor is in the middle of a byte,
//! the access starts at the next whole byte (see
//! [`BinAccess::byte_start`]) and the abandoned bits are left untouched.
//!
//! Every type has a method using the default endianness and two with an
//! explicit one, e.g., [`read_u32`](ScalarRead::read_u32),
//! [`read_u32_be`](ScalarRead::read_u32_be) and
//! [`read_u32_le`](ScalarRead::read_u32_le). Half-precision floats are
//! exchanged as `f32` (see [`half`](super::half)). Conventional names are
//! available as aliases:
//!
//! | Alias | Type |
//! |-------|------|
//! | `byte` | `i8` |
//! | `ubyte` | `u8` |
//! | `short`, `word` | `i16` |
//! | `ushort`, `uword` | `u16` |
//! | `long`, `dword` | `i32` |
//! | `ulong`, `udword` | `u32` |
//! | `quad`, `qword` | `i64` |
//! | `uquad`, `uqword` | `u64` |
//! | `half` | binary16 as `f32` |
//! | `float` | `f32` |
//! | `double` | `f64` |
//!
//! Callers holding a width at runtime can use
//! [`read_int`](ScalarRead::read_int) and
//! [`write_int`](ScalarWrite::write_int).

use num_traits::{FromBytes, ToBytes};

use super::half::{f16_to_f32, f32_to_f16};
use crate::error::{Error, Result};
use crate::traits::*;

/// The admissible range of a `bytes`-byte integer, or `None` if `bytes` is
/// not 1, 2, 4 or 8.
pub(crate) fn int_range(bytes: usize, unsigned: bool) -> Option<(i128, i128)> {
    if !matches!(bytes, 1 | 2 | 4 | 8) {
        return None;
    }
    let bits = 8 * bytes as u32;
    Some(if unsigned {
        (0, (1_i128 << bits) - 1)
    } else {
        (-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1)
    })
}

#[inline(always)]
fn invalid_bytes(bytes: usize) -> Error {
    Error::InvalidWidth {
        what: "integer width in bytes (must be 1, 2, 4 or 8)",
        width: bytes as u64,
    }
}

macro_rules! scalar_read_methods {
    ($($ty:ident: $n:literal),*) => {
        paste::paste! {
            $(
                #[doc = "Read a `" $ty "` with the default endianness."]
                #[inline]
                fn [<read_ $ty>](&mut self) -> Result<$ty> {
                    let endian = self.endian();
                    self.read_scalar_with::<$ty, $n>(endian)
                }

                #[doc = "Read a big-endian `" $ty "`."]
                #[inline]
                fn [<read_ $ty _be>](&mut self) -> Result<$ty> {
                    self.read_scalar_with::<$ty, $n>(Endianness::Big)
                }

                #[doc = "Read a little-endian `" $ty "`."]
                #[inline]
                fn [<read_ $ty _le>](&mut self) -> Result<$ty> {
                    self.read_scalar_with::<$ty, $n>(Endianness::Little)
                }
            )*
        }
    };
}

macro_rules! scalar_write_methods {
    ($($ty:ident: $n:literal),*) => {
        paste::paste! {
            $(
                #[doc = "Write a `" $ty "` with the default endianness."]
                #[inline]
                fn [<write_ $ty>](&mut self, value: $ty) -> Result<()> {
                    let endian = self.endian();
                    self.write_scalar_with::<$ty, $n>(value, endian)
                }

                #[doc = "Write a big-endian `" $ty "`."]
                #[inline]
                fn [<write_ $ty _be>](&mut self, value: $ty) -> Result<()> {
                    self.write_scalar_with::<$ty, $n>(value, Endianness::Big)
                }

                #[doc = "Write a little-endian `" $ty "`."]
                #[inline]
                fn [<write_ $ty _le>](&mut self, value: $ty) -> Result<()> {
                    self.write_scalar_with::<$ty, $n>(value, Endianness::Little)
                }
            )*
        }
    };
}

macro_rules! scalar_read_aliases {
    ($($alias:ident => $canon:ident: $ty:ty),*) => {
        paste::paste! {
            $(
                #[doc = "Alias for [`read_" $canon "`](ScalarRead::read_" $canon ")."]
                #[inline]
                fn [<read_ $alias>](&mut self) -> Result<$ty> {
                    self.[<read_ $canon>]()
                }

                #[doc = "Alias for [`read_" $canon "_be`](ScalarRead::read_" $canon "_be)."]
                #[inline]
                fn [<read_ $alias _be>](&mut self) -> Result<$ty> {
                    self.[<read_ $canon _be>]()
                }

                #[doc = "Alias for [`read_" $canon "_le`](ScalarRead::read_" $canon "_le)."]
                #[inline]
                fn [<read_ $alias _le>](&mut self) -> Result<$ty> {
                    self.[<read_ $canon _le>]()
                }
            )*
        }
    };
}

macro_rules! scalar_write_aliases {
    ($($alias:ident => $canon:ident: $ty:ty),*) => {
        paste::paste! {
            $(
                #[doc = "Alias for [`write_" $canon "`](ScalarWrite::write_" $canon ")."]
                #[inline]
                fn [<write_ $alias>](&mut self, value: $ty) -> Result<()> {
                    self.[<write_ $canon>](value)
                }

                #[doc = "Alias for [`write_" $canon "_be`](ScalarWrite::write_" $canon "_be)."]
                #[inline]
                fn [<write_ $alias _be>](&mut self, value: $ty) -> Result<()> {
                    self.[<write_ $canon _be>](value)
                }

                #[doc = "Alias for [`write_" $canon "_le`](ScalarWrite::write_" $canon "_le)."]
                #[inline]
                fn [<write_ $alias _le>](&mut self, value: $ty) -> Result<()> {
                    self.[<write_ $canon _le>](value)
                }
            )*
        }
    };
}

/// Trait for reading fixed-width scalars.
///
/// This trait is implemented for every [`BinAccess`].
pub trait ScalarRead: BinAccess {
    /// Read any primitive whose byte representation has `N` bytes.
    ///
    /// ```
    /// use bit_cursor::prelude::*;
    ///
    /// let mut cursor = BitCursor::from_vec(vec![0, 0, 0x80, 0x3f]);
    /// assert_eq!(cursor.read_scalar_with::<f32, 4>(LE).unwrap(), 1.0);
    /// ```
    fn read_scalar_with<T, const N: usize>(&mut self, endian: Endianness) -> Result<T>
    where
        T: FromBytes<Bytes = [u8; N]>,
    {
        let mut buf = [0_u8; N];
        self.get_bytes(&mut buf)?;
        Ok(match endian {
            Endianness::Big => T::from_be_bytes(&buf),
            Endianness::Little => T::from_le_bytes(&buf),
        })
    }

    /// Read an integer of `bytes` bytes (1, 2, 4 or 8) with the given
    /// signedness and endianness.
    fn read_int(&mut self, bytes: usize, unsigned: bool, endian: Endianness) -> Result<i128> {
        Ok(match (bytes, unsigned) {
            (1, true) => self.read_scalar_with::<u8, 1>(endian)? as i128,
            (1, false) => self.read_scalar_with::<i8, 1>(endian)? as i128,
            (2, true) => self.read_scalar_with::<u16, 2>(endian)? as i128,
            (2, false) => self.read_scalar_with::<i16, 2>(endian)? as i128,
            (4, true) => self.read_scalar_with::<u32, 4>(endian)? as i128,
            (4, false) => self.read_scalar_with::<i32, 4>(endian)? as i128,
            (8, true) => self.read_scalar_with::<u64, 8>(endian)? as i128,
            (8, false) => self.read_scalar_with::<i64, 8>(endian)? as i128,
            _ => return self.fail(invalid_bytes(bytes)),
        })
    }

    /// Read a binary16 float with the given endianness.
    #[inline]
    fn read_f16_with(&mut self, endian: Endianness) -> Result<f32> {
        self.read_scalar_with::<u16, 2>(endian).map(f16_to_f32)
    }

    /// Read a binary16 float with the default endianness.
    #[inline]
    fn read_f16(&mut self) -> Result<f32> {
        let endian = self.endian();
        self.read_f16_with(endian)
    }

    #[inline]
    fn read_f16_be(&mut self) -> Result<f32> {
        self.read_f16_with(Endianness::Big)
    }

    #[inline]
    fn read_f16_le(&mut self) -> Result<f32> {
        self.read_f16_with(Endianness::Little)
    }

    scalar_read_methods!(
        u8: 1, i8: 1, u16: 2, i16: 2, u32: 4, i32: 4, u64: 8, i64: 8, f32: 4, f64: 8
    );

    scalar_read_aliases!(
        byte => i8: i8,
        ubyte => u8: u8,
        short => i16: i16,
        word => i16: i16,
        ushort => u16: u16,
        uword => u16: u16,
        long => i32: i32,
        dword => i32: i32,
        ulong => u32: u32,
        udword => u32: u32,
        quad => i64: i64,
        qword => i64: i64,
        uquad => u64: u64,
        uqword => u64: u64,
        half => f16: f32,
        float => f32: f32,
        double => f64: f64
    );
}

/// Trait for writing fixed-width scalars.
///
/// This trait is implemented for every [`BinAccess`].
pub trait ScalarWrite: BinAccess {
    /// Write any primitive whose byte representation has `N` bytes.
    fn write_scalar_with<T, const N: usize>(&mut self, value: T, endian: Endianness) -> Result<()>
    where
        T: ToBytes<Bytes = [u8; N]>,
    {
        let buf = match endian {
            Endianness::Big => value.to_be_bytes(),
            Endianness::Little => value.to_le_bytes(),
        };
        self.put_bytes(&buf)
    }

    /// Write `value` as an integer of `bytes` bytes (1, 2, 4 or 8) with the
    /// given signedness and endianness.
    ///
    /// ```
    /// use bit_cursor::prelude::*;
    ///
    /// let mut cursor = BitCursor::from_vec(vec![]);
    /// cursor.write_int(-2, 2, false, BE).unwrap();
    /// assert_eq!(cursor.get_ref().as_slice(), &[0xff, 0xfe]);
    /// assert!(cursor.write_int(256, 1, true, BE).is_err());
    /// ```
    fn write_int(
        &mut self,
        value: i128,
        bytes: usize,
        unsigned: bool,
        endian: Endianness,
    ) -> Result<()> {
        let Some((min, max)) = int_range(bytes, unsigned) else {
            return self.fail(invalid_bytes(bytes));
        };
        if let Err(err) = Error::check_range(value, min, max) {
            return self.fail(err);
        }
        // the value fits, so truncating to the width keeps it intact
        match bytes {
            1 => self.write_scalar_with::<u8, 1>(value as u8, endian),
            2 => self.write_scalar_with::<u16, 2>(value as u16, endian),
            4 => self.write_scalar_with::<u32, 4>(value as u32, endian),
            _ => self.write_scalar_with::<u64, 8>(value as u64, endian),
        }
    }

    /// Write `value` as a binary16 float with the given endianness,
    /// rounding to nearest, ties to even.
    #[inline]
    fn write_f16_with(&mut self, value: f32, endian: Endianness) -> Result<()> {
        self.write_scalar_with::<u16, 2>(f32_to_f16(value), endian)
    }

    /// Write a binary16 float with the default endianness.
    #[inline]
    fn write_f16(&mut self, value: f32) -> Result<()> {
        let endian = self.endian();
        self.write_f16_with(value, endian)
    }

    #[inline]
    fn write_f16_be(&mut self, value: f32) -> Result<()> {
        self.write_f16_with(value, Endianness::Big)
    }

    #[inline]
    fn write_f16_le(&mut self, value: f32) -> Result<()> {
        self.write_f16_with(value, Endianness::Little)
    }

    scalar_write_methods!(
        u8: 1, i8: 1, u16: 2, i16: 2, u32: 4, i32: 4, u64: 8, i64: 8, f32: 4, f64: 8
    );

    scalar_write_aliases!(
        byte => i8: i8,
        ubyte => u8: u8,
        short => i16: i16,
        word => i16: i16,
        ushort => u16: u16,
        uword => u16: u16,
        long => i32: i32,
        dword => i32: i32,
        ulong => u32: u32,
        udword => u32: u32,
        quad => i64: i64,
        qword => i64: i64,
        uquad => u64: u64,
        uqword => u64: u64,
        half => f16: f32,
        float => f32: f32,
        double => f64: f64
    );
}

impl<T: BinAccess + ?Sized> ScalarRead for T {}
impl<T: BinAccess + ?Sized> ScalarWrite for T {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codes::BitsWrite;
    use crate::impls::BitCursor;

    #[test]
    fn test_layout() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![]);
        cursor.write_u32_be(0x0102_0304)?;
        cursor.write_u32_le(0x0102_0304)?;
        cursor.write_i16_be(-2)?;
        cursor.write_u8(0xaa)?;
        assert_eq!(
            cursor.get_ref().as_slice(),
            &[1, 2, 3, 4, 4, 3, 2, 1, 0xff, 0xfe, 0xaa]
        );
        cursor.rewind();
        assert_eq!(cursor.read_u32_be()?, 0x0102_0304);
        assert_eq!(cursor.read_u32_le()?, 0x0102_0304);
        assert_eq!(cursor.read_i16_be()?, -2);
        assert_eq!(cursor.read_u8()?, 0xaa);
        Ok(())
    }

    #[test]
    fn test_default_endianness() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![]);
        cursor.write_ushort(0x1234)?;
        cursor.set_endian(BE);
        cursor.write_ushort(0x1234)?;
        assert_eq!(cursor.get_ref().as_slice(), &[0x34, 0x12, 0x12, 0x34]);
        Ok(())
    }

    #[test]
    fn test_floats() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![]);
        cursor.write_double_be(f64::NEG_INFINITY)?;
        cursor.write_float_le(f32::MIN_POSITIVE / 2.0)?;
        cursor.write_half_be(-1.5)?;
        cursor.write_f32(f32::NAN)?;
        assert_eq!(&cursor.get_ref().as_slice()[12..14], &[0xbe, 0x00]);
        cursor.rewind();
        assert_eq!(cursor.read_double_be()?, f64::NEG_INFINITY);
        assert_eq!(cursor.read_float_le()?, f32::MIN_POSITIVE / 2.0);
        assert_eq!(cursor.read_half_be()?, -1.5);
        assert!(cursor.read_f32()?.is_nan());
        Ok(())
    }

    #[test]
    fn test_dynamic() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![]);
        for (bytes, unsigned) in [(1, true), (2, false), (4, true), (8, false)] {
            let (min, max) = int_range(bytes, unsigned).unwrap();
            cursor.write_int(min, bytes, unsigned, BE)?;
            cursor.write_int(max, bytes, unsigned, LE)?;
        }
        cursor.rewind();
        for (bytes, unsigned) in [(1, true), (2, false), (4, true), (8, false)] {
            let (min, max) = int_range(bytes, unsigned).unwrap();
            assert_eq!(cursor.read_int(bytes, unsigned, BE)?, min);
            assert_eq!(cursor.read_int(bytes, unsigned, LE)?, max);
        }
        assert!(matches!(
            cursor.read_int(3, true, BE),
            Err(Error::InvalidWidth { width: 3, .. })
        ));
        assert!(matches!(
            cursor.write_int(-129, 1, false, BE),
            Err(Error::ValueRange { min: -128, .. })
        ));
        assert!(matches!(
            cursor.write_int(1 << 64, 8, true, BE),
            Err(Error::ValueRange { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_byte_resume() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![0b0001_1111, 0]);
        cursor.write_ubit3_be(0b101)?;
        cursor.write_u8(0x42)?;
        assert_eq!(cursor.get_ref().as_slice(), &[0b1011_1111, 0x42]);
        assert_eq!((cursor.offset(), cursor.bit_offset()), (2, 0));
        Ok(())
    }
}

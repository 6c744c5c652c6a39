/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Forward searches.
//!
//! Searches scan from the byte at which the next byte-granular access
//! would start to the end of the buffer, and return the absolute byte
//! offset of the first match. They never move the cursor and never grow
//! the buffer.

use num_traits::ToBytes;

use crate::codes::scalar::int_range;
use crate::error::{Error, Result};
use crate::impls::BitCursor;
use crate::impls::regions::CHUNK;
use crate::traits::*;

macro_rules! find_methods {
    ($($ty:ident),*) => {
        paste::paste! {
            $(
                #[doc = "Find the first occurrence of a `" $ty "` with the given endianness."]
                #[inline]
                pub fn [<find_ $ty>](&mut self, value: $ty, endian: Endianness) -> Result<Option<u64>> {
                    self.find_scalar(value, endian)
                }
            )*
        }
    };
}

impl<S: ByteStore> BitCursor<S> {
    /// Find the first occurrence of `pattern`.
    ///
    /// An empty pattern matches at the cursor.
    ///
    /// ```
    /// use bit_cursor::prelude::*;
    ///
    /// let mut cursor = BitCursor::from_vec(b"abcabc".to_vec());
    /// assert_eq!(cursor.find_bytes(b"ca").unwrap(), Some(2));
    /// cursor.seek(3, 0).unwrap();
    /// assert_eq!(cursor.find_bytes(b"ab").unwrap(), Some(3));
    /// assert_eq!(cursor.find_bytes(b"ca").unwrap(), None);
    /// ```
    pub fn find_bytes(&mut self, pattern: &[u8]) -> Result<Option<u64>> {
        let start = self.byte_start();
        let size = self.size();
        if pattern.is_empty() {
            return Ok((start <= size).then_some(start));
        }
        // consecutive windows overlap so that matches across chunk
        // boundaries are found
        let overlap = pattern.len() - 1;
        let mut buf = Vec::new();
        let mut pos = start;
        while pos < size {
            let n = (size - pos).min((CHUNK + overlap) as u64) as usize;
            if n < pattern.len() {
                break;
            }
            buf.resize(n, 0);
            self.load(pos, &mut buf)?;
            if let Some(i) = buf.windows(pattern.len()).position(|w| w == pattern) {
                return Ok(Some(pos + i as u64));
            }
            pos += (n - overlap) as u64;
        }
        Ok(None)
    }

    /// Find the first occurrence of the UTF-8 bytes of `s`.
    #[inline]
    pub fn find_str(&mut self, s: &str) -> Result<Option<u64>> {
        self.find_bytes(s.as_bytes())
    }

    /// Find the first occurrence of any primitive encoded with the given
    /// endianness.
    pub fn find_scalar<T: ToBytes>(&mut self, value: T, endian: Endianness) -> Result<Option<u64>> {
        match endian {
            Endianness::Big => self.find_bytes(value.to_be_bytes().as_ref()),
            Endianness::Little => self.find_bytes(value.to_le_bytes().as_ref()),
        }
    }

    /// Find the first occurrence of `value` encoded as an integer of
    /// `bytes` bytes (1, 2, 4 or 8) with the given signedness and
    /// endianness.
    pub fn find_int(
        &mut self,
        value: i128,
        bytes: usize,
        unsigned: bool,
        endian: Endianness,
    ) -> Result<Option<u64>> {
        let Some((min, max)) = int_range(bytes, unsigned) else {
            return self.fail(Error::InvalidWidth {
                what: "integer width in bytes (must be 1, 2, 4 or 8)",
                width: bytes as u64,
            });
        };
        if let Err(err) = Error::check_range(value, min, max) {
            return self.fail(err);
        }
        // two's complement truncation of a value in range
        let encoded = value.to_le_bytes();
        let mut pattern = encoded[..bytes].to_vec();
        if endian.is_big() {
            pattern.reverse();
        }
        self.find_bytes(&pattern)
    }

    find_methods!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);
}

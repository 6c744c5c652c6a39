/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bulk byte-wise transforms over ranges.
//!
//! All transforms go through [`BitCursor::transform`], which ensures the
//! end of the range once and then rewrites it chunk by chunk, so that
//! large file-backed ranges do not need to be loaded in memory.

use core::ops::RangeBounds;

use crate::error::{Error, Result};
use crate::impls::regions::CHUNK;
use crate::impls::{BitCursor, Position};
use crate::traits::*;

/// The key of a bitwise operation: a single byte, or a pattern repeated
/// cyclically over the range.
///
/// Strings are used through their UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Byte(u8),
    Pattern(Vec<u8>),
}

impl Key {
    /// The key byte applied at `index` bytes from the start of the range.
    #[inline(always)]
    fn at(&self, index: u64) -> u8 {
        match self {
            Key::Byte(b) => *b,
            Key::Pattern(p) => p[(index % p.len() as u64) as usize],
        }
    }
}

impl From<u8> for Key {
    fn from(b: u8) -> Self {
        Key::Byte(b)
    }
}

impl From<&[u8]> for Key {
    fn from(p: &[u8]) -> Self {
        Key::Pattern(p.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Key {
    fn from(p: &[u8; N]) -> Self {
        Key::Pattern(p.to_vec())
    }
}

impl From<Vec<u8>> for Key {
    fn from(p: Vec<u8>) -> Self {
        Key::Pattern(p)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Pattern(s.as_bytes().to_vec())
    }
}

impl<S: ByteStore> BitCursor<S> {
    /// Replace each byte `b` of a range with `f(i, b)`, where `i` is the
    /// index of the byte from the start of the range.
    ///
    /// If `consume` is true, the cursor moves to the end of the range.
    ///
    /// ```
    /// use bit_cursor::prelude::*;
    ///
    /// let mut cursor = BitCursor::from_vec(vec![1, 2, 3, 4]);
    /// cursor.transform(1..3, false, |i, b| b * 10 + i as u8).unwrap();
    /// assert_eq!(cursor.into_vec(), vec![1, 20, 31, 4]);
    /// ```
    pub fn transform(
        &mut self,
        range: impl RangeBounds<u64>,
        consume: bool,
        mut f: impl FnMut(u64, u8) -> u8,
    ) -> Result<()> {
        let (start, end) = self.checked_range(range)?;
        let len = end - start;
        self.ensure_range(start, len)?;
        let mut buf = vec![0_u8; (CHUNK as u64).min(len) as usize];
        let mut done = 0;
        while done < len {
            let n = (len - done).min(CHUNK as u64) as usize;
            let chunk = &mut buf[..n];
            self.load(start + done, chunk)?;
            for (i, b) in chunk.iter_mut().enumerate() {
                *b = f(done + i as u64, *b);
            }
            self.store(start + done, chunk)?;
            done += n as u64;
        }
        if consume {
            self.set_position(Position::new(end, 0));
        }
        Ok(())
    }

    fn with_key(
        &mut self,
        key: Key,
        range: impl RangeBounds<u64>,
        consume: bool,
        op: impl Fn(u8, u8) -> u8,
    ) -> Result<()> {
        if matches!(&key, Key::Pattern(p) if p.is_empty()) {
            return self.fail(Error::InvalidWidth {
                what: "key length",
                width: 0,
            });
        }
        self.transform(range, consume, |i, b| op(b, key.at(i)))
    }

    /// Bitwise AND of a range with a key.
    pub fn and(&mut self, key: impl Into<Key>, range: impl RangeBounds<u64>, consume: bool) -> Result<()> {
        self.with_key(key.into(), range, consume, |b, k| b & k)
    }

    /// Bitwise OR of a range with a key.
    pub fn or(&mut self, key: impl Into<Key>, range: impl RangeBounds<u64>, consume: bool) -> Result<()> {
        self.with_key(key.into(), range, consume, |b, k| b | k)
    }

    /// Bitwise XOR of a range with a key.
    ///
    /// ```
    /// use bit_cursor::prelude::*;
    ///
    /// let mut cursor = BitCursor::from_vec(b"abcd".to_vec());
    /// cursor.xor(b"\x20\x00", .., false).unwrap();
    /// assert_eq!(cursor.get_ref().as_slice(), b"AbCd");
    /// ```
    pub fn xor(&mut self, key: impl Into<Key>, range: impl RangeBounds<u64>, consume: bool) -> Result<()> {
        self.with_key(key.into(), range, consume, |b, k| b ^ k)
    }

    /// Bitwise NOT of a range.
    pub fn not(&mut self, range: impl RangeBounds<u64>, consume: bool) -> Result<()> {
        self.transform(range, consume, |_, b| !b)
    }

    /// Shift every byte of a range left by `bits`; bits do not carry
    /// between bytes, and shifts of 8 or more clear the bytes.
    pub fn shl(&mut self, bits: u32, range: impl RangeBounds<u64>, consume: bool) -> Result<()> {
        self.transform(range, consume, |_, b| b.checked_shl(bits).unwrap_or(0))
    }

    /// Shift every byte of a range right by `bits`; bits do not carry
    /// between bytes, and shifts of 8 or more clear the bytes.
    pub fn shr(&mut self, bits: u32, range: impl RangeBounds<u64>, consume: bool) -> Result<()> {
        self.transform(range, consume, |_, b| b.checked_shr(bits).unwrap_or(0))
    }
}

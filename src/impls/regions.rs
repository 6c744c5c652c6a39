/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Byte-range edits.
//!
//! Ranges are byte ranges in the usual Rust syntax; an unbounded start
//! means the byte at which the next byte-granular access would start, and
//! an unbounded end means the end of the buffer. Structural edits (those
//! that move the tail of the buffer) are refused by strict cursors with
//! [`Error::StrictResize`].

use core::ops::RangeBounds;

use crate::error::{Error, Result};
use crate::impls::position::checked_end;
use crate::impls::{BitCursor, Position};
use crate::traits::*;

/// Size of the buffer used when moving or scanning large regions.
pub(crate) const CHUNK: usize = 1 << 16;

impl<S: ByteStore> BitCursor<S> {
    /// Route the error of a direct store operation through the failure hook.
    fn checked<T>(&mut self, res: Result<T>) -> Result<T> {
        match res {
            Ok(value) => Ok(value),
            Err(err) => self.fail(err),
        }
    }

    fn refuse_if_strict(&mut self, operation: &'static str) -> Result<()> {
        if self.strict() {
            return self.fail(Error::StrictResize { operation });
        }
        Ok(())
    }

    /// Move the cursor back to the end of the buffer if it lies beyond it.
    fn clamp_position(&mut self) {
        let size = self.size();
        if self.position().end_byte() > size {
            self.set_position(Position::new(size, 0));
        }
    }

    /// Copy `len` bytes from `from` to `to`, chunk by chunk, in the order
    /// that is safe for overlapping regions.
    fn move_bytes(&mut self, from: u64, to: u64, len: u64) -> Result<()> {
        let mut buf = vec![0_u8; (CHUNK as u64).min(len) as usize];
        let mut done = 0;
        while done < len {
            let n = (len - done).min(CHUNK as u64);
            // moving right starts from the tail
            let offset = if to > from { len - done - n } else { done };
            let chunk = &mut buf[..n as usize];
            self.load(from + offset, chunk)?;
            self.store(to + offset, chunk)?;
            done += n;
        }
        Ok(())
    }

    /// Return a copy of a byte range.
    ///
    /// The end of the range is ensured, so extracting past the end grows
    /// the buffer (or fails in strict mode). If `consume` is true, the
    /// cursor moves to the end of the range.
    pub fn extract(&mut self, range: impl RangeBounds<u64>, consume: bool) -> Result<Vec<u8>> {
        let (start, end) = self.checked_range(range)?;
        self.ensure_range(start, end - start)?;
        let mut data = vec![0_u8; (end - start) as usize];
        self.load(start, &mut data)?;
        if consume {
            self.set_position(Position::new(end, 0));
        }
        Ok(data)
    }

    /// Remove a byte range from the buffer, returning it.
    ///
    /// The bytes after the range move left and the buffer shrinks. If
    /// `consume` is true the cursor moves to the start of the range;
    /// otherwise it stays where it is, unless it now lies past the end of
    /// the buffer, in which case it moves to the end.
    ///
    /// ```
    /// use bit_cursor::prelude::*;
    ///
    /// let mut cursor = BitCursor::from_vec((0..10).collect());
    /// let removed = cursor.delete(2..5, false).unwrap();
    /// assert_eq!(removed, [2, 3, 4]);
    /// assert_eq!(cursor.get_ref().as_slice(), &[0, 1, 5, 6, 7, 8, 9]);
    /// cursor.insert(&removed, Some(2), false).unwrap();
    /// assert_eq!(cursor.into_vec(), (0..10).collect::<Vec<u8>>());
    /// ```
    pub fn delete(&mut self, range: impl RangeBounds<u64>, consume: bool) -> Result<Vec<u8>> {
        self.refuse_if_strict("delete from")?;
        let (start, end) = self.checked_range(range)?;
        let size = self.size();
        if end > size {
            return self.fail(Error::Bounds {
                requested: end,
                available: size,
            });
        }
        let mut removed = vec![0_u8; (end - start) as usize];
        self.load(start, &mut removed)?;
        self.move_bytes(end, start, size - end)?;
        let new_size = size - (end - start);
        let res = self.get_mut().truncate_to(new_size);
        self.checked(res)?;
        tracing::debug!(start, end, new_size, "deleted range");
        if consume {
            self.set_position(Position::new(start, 0));
        } else {
            self.clamp_position();
        }
        Ok(removed)
    }

    /// Insert `data` at a byte offset (by default, the byte at which the
    /// next byte-granular access would start), moving the following bytes
    /// right.
    ///
    /// An offset past the end of the buffer first grows it to the offset.
    /// If `consume` is true, the cursor moves past the inserted bytes.
    pub fn insert(&mut self, data: &[u8], offset: Option<u64>, consume: bool) -> Result<()> {
        self.refuse_if_strict("insert into")?;
        let offset = offset.unwrap_or_else(|| self.byte_start());
        self.ensure_range(offset, 0)?;
        let size = self.size();
        let len = data.len() as u64;
        let Some(new_size) = checked_end(size, len) else {
            return self.fail(Error::Bounds {
                requested: size.saturating_add(len),
                available: size,
            });
        };
        let res = self.get_mut().grow_to(new_size);
        self.checked(res)?;
        self.move_bytes(offset, offset + len, size - offset)?;
        self.store(offset, data)?;
        tracing::debug!(offset, len, new_size, "inserted bytes");
        if consume {
            self.set_position(Position::new(offset + len, 0));
        }
        Ok(())
    }

    /// Overwrite the bytes at a byte offset (by default, the byte at which
    /// the next byte-granular access would start) with `data`.
    ///
    /// Unlike [`insert`](BitCursor::insert), this is not a structural edit:
    /// it grows the buffer only if `data` extends past its end, and it is
    /// allowed in strict mode within the buffer. If `consume` is true, the
    /// cursor moves past the replaced bytes.
    pub fn replace(&mut self, data: &[u8], offset: Option<u64>, consume: bool) -> Result<()> {
        let offset = offset.unwrap_or_else(|| self.byte_start());
        let end = self.ensure_range(offset, data.len() as u64)?;
        self.store(offset, data)?;
        if consume {
            self.set_position(Position::new(end, 0));
        }
        Ok(())
    }

    /// Write `len` copies of `value` at the cursor and advance past them.
    pub fn fill(&mut self, value: u8, len: u64) -> Result<()> {
        let start = self.byte_start();
        let end = self.ensure_range(start, len)?;
        let buf = vec![value; (CHUNK as u64).min(len) as usize];
        let mut done = 0;
        while done < len {
            let n = (len - done).min(CHUNK as u64) as usize;
            self.store(start + done, &buf[..n])?;
            done += n as u64;
        }
        self.set_position(Position::new(end, 0));
        Ok(())
    }

    /// Read `len` bytes at the cursor and advance past them.
    ///
    /// The bytes are ensured before any memory is allocated for them.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let start = self.byte_start();
        self.ensure_range(start, len as u64)?;
        let mut data = vec![0_u8; len];
        self.get_bytes(&mut data)?;
        Ok(data)
    }

    /// Write `data` at the cursor and advance past it.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.put_bytes(data)
    }

    /// Shrink the buffer to `len` bytes; does nothing if it is not longer.
    ///
    /// A cursor past the new end moves to the end.
    pub fn truncate(&mut self, len: u64) -> Result<()> {
        self.refuse_if_strict("truncate")?;
        let size = self.size();
        if len < size {
            let res = self.get_mut().truncate_to(len);
            self.checked(res)?;
            tracing::debug!(from = size, to = len, "truncated store");
            self.clamp_position();
        }
        Ok(())
    }

    pub(crate) fn checked_range(&mut self, range: impl RangeBounds<u64>) -> Result<(u64, u64)> {
        let res = self.resolve_range(range);
        self.checked(res)
    }
}

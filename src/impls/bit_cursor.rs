/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::ops::{Bound, RangeBounds};
use std::path::Path;

use crate::error::{Error, Result};
use crate::impls::{Bounds, CursorOptions, FileStore, MemStore, OpenMode, Position};
use crate::traits::*;
use crate::utils::hexdump;

/// A cursor over a [`ByteStore`] with bit-granular position.
///
/// The cursor owns its store, a [`Position`], a default [`Endianness`] and
/// a [`Bounds`] policy. All codecs are available as methods of the
/// extension traits in [`codes`](crate::codes) (bring them in scope with
/// the [prelude](crate::prelude)); region edits, bulk transforms and
/// searches are inherent methods.
///
/// In non-strict mode every access beyond the end of the store grows it
/// (zero-filled); in strict mode such an access fails with
/// [`Error::Bounds`] and leaves both the store and the position unchanged.
///
/// # Example
/// ```
/// use bit_cursor::prelude::*;
///
/// let mut cursor = BitCursor::from_vec(vec![]);
/// cursor.write_ubit3_be(5).unwrap();
/// cursor.write_ubit5_be(17).unwrap();
/// cursor.write_u16_be(0xcafe).unwrap();
/// assert_eq!(cursor.get_ref().as_slice(), &[0b1011_0001, 0xca, 0xfe]);
///
/// cursor.rewind();
/// assert_eq!(cursor.read_ubit3_be().unwrap(), 5);
/// assert_eq!(cursor.read_ubit5_be().unwrap(), 17);
/// assert_eq!(cursor.read_u16_be().unwrap(), 0xcafe);
/// ```
#[derive(Debug)]
pub struct BitCursor<S: ByteStore> {
    store: S,
    pos: Position,
    endian: Endianness,
    bounds: Bounds,
    dump_on_error: bool,
}

impl<S: ByteStore> BitCursor<S> {
    /// Create a growable, little-endian cursor at the start of `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            pos: Position::default(),
            endian: Endianness::default(),
            bounds: Bounds::default(),
            dump_on_error: false,
        }
    }

    /// Create a cursor with the given options.
    ///
    /// The initial position is reached with [`seek`](BitCursor::seek), so
    /// an offset beyond the end of the store grows it, or fails in strict
    /// mode.
    pub fn with_options(store: S, options: CursorOptions) -> Result<Self> {
        let mut cursor = Self {
            store,
            pos: Position::default(),
            endian: options.endian,
            bounds: Bounds::new(options.strict, options.grow_by),
            dump_on_error: options.dump_on_error,
        };
        cursor.seek(options.byte_offset, options.bit_offset)?;
        Ok(cursor)
    }

    pub fn get_ref(&self) -> &S {
        &self.store
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    #[must_use]
    pub fn strict(&self) -> bool {
        self.bounds.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.bounds.strict = strict;
    }

    #[must_use]
    pub fn grow_by(&self) -> u64 {
        self.bounds.grow_by
    }

    pub fn set_grow_by(&mut self, grow_by: u64) {
        self.bounds.grow_by = grow_by;
    }

    pub fn set_endian(&mut self, endian: Endianness) {
        self.endian = endian;
    }

    pub fn set_dump_on_error(&mut self, dump_on_error: bool) {
        self.dump_on_error = dump_on_error;
    }

    /// The current byte offset.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.pos.byte()
    }

    /// The current bit offset inside the byte at [`offset`](BitCursor::offset).
    #[must_use]
    pub fn bit_offset(&self) -> u8 {
        self.pos.bit()
    }

    /// The current absolute offset in bits.
    #[must_use]
    pub fn abs_bit_offset(&self) -> u64 {
        self.pos.abs_bits()
    }

    /// Number of whole bytes between the cursor and the end of the store.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.store.len().saturating_sub(self.pos.end_byte())
    }

    /// Move to an absolute position.
    ///
    /// The bit offset can be larger than 7, in which case it carries into
    /// the byte offset. A target beyond [`Position::MAX_BYTE`] fails with
    /// [`Error::Bounds`].
    pub fn seek(&mut self, byte: u64, bit: u64) -> Result<()> {
        match Position::checked_new(byte, bit) {
            Some(pos) => self.move_to(pos),
            None => self.out_of_range(byte.saturating_add(bit / 8)),
        }
    }

    /// Move to an absolute bit offset.
    pub fn seek_bits(&mut self, bits: u64) -> Result<()> {
        self.move_to(Position::from_bits(bits))
    }

    /// Move by a signed number of bytes and bits.
    ///
    /// Negative bit deltas borrow from the byte offset, and positions
    /// before the start clamp to zero.
    pub fn skip(&mut self, byte_delta: i64, bit_delta: i64) -> Result<()> {
        match self.pos.offset_by(byte_delta, bit_delta) {
            Some(pos) => self.move_to(pos),
            None => self.out_of_range(u64::MAX),
        }
    }

    /// Move by a signed number of bytes, keeping the bit offset.
    pub fn skip_bytes(&mut self, byte_delta: i64) -> Result<()> {
        self.skip(byte_delta, 0)
    }

    /// Move by a signed number of bits.
    pub fn skip_bits(&mut self, bit_delta: i64) -> Result<()> {
        self.skip(0, bit_delta)
    }

    /// Move forward to the next byte offset that is a multiple of `n`.
    ///
    /// The bit offset is not changed.
    pub fn align(&mut self, n: u64) -> Result<()> {
        if n == 0 {
            return self.fail(Error::InvalidWidth {
                what: "alignment",
                width: 0,
            });
        }
        let rem = self.pos.byte() % n;
        if rem != 0 {
            let delta = i64::try_from(n - rem).map_err(|_| Error::InvalidWidth {
                what: "alignment",
                width: n,
            })?;
            self.skip(delta, 0)?;
        }
        Ok(())
    }

    /// Move to the start of the store.
    pub fn rewind(&mut self) {
        self.pos = Position::default();
    }

    /// Move to the end of the store.
    pub fn goto_end(&mut self) {
        self.pos = Position::new(self.store.len(), 0);
    }

    /// Run `f` on the cursor and restore the position afterwards, whatever
    /// the outcome. Writes performed by `f` are not undone.
    ///
    /// ```
    /// use bit_cursor::prelude::*;
    ///
    /// let mut cursor = BitCursor::from_vec(vec![1, 2, 3]);
    /// assert_eq!(cursor.peek(|c| c.read_u16_be()).unwrap(), 0x0102);
    /// assert_eq!(cursor.offset(), 0);
    /// ```
    pub fn peek<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let pos = self.pos;
        let res = f(self);
        self.pos = pos;
        res
    }

    /// Fail with [`Error::Bounds`] for a target that is not a position.
    fn out_of_range<T>(&mut self, requested: u64) -> Result<T> {
        let available = self.store.len();
        self.fail(Error::Bounds {
            requested,
            available,
        })
    }

    fn move_to(&mut self, pos: Position) -> Result<()> {
        self.ensure(pos.end_byte())?;
        tracing::trace!(from = %self.pos, to = %pos, "seek");
        self.pos = pos;
        Ok(())
    }

    /// Resolve a byte range, where an unbounded start means the byte
    /// at which the next byte-granular access would start, and an
    /// unbounded end means the end of the store.
    pub(crate) fn resolve_range(&self, range: impl RangeBounds<u64>) -> Result<(u64, u64)> {
        let start = match range.start_bound() {
            Bound::Included(&idx) => Some(idx),
            Bound::Excluded(&idx) => idx.checked_add(1),
            Bound::Unbounded => Some(self.byte_start()),
        };
        let end = match range.end_bound() {
            Bound::Included(&idx) => idx.checked_add(1),
            Bound::Excluded(&idx) => Some(idx),
            Bound::Unbounded => start.map(|start| self.store.len().max(start)),
        };
        match (start, end) {
            (Some(start), Some(end)) if start <= end => Ok((start, end)),
            _ => Err(Error::InvalidWidth {
                what: "range (start after end, or past the last byte)",
                width: start.unwrap_or(u64::MAX),
            }),
        }
    }

    /// Return a hex dump of the given byte range, clamped to the store.
    pub fn hexdump(&mut self, range: impl RangeBounds<u64>) -> Result<String> {
        let (start, end) = self.resolve_range(range)?;
        let end = end.min(self.store.len());
        let start = start.min(end);
        let mut bytes = vec![0; (end - start) as usize];
        self.store.read_at(start, &mut bytes)?;
        Ok(hexdump::hexdump(&bytes, start, Some(self.pos.byte())))
    }

    fn dump_around_cursor(&mut self) -> Result<String> {
        let byte = self.pos.byte();
        let start = byte.saturating_sub(32) & !15;
        self.hexdump(start..byte.saturating_add(48))
    }
}

impl<S: ByteStore> BinAccess for BitCursor<S> {
    #[inline(always)]
    fn position(&self) -> Position {
        self.pos
    }

    #[inline(always)]
    fn set_position(&mut self, pos: Position) {
        self.pos = pos;
    }

    #[inline(always)]
    fn endian(&self) -> Endianness {
        self.endian
    }

    #[inline(always)]
    fn size(&self) -> u64 {
        self.store.len()
    }

    #[inline]
    fn ensure(&mut self, required_end: u64) -> Result<()> {
        match self.bounds.ensure(&mut self.store, required_end) {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    #[inline]
    fn load(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
        match self.store.read_at(pos, buf) {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    #[inline]
    fn store(&mut self, pos: u64, buf: &[u8]) -> Result<()> {
        match self.store.write_at(pos, buf) {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    fn fail<T>(&mut self, err: Error) -> Result<T> {
        if self.dump_on_error {
            match self.dump_around_cursor() {
                Ok(dump) => tracing::error!(position = %self.pos, "{}\n{}", err, dump),
                Err(dump_err) => {
                    tracing::error!(position = %self.pos, "{} (dump failed: {})", err, dump_err)
                }
            }
        }
        Err(err)
    }
}

impl BitCursor<MemStore<Vec<u8>>> {
    /// Create a growable, little-endian cursor over an owned vector.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::new(MemStore::new(data))
    }

    /// Consume the cursor, returning the underlying vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.store.into_inner()
    }
}

impl BitCursor<FileStore> {
    /// Open a file and create a cursor over it.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode, options: CursorOptions) -> Result<Self> {
        Self::with_options(FileStore::open(path, mode)?, options)
    }

    /// Flush and close the underlying file.
    pub fn close(self) -> Result<()> {
        self.store.close()
    }
}

impl<S: ByteStore> std::io::Read for BitCursor<S> {
    /// Read up to the end of the store, never growing it.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let start = self.byte_start();
        let len = (buf.len() as u64).min(self.store.len().saturating_sub(start)) as usize;
        self.get_bytes(&mut buf[..len])?;
        Ok(len)
    }
}

impl<S: ByteStore> std::io::Write for BitCursor<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.put_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<S: ByteStore> std::io::Seek for BitCursor<S> {
    /// Seek to a byte offset; the bit offset is reset to zero.
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        let target = match pos {
            std::io::SeekFrom::Start(offset) => Some(offset),
            std::io::SeekFrom::End(delta) => self.store.len().checked_add_signed(delta),
            std::io::SeekFrom::Current(delta) => self.pos.byte().checked_add_signed(delta),
        };
        let pos = target.and_then(|target| Position::checked_new(target, 0));
        let pos = pos.ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Invalid seek to a negative or overflowing position",
            )
        })?;
        self.move_to(pos)?;
        Ok(pos.byte())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_seek_skip() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![0; 8]);
        cursor.seek(2, 11)?;
        assert_eq!((cursor.offset(), cursor.bit_offset()), (3, 3));
        cursor.skip(0, -4)?;
        assert_eq!((cursor.offset(), cursor.bit_offset()), (2, 7));
        cursor.skip(-5, 0)?;
        assert_eq!(cursor.abs_bit_offset(), 0);
        Ok(())
    }

    #[test]
    fn test_seek_grows() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![0; 4]);
        cursor.seek(6, 0)?;
        assert_eq!(cursor.size(), 6);
        // a partial byte must exist
        cursor.seek(6, 1)?;
        assert_eq!(cursor.size(), 7);
        Ok(())
    }

    #[test]
    fn test_seek_strict() {
        let mut cursor =
            BitCursor::with_options(MemStore::new(vec![0; 4]), CursorOptions::default().with_strict(true))
                .unwrap();
        cursor.seek(1, 0).unwrap();
        assert!(matches!(cursor.seek(5, 0), Err(Error::Bounds { .. })));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.size(), 4);
        // seeking to the end is fine
        cursor.seek(4, 0).unwrap();
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_range_limits() {
        let cursor = BitCursor::from_vec(vec![0; 4]);
        assert!(matches!(
            cursor.resolve_range(..=u64::MAX),
            Err(Error::InvalidWidth { .. })
        ));
        assert!(matches!(
            cursor.resolve_range((Bound::Excluded(u64::MAX), Bound::Unbounded)),
            Err(Error::InvalidWidth { .. })
        ));
        assert_eq!(cursor.resolve_range(..=2).unwrap(), (0, 3));
        assert_eq!(cursor.resolve_range((Bound::Excluded(1), Bound::Unbounded)).unwrap(), (2, 4));
    }

    #[test]
    fn test_strict_construction() {
        let options = CursorOptions::default().with_strict(true).with_offset(10, 0);
        assert!(BitCursor::with_options(MemStore::new(vec![0; 4]), options).is_err());
    }

    #[test]
    fn test_align() -> Result<()> {
        let mut cursor = BitCursor::from_vec(vec![]);
        cursor.seek(5, 0)?;
        cursor.align(4)?;
        assert_eq!(cursor.offset(), 8);
        cursor.align(4)?;
        assert_eq!(cursor.offset(), 8);
        assert!(cursor.align(0).is_err());
        Ok(())
    }

    #[test]
    fn test_rewind_goto_end() {
        let mut cursor = BitCursor::from_vec(vec![0; 10]);
        cursor.goto_end();
        assert_eq!(cursor.offset(), 10);
        assert_eq!(cursor.remaining(), 0);
        cursor.rewind();
        assert_eq!(cursor.remaining(), 10);
    }

    #[test]
    fn test_io_traits() -> std::io::Result<()> {
        use std::io::{Read, Seek, SeekFrom, Write};
        let mut cursor = BitCursor::from_vec(vec![]);
        cursor.write_all(b"hello world")?;
        Seek::seek(&mut cursor, SeekFrom::Start(6))?;
        let mut buf = String::new();
        cursor.read_to_string(&mut buf)?;
        assert_eq!(buf, "world");
        assert!(Seek::seek(&mut cursor, SeekFrom::Current(-20)).is_err());
        assert_eq!(Seek::seek(&mut cursor, SeekFrom::End(-5))?, 6);
        Ok(())
    }

    #[test]
    fn test_hexdump() -> Result<()> {
        let mut cursor = BitCursor::from_vec(b"hello".to_vec());
        let dump = cursor.hexdump(..)?;
        assert!(dump.contains("68 65 6c 6c 6f"));
        assert!(dump.contains("|hello|"));
        Ok(())
    }
}

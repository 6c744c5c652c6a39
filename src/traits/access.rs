/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{Error, Result};
use crate::impls::Position;
use crate::impls::position::checked_end;
use crate::traits::Endianness;

/// Cursor-based access to a byte store.
///
/// This trait specifies the basic operations over which the bit, scalar and
/// string codecs are implemented as default methods of extension traits
/// such as [`BitsRead`](crate::codes::BitsRead) and
/// [`ScalarWrite`](crate::codes::ScalarWrite), which are implemented for
/// every type implementing [`BinAccess`].
///
/// Implementors must guarantee that [`ensure`](BinAccess::ensure) is the
/// only way the underlying store is grown, and codecs must call it once,
/// with the full extent of the access, before calling
/// [`load`](BinAccess::load) or [`store`](BinAccess::store).
pub trait BinAccess {
    /// The current position.
    fn position(&self) -> Position;

    /// Set the position without any bounds check.
    ///
    /// This is used by codecs after a successful access; to move the cursor
    /// use [`BitCursor::seek`](crate::impls::BitCursor::seek) and friends.
    fn set_position(&mut self, pos: Position);

    /// The default endianness.
    fn endian(&self) -> Endianness;

    /// Current size of the underlying store in bytes.
    fn size(&self) -> u64;

    /// Make sure that the store holds at least `required_end` bytes,
    /// growing it or failing according to the growth policy.
    fn ensure(&mut self, required_end: u64) -> Result<()>;

    /// Read bytes at an absolute offset, which must be within bounds.
    fn load(&mut self, pos: u64, buf: &mut [u8]) -> Result<()>;

    /// Write bytes at an absolute offset, which must be within bounds.
    fn store(&mut self, pos: u64, buf: &[u8]) -> Result<()>;

    /// Report an error detected by a codec.
    ///
    /// Implementations can use this hook for diagnostics; the error must
    /// be returned unchanged.
    fn fail<T>(&mut self, err: Error) -> Result<T>;

    /// The byte offset at which the next byte-granular access starts.
    ///
    /// If the cursor is in the middle of a byte, the remaining bits of that
    /// byte are abandoned and the access starts at the next byte.
    #[inline(always)]
    fn byte_start(&self) -> u64 {
        self.position().end_byte()
    }

    /// Make sure that the `len` bytes starting at `start` exist, and return
    /// the end of the range.
    ///
    /// A range ending past [`Position::MAX_BYTE`] fails with
    /// [`Error::Bounds`] without touching the store.
    fn ensure_range(&mut self, start: u64, len: u64) -> Result<u64> {
        match checked_end(start, len) {
            Some(end) => {
                self.ensure(end)?;
                Ok(end)
            }
            None => {
                let available = self.size();
                self.fail(Error::Bounds {
                    requested: start.saturating_add(len),
                    available,
                })
            }
        }
    }

    /// Read `buf.len()` bytes starting at [`byte_start`](BinAccess::byte_start)
    /// and advance past them.
    fn get_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        let start = self.byte_start();
        let end = self.ensure_range(start, buf.len() as u64)?;
        self.load(start, buf)?;
        self.set_position(Position::new(end, 0));
        Ok(())
    }

    /// Write `buf` starting at [`byte_start`](BinAccess::byte_start) and
    /// advance past it.
    fn put_bytes(&mut self, buf: &[u8]) -> Result<()> {
        let start = self.byte_start();
        let end = self.ensure_range(start, buf.len() as u64)?;
        self.store(start, buf)?;
        self.set_position(Position::new(end, 0));
        Ok(())
    }
}

/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::Result;

/// Positioned, random-access byte storage.
///
/// This is the only interface the cursor logic needs from its storage:
/// the bit packer, the scalar and string codecs, and the region edits are
/// all written once against it, so an in-memory buffer and a file behave
/// identically.
///
/// Implementations are not required to check bounds on
/// [`read_at`](ByteStore::read_at) and [`write_at`](ByteStore::write_at):
/// callers guarantee, through [`Bounds::ensure`](crate::impls::Bounds::ensure),
/// that `pos + buf.len() <= len()`.
pub trait ByteStore {
    /// Current length of the store in bytes.
    fn len(&self) -> u64;

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` with the bytes starting at `pos`.
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()>;

    /// Overwrite the bytes starting at `pos` with `buf`.
    fn write_at(&mut self, pos: u64, buf: &[u8]) -> Result<()>;

    /// Extend the store to `new_len` bytes, filling the new region with
    /// zeros. Does nothing if `new_len` is not larger than the current
    /// length.
    fn grow_to(&mut self, new_len: u64) -> Result<()>;

    /// Shrink the store to `new_len` bytes. Does nothing if `new_len` is
    /// not smaller than the current length.
    fn truncate_to(&mut self, new_len: u64) -> Result<()>;
}

impl<S: ByteStore + ?Sized> ByteStore for &mut S {
    #[inline(always)]
    fn len(&self) -> u64 {
        (**self).len()
    }

    #[inline(always)]
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
        (**self).read_at(pos, buf)
    }

    #[inline(always)]
    fn write_at(&mut self, pos: u64, buf: &[u8]) -> Result<()> {
        (**self).write_at(pos, buf)
    }

    #[inline(always)]
    fn grow_to(&mut self, new_len: u64) -> Result<()> {
        (**self).grow_to(new_len)
    }

    #[inline(always)]
    fn truncate_to(&mut self, new_len: u64) -> Result<()> {
        (**self).truncate_to(new_len)
    }
}

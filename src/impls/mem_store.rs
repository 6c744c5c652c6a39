/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{Error, Result};
use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// An implementation of [`ByteStore`] for a [`Vec<u8>`], either owned or
/// mutably borrowed.
///
/// # Example
/// ```
/// use bit_cursor::prelude::*;
///
/// let mut bytes = vec![0x12, 0x34];
/// let mut store = MemStore::new(&mut bytes);
///
/// let mut buf = [0; 2];
/// store.read_at(0, &mut buf).unwrap();
/// assert_eq!(buf, [0x12, 0x34]);
///
/// // growing zero-fills
/// store.grow_to(4).unwrap();
/// store.write_at(3, &[0xff]).unwrap();
/// assert_eq!(store.len(), 4);
///
/// drop(store);
/// assert_eq!(bytes, [0x12, 0x34, 0x00, 0xff]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemStore<B: AsRef<Vec<u8>> + AsMut<Vec<u8>>> {
    data: B,
}

impl<B: AsRef<Vec<u8>> + AsMut<Vec<u8>>> MemStore<B> {
    /// Create a new [`MemStore`] over the given vector.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    /// The bytes of the store.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Return the byte range `pos..pos + len` as a `usize` range, or an
    /// I/O error if it does not fit the address space.
    fn range(pos: u64, len: usize) -> Result<core::ops::Range<usize>> {
        let start = usize::try_from(pos).map_err(|_| too_large(pos))?;
        let end = start.checked_add(len).ok_or_else(|| too_large(pos))?;
        Ok(start..end)
    }
}

fn too_large(pos: u64) -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::OutOfMemory,
        format!("Position {} does not fit in memory", pos),
    ))
}

impl<B: AsRef<Vec<u8>> + AsMut<Vec<u8>>> ByteStore for MemStore<B> {
    #[inline(always)]
    fn len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }

    #[inline]
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
        let range = Self::range(pos, buf.len())?;
        match self.data.as_ref().get(range) {
            Some(src) => {
                buf.copy_from_slice(src);
                Ok(())
            }
            None => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "Unexpected end of buffer",
            ))),
        }
    }

    #[inline]
    fn write_at(&mut self, pos: u64, buf: &[u8]) -> Result<()> {
        let range = Self::range(pos, buf.len())?;
        match self.data.as_mut().get_mut(range) {
            Some(dst) => {
                dst.copy_from_slice(buf);
                Ok(())
            }
            None => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "Unexpected end of buffer",
            ))),
        }
    }

    fn grow_to(&mut self, new_len: u64) -> Result<()> {
        let new_len = usize::try_from(new_len).map_err(|_| too_large(new_len))?;
        let data = self.data.as_mut();
        if new_len > data.len() {
            data.try_reserve(new_len - data.len())
                .map_err(|_| too_large(new_len as u64))?;
            data.resize(new_len, 0);
        }
        Ok(())
    }

    fn truncate_to(&mut self, new_len: u64) -> Result<()> {
        if let Ok(new_len) = usize::try_from(new_len) {
            self.data.as_mut().truncate(new_len);
        }
        Ok(())
    }
}

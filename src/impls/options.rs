/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::Endianness;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// Construction options of a [`BitCursor`](crate::impls::BitCursor).
///
/// The defaults describe a little-endian, growable cursor at the start of
/// the buffer. With the `serde` feature the options can be read from any
/// configuration format; missing fields take their default value.
///
/// ```
/// use bit_cursor::prelude::*;
///
/// let options = CursorOptions::default()
///     .with_endian(BE)
///     .with_strict(true)
///     .with_offset(4, 3);
/// assert_eq!(options.byte_offset, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CursorOptions {
    /// Initial byte offset.
    pub byte_offset: u64,
    /// Initial bit offset; values larger than 7 carry into the byte offset.
    pub bit_offset: u64,
    /// Default endianness of the codecs.
    pub endian: Endianness,
    /// Refuse to grow the buffer, failing instead.
    pub strict: bool,
    /// Minimum number of bytes added whenever the buffer grows.
    pub grow_by: u64,
    /// Log a hex dump of the bytes around the cursor whenever an operation
    /// fails.
    pub dump_on_error: bool,
}

impl CursorOptions {
    #[must_use]
    pub fn with_offset(mut self, byte_offset: u64, bit_offset: u64) -> Self {
        self.byte_offset = byte_offset;
        self.bit_offset = bit_offset;
        self
    }

    #[must_use]
    pub fn with_endian(mut self, endian: Endianness) -> Self {
        self.endian = endian;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_grow_by(mut self, grow_by: u64) -> Self {
        self.grow_by = grow_by;
        self
    }

    #[must_use]
    pub fn with_dump_on_error(mut self, dump_on_error: bool) -> Self {
        self.dump_on_error = dump_on_error;
        self
    }
}

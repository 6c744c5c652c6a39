/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::Error;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// Byte and bit order selector.
///
/// Unlike the type-level selectors of a bit stream, a cursor chooses its
/// endianness at run time: every instance has a default, and each codec
/// method has variants taking an explicit value.
///
/// For multi-byte scalars the meaning is the usual one (big endian stores
/// the most significant byte first). For bit fields, big endian fills each
/// byte from its most significant bit downwards, starting from the most
/// significant bit of the field, whereas little endian fills each byte from
/// its least significant bit upwards, starting from the least significant
/// bit of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Endianness {
    Big,
    #[default]
    Little,
}

/// Alias for [`Endianness::Big`].
pub const BE: Endianness = Endianness::Big;

/// Alias for [`Endianness::Little`].
pub const LE: Endianness = Endianness::Little;

impl Endianness {
    /// The endianness of the host.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    #[must_use]
    pub const fn is_big(self) -> bool {
        matches!(self, Endianness::Big)
    }

    #[must_use]
    pub const fn is_little(self) -> bool {
        matches!(self, Endianness::Little)
    }
}

impl core::str::FromStr for Endianness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(Endianness::Big),
            "little" | "le" => Ok(Endianness::Little),
            _ => Err(Error::UnsupportedType(format!(
                "endianness must be \"big\" or \"little\", got {:?}",
                s
            ))),
        }
    }
}

impl core::fmt::Display for Endianness {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Endianness::Big => f.write_str("big"),
            Endianness::Little => f.write_str("little"),
        }
    }
}

/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The error type shared by stores, codecs and the cursor.

/// Errors returned by every fallible operation of this crate.
///
/// All checks happen before the backing store is touched, so an operation
/// that returns an error has not modified the buffer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The operation needs bytes up to `requested`, but the buffer holds
    /// only `available` and cannot grow, either because the cursor is
    /// strict or because `requested` is past the last valid position.
    #[error("Access up to byte {requested} is out of bounds: the buffer has {available} bytes")]
    Bounds { requested: u64, available: u64 },

    /// A bit width, byte width, length-field size or alignment outside its
    /// admissible set.
    #[error("Invalid {what}: {width}")]
    InvalidWidth { what: &'static str, width: u64 },

    /// The value cannot be represented in the requested width and
    /// signedness.
    #[error("Value {value} is out of range [{min}, {max}]")]
    ValueRange { value: i128, min: i128, max: i128 },

    /// The string has more units than its length field or explicit cap
    /// allow.
    #[error("String of {len} units exceeds the maximum length {max}")]
    StringTooLong { len: u64, max: u64 },

    /// An option string that does not name a known endianness or string
    /// type.
    #[error("Unsupported option: {0}")]
    UnsupportedType(String),

    /// A structural edit (insertion, deletion, truncation) was requested on
    /// a strict cursor.
    #[error("Cannot {operation} a strict buffer")]
    StrictResize { operation: &'static str },

    /// A failure of the underlying file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            other => std::io::Error::other(other),
        }
    }
}

impl Error {
    /// Returns the [`Error::ValueRange`] for `value` if it lies outside
    /// `[min, max]`.
    pub(crate) fn check_range(value: i128, min: i128, max: i128) -> Result<()> {
        if value < min || value > max {
            return Err(Error::ValueRange { value, min, max });
        }
        Ok(())
    }
}

/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Terminated, fixed-length and length-prefixed strings.
//!
//! Four layouts are supported, selected by [`StringType`]:
//!
//! - [UTF-8](StringType::Utf8) and [UTF-16](StringType::Utf16) strings are
//!   sequences of code units (one byte and two bytes, respectively) that
//!   either have a fixed `length` or end with a terminator unit. When
//!   neither a length nor a terminator is given, the terminator is zero.
//! - [Pascal](StringType::Pascal) and [wide Pascal](StringType::WidePascal)
//!   strings are a prefix of 1, 2 or 4 bytes counting the units of the
//!   UTF-8 or UTF-16 payload that follows.
//!
//! UTF-16 units and length prefixes use the endianness of the
//! [options](StringOptions::endian), or the default endianness of the
//! cursor. Decoding is lossy: invalid sequences become U+FFFD.
//!
//! Like scalars, strings are byte-granular (see
//! [`BinAccess::byte_start`]). Every write computes its full extent first,
//! ensures it once and then stores the encoded bytes with a single write,
//! so a failing write leaves the buffer untouched.

use core::fmt::{Display, Formatter};
use core::str::FromStr;

use super::scalar::ScalarRead;
use crate::error::{Error, Result};
use crate::impls::Position;
use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// Size of the buffer used to scan for terminators.
const SCAN_CHUNK: usize = 4096;

/// The layout of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StringType {
    #[default]
    Utf8,
    Utf16,
    Pascal,
    WidePascal,
}

impl StringType {
    /// Bytes per code unit.
    #[must_use]
    pub const fn unit_size(self) -> usize {
        match self {
            StringType::Utf8 | StringType::Pascal => 1,
            StringType::Utf16 | StringType::WidePascal => 2,
        }
    }

    /// Whether the string carries a length prefix.
    #[must_use]
    pub const fn is_prefixed(self) -> bool {
        matches!(self, StringType::Pascal | StringType::WidePascal)
    }
}

impl FromStr for StringType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(StringType::Utf8),
            "utf-16" | "utf16" => Ok(StringType::Utf16),
            "pascal" => Ok(StringType::Pascal),
            "wide-pascal" | "widepascal" => Ok(StringType::WidePascal),
            _ => Err(Error::UnsupportedType(format!(
                "string type must be one of utf-8, utf-16, pascal, wide-pascal, got {:?}",
                s
            ))),
        }
    }
}

impl Display for StringType {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            StringType::Utf8 => "utf-8",
            StringType::Utf16 => "utf-16",
            StringType::Pascal => "pascal",
            StringType::WidePascal => "wide-pascal",
        })
    }
}

/// How a string is laid out.
///
/// For UTF strings `length` is the exact number of units read or written
/// (excluding the terminator); for Pascal strings it is a cap on the number
/// of units. `terminate_value` is only used by UTF strings, and
/// `length_field_size` only by Pascal strings.
///
/// ```
/// use bit_cursor::prelude::*;
///
/// let options = StringOptions::new(StringType::Utf16)
///     .with_length(8)
///     .with_terminator(0)
///     .with_endian(BE);
/// let mut cursor = BitCursor::from_vec(vec![]);
/// cursor.write_string("hi", &options).unwrap();
/// // eight units and the terminator
/// assert_eq!(cursor.size(), 18);
/// cursor.rewind();
/// assert_eq!(cursor.read_string(&options).unwrap(), "hi");
/// assert_eq!(cursor.offset(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StringOptions {
    pub length: Option<usize>,
    pub string_type: StringType,
    pub terminate_value: Option<u32>,
    pub length_field_size: u8,
    pub endian: Option<Endianness>,
}

impl Default for StringOptions {
    fn default() -> Self {
        Self {
            length: None,
            string_type: StringType::Utf8,
            terminate_value: None,
            length_field_size: 1,
            endian: None,
        }
    }
}

impl StringOptions {
    #[must_use]
    pub fn new(string_type: StringType) -> Self {
        Self {
            string_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn with_terminator(mut self, terminate_value: u32) -> Self {
        self.terminate_value = Some(terminate_value);
        self
    }

    #[must_use]
    pub fn with_length_field_size(mut self, length_field_size: u8) -> Self {
        self.length_field_size = length_field_size;
        self
    }

    #[must_use]
    pub fn with_endian(mut self, endian: Endianness) -> Self {
        self.endian = Some(endian);
        self
    }

    /// The terminator in effect: the explicit one, or zero if there is no
    /// fixed length either.
    #[must_use]
    pub fn terminator(&self) -> Option<u32> {
        match (self.terminate_value, self.length) {
            (Some(t), _) => Some(t),
            (None, None) => Some(0),
            (None, Some(_)) => None,
        }
    }
}

fn check_field_size(size: u8) -> Result<()> {
    if matches!(size, 1 | 2 | 4) {
        Ok(())
    } else {
        Err(Error::InvalidWidth {
            what: "length field size (must be 1, 2 or 4)",
            width: size as u64,
        })
    }
}

#[inline(always)]
fn decode_unit(bytes: &[u8], endian: Endianness) -> u32 {
    match (bytes, endian) {
        ([b], _) => *b as u32,
        ([a, b], Endianness::Big) => u16::from_be_bytes([*a, *b]) as u32,
        ([a, b], Endianness::Little) => u16::from_le_bytes([*a, *b]) as u32,
        _ => unreachable!(),
    }
}

/// Decode a payload of `unit`-byte code units.
fn decode(payload: &[u8], unit: usize, endian: Endianness) -> String {
    if unit == 1 {
        String::from_utf8_lossy(payload).into_owned()
    } else {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|u| decode_unit(u, endian) as u16)
            .collect();
        String::from_utf16_lossy(&units)
    }
}

/// Encode `s` as `unit`-byte code units, keeping only the characters that
/// fit completely in `max_units` units. Returns the bytes and the number of
/// units.
fn encode(s: &str, unit: usize, endian: Endianness, max_units: usize) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(s.len() * unit);
    let mut units = 0;
    let mut buf = [0_u16; 2];
    for c in s.chars() {
        let width = if unit == 1 { c.len_utf8() } else { c.len_utf16() };
        if units + width > max_units {
            break;
        }
        if unit == 1 {
            let mut tmp = [0_u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
        } else {
            for u in c.encode_utf16(&mut buf) {
                out.extend_from_slice(&match endian {
                    Endianness::Big => u.to_be_bytes(),
                    Endianness::Little => u.to_le_bytes(),
                });
            }
        }
        units += width;
    }
    (out, units)
}

/// Check that a terminator fits in a unit.
fn check_unit(value: u32, unit: usize) -> Result<()> {
    let max = if unit == 1 { u8::MAX as i128 } else { u16::MAX as i128 };
    Error::check_range(value as i128, 0, max)
}

/// Append a unit already checked by [`check_unit`].
fn push_unit(out: &mut Vec<u8>, value: u32, unit: usize, endian: Endianness) {
    if unit == 1 {
        out.push(value as u8);
    } else {
        out.extend_from_slice(&match endian {
            Endianness::Big => (value as u16).to_be_bytes(),
            Endianness::Little => (value as u16).to_le_bytes(),
        });
    }
}

/// Bytes taken by a fixed-length string of `length` units, plus the
/// terminator unit if there is one.
#[inline(always)]
fn fixed_extent(length: usize, terminated: bool, unit: usize) -> u64 {
    (length as u64)
        .saturating_add(terminated as u64)
        .saturating_mul(unit as u64)
}

/// Read a length-prefixed string, restoring the position on failure.
fn read_prefixed<A: BinAccess + ?Sized>(
    access: &mut A,
    options: &StringOptions,
    unit: usize,
    endian: Endianness,
) -> Result<String> {
    if let Err(err) = check_field_size(options.length_field_size) {
        return access.fail(err);
    }
    let pos = access.position();
    let count = access.read_int(options.length_field_size as usize, true, endian)? as u64;
    if let Some(cap) = options.length {
        if count > cap as u64 {
            access.set_position(pos);
            return access.fail(Error::StringTooLong {
                len: count,
                max: cap as u64,
            });
        }
    }
    let start = access.byte_start();
    let end = match access.ensure_range(start, count.saturating_mul(unit as u64)) {
        Ok(end) => end,
        Err(err) => {
            access.set_position(pos);
            return Err(err);
        }
    };
    let mut payload = vec![0_u8; (end - start) as usize];
    if let Err(err) = access.get_bytes(&mut payload) {
        access.set_position(pos);
        return Err(err);
    }
    Ok(decode(&payload, unit, endian))
}

/// Trait for reading strings.
///
/// This trait is implemented for every [`BinAccess`].
pub trait StringRead: BinAccess {
    /// Read a string laid out as described by `options`.
    ///
    /// A UTF string with a fixed `length` and a terminator takes `length`
    /// units plus the terminator unit, as written by
    /// [`write_string`](StringWrite::write_string); the text ends at the
    /// first terminator unit.
    fn read_string(&mut self, options: &StringOptions) -> Result<String> {
        let endian = options.endian.unwrap_or_else(|| self.endian());
        let unit = options.string_type.unit_size();
        if options.string_type.is_prefixed() {
            return read_prefixed(self, options, unit, endian);
        }

        let start = self.byte_start();
        let terminator = options.terminator();
        match options.length {
            Some(length) => {
                let len = fixed_extent(length, terminator.is_some(), unit);
                let end = self.ensure_range(start, len)?;
                let mut payload = vec![0_u8; (end - start) as usize];
                self.get_bytes(&mut payload)?;
                if let Some(t) = terminator {
                    if let Some(idx) = payload
                        .chunks_exact(unit)
                        .position(|u| decode_unit(u, endian) == t)
                    {
                        payload.truncate(idx * unit);
                    }
                }
                Ok(decode(&payload, unit, endian))
            }
            None => {
                let terminator = terminator.unwrap_or(0);
                let size = self.size();
                let mut pos = start;
                let mut payload = Vec::new();
                let mut chunk = vec![0_u8; SCAN_CHUNK];
                'scan: while pos + unit as u64 <= size {
                    let avail = (size - pos).min(SCAN_CHUNK as u64) as usize;
                    let len = avail / unit * unit;
                    self.load(pos, &mut chunk[..len])?;
                    for u in chunk[..len].chunks_exact(unit) {
                        pos += unit as u64;
                        if decode_unit(u, endian) == terminator {
                            break 'scan;
                        }
                        payload.extend_from_slice(u);
                    }
                }
                self.set_position(Position::new(pos, 0));
                Ok(decode(&payload, unit, endian))
            }
        }
    }

    /// Read a zero-terminated UTF-8 string.
    #[inline]
    fn read_utf8(&mut self) -> Result<String> {
        self.read_string(&StringOptions::new(StringType::Utf8))
    }

    /// Read a zero-terminated UTF-16 string with the default endianness.
    #[inline]
    fn read_utf16(&mut self) -> Result<String> {
        self.read_string(&StringOptions::new(StringType::Utf16))
    }

    /// Read a Pascal string with a one-byte length prefix.
    #[inline]
    fn read_pascal(&mut self) -> Result<String> {
        self.read_string(&StringOptions::new(StringType::Pascal))
    }

    /// Read a wide Pascal string with a one-byte length prefix.
    #[inline]
    fn read_wide_pascal(&mut self) -> Result<String> {
        self.read_string(&StringOptions::new(StringType::WidePascal))
    }
}

/// Trait for writing strings.
///
/// This trait is implemented for every [`BinAccess`].
pub trait StringWrite: BinAccess {
    /// Write `s` laid out as described by `options`.
    ///
    /// UTF strings with a fixed length are truncated at the last complete
    /// character that fits, and zero-padded to the length; the terminator,
    /// if any, follows. Pascal strings fail with [`Error::StringTooLong`]
    /// if their units do not fit the length field or exceed `length`.
    ///
    /// ```
    /// use bit_cursor::prelude::*;
    ///
    /// let mut cursor = BitCursor::from_vec(vec![]);
    /// cursor.write_utf8("hello").unwrap();
    /// cursor.write_pascal("hi").unwrap();
    /// assert_eq!(cursor.into_vec(), b"hello\0\x02hi");
    /// ```
    fn write_string(&mut self, s: &str, options: &StringOptions) -> Result<()> {
        let endian = options.endian.unwrap_or_else(|| self.endian());
        let unit = options.string_type.unit_size();

        let bytes = if options.string_type.is_prefixed() {
            let field = options.length_field_size;
            if let Err(err) = check_field_size(field) {
                return self.fail(err);
            }
            let (payload, units) = encode(s, unit, endian, usize::MAX);
            let max = (1_u64 << (8 * field as u32)) - 1;
            let max = options.length.map_or(max, |cap| max.min(cap as u64));
            if units as u64 > max {
                return self.fail(Error::StringTooLong {
                    len: units as u64,
                    max,
                });
            }
            let field = field as usize;
            let mut bytes = Vec::with_capacity(field + payload.len());
            match endian {
                Endianness::Big => bytes.extend_from_slice(&(units as u64).to_be_bytes()[8 - field..]),
                Endianness::Little => bytes.extend_from_slice(&(units as u64).to_le_bytes()[..field]),
            }
            bytes.extend_from_slice(&payload);
            bytes
        } else {
            let terminator = options.terminator();
            if let Some(t) = terminator {
                if let Err(err) = check_unit(t, unit) {
                    return self.fail(err);
                }
            }
            let (mut bytes, _) = encode(s, unit, endian, options.length.unwrap_or(usize::MAX));
            if let Some(length) = options.length {
                let start = self.byte_start();
                self.ensure_range(start, fixed_extent(length, terminator.is_some(), unit))?;
                bytes.resize(length * unit, 0);
            }
            if let Some(t) = terminator {
                push_unit(&mut bytes, t, unit, endian);
            }
            bytes
        };
        self.put_bytes(&bytes)
    }

    /// Write a zero-terminated UTF-8 string.
    #[inline]
    fn write_utf8(&mut self, s: &str) -> Result<()> {
        self.write_string(s, &StringOptions::new(StringType::Utf8))
    }

    /// Write a zero-terminated UTF-16 string with the default endianness.
    #[inline]
    fn write_utf16(&mut self, s: &str) -> Result<()> {
        self.write_string(s, &StringOptions::new(StringType::Utf16))
    }

    /// Write a Pascal string with a one-byte length prefix.
    #[inline]
    fn write_pascal(&mut self, s: &str) -> Result<()> {
        self.write_string(s, &StringOptions::new(StringType::Pascal))
    }

    /// Write a wide Pascal string with a one-byte length prefix.
    #[inline]
    fn write_wide_pascal(&mut self, s: &str) -> Result<()> {
        self.write_string(s, &StringOptions::new(StringType::WidePascal))
    }
}

impl<T: BinAccess + ?Sized> StringRead for T {}
impl<T: BinAccess + ?Sized> StringWrite for T {}

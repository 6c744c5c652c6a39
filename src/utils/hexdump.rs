/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Format `bytes` as a classic hex dump.
///
/// Each line shows the absolute offset (`base` plus the index in `bytes`),
/// sixteen bytes in hexadecimal and their printable ASCII rendering. If
/// `mark` is the absolute offset of one of the bytes, the line containing
/// it is prefixed with `>`.
///
/// ```
/// use bit_cursor::utils::hexdump::hexdump;
///
/// assert_eq!(
///     hexdump(b"hi!", 0x10, None),
///     " 00000010  68 69 21                                         |hi!|\n"
/// );
/// ```
#[must_use]
pub fn hexdump(bytes: &[u8], base: u64, mark: Option<u64>) -> String {
    let mut out = String::new();
    for (i, line) in bytes.chunks(BYTES_PER_LINE).enumerate() {
        let offset = base + (i * BYTES_PER_LINE) as u64;
        let marked = mark.is_some_and(|m| m >= offset && m < offset + line.len() as u64);
        let _ = write!(out, "{}{:08x} ", if marked { '>' } else { ' ' }, offset);
        for j in 0..BYTES_PER_LINE {
            match line.get(j) {
                Some(b) => {
                    let _ = write!(out, " {:02x}", b);
                }
                None => out.push_str("   "),
            }
        }
        out.push_str("  |");
        out.extend(line.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hexdump() {
        let data: Vec<u8> = (0..20).collect();
        let dump = hexdump(&data, 0, Some(17));
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 00000000  00 01 02"));
        assert!(lines[1].starts_with(">00000010  10 11 12 13"));
        assert!(lines[0].ends_with("|................|"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(hexdump(&[], 0, None), "");
    }
}

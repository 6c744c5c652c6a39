/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use bit_cursor::prelude::*;

#[test]
fn test_delete_insert_restores() -> Result<()> {
    let original: Vec<u8> = (0..10).map(|i| i * 3).collect();
    let mut cursor = BitCursor::from_vec(original.clone());
    let removed = cursor.delete(2..5, true)?;
    assert_eq!(removed, &original[2..5]);
    assert_eq!(cursor.size(), 7);
    let expected: Vec<u8> = original[..2].iter().chain(&original[5..]).copied().collect();
    assert_eq!(cursor.get_ref().as_slice(), expected.as_slice());
    assert_eq!(cursor.offset(), 2);

    cursor.insert(&removed, None, true)?;
    assert_eq!(cursor.offset(), 5);
    assert_eq!(cursor.into_vec(), original);
    Ok(())
}

#[test]
fn test_extract_consume_then_read() -> Result<()> {
    let mut cursor = BitCursor::from_vec(b"headerbody".to_vec());
    assert_eq!(cursor.extract(..6, true)?, b"header");
    assert_eq!(cursor.read_bytes(4)?, b"body");
    Ok(())
}

#[test]
fn test_transform_then_search() -> Result<()> {
    let mut cursor = BitCursor::from_vec(b"secret message".to_vec());
    cursor.xor("key", .., false)?;
    assert_eq!(cursor.find_str("message")?, None);
    cursor.xor("key", .., false)?;
    assert_eq!(cursor.find_str("message")?, Some(7));

    cursor.seek(9, 0)?;
    assert_eq!(cursor.find_u8(b'e', BE)?, Some(13));
    assert_eq!(cursor.offset(), 9);
    cursor.not(8.., true)?;
    assert_eq!(cursor.offset(), 14);
    cursor.not(8..14, false)?;
    assert_eq!(cursor.into_vec(), b"secret message");
    Ok(())
}

#[test]
fn test_hexdump_marks_cursor() -> Result<()> {
    let mut cursor = BitCursor::from_vec((0..40).collect());
    cursor.seek(20, 0)?;
    let dump = cursor.hexdump(0..40)?;
    let lines: Vec<_> = dump.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(' '));
    assert!(lines[1].starts_with(">00000010"));
    assert!(lines[2].starts_with(' '));
    // out of range bytes are clamped
    assert_eq!(cursor.hexdump(100..200)?, "");
    Ok(())
}

/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use bit_cursor::prelude::*;

fn extremes(width: usize, unsigned: bool) -> Vec<i64> {
    if unsigned {
        let max = (1_i64 << width) - 1;
        vec![0, 1, max / 2, max - 1, max]
    } else {
        let max = (1_i64 << (width - 1)) - 1;
        let min = -max - 1;
        vec![min, min + 1, -1, 0, max]
    }
}

#[test]
fn test_all_widths_offsets_endians() -> Result<()> {
    for endian in [BE, LE] {
        for unsigned in [true, false] {
            for width in 1..=32 {
                for bit in 0..8 {
                    for value in extremes(width, unsigned) {
                        // surrounding ones must survive the write
                        let mut cursor = BitCursor::from_vec(vec![0xff; 6]);
                        cursor.seek(0, bit)?;
                        cursor.write_bits_with(value, width, unsigned, endian)?;
                        assert_eq!(cursor.abs_bit_offset(), bit + width as u64);
                        assert_eq!(cursor.size(), 6);

                        cursor.seek(0, bit)?;
                        assert_eq!(
                            cursor.read_bits_with(width, unsigned, endian)?,
                            value,
                            "endian {} unsigned {} width {} bit {}",
                            endian,
                            unsigned,
                            width,
                            bit
                        );

                        // the bits around the field are untouched
                        let data = cursor.into_vec();
                        let end = bit as usize + width;
                        for pos in (0..bit as usize).chain(end..48) {
                            let byte = data[pos / 8];
                            let shift = match endian {
                                Endianness::Big => 7 - pos % 8,
                                Endianness::Little => pos % 8,
                            };
                            assert_eq!((byte >> shift) & 1, 1, "bit {} clobbered", pos);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_sequence() -> Result<()> {
    let mut cursor = BitCursor::from_vec(vec![]);
    cursor.set_endian(BE);
    let fields: Vec<(i64, usize)> = (1..=32).map(|w| ((1_i64 << w) - 1, w)).collect();
    for &(value, width) in &fields {
        cursor.write_bits(value, width, true)?;
    }
    let total: usize = fields.iter().map(|&(_, w)| w).sum();
    assert_eq!(cursor.abs_bit_offset(), total as u64);
    assert_eq!(cursor.size(), total.div_ceil(8) as u64);
    // all ones
    assert!(cursor.get_ref().as_slice()[..total / 8].iter().all(|&b| b == 0xff));

    cursor.rewind();
    for &(value, width) in &fields {
        assert_eq!(cursor.read_bits(width, true)?, value);
    }
    Ok(())
}

#[test]
fn test_aliases() -> Result<()> {
    let mut cursor = BitCursor::from_vec(vec![]);
    cursor.write_ubit1(1)?;
    cursor.write_bit7_be(-64)?;
    cursor.write_ubit12_le(0xabc)?;
    cursor.write_bit20(-1)?;
    cursor.rewind();
    assert_eq!(cursor.read_ubit1()?, 1);
    assert_eq!(cursor.read_bit7_be()?, -64);
    assert_eq!(cursor.read_ubit12_le()?, 0xabc);
    assert_eq!(cursor.read_bit20()?, -1);
    assert_eq!(cursor.abs_bit_offset(), 40);
    Ok(())
}

#[test]
fn test_byte_resume_after_bits() -> Result<()> {
    let mut cursor = BitCursor::from_vec(vec![0b0001_0101, 0, 0]);
    cursor.write_ubit3_be(0b111)?;
    assert_eq!((cursor.offset(), cursor.bit_offset()), (0, 3));
    cursor.write_u8(0x5a)?;
    // the other 5 bits of the partial byte keep their previous value
    assert_eq!(cursor.get_ref().as_slice(), &[0b1111_0101, 0x5a, 0]);
    assert_eq!((cursor.offset(), cursor.bit_offset()), (2, 0));

    cursor.seek(0, 3)?;
    assert_eq!(cursor.read_u8()?, 0x5a);
    Ok(())
}

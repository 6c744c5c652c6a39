/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! IEEE 754 binary16 conversions.
//!
//! Rust has no stable half-precision type, so half floats travel as `f32`
//! and are converted to and from their 16-bit pattern here (1 sign bit, 5
//! exponent bits with bias 15, 10 fraction bits). Infinities, NaNs
//! (payload truncated, quiet bit kept) and subnormals are preserved; the
//! narrowing conversion rounds to nearest, ties to even.

/// Convert a binary16 bit pattern to an `f32`, exactly.
#[must_use]
pub fn f16_to_f32(bits: u16) -> f32 {
    let sign = ((bits & 0x8000) as u32) << 16;
    let exp = ((bits >> 10) & 0x1f) as u32;
    let frac = (bits & 0x3ff) as u32;
    match exp {
        0 if frac == 0 => f32::from_bits(sign),
        0 => {
            // subnormal: frac * 2^-24
            let value = frac as f32 / 16_777_216.0;
            if sign != 0 { -value } else { value }
        }
        0x1f => f32::from_bits(sign | 0x7f80_0000 | (frac << 13)),
        _ => f32::from_bits(sign | ((exp + 112) << 23) | (frac << 13)),
    }
}

/// Convert an `f32` to the nearest binary16 bit pattern.
///
/// Values too large for binary16 become infinities, values too small
/// become (signed) zeros.
#[must_use]
pub fn f32_to_f16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xff) as i32;
    let frac = bits & 0x7f_ffff;

    if exp == 0xff {
        return if frac == 0 {
            sign | 0x7c00
        } else {
            sign | 0x7e00 | (frac >> 13) as u16
        };
    }

    let half_exp = exp - 127 + 15;
    if half_exp >= 0x1f {
        return sign | 0x7c00;
    }

    if half_exp <= 0 {
        if half_exp < -10 {
            return sign;
        }
        let full = frac | 0x80_0000;
        let shift = (14 - half_exp) as u32;
        let mut half = full >> shift;
        let rem = full & ((1 << shift) - 1);
        let halfway = 1 << (shift - 1);
        if rem > halfway || (rem == halfway && half & 1 == 1) {
            half += 1;
        }
        return sign | half as u16;
    }

    let mut half = ((half_exp as u32) << 10) | (frac >> 13);
    let rem = frac & 0x1fff;
    // a carry out of the fraction correctly bumps the exponent
    if rem > 0x1000 || (rem == 0x1000 && half & 1 == 1) {
        half += 1;
    }
    sign | half as u16
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(f32_to_f16(0.0), 0x0000);
        assert_eq!(f32_to_f16(-0.0), 0x8000);
        assert_eq!(f32_to_f16(1.0), 0x3c00);
        assert_eq!(f32_to_f16(-2.0), 0xc000);
        assert_eq!(f32_to_f16(65504.0), 0x7bff);
        assert_eq!(f32_to_f16(65520.0), 0x7c00);
        assert_eq!(f32_to_f16(f32::INFINITY), 0x7c00);
        assert_eq!(f32_to_f16(f32::NEG_INFINITY), 0xfc00);
        assert_eq!(f32_to_f16(5.960_464_5e-8), 0x0001);
        assert_eq!(f32_to_f16(6.103_515_6e-5), 0x0400);
        assert_eq!(f16_to_f32(0x3c00), 1.0);
        assert_eq!(f16_to_f32(0x3555), 0.333_251_95);
        assert_eq!(f16_to_f32(0x0001), 5.960_464_5e-8);
        assert!(f16_to_f32(0x7e00).is_nan());
        assert!(f32_to_f16(f32::NAN) & 0x7c00 == 0x7c00 && f32_to_f16(f32::NAN) & 0x3ff != 0);
    }

    #[test]
    fn test_round_trip_all() {
        for bits in 0..=u16::MAX {
            let value = f16_to_f32(bits);
            if value.is_nan() {
                assert!(f16_to_f32(f32_to_f16(value)).is_nan());
            } else {
                assert_eq!(f32_to_f16(value), bits, "{:#06x}", bits);
            }
        }
    }

    #[test]
    fn test_ties_to_even() {
        // 1 + 2^-11 lies halfway between 1 and the next half
        assert_eq!(f32_to_f16(1.0 + 1.0 / 2048.0), 0x3c00);
        // 1 + 3 * 2^-11 rounds up to the even neighbour
        assert_eq!(f32_to_f16(1.0 + 3.0 / 2048.0), 0x3c02);
    }
}

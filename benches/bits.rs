/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bit_cursor::prelude::*;
use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const N: usize = 100_000;

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut r = SmallRng::seed_from_u64(0);
    let fields: Vec<(i64, usize)> = (0..N)
        .map(|_| {
            let width = r.random_range(1..=32);
            (r.random_range(0..(1_i64 << width)), width)
        })
        .collect();

    for endian in [BE, LE] {
        c.bench_function(&format!("write_bits<{}>", endian), |b| {
            b.iter(|| {
                let mut cursor = BitCursor::from_vec(Vec::with_capacity(4 * N));
                for &(value, width) in &fields {
                    cursor.write_bits_with(value, width, true, endian).unwrap();
                }
                black_box(cursor.into_vec())
            })
        });

        let mut cursor = BitCursor::from_vec(vec![]);
        for &(value, width) in &fields {
            cursor.write_bits_with(value, width, true, endian).unwrap();
        }
        c.bench_function(&format!("read_bits<{}>", endian), |b| {
            b.iter(|| {
                cursor.rewind();
                for &(_, width) in &fields {
                    black_box(cursor.read_bits_with(width, true, endian).unwrap());
                }
            })
        });
    }

    c.bench_function("write_u32", |b| {
        b.iter(|| {
            let mut cursor = BitCursor::from_vec(Vec::with_capacity(4 * N));
            for i in 0..N as u32 {
                cursor.write_u32_be(black_box(i)).unwrap();
            }
            black_box(cursor.into_vec())
        })
    });

    let mut haystack = BitCursor::from_vec(vec![0; 1 << 22]);
    haystack.seek((1 << 22) - 4, 0).unwrap();
    haystack.write_bytes(b"mark").unwrap();
    haystack.rewind();
    c.bench_function("find_bytes", |b| {
        b.iter(|| black_box(haystack.find_bytes(b"mark").unwrap()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits for reading and writing bit fields, scalars and strings.

Each codec is implemented as a pair of traits for reading and writing
(e.g., [`BitsRead`] and [`BitsWrite`]) whose methods have default
implementations based on [`BinAccess`](crate::traits::BinAccess); the
traits are implemented for every type implementing it, so they just need
to be in scope (e.g., through the [prelude](crate::prelude)).

| Codec | Granularity | Traits |
|-------|-------------|--------|
| [bit fields](bits) of 1 to 32 bits | bit | [`BitsRead`], [`BitsWrite`] |
| [integers and floats](scalar) | byte | [`ScalarRead`], [`ScalarWrite`] |
| [strings](strings) | byte | [`StringRead`], [`StringWrite`] |

Byte-granular codecs start at the next whole byte if the cursor is in the
middle of a byte.

*/

pub mod bits;
pub use bits::{BitsRead, BitsWrite};

pub mod half;

pub mod scalar;
pub use scalar::{ScalarRead, ScalarWrite};

pub mod strings;
pub use strings::{StringOptions, StringRead, StringType, StringWrite};

/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of stores and of the cursor.

A [`BitCursor`] is built over a [`ByteStore`](crate::traits::ByteStore):
use [`MemStore`] to work on a vector in memory (or just
[`BitCursor::from_vec`]), and [`FileStore`] to work directly on a file
(or just [`BitCursor::open`]). The code of the cursor does not depend on
the store, so the two behave identically, except that a file cannot be
grown or modified when opened in [`OpenMode::Read`].

The growth policy of the cursor is described by [`Bounds`], and the
options of a new cursor by [`CursorOptions`]. Besides the codecs of
[`codes`](crate::codes), a cursor provides byte-range edits, bulk
bitwise transforms (keyed by a [`Key`]) and forward searches.

*/

pub(crate) mod position;
pub use position::Position;

mod bounds;
pub use bounds::Bounds;

mod options;
pub use options::CursorOptions;

mod mem_store;
pub use mem_store::MemStore;

mod file_store;
pub use file_store::{FileStore, OpenMode};

mod bit_cursor;
pub use bit_cursor::BitCursor;

pub(crate) mod regions;

mod transform;
pub use transform::Key;

mod search;

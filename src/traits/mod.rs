/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits

[`ByteStore`] abstracts the storage of a cursor, [`BinAccess`] the
cursor itself as seen by the codecs in [`codes`](crate::codes).

*/

mod endianness;
pub use endianness::*;

mod store;
pub use store::*;

mod access;
pub use access::*;

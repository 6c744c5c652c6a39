/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{Error, Result};
use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// The growth policy of a cursor.
///
/// Every primitive computes the end of the byte range it is about to touch
/// and passes it to [`ensure`](Bounds::ensure) before accessing the store:
/// this is the only place where a store is grown or where an access beyond
/// the end is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
pub struct Bounds {
    /// Whether growth is forbidden.
    pub strict: bool,
    /// Minimum number of bytes added by a growth.
    pub grow_by: u64,
}

impl Bounds {
    #[must_use]
    pub const fn new(strict: bool, grow_by: u64) -> Self {
        Self { strict, grow_by }
    }

    /// Make sure that `store` holds at least `required_end` bytes.
    ///
    /// If the store is already large enough, nothing happens. Otherwise, if
    /// the policy is not strict, the store grows by the larger of the
    /// missing amount and [`grow_by`](Bounds::grow_by); if it is strict,
    /// [`Error::Bounds`] is returned and the store is left untouched.
    pub fn ensure<S: ByteStore + ?Sized>(&self, store: &mut S, required_end: u64) -> Result<()> {
        let size = store.len();
        if required_end <= size {
            return Ok(());
        }
        if self.strict {
            return Err(Error::Bounds {
                requested: required_end,
                available: size,
            });
        }
        let new_len = size.saturating_add((required_end - size).max(self.grow_by));
        tracing::debug!(from = size, to = new_len, required_end, "growing store");
        store.grow_to(new_len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::impls::MemStore;

    #[test]
    fn test_exact_growth() {
        let mut store = MemStore::new(vec![0_u8; 4]);
        let bounds = Bounds::new(false, 0);
        bounds.ensure(&mut store, 3).unwrap();
        assert_eq!(store.len(), 4);
        bounds.ensure(&mut store, 7).unwrap();
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_chunked_growth() {
        let mut store = MemStore::new(vec![0_u8; 4]);
        let bounds = Bounds::new(false, 16);
        bounds.ensure(&mut store, 5).unwrap();
        assert_eq!(store.len(), 20);
        // a request larger than the chunk grows exactly
        bounds.ensure(&mut store, 100).unwrap();
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn test_strict() {
        let mut store = MemStore::new(vec![0_u8; 4]);
        let bounds = Bounds::new(true, 16);
        bounds.ensure(&mut store, 4).unwrap();
        assert!(matches!(
            bounds.ensure(&mut store, 5),
            Err(Error::Bounds {
                requested: 5,
                available: 4
            })
        ));
        assert_eq!(store.len(), 4);
    }
}

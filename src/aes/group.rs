//! Group-local table cache for batch execution.
//!
//! One heap copy of the shared lookup tables serves every lane of a worker
//! group. The copy is populated cooperatively: each participating lane
//! writes a disjoint stripe of every table, and the populate step joins all
//! lanes before the cache is handed out, so no lane can read a stripe
//! another lane has not written yet. Reads then go through the same
//! `&AesTables` reference as the shared static; the cache is an optimization
//! and must never change output.

use rayon::prelude::*;

use super::tables::AesTables;

const STRIPE_WORDS: usize = 32;

/// A populated per-group copy of the AES lookup tables.
pub(crate) struct GroupTables {
    cache: Box<AesTables>,
}

impl GroupTables {
    /// Copy the shared tables into a fresh group cache, striped across the
    /// current worker pool. Returns only after every stripe is written.
    pub(crate) fn populate() -> Self {
        let shared = AesTables::shared();
        let mut cache = Box::new(AesTables::zeroed());

        {
            let stripes: Vec<(&mut [u32], &[u32])> = [
                (&mut cache.te0[..], &shared.te0[..]),
                (&mut cache.te1[..], &shared.te1[..]),
                (&mut cache.te2[..], &shared.te2[..]),
                (&mut cache.te3[..], &shared.te3[..]),
                (&mut cache.td0[..], &shared.td0[..]),
                (&mut cache.td1[..], &shared.td1[..]),
                (&mut cache.td2[..], &shared.td2[..]),
                (&mut cache.td3[..], &shared.td3[..]),
            ]
            .into_iter()
            .collect();

            stripes.into_par_iter().for_each(|(dst, src)| {
                dst.par_chunks_mut(STRIPE_WORDS)
                    .zip(src.par_chunks(STRIPE_WORDS))
                    .for_each(|(d, s)| d.copy_from_slice(s));
            });
        }

        cache.td4 = shared.td4;
        cache.rcon = shared.rcon;
        Self { cache }
    }

    /// The cached table set, read exactly like the shared static.
    pub(crate) fn tables(&self) -> &AesTables {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_copies_every_table() {
        let group = GroupTables::populate();
        let shared = AesTables::shared();
        let cached = group.tables();
        assert_eq!(cached.te0, shared.te0);
        assert_eq!(cached.te3, shared.te3);
        assert_eq!(cached.td0, shared.td0);
        assert_eq!(cached.td3, shared.td3);
        assert_eq!(cached.td4, shared.td4);
        assert_eq!(cached.rcon, shared.rcon);
    }
}

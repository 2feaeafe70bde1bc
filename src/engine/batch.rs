//! Batch hashing across a worker group.

use rayon::prelude::*;

use super::dispatcher::{active_backend, select};
use crate::aes::group::GroupTables;
use crate::slow_hash::{compute_with, Scratchpad, DIGEST_SIZE};
use crate::types::Error;

/// Hash every candidate in parallel, one scratchpad per worker.
///
/// The group table cache is populated cooperatively across the pool before
/// any lane starts hashing; every lane then reads through the same cache.
/// Results keep the input order.
pub fn compute_batch(candidates: &[&[u8]]) -> Vec<Result<[u8; DIGEST_SIZE], Error>> {
    let group = GroupTables::populate();
    let kernel = select(active_backend());
    candidates
        .par_iter()
        .map_init(Scratchpad::new, |scratch, data| {
            compute_with(data, scratch, kernel, group.tables())
        })
        .collect()
}

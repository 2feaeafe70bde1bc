//! Software kernels: the fill/fold sweeps and the mixing loop built on the
//! table-driven AES rounds.

use crate::aes::soft;
use crate::aes::tables::AesTables;
use crate::aes::PseudoKeys;
use crate::slow_hash::ITER;
use crate::types::Block;

/// Scratchpad index addressed by a block: bits 4..21 of the low lane.
#[inline]
fn block_index(block: &Block, mask: usize) -> usize {
    let (lo, _) = block.to_u64s();
    ((lo / 16) as usize) & mask
}

pub(crate) fn fill(
    blocks: &mut [Block; 8],
    keys: &PseudoKeys,
    pad: &mut [Block],
    t: &AesTables,
) {
    for group in pad.chunks_exact_mut(8) {
        for (block, slot) in blocks.iter_mut().zip(group.iter_mut()) {
            soft::pseudo_rounds(block, keys, t);
            *slot = *block;
        }
    }
}

pub(crate) fn fold(
    blocks: &mut [Block; 8],
    keys: &PseudoKeys,
    pad: &mut [Block],
    t: &AesTables,
) {
    for group in pad.chunks_exact(8) {
        for (block, slot) in blocks.iter_mut().zip(group.iter()) {
            *block = block.xor(slot);
            soft::pseudo_rounds(block, keys, t);
        }
    }
}

/// The serialized mixing loop. Each iteration performs two scratchpad
/// round-trips; the loaded block of each step addresses the store of the
/// next, which is what forces sequential execution.
pub(crate) fn mix(a: Block, b: Block, pad: &mut [Block], t: &AesTables) {
    let mask = pad.len() - 1;
    let mut a = a;
    let mut b = b;

    for _ in 0..ITER / 2 {
        // Step 1: AES round keyed by the running register.
        let j = block_index(&a, mask);
        let c = soft::encrypt_round(&pad[j], &a, t);
        pad[j] = b.xor(&c);
        let saved = a;

        // Step 2: widening multiply folded back into the saved register.
        let j2 = block_index(&c, mask);
        let loaded = pad[j2];
        let (c_lo, _) = c.to_u64s();
        let (l_lo, _) = loaded.to_u64s();
        let product = u128::from(c_lo) * u128::from(l_lo);
        let (s_lo, s_hi) = saved.to_u64s();
        let d = Block::from_u64s(
            s_lo.wrapping_add((product >> 64) as u64),
            s_hi.wrapping_add(product as u64),
        );
        pad[j2] = d;
        b = c;
        a = loaded.xor(&d);
    }
}

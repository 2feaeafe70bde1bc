//! Hardware kernels: the same sweeps and mixing loop as the software
//! kernels, with the AES round coming from `aesenc`.
//!
//! Each loop is one `#[target_feature]` function so the feature gate is
//! paid once per sweep, not once per round. The safe wrappers exist to fit
//! the kernel function-pointer contract; they are only ever installed by
//! the dispatcher after the capability probe has passed.

use crate::aes::aesni;
use crate::aes::tables::AesTables;
use crate::aes::PseudoKeys;
use crate::slow_hash::ITER;
use crate::types::Block;

#[inline]
fn block_index(block: &Block, mask: usize) -> usize {
    let (lo, _) = block.to_u64s();
    ((lo / 16) as usize) & mask
}

#[allow(unsafe_code)]
#[target_feature(enable = "aes", enable = "sse2")]
unsafe fn fill_impl(blocks: &mut [Block; 8], keys: &PseudoKeys, pad: &mut [Block]) {
    for group in pad.chunks_exact_mut(8) {
        for (block, slot) in blocks.iter_mut().zip(group.iter_mut()) {
            aesni::pseudo_rounds(block, keys);
            *slot = *block;
        }
    }
}

#[allow(unsafe_code)]
#[target_feature(enable = "aes", enable = "sse2")]
unsafe fn fold_impl(blocks: &mut [Block; 8], keys: &PseudoKeys, pad: &mut [Block]) {
    for group in pad.chunks_exact(8) {
        for (block, slot) in blocks.iter_mut().zip(group.iter()) {
            *block = block.xor(slot);
            aesni::pseudo_rounds(block, keys);
        }
    }
}

#[allow(unsafe_code)]
#[target_feature(enable = "aes", enable = "sse2")]
unsafe fn mix_impl(a: Block, b: Block, pad: &mut [Block]) {
    let mask = pad.len() - 1;
    let mut a = a;
    let mut b = b;

    for _ in 0..ITER / 2 {
        let j = block_index(&a, mask);
        let c = aesni::encrypt_round(&pad[j], &a);
        pad[j] = b.xor(&c);
        let saved = a;

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

pub(crate) fn fill(
    blocks: &mut [Block; 8],
    keys: &PseudoKeys,
    pad: &mut [Block],
    _t: &AesTables,
) {
    // SAFETY: this kernel is only selected after the capability probe
    // confirmed AES-NI and SSE2.
    #[allow(unsafe_code)]
    unsafe {
        fill_impl(blocks, keys, pad);
    }
}

pub(crate) fn fold(
    blocks: &mut [Block; 8],
    keys: &PseudoKeys,
    pad: &mut [Block],
    _t: &AesTables,
) {
    // SAFETY: as above.
    #[allow(unsafe_code)]
    unsafe {
        fold_impl(blocks, keys, pad);
    }
}

pub(crate) fn mix(a: Block, b: Block, pad: &mut [Block], _t: &AesTables) {
    // SAFETY: as above.
    #[allow(unsafe_code)]
    unsafe {
        mix_impl(a, b, pad);
    }
}

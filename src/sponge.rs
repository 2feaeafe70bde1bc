//! Keccak-1600 absorber glue.
//!
//! The permutation itself comes from the `keccak` crate; this module owns
//! the 200-byte state layout the engine works on. The state splits into key
//! material (bytes 0..64) and the scratch-seed region (bytes 64..192), with
//! explicit little-endian lane/byte conversion at every boundary.

use keccak::f1600;

use crate::types::Block;

/// Absorb rate in bytes for the 1600-bit permutation at capacity 512.
const RATE: usize = 136;

/// The 25-lane sponge state.
pub(crate) struct SpongeState {
    lanes: [u64; 25],
}

impl SpongeState {
    /// Absorb `data` with legacy Keccak padding (`0x01` domain byte, `0x80`
    /// on the final rate byte).
    pub(crate) fn absorb(data: &[u8]) -> Self {
        let mut lanes = [0u64; 25];

        let mut chunks = data.chunks_exact(RATE);
        for chunk in &mut chunks {
            xor_into_lanes(&mut lanes, chunk);
            f1600(&mut lanes);
        }

        let rem = chunks.remainder();
        let mut last = [0u8; RATE];
        last[..rem.len()].copy_from_slice(rem);
        last[rem.len()] = 0x01;
        last[RATE - 1] |= 0x80;
        xor_into_lanes(&mut lanes, &last);
        f1600(&mut lanes);

        Self { lanes }
    }

    /// One application of the 1600-bit permutation.
    pub(crate) fn permute(&mut self) {
        f1600(&mut self.lanes);
    }

    /// 32 bytes of key material starting at `offset` (0 or 32).
    pub(crate) fn key_material(&self, offset: usize) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..4 {
            out[8 * i..8 * i + 8].copy_from_slice(&self.lanes[offset / 8 + i].to_le_bytes());
        }
        out
    }

    /// The scratch-seed region, bytes 64..192, as eight working blocks.
    pub(crate) fn seed_blocks(&self) -> [Block; 8] {
        core::array::from_fn(|i| {
            Block::from_u64s(self.lanes[8 + 2 * i], self.lanes[9 + 2 * i])
        })
    }

    /// Write eight working blocks back into the scratch-seed region.
    pub(crate) fn set_seed_blocks(&mut self, blocks: &[Block; 8]) {
        for (i, block) in blocks.iter().enumerate() {
            let (lo, hi) = block.to_u64s();
            self.lanes[8 + 2 * i] = lo;
            self.lanes[9 + 2 * i] = hi;
        }
    }

    /// The mixing-loop registers: key material folded lane-wise,
    /// `a = k[0..16) ^ k[32..48)` and `b = k[16..32) ^ k[48..64)`.
    pub(crate) fn mix_registers(&self) -> (Block, Block) {
        let k = &self.lanes;
        let a = Block::from_u64s(k[0] ^ k[4], k[1] ^ k[5]);
        let b = Block::from_u64s(k[2] ^ k[6], k[3] ^ k[7]);
        (a, b)
    }

    /// The full state as 200 little-endian bytes.
    pub(crate) fn to_bytes(&self) -> [u8; 200] {
        let mut out = [0u8; 200];
        for (i, lane) in self.lanes.iter().enumerate() {
            out[8 * i..8 * i + 8].copy_from_slice(&lane.to_le_bytes());
        }
        out
    }
}

fn xor_into_lanes(lanes: &mut [u64; 25], block: &[u8]) {
    debug_assert_eq!(block.len(), RATE);
    for (lane, chunk) in lanes.iter_mut().zip(block.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        *lane ^= u64::from_le_bytes(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keccak-256 of the empty string starts c5d2460186f7; the first 32 state
    // bytes after absorbing "" are exactly that digest prefix.
    #[test]
    fn empty_absorb_matches_keccak256() {
        let state = SpongeState::absorb(&[]);
        let bytes = state.to_bytes();
        assert_eq!(
            &bytes[..32],
            &[
                0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc,
                0xc7, 0x03, 0xc0, 0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa,
                0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70
            ]
        );
    }

    #[test]
    fn multi_rate_absorb_differs_per_block_count() {
        let one = SpongeState::absorb(&[0xab; RATE - 1]);
        let two = SpongeState::absorb(&[0xab; RATE]);
        let three = SpongeState::absorb(&[0xab; 2 * RATE + 5]);
        assert_ne!(one.to_bytes()[..32], two.to_bytes()[..32]);
        assert_ne!(two.to_bytes()[..32], three.to_bytes()[..32]);
    }

    #[test]
    fn seed_blocks_round_trip() {
        let mut state = SpongeState::absorb(b"seed round trip");
        let blocks = state.seed_blocks();
        let mut mutated = blocks;
        for (i, block) in mutated.iter_mut().enumerate() {
            block.b[0] ^= 1 + i as u8;
        }
        state.set_seed_blocks(&mutated);
        assert_eq!(state.seed_blocks(), mutated);
        // Key material (bytes 0..64) untouched by seed writes.
        let fresh = SpongeState::absorb(b"seed round trip");
        assert_eq!(state.key_material(0), fresh.key_material(0));
        assert_eq!(state.key_material(32), fresh.key_material(32));
    }

    #[test]
    fn mix_registers_fold_key_lanes() {
        let state = SpongeState::absorb(b"registers");
        let k0 = state.key_material(0);
        let k1 = state.key_material(32);
        let (a, b) = state.mix_registers();
        let (a_lo, a_hi) = a.to_u64s();
        let le = |s: &[u8]| {
            let mut w = [0u8; 8];
            w.copy_from_slice(s);
            u64::from_le_bytes(w)
        };
        assert_eq!(a_lo, le(&k0[0..8]) ^ le(&k1[0..8]));
        assert_eq!(a_hi, le(&k0[8..16]) ^ le(&k1[8..16]));
        let (b_lo, b_hi) = b.to_u64s();
        assert_eq!(b_lo, le(&k0[16..24]) ^ le(&k1[16..24]));
        assert_eq!(b_hi, le(&k0[24..32]) ^ le(&k1[24..32]));
    }
}

//! The memory-hard hash engine.
//!
//! One computation runs seven strictly ordered stages: absorb the input
//! into the sponge, seed eight working blocks, expand them across the
//! 2 MiB scratchpad, fold the key material into two mixing registers, walk
//! the scratchpad for half a million two-step iterations, fold the
//! scratchpad back into the working blocks, then permute and hand the full
//! state to the selected finishing hash.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec};

use crate::aes::tables::AesTables;
use crate::aes::PseudoKeys;
use crate::engine::{self, Backend};
use crate::finish::FinishingHash;
use crate::sponge::SpongeState;
use crate::types::{Block, Error, Kernel};

/// Digest size in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Scratchpad footprint in bytes.
pub const MEMORY: usize = 1 << 21;

/// Total serialized memory round-trips of the mixing loop.
pub(crate) const ITER: usize = 1 << 20;

const BLOCK_SIZE: usize = 16;
const PAD_BLOCKS: usize = MEMORY / BLOCK_SIZE;

// =============================================================================
// SCRATCHPAD
// =============================================================================

/// The 2 MiB working memory of one hash computation.
///
/// Caller-owned so the allocation amortizes across calls: a recovery loop
/// allocates one per worker and reuses it for every candidate. Contents are
/// unspecified between calls; every computation overwrites what it reads,
/// so no clearing is needed. Never share one between concurrent
/// computations.
pub struct Scratchpad {
    pub(crate) blocks: Box<[Block]>,
}

impl Scratchpad {
    /// Allocate a zeroed scratchpad.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::ZERO; PAD_BLOCKS].into_boxed_slice(),
        }
    }
}

impl Default for Scratchpad {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// COMPUTE
// =============================================================================

/// Hash `data`, choosing the best available execution strategy.
///
/// # Errors
/// Propagates [`Error`] from key import; no digest is produced on failure
/// and the scratchpad remains usable for the next call.
pub fn compute(data: &[u8], scratch: &mut Scratchpad) -> Result<[u8; DIGEST_SIZE], Error> {
    compute_with_backend(data, scratch, engine::active_backend())
}

/// Hash `data` with an explicitly requested execution strategy.
///
/// A hardware request on a machine without AES-NI falls back to the
/// software strategy; both produce identical digests.
///
/// # Errors
/// Same contract as [`compute`].
pub fn compute_with_backend(
    data: &[u8],
    scratch: &mut Scratchpad,
    backend: Backend,
) -> Result<[u8; DIGEST_SIZE], Error> {
    compute_with(data, scratch, engine::select(backend), AesTables::shared())
}

pub(crate) fn compute_with(
    data: &[u8],
    scratch: &mut Scratchpad,
    kernel: &Kernel,
    tables: &AesTables,
) -> Result<[u8; DIGEST_SIZE], Error> {
    let mut state = SpongeState::absorb(data);

    // Expand: seed blocks from the scratch-seed region, key from state
    // bytes 0..32, then fill the whole scratchpad.
    let fill_keys = PseudoKeys::import(&state.key_material(0), tables)?;
    let mut blocks = state.seed_blocks();
    (kernel.fill)(&mut blocks, &fill_keys, &mut scratch.blocks, tables);

    // The serialized walk.
    let (a, b) = state.mix_registers();
    (kernel.mix)(a, b, &mut scratch.blocks, tables);

    // Fold the scratchpad back under the second key, state bytes 32..64.
    let fold_keys = PseudoKeys::import(&state.key_material(32), tables)?;
    let mut blocks = state.seed_blocks();
    (kernel.fold)(&mut blocks, &fold_keys, &mut scratch.blocks, tables);
    state.set_seed_blocks(&blocks);

    state.permute();
    let bytes = state.to_bytes();
    Ok(FinishingHash::from_selector(bytes[0]).digest(&bytes))
}

// =============================================================================
// CONVENIENCE SURFACE
// =============================================================================

/// One-shot hash that owns its scratchpad internally.
///
/// # Errors
/// Same contract as [`compute`].
pub fn slow_hash(data: &[u8]) -> Result<[u8; DIGEST_SIZE], Error> {
    let mut scratch = Scratchpad::new();
    compute(data, &mut scratch)
}

/// Hash `data` and compare against an expected digest in constant time.
///
/// # Errors
/// Same contract as [`compute`].
pub fn verify(data: &[u8], expected: &[u8; DIGEST_SIZE]) -> Result<bool, Error> {
    use subtle::ConstantTimeEq;

    let digest = slow_hash(data)?;
    Ok(digest[..].ct_eq(&expected[..]).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratchpad_has_exact_footprint() {
        let scratch = Scratchpad::new();
        assert_eq!(scratch.blocks.len() * BLOCK_SIZE, MEMORY);
        assert!(scratch.blocks.len().is_power_of_two());
    }

    #[test]
    fn scratchpad_reuse_is_invisible() {
        let mut scratch = Scratchpad::new();
        let first = compute(b"reuse", &mut scratch).unwrap();
        // Second call sees a dirty scratchpad and must not care.
        let second = compute(b"reuse", &mut scratch).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_regression() {
        let mut scratch = Scratchpad::new();
        let digest = compute(b"", &mut scratch).unwrap();
        assert_eq!(
            hex::encode(digest),
            "eb14e8a833fac6fe9a43b57b336789c46ffe93f2868452240720607b14387e11"
        );
    }

    #[test]
    fn verify_accepts_and_rejects() {
        let digest = slow_hash(b"verify me").unwrap();
        assert!(verify(b"verify me", &digest).unwrap());
        let mut wrong = digest;
        wrong[0] ^= 1;
        assert!(!verify(b"verify me", &wrong).unwrap());
    }
}

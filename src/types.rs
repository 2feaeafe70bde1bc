//! Shared types used across the crate.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

use crate::aes::tables::AesTables;
use crate::aes::PseudoKeys;

// =============================================================================
// BLOCK
// =============================================================================

/// One 16-byte cipher block.
///
/// The byte array is the canonical representation; the 64-bit-lane and
/// big-endian-word views used by the mixing loop and the table-driven rounds
/// are produced by explicit conversions, never by in-memory aliasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, align(16))]
pub struct Block {
    /// Raw block bytes.
    pub b: [u8; 16],
}

impl Block {
    /// The all-zero block.
    pub const ZERO: Self = Self { b: [0; 16] };

    /// Build a block from two little-endian 64-bit lanes.
    #[must_use]
    pub fn from_u64s(lo: u64, hi: u64) -> Self {
        let mut b = [0u8; 16];
        b[0..8].copy_from_slice(&lo.to_le_bytes());
        b[8..16].copy_from_slice(&hi.to_le_bytes());
        Self { b }
    }

    /// Decode the two little-endian 64-bit lanes.
    #[must_use]
    pub fn to_u64s(self) -> (u64, u64) {
        let lo = u64::from_le_bytes([
            self.b[0], self.b[1], self.b[2], self.b[3], self.b[4], self.b[5], self.b[6], self.b[7],
        ]);
        let hi = u64::from_le_bytes([
            self.b[8], self.b[9], self.b[10], self.b[11], self.b[12], self.b[13], self.b[14],
            self.b[15],
        ]);
        (lo, hi)
    }

    /// Lane-wise XOR.
    #[must_use]
    pub fn xor(&self, other: &Self) -> Self {
        let mut res = Self::ZERO;
        for (i, res_i) in res.b.iter_mut().enumerate() {
            *res_i = self.b[i] ^ other.b[i];
        }
        res
    }
}

// =============================================================================
// KERNEL INTERFACE
// =============================================================================

/// Scratchpad fill/fold sweep: `(working_blocks, round_keys, scratchpad, tables)`.
///
/// Both execution strategies (AES-NI and software tables) implement this same
/// signature so the dispatcher can swap them at call granularity.
pub(crate) type SweepFn = fn(&mut [Block; 8], &PseudoKeys, &mut [Block], &AesTables);

/// Serialized mixing loop: `(a, b, scratchpad, tables)`.
pub(crate) type MixFn = fn(Block, Block, &mut [Block], &AesTables);

/// One execution strategy of the memory-hard engine, selected once per call.
pub(crate) struct Kernel {
    pub name: &'static str,
    pub fill: SweepFn,
    pub fold: SweepFn,
    pub mix: MixFn,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Failures of the cipher and hash engine.
///
/// Every failure is deterministic over its inputs; there is no retry logic
/// anywhere in this crate because a retry would fail identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A key schedule was requested for an unsupported key length.
    /// Only 16-, 24- and 32-byte (128/192/256-bit) keys exist.
    InvalidKeySize {
        /// The rejected key length in bytes.
        len: usize,
    },
    /// The engine's internal key import rejected the derived key material.
    KeyImport,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKeySize { len } => {
                write!(f, "invalid AES key size: {len} bytes (expected 16, 24 or 32)")
            }
            Self::KeyImport => write!(f, "cipher context rejected derived key material"),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}

//! Finishing-hash dispatch.
//!
//! The final 200-byte sponge state is condensed to 32 bytes by one of four
//! digests, selected by the two low bits of state byte 0. The digests
//! themselves are consumed as crates; only the selection lives here.

use digest::Digest;

/// The finishing hash family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FinishingHash {
    Blake,
    Groestl,
    Jh,
    Skein,
}

impl FinishingHash {
    /// Selection order is fixed by the two low bits of the selector byte:
    /// BLAKE-256, Groestl-256, JH-256, Skein-512-256.
    pub(crate) fn from_selector(byte: u8) -> Self {
        match byte & 3 {
            0 => Self::Blake,
            1 => Self::Groestl,
            2 => Self::Jh,
            _ => Self::Skein,
        }
    }

    /// Digest the full 200-byte state down to the 32-byte output.
    pub(crate) fn digest(self, state: &[u8; 200]) -> [u8; 32] {
        match self {
            Self::Blake => {
                use blake_hash::Digest as _;
                blake_hash::Blake256::digest(state).into()
            }
            Self::Groestl => groestl::Groestl256::digest(state).into(),
            Self::Jh => jh::Jh256::digest(state).into(),
            Self::Skein => skein::Skein512::<digest::consts::U32>::digest(state).into(),
        }
    }
}

//! CryptoNight memory-hard slow hash for password-recovery workloads.
//!
//! The hash forces every evaluation through a 2 MiB scratchpad and a
//! serialized walk of 2^20 memory round-trips, which is what makes bulk
//! candidate testing expensive on specialized hardware. The AES round
//! function at its core ships in two interchangeable execution strategies:
//! hardware AES-NI, probed once at startup, and a table-driven software
//! implementation that runs everywhere. Both are bit-identical for every
//! input.
//!
//! Allocate a [`Scratchpad`] once per worker and reuse it:
//!
//! ```no_run
//! use cryptonight::{compute, Scratchpad};
//!
//! # fn main() -> Result<(), cryptonight::Error> {
//! let mut scratch = Scratchpad::new();
//! let digest = compute(b"candidate password", &mut scratch)?;
//! assert_eq!(digest.len(), 32);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod aes;
mod engine;
mod finish;
mod slow_hash;
mod sponge;
mod types;

pub use aes::AesKey;
#[cfg(feature = "multithread")]
pub use engine::compute_batch;
pub use engine::{hardware_path_available, Backend};
pub use slow_hash::{
    compute, compute_with_backend, slow_hash, verify, Scratchpad, DIGEST_SIZE, MEMORY,
};
pub use types::{Block, Error};

/// Name of the execution strategy a plain [`compute`] call selects on this
/// machine.
#[must_use]
pub fn active_backend() -> &'static str {
    engine::select(engine::active_backend()).name
}

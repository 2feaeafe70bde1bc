//! AES-NI strategy (x86_64).
//!
//! Every function here carries `#[target_feature(enable = "aes", "sse2")]`
//! and is therefore unsafe to call: callers must have gone through the
//! capability probe first. Round keys are materialized from the schedule
//! words right before the load, so the schedule layout stays identical to
//! the software strategy's.

use core::arch::x86_64::{
    __m128i, _mm_aesdec_si128, _mm_aesdeclast_si128, _mm_aesenc_si128, _mm_aesenclast_si128,
    _mm_loadu_si128, _mm_storeu_si128, _mm_xor_si128,
};

use super::{AesKey, PseudoKeys};
use crate::types::Block;

#[inline]
fn round_key_bytes(key: &AesKey, r: usize) -> [u8; 16] {
    let mut out = [0u8; 16];
    for i in 0..4 {
        out[4 * i..4 * i + 4].copy_from_slice(&key.rd_key[4 * r + i].to_be_bytes());
    }
    out
}

/// One `aesenc` application: bit-identical to the table-driven full round.
///
/// # Safety
/// Requires the `aes` and `sse2` target features at runtime.
#[allow(unsafe_code)]
#[target_feature(enable = "aes", enable = "sse2")]
pub(crate) unsafe fn encrypt_round(block: &Block, round_key: &Block) -> Block {
    let s = _mm_loadu_si128(block.b.as_ptr().cast::<__m128i>());
    let k = _mm_loadu_si128(round_key.b.as_ptr().cast::<__m128i>());
    let mut out = Block::ZERO;
    _mm_storeu_si128(out.b.as_mut_ptr().cast::<__m128i>(), _mm_aesenc_si128(s, k));
    out
}

/// Ten chained `aesenc` applications keyed by the pseudo-encryption keys;
/// no whitening and no final-round variant.
///
/// # Safety
/// Requires the `aes` and `sse2` target features at runtime.
#[allow(unsafe_code)]
#[target_feature(enable = "aes", enable = "sse2")]
pub(crate) unsafe fn pseudo_rounds(block: &mut Block, keys: &PseudoKeys) {
    let mut s = _mm_loadu_si128(block.b.as_ptr().cast::<__m128i>());
    for rk in &keys.bytes {
        let k = _mm_loadu_si128(rk.as_ptr().cast::<__m128i>());
        s = _mm_aesenc_si128(s, k);
    }
    _mm_storeu_si128(block.b.as_mut_ptr().cast::<__m128i>(), s);
}

/// Encrypt one block. `key` must be an encryption schedule.
///
/// # Safety
/// Requires the `aes` and `sse2` target features at runtime.
#[allow(unsafe_code)]
#[target_feature(enable = "aes", enable = "sse2")]
pub(crate) unsafe fn encrypt_block(input: &[u8; 16], key: &AesKey) -> [u8; 16] {
    let whitening = round_key_bytes(key, 0);
    let mut s = _mm_loadu_si128(input.as_ptr().cast::<__m128i>());
    s = _mm_xor_si128(
        s,
        _mm_loadu_si128(whitening.as_ptr().cast::<__m128i>()),
    );
    for r in 1..key.rounds {
        let rk = round_key_bytes(key, r);
        s = _mm_aesenc_si128(s, _mm_loadu_si128(rk.as_ptr().cast::<__m128i>()));
    }
    let last = round_key_bytes(key, key.rounds);
    s = _mm_aesenclast_si128(s, _mm_loadu_si128(last.as_ptr().cast::<__m128i>()));

    let mut out = [0u8; 16];
    _mm_storeu_si128(out.as_mut_ptr().cast::<__m128i>(), s);
    out
}

/// Decrypt one block. `key` must be a decryption schedule; the table-derived
/// schedule is already in the equivalent-inverse-cipher form `aesdec`
/// expects, so no extra transform happens here.
///
/// # Safety
/// Requires the `aes` and `sse2` target features at runtime.
#[allow(unsafe_code)]
#[target_feature(enable = "aes", enable = "sse2")]
pub(crate) unsafe fn decrypt_block(input: &[u8; 16], key: &AesKey) -> [u8; 16] {
    let whitening = round_key_bytes(key, 0);
    let mut s = _mm_loadu_si128(input.as_ptr().cast::<__m128i>());
    s = _mm_xor_si128(
        s,
        _mm_loadu_si128(whitening.as_ptr().cast::<__m128i>()),
    );
    for r in 1..key.rounds {
        let rk = round_key_bytes(key, r);
        s = _mm_aesdec_si128(s, _mm_loadu_si128(rk.as_ptr().cast::<__m128i>()));
    }
    let last = round_key_bytes(key, key.rounds);
    s = _mm_aesdeclast_si128(s, _mm_loadu_si128(last.as_ptr().cast::<__m128i>()));

    let mut out = [0u8; 16];
    _mm_storeu_si128(out.as_mut_ptr().cast::<__m128i>(), s);
    out
}

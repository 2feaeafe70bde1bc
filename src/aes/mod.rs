//! AES primitive with two interchangeable execution strategies.
//!
//! The software strategy ([`soft`]) runs everywhere; the hardware strategy
//! ([`aesni`]) uses the AES-NI instruction set when the capability probe
//! confirms it. Both are bit-identical for every input, so the dispatcher is
//! free to pick per call.

#[cfg(target_arch = "x86_64")]
pub(crate) mod aesni;
#[cfg(feature = "multithread")]
pub(crate) mod group;
pub(crate) mod soft;
pub(crate) mod tables;

use crate::types::Error;
use tables::AesTables;

// =============================================================================
// KEY SCHEDULE
// =============================================================================

/// An expanded AES key schedule.
///
/// Holds room for the largest (256-bit) schedule; `rounds` fixes how much of
/// it is live. A schedule is either an encryption or a decryption schedule
/// depending on which constructor built it, and must only be used with the
/// matching block operation.
#[derive(Clone, Debug)]
pub struct AesKey {
    pub(crate) rd_key: [u32; 60],
    pub(crate) rounds: usize,
}

impl AesKey {
    /// Expand raw key bytes into an encryption schedule.
    ///
    /// # Errors
    /// [`Error::InvalidKeySize`] unless the key is 16, 24 or 32 bytes.
    pub fn encrypt(key: &[u8]) -> Result<Self, Error> {
        soft::expand_encrypt_key(key, AesTables::shared())
    }

    /// Expand raw key bytes into a decryption schedule.
    ///
    /// # Errors
    /// [`Error::InvalidKeySize`] unless the key is 16, 24 or 32 bytes.
    pub fn decrypt(key: &[u8]) -> Result<Self, Error> {
        soft::expand_decrypt_key(key, AesTables::shared())
    }

    /// Encrypt one block. `self` must be an encryption schedule.
    #[must_use]
    pub fn encrypt_block(&self, input: &[u8; 16]) -> [u8; 16] {
        #[cfg(target_arch = "x86_64")]
        if crate::engine::hardware_path_available() {
            // SAFETY: the capability probe confirmed AES-NI and SSE2.
            #[allow(unsafe_code)]
            return unsafe { aesni::encrypt_block(input, self) };
        }
        soft::encrypt_block(input, self, AesTables::shared())
    }

    /// Decrypt one block. `self` must be a decryption schedule.
    ///
    /// The decryption schedule is already in the equivalent-inverse-cipher
    /// form, so the same schedule drives both the table rounds and `aesdec`.
    #[must_use]
    pub fn decrypt_block(&self, input: &[u8; 16]) -> [u8; 16] {
        #[cfg(target_arch = "x86_64")]
        if crate::engine::hardware_path_available() {
            // SAFETY: the capability probe confirmed AES-NI and SSE2.
            #[allow(unsafe_code)]
            return unsafe { aesni::decrypt_block(input, self) };
        }
        soft::decrypt_block(input, self, AesTables::shared())
    }
}

// =============================================================================
// PSEUDO-ENCRYPTION KEYS
// =============================================================================

/// The first ten round keys of an AES-256 encryption schedule, as consumed
/// by the scratchpad expansion rounds.
///
/// Kept in both views the two strategies want: big-endian schedule words for
/// the table rounds, raw 16-byte round keys for `aesenc`.
#[derive(Debug)]
pub(crate) struct PseudoKeys {
    pub(crate) words: [u32; 40],
    pub(crate) bytes: [[u8; 16]; 10],
}

impl PseudoKeys {
    /// Import 32 bytes of derived key material and expand the schedule.
    ///
    /// # Errors
    /// [`Error::KeyImport`] if the material is not exactly 32 bytes.
    pub(crate) fn import(material: &[u8], t: &AesTables) -> Result<Self, Error> {
        if material.len() != 32 {
            return Err(Error::KeyImport);
        }
        let schedule = soft::expand_encrypt_key(material, t)?;

        let mut words = [0u32; 40];
        words.copy_from_slice(&schedule.rd_key[..40]);

        let mut bytes = [[0u8; 16]; 10];
        for (r, rk) in bytes.iter_mut().enumerate() {
            for i in 0..4 {
                rk[4 * i..4 * i + 4].copy_from_slice(&words[4 * r + i].to_be_bytes());
            }
        }
        Ok(Self { words, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Block;

    #[test]
    fn round_trip_all_key_sizes() {
        for len in [16usize, 24, 32] {
            let key: Vec<u8> = (0..len as u8).map(|i| i.wrapping_mul(7)).collect();
            let enc = AesKey::encrypt(&key).unwrap();
            let dec = AesKey::decrypt(&key).unwrap();
            let pt = *b"sixteen byte msg";
            assert_eq!(dec.decrypt_block(&enc.encrypt_block(&pt)), pt);
        }
    }

    #[test]
    fn pseudo_key_import_rejects_wrong_length() {
        let t = AesTables::shared();
        for len in [0usize, 16, 24, 31, 33] {
            let material = vec![0x5au8; len];
            assert_eq!(
                PseudoKeys::import(&material, t).unwrap_err(),
                Error::KeyImport
            );
        }
        assert!(PseudoKeys::import(&[0x5a; 32], t).is_ok());
    }

    #[test]
    fn pseudo_key_views_agree() {
        let t = AesTables::shared();
        let material: [u8; 32] = core::array::from_fn(|i| i as u8);
        let keys = PseudoKeys::import(&material, t).unwrap();
        for r in 0..10 {
            for i in 0..4 {
                assert_eq!(
                    keys.bytes[r][4 * i..4 * i + 4],
                    keys.words[4 * r + i].to_be_bytes()
                );
            }
        }
        // Round key 0 is the first half of the raw key.
        assert_eq!(keys.bytes[0], material[..16]);
    }

    #[test]
    fn soft_round_matches_pseudo_round_chain() {
        let t = AesTables::shared();
        let material: [u8; 32] = core::array::from_fn(|i| (i as u8).wrapping_mul(31));
        let keys = PseudoKeys::import(&material, t).unwrap();

        let start = Block {
            b: core::array::from_fn(|i| (i as u8) ^ 0xa5),
        };
        let mut chained = start;
        soft::pseudo_rounds(&mut chained, &keys, t);

        let mut manual = start;
        for rk in &keys.bytes {
            manual = soft::encrypt_round(&manual, &Block { b: *rk }, t);
        }
        assert_eq!(chained, manual);
    }

    // Strategy-equality over randomized inputs; skipped where the hardware
    // path is absent.
    #[cfg(all(target_arch = "x86_64", feature = "std"))]
    #[test]
    fn soft_matches_aesni_block_ops() {
        use rand::RngCore;

        if !crate::engine::hardware_path_available() {
            return;
        }
        let t = AesTables::shared();
        let mut rng = rand::rng();
        let mut key = [0u8; 32];
        let mut block = [0u8; 16];

        for len in [16usize, 24, 32] {
            for _ in 0..10_000 {
                rng.fill_bytes(&mut key[..len]);
                rng.fill_bytes(&mut block);

                let enc = AesKey::encrypt(&key[..len]).unwrap();
                let soft_ct = soft::encrypt_block(&block, &enc, t);
                // SAFETY: hardware_path_available confirmed AES-NI and SSE2.
                #[allow(unsafe_code)]
                let hw_ct = unsafe { aesni::encrypt_block(&block, &enc) };
                assert_eq!(soft_ct, hw_ct);

                let dec = AesKey::decrypt(&key[..len]).unwrap();
                let soft_pt = soft::decrypt_block(&soft_ct, &dec, t);
                // SAFETY: as above.
                #[allow(unsafe_code)]
                let hw_pt = unsafe { aesni::decrypt_block(&soft_ct, &dec) };
                assert_eq!(soft_pt, hw_pt);
                assert_eq!(soft_pt, block);
            }
        }
    }

    #[cfg(all(target_arch = "x86_64", feature = "std"))]
    #[test]
    fn soft_matches_aesni_round_primitives() {
        use rand::RngCore;

        if !crate::engine::hardware_path_available() {
            return;
        }
        let t = AesTables::shared();
        let mut rng = rand::rng();
        let mut material = [0u8; 32];
        let mut block = [0u8; 16];
        let mut round_key = [0u8; 16];

        for _ in 0..10_000 {
            rng.fill_bytes(&mut material);
            rng.fill_bytes(&mut block);
            rng.fill_bytes(&mut round_key);

            let b = Block { b: block };
            let k = Block { b: round_key };
            let soft_out = soft::encrypt_round(&b, &k, t);
            // SAFETY: hardware_path_available confirmed AES-NI and SSE2.
            #[allow(unsafe_code)]
            let hw_out = unsafe { aesni::encrypt_round(&b, &k) };
            assert_eq!(soft_out, hw_out);

            let keys = PseudoKeys::import(&material, t).unwrap();
            let mut soft_chain = b;
            soft::pseudo_rounds(&mut soft_chain, &keys, t);
            let mut hw_chain = b;
            // SAFETY: as above.
            #[allow(unsafe_code)]
            unsafe {
                aesni::pseudo_rounds(&mut hw_chain, &keys);
            }
            assert_eq!(soft_chain, hw_chain);
        }
    }
}

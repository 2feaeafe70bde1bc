//! Table-driven AES (software strategy).
//!
//! Round and schedule logic in the classic four-table form. Block bytes are
//! mapped to four big-endian 32-bit words at every boundary; the tables are
//! always read through an explicit [`AesTables`] reference so the shared
//! static and a group-local cache go through the same code.

use super::tables::AesTables;
use super::{AesKey, PseudoKeys};
use crate::types::{Block, Error};

#[inline]
fn get_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

#[inline]
fn put_u32(b: &mut [u8], v: u32) {
    b.copy_from_slice(&v.to_be_bytes());
}

// =============================================================================
// KEY SCHEDULE
// =============================================================================

/// Rotate-and-substitute step of the key schedule, assembled from the four
/// encryption tables masked per byte lane.
#[inline]
fn sub_rot_word(w: u32, t: &AesTables) -> u32 {
    (t.te2[(w >> 16) as usize & 0xff] & 0xff00_0000)
        ^ (t.te3[(w >> 8) as usize & 0xff] & 0x00ff_0000)
        ^ (t.te0[w as usize & 0xff] & 0x0000_ff00)
        ^ (t.te1[(w >> 24) as usize] & 0x0000_00ff)
}

/// Substitution without the byte rotate (even steps of the 256-bit schedule).
#[inline]
fn sub_word(w: u32, t: &AesTables) -> u32 {
    (t.te2[(w >> 24) as usize] & 0xff00_0000)
        ^ (t.te3[(w >> 16) as usize & 0xff] & 0x00ff_0000)
        ^ (t.te0[(w >> 8) as usize & 0xff] & 0x0000_ff00)
        ^ (t.te1[w as usize & 0xff] & 0x0000_00ff)
}

/// Expand raw key bytes into the encryption schedule.
///
/// Distinct iteration counts and round-constant cadence per key size:
/// 10, 8 and 7 constant-injection steps for 128-, 192- and 256-bit keys.
pub fn expand_encrypt_key(key: &[u8], t: &AesTables) -> Result<AesKey, Error> {
    let rounds = match key.len() {
        16 => 10,
        24 => 12,
        32 => 14,
        len => return Err(Error::InvalidKeySize { len }),
    };

    let mut rk = [0u32; 60];
    for (i, chunk) in key.chunks_exact(4).enumerate() {
        rk[i] = get_u32(chunk);
    }

    match rounds {
        10 => {
            let mut i = 0;
            let mut o = 0;
            loop {
                let temp = rk[o + 3];
                rk[o + 4] = rk[o] ^ sub_rot_word(temp, t) ^ t.rcon[i];
                rk[o + 5] = rk[o + 1] ^ rk[o + 4];
                rk[o + 6] = rk[o + 2] ^ rk[o + 5];
                rk[o + 7] = rk[o + 3] ^ rk[o + 6];
                i += 1;
                if i == 10 {
                    break;
                }
                o += 4;
            }
        }
        12 => {
            let mut i = 0;
            let mut o = 0;
            loop {
                let temp = rk[o + 5];
                rk[o + 6] = rk[o] ^ sub_rot_word(temp, t) ^ t.rcon[i];
                rk[o + 7] = rk[o + 1] ^ rk[o + 6];
                rk[o + 8] = rk[o + 2] ^ rk[o + 7];
                rk[o + 9] = rk[o + 3] ^ rk[o + 8];
                i += 1;
                if i == 8 {
                    break;
                }
                rk[o + 10] = rk[o + 4] ^ rk[o + 9];
                rk[o + 11] = rk[o + 5] ^ rk[o + 10];
                o += 6;
            }
        }
        _ => {
            let mut i = 0;
            let mut o = 0;
            loop {
                let temp = rk[o + 7];
                rk[o + 8] = rk[o] ^ sub_rot_word(temp, t) ^ t.rcon[i];
                rk[o + 9] = rk[o + 1] ^ rk[o + 8];
                rk[o + 10] = rk[o + 2] ^ rk[o + 9];
                rk[o + 11] = rk[o + 3] ^ rk[o + 10];
                i += 1;
                if i == 7 {
                    break;
                }
                let temp = rk[o + 11];
                rk[o + 12] = rk[o + 4] ^ sub_word(temp, t);
                rk[o + 13] = rk[o + 5] ^ rk[o + 12];
                rk[o + 14] = rk[o + 6] ^ rk[o + 13];
                rk[o + 15] = rk[o + 7] ^ rk[o + 14];
                o += 8;
            }
        }
    }

    Ok(AesKey { rd_key: rk, rounds })
}

/// Derive the decryption schedule from an encryption schedule: reverse the
/// round-key groups, then apply the inverse mix-column transform (forward
/// substitution followed by a decryption-table lookup) to every round key
/// except the first and the last.
pub fn expand_decrypt_key(key: &[u8], t: &AesTables) -> Result<AesKey, Error> {
    let mut schedule = expand_encrypt_key(key, t)?;
    let rk = &mut schedule.rd_key;

    let mut i = 0;
    let mut j = 4 * schedule.rounds;
    while i < j {
        for n in 0..4 {
            rk.swap(i + n, j + n);
        }
        i += 4;
        j -= 4;
    }

    for r in 1..schedule.rounds {
        for n in 0..4 {
            let w = rk[4 * r + n];
            rk[4 * r + n] = t.td0[(t.te1[(w >> 24) as usize] & 0xff) as usize]
                ^ t.td1[(t.te1[(w >> 16) as usize & 0xff] & 0xff) as usize]
                ^ t.td2[(t.te1[(w >> 8) as usize & 0xff] & 0xff) as usize]
                ^ t.td3[(t.te1[w as usize & 0xff] & 0xff) as usize];
        }
    }

    Ok(schedule)
}

// =============================================================================
// ROUND PRIMITIVES
// =============================================================================

#[inline]
fn enc_round_words(s: &[u32; 4], rk: &[u32], t: &AesTables) -> [u32; 4] {
    [
        t.te0[(s[0] >> 24) as usize]
            ^ t.te1[(s[1] >> 16) as usize & 0xff]
            ^ t.te2[(s[2] >> 8) as usize & 0xff]
            ^ t.te3[s[3] as usize & 0xff]
            ^ rk[0],
        t.te0[(s[1] >> 24) as usize]
            ^ t.te1[(s[2] >> 16) as usize & 0xff]
            ^ t.te2[(s[3] >> 8) as usize & 0xff]
            ^ t.te3[s[0] as usize & 0xff]
            ^ rk[1],
        t.te0[(s[2] >> 24) as usize]
            ^ t.te1[(s[3] >> 16) as usize & 0xff]
            ^ t.te2[(s[0] >> 8) as usize & 0xff]
            ^ t.te3[s[1] as usize & 0xff]
            ^ rk[2],
        t.te0[(s[3] >> 24) as usize]
            ^ t.te1[(s[0] >> 16) as usize & 0xff]
            ^ t.te2[(s[1] >> 8) as usize & 0xff]
            ^ t.te3[s[2] as usize & 0xff]
            ^ rk[3],
    ]
}

#[inline]
fn dec_round_words(s: &[u32; 4], rk: &[u32], t: &AesTables) -> [u32; 4] {
    [
        t.td0[(s[0] >> 24) as usize]
            ^ t.td1[(s[3] >> 16) as usize & 0xff]
            ^ t.td2[(s[2] >> 8) as usize & 0xff]
            ^ t.td3[s[1] as usize & 0xff]
            ^ rk[0],
        t.td0[(s[1] >> 24) as usize]
            ^ t.td1[(s[0] >> 16) as usize & 0xff]
            ^ t.td2[(s[3] >> 8) as usize & 0xff]
            ^ t.td3[s[2] as usize & 0xff]
            ^ rk[1],
        t.td0[(s[2] >> 24) as usize]
            ^ t.td1[(s[1] >> 16) as usize & 0xff]
            ^ t.td2[(s[0] >> 8) as usize & 0xff]
            ^ t.td3[s[3] as usize & 0xff]
            ^ rk[2],
        t.td0[(s[3] >> 24) as usize]
            ^ t.td1[(s[2] >> 16) as usize & 0xff]
            ^ t.td2[(s[1] >> 8) as usize & 0xff]
            ^ t.td3[s[0] as usize & 0xff]
            ^ rk[3],
    ]
}

#[inline]
fn load_words(block: &[u8; 16]) -> [u32; 4] {
    [
        get_u32(&block[0..4]),
        get_u32(&block[4..8]),
        get_u32(&block[8..12]),
        get_u32(&block[12..16]),
    ]
}

#[inline]
fn store_words(words: &[u32; 4]) -> [u8; 16] {
    let mut out = [0u8; 16];
    put_u32(&mut out[0..4], words[0]);
    put_u32(&mut out[4..8], words[1]);
    put_u32(&mut out[8..12], words[2]);
    put_u32(&mut out[12..16], words[3]);
    out
}

/// One full AES round (SubBytes, ShiftRows, MixColumns, AddRoundKey) keyed
/// by a raw 16-byte round key. Bit-identical to the hardware `aesenc`
/// instruction for the same inputs.
#[must_use]
pub fn encrypt_round(block: &Block, round_key: &Block, t: &AesTables) -> Block {
    let s = load_words(&block.b);
    let rk = load_words(&round_key.b);
    Block {
        b: store_words(&enc_round_words(&s, &rk, t)),
    }
}

/// Ten chained full rounds keyed by the first ten round keys of an AES-256
/// schedule. No whitening step and no final-round variant: this is the
/// scratchpad expansion primitive, not the block cipher.
pub fn pseudo_rounds(block: &mut Block, keys: &PseudoKeys, t: &AesTables) {
    let mut s = load_words(&block.b);
    for r in 0..10 {
        s = enc_round_words(&s, &keys.words[4 * r..4 * r + 4], t);
    }
    block.b = store_words(&s);
}

// =============================================================================
// BLOCK ENCRYPT / DECRYPT
// =============================================================================

/// `rounds - 1` full rounds, two per loop iteration. Returns the state
/// feeding the final round; the final round key sits at `4 * rounds`.
#[cfg(not(feature = "full-unroll"))]
fn enc_rounds(s0: [u32; 4], key: &AesKey, t: &AesTables) -> [u32; 4] {
    let rk = &key.rd_key;
    let mut s = s0;
    let mut out;
    let mut k = 0;
    let mut r = key.rounds >> 1;
    loop {
        out = enc_round_words(&s, &rk[k + 4..k + 8], t);
        k += 8;
        r -= 1;
        if r == 0 {
            break;
        }
        s = enc_round_words(&out, &rk[k..k + 4], t);
    }
    out
}

#[cfg(not(feature = "full-unroll"))]
fn dec_rounds(s0: [u32; 4], key: &AesKey, t: &AesTables) -> [u32; 4] {
    let rk = &key.rd_key;
    let mut s = s0;
    let mut out;
    let mut k = 0;
    let mut r = key.rounds >> 1;
    loop {
        out = dec_round_words(&s, &rk[k + 4..k + 8], t);
        k += 8;
        r -= 1;
        if r == 0 {
            break;
        }
        s = dec_round_words(&out, &rk[k..k + 4], t);
    }
    out
}

/// Every round spelled out straight-line, for targets that dislike the
/// paired-round branch. Must match the looped variant bit for bit.
#[cfg(feature = "full-unroll")]
fn enc_rounds(s0: [u32; 4], key: &AesKey, t: &AesTables) -> [u32; 4] {
    let rk = &key.rd_key;
    let mut s = enc_round_words(&s0, &rk[4..8], t);
    s = enc_round_words(&s, &rk[8..12], t);
    s = enc_round_words(&s, &rk[12..16], t);
    s = enc_round_words(&s, &rk[16..20], t);
    s = enc_round_words(&s, &rk[20..24], t);
    s = enc_round_words(&s, &rk[24..28], t);
    s = enc_round_words(&s, &rk[28..32], t);
    s = enc_round_words(&s, &rk[32..36], t);
    s = enc_round_words(&s, &rk[36..40], t);
    if key.rounds > 10 {
        s = enc_round_words(&s, &rk[40..44], t);
        s = enc_round_words(&s, &rk[44..48], t);
        if key.rounds > 12 {
            s = enc_round_words(&s, &rk[48..52], t);
            s = enc_round_words(&s, &rk[52..56], t);
        }
    }
    s
}

#[cfg(feature = "full-unroll")]
fn dec_rounds(s0: [u32; 4], key: &AesKey, t: &AesTables) -> [u32; 4] {
    let rk = &key.rd_key;
    let mut s = dec_round_words(&s0, &rk[4..8], t);
    s = dec_round_words(&s, &rk[8..12], t);
    s = dec_round_words(&s, &rk[12..16], t);
    s = dec_round_words(&s, &rk[16..20], t);
    s = dec_round_words(&s, &rk[20..24], t);
    s = dec_round_words(&s, &rk[24..28], t);
    s = dec_round_words(&s, &rk[28..32], t);
    s = dec_round_words(&s, &rk[32..36], t);
    s = dec_round_words(&s, &rk[36..40], t);
    if key.rounds > 10 {
        s = dec_round_words(&s, &rk[40..44], t);
        s = dec_round_words(&s, &rk[44..48], t);
        if key.rounds > 12 {
            s = dec_round_words(&s, &rk[48..52], t);
            s = dec_round_words(&s, &rk[52..56], t);
        }
    }
    s
}

/// Encrypt a single block with the table-driven strategy.
#[must_use]
pub fn encrypt_block(input: &[u8; 16], key: &AesKey, t: &AesTables) -> [u8; 16] {
    let rk = &key.rd_key;
    let s0 = [
        get_u32(&input[0..4]) ^ rk[0],
        get_u32(&input[4..8]) ^ rk[1],
        get_u32(&input[8..12]) ^ rk[2],
        get_u32(&input[12..16]) ^ rk[3],
    ];
    let s = enc_rounds(s0, key, t);

    // Final round omits the mix-column step: masked encryption tables.
    let k = 4 * key.rounds;
    let out = [
        (t.te2[(s[0] >> 24) as usize] & 0xff00_0000)
            ^ (t.te3[(s[1] >> 16) as usize & 0xff] & 0x00ff_0000)
            ^ (t.te0[(s[2] >> 8) as usize & 0xff] & 0x0000_ff00)
            ^ (t.te1[s[3] as usize & 0xff] & 0x0000_00ff)
            ^ rk[k],
        (t.te2[(s[1] >> 24) as usize] & 0xff00_0000)
            ^ (t.te3[(s[2] >> 16) as usize & 0xff] & 0x00ff_0000)
            ^ (t.te0[(s[3] >> 8) as usize & 0xff] & 0x0000_ff00)
            ^ (t.te1[s[0] as usize & 0xff] & 0x0000_00ff)
            ^ rk[k + 1],
        (t.te2[(s[2] >> 24) as usize] & 0xff00_0000)
            ^ (t.te3[(s[3] >> 16) as usize & 0xff] & 0x00ff_0000)
            ^ (t.te0[(s[0] >> 8) as usize & 0xff] & 0x0000_ff00)
            ^ (t.te1[s[1] as usize & 0xff] & 0x0000_00ff)
            ^ rk[k + 2],
        (t.te2[(s[3] >> 24) as usize] & 0xff00_0000)
            ^ (t.te3[(s[0] >> 16) as usize & 0xff] & 0x00ff_0000)
            ^ (t.te0[(s[1] >> 8) as usize & 0xff] & 0x0000_ff00)
            ^ (t.te1[s[2] as usize & 0xff] & 0x0000_00ff)
            ^ rk[k + 3],
    ];
    store_words(&out)
}

/// Decrypt a single block with the table-driven strategy. `key` must be a
/// decryption schedule.
#[must_use]
pub fn decrypt_block(input: &[u8; 16], key: &AesKey, t: &AesTables) -> [u8; 16] {
    let rk = &key.rd_key;
    let s0 = [
        get_u32(&input[0..4]) ^ rk[0],
        get_u32(&input[4..8]) ^ rk[1],
        get_u32(&input[8..12]) ^ rk[2],
        get_u32(&input[12..16]) ^ rk[3],
    ];
    let s = dec_rounds(s0, key, t);

    // Final round: dedicated inverse substitution table.
    let k = 4 * key.rounds;
    let out = [
        (u32::from(t.td4[(s[0] >> 24) as usize]) << 24)
            ^ (u32::from(t.td4[(s[3] >> 16) as usize & 0xff]) << 16)
            ^ (u32::from(t.td4[(s[2] >> 8) as usize & 0xff]) << 8)
            ^ u32::from(t.td4[s[1] as usize & 0xff])
            ^ rk[k],
        (u32::from(t.td4[(s[1] >> 24) as usize]) << 24)
            ^ (u32::from(t.td4[(s[0] >> 16) as usize & 0xff]) << 16)
            ^ (u32::from(t.td4[(s[3] >> 8) as usize & 0xff]) << 8)
            ^ u32::from(t.td4[s[2] as usize & 0xff])
            ^ rk[k + 1],
        (u32::from(t.td4[(s[2] >> 24) as usize]) << 24)
            ^ (u32::from(t.td4[(s[1] >> 16) as usize & 0xff]) << 16)
            ^ (u32::from(t.td4[(s[0] >> 8) as usize & 0xff]) << 8)
            ^ u32::from(t.td4[s[3] as usize & 0xff])
            ^ rk[k + 2],
        (u32::from(t.td4[(s[3] >> 24) as usize]) << 24)
            ^ (u32::from(t.td4[(s[2] >> 16) as usize & 0xff]) << 16)
            ^ (u32::from(t.td4[(s[1] >> 8) as usize & 0xff]) << 8)
            ^ u32::from(t.td4[s[0] as usize & 0xff])
            ^ rk[k + 3],
    ];
    store_words(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aes::tables::AesTables;

    // FIPS-197 appendix C, AES-128.
    #[test]
    fn fips_197_aes128() {
        let t = AesTables::shared();
        let key: [u8; 16] = core::array::from_fn(|i| i as u8);
        let pt: [u8; 16] = core::array::from_fn(|i| (i as u8) * 0x11);
        let enc = expand_encrypt_key(&key, t).unwrap();
        let ct = encrypt_block(&pt, &enc, t);
        assert_eq!(
            ct,
            [
                0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70,
                0xb4, 0xc5, 0x5a
            ]
        );
        let dec = expand_decrypt_key(&key, t).unwrap();
        assert_eq!(decrypt_block(&ct, &dec, t), pt);
    }

    #[test]
    fn fips_197_aes192_aes256() {
        let t = AesTables::shared();
        let pt: [u8; 16] = core::array::from_fn(|i| (i as u8) * 0x11);

        let key192: [u8; 24] = core::array::from_fn(|i| i as u8);
        let enc = expand_encrypt_key(&key192, t).unwrap();
        let ct = encrypt_block(&pt, &enc, t);
        assert_eq!(
            ct,
            [
                0xdd, 0xa9, 0x7c, 0xa4, 0x86, 0x4c, 0xdf, 0xe0, 0x6e, 0xaf, 0x70, 0xa0, 0xec,
                0x0d, 0x71, 0x91
            ]
        );
        let dec = expand_decrypt_key(&key192, t).unwrap();
        assert_eq!(decrypt_block(&ct, &dec, t), pt);

        let key256: [u8; 32] = core::array::from_fn(|i| i as u8);
        let enc = expand_encrypt_key(&key256, t).unwrap();
        let ct = encrypt_block(&pt, &enc, t);
        assert_eq!(
            ct,
            [
                0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b,
                0x49, 0x60, 0x89
            ]
        );
        let dec = expand_decrypt_key(&key256, t).unwrap();
        assert_eq!(decrypt_block(&ct, &dec, t), pt);
    }

    #[test]
    fn rejects_unsupported_key_sizes() {
        let t = AesTables::shared();
        for len in [0usize, 8, 15, 17, 31, 33, 64] {
            let key = alloc_key(len);
            assert_eq!(
                expand_encrypt_key(&key, t).unwrap_err(),
                crate::types::Error::InvalidKeySize { len }
            );
        }
    }

    fn alloc_key(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }
}

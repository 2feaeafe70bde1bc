//! Precomputed AES lookup tables.
//!
//! Eight 256-entry mix-column tables (four per direction), the inverse
//! substitution table for the final decryption round, and the round
//! constants. Everything is derived at compile time from the forward S-box
//! and shared process-wide as immutable state; round functions receive the
//! table set as an explicit reference so a group-local cached copy reads
//! through exactly the same code path.

// AES S-Box
#[rustfmt::skip]
pub(crate) const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// GF(2^8) multiplication, reduction polynomial `x^8 + x^4 + x^3 + x + 1`.
const fn gf_mul(a: u8, b: u8) -> u8 {
    let mut a = a;
    let mut b = b;
    let mut p = 0u8;
    let mut i = 0;
    while i < 8 {
        if b & 1 != 0 {
            p ^= a;
        }
        let carry = a >> 7;
        a = (a << 1) ^ (carry * 0x1b);
        b >>= 1;
        i += 1;
    }
    p
}

const fn inverse_sbox() -> [u8; 256] {
    let mut inv = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        inv[SBOX[i] as usize] = i as u8;
        i += 1;
    }
    inv
}

/// Encryption table 0: `te0[x] = [2s, s, s, 3s]` as a big-endian word;
/// tables 1..3 are byte rotations of it.
const fn build_te0() -> [u32; 256] {
    let mut t = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let s = SBOX[i];
        t[i] = ((gf_mul(s, 2) as u32) << 24)
            | ((s as u32) << 16)
            | ((s as u32) << 8)
            | (gf_mul(s, 3) as u32);
        i += 1;
    }
    t
}

/// Decryption table 0: `td0[x] = [14s', 9s', 13s', 11s']` over the inverse
/// S-box, i.e. the inverse mix-column transform folded into the lookup.
const fn build_td0() -> [u32; 256] {
    let inv = inverse_sbox();
    let mut t = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let s = inv[i];
        t[i] = ((gf_mul(s, 14) as u32) << 24)
            | ((gf_mul(s, 9) as u32) << 16)
            | ((gf_mul(s, 13) as u32) << 8)
            | (gf_mul(s, 11) as u32);
        i += 1;
    }
    t
}

const fn rotate_table(src: &[u32; 256], bits: u32) -> [u32; 256] {
    let mut t = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        t[i] = src[i].rotate_right(bits);
        i += 1;
    }
    t
}

// =============================================================================
// TABLE SET
// =============================================================================

/// The complete lookup-table set: read-only, shared by all cipher contexts.
pub struct AesTables {
    pub(crate) te0: [u32; 256],
    pub(crate) te1: [u32; 256],
    pub(crate) te2: [u32; 256],
    pub(crate) te3: [u32; 256],
    pub(crate) td0: [u32; 256],
    pub(crate) td1: [u32; 256],
    pub(crate) td2: [u32; 256],
    pub(crate) td3: [u32; 256],
    pub(crate) td4: [u8; 256],
    pub(crate) rcon: [u32; 10],
}

static SHARED: AesTables = AesTables::build();

impl AesTables {
    pub(crate) const fn build() -> Self {
        let te0 = build_te0();
        let td0 = build_td0();
        Self {
            te0,
            te1: rotate_table(&te0, 8),
            te2: rotate_table(&te0, 16),
            te3: rotate_table(&te0, 24),
            td0,
            td1: rotate_table(&td0, 8),
            td2: rotate_table(&td0, 16),
            td3: rotate_table(&td0, 24),
            td4: inverse_sbox(),
            rcon: [
                0x0100_0000,
                0x0200_0000,
                0x0400_0000,
                0x0800_0000,
                0x1000_0000,
                0x2000_0000,
                0x4000_0000,
                0x8000_0000,
                0x1b00_0000,
                0x3600_0000,
            ],
        }
    }

    /// An all-zero table set, to be populated by a group cache.
    #[cfg(feature = "multithread")]
    pub(crate) const fn zeroed() -> Self {
        Self {
            te0: [0; 256],
            te1: [0; 256],
            te2: [0; 256],
            te3: [0; 256],
            td0: [0; 256],
            td1: [0; 256],
            td2: [0; 256],
            td3: [0; 256],
            td4: [0; 256],
            rcon: [0; 10],
        }
    }

    /// The process-wide shared table set.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sbox_inverts() {
        let inv = inverse_sbox();
        for i in 0..256 {
            assert_eq!(inv[SBOX[i] as usize] as usize, i);
        }
    }

    #[test]
    fn te_td_spot_values() {
        let t = AesTables::shared();
        // rijndael-alg-fst reference values.
        assert_eq!(t.te0[0], 0xc663_63a5);
        assert_eq!(t.te0[255], 0x2c16_163a);
        assert_eq!(t.td0[0], 0x51f4_a750);
        assert_eq!(t.te1[0], t.te0[0].rotate_right(8));
        assert_eq!(t.td4[SBOX[0x7f] as usize], 0x7f);
    }
}

//! Statistical sanity checks on the digest.

#![allow(clippy::unwrap_used)]

use cryptonight::{compute, verify, Scratchpad};

fn hamming(a: &[u8; 32], b: &[u8; 32]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}

// Single-bit flips in the input must scramble roughly half the output
// bits. 16 samples of an expected-128 distribution; the bounds are loose
// enough to never flake and tight enough to catch a broken stage.
#[test]
fn avalanche_on_single_bit_flips() {
    let base = *b"avalanche statistics input 32by.";
    let mut scratch = Scratchpad::new();
    let reference = compute(&base, &mut scratch).unwrap();

    let mut total = 0u32;
    let samples = 16u32;
    for i in 0..samples {
        let mut flipped = base;
        // Spread flips across bytes and bit positions.
        flipped[(i * 2) as usize % base.len()] ^= 1 << (i % 8);
        let digest = compute(&flipped, &mut scratch).unwrap();
        let distance = hamming(&reference, &digest);
        assert!(
            (64..=192).contains(&distance),
            "sample {i} moved only {distance} bits"
        );
        total += distance;
    }
    let mean = total / samples;
    assert!((112..=144).contains(&mean), "mean distance {mean}");
}

#[test]
fn verify_is_exact() {
    let mut scratch = Scratchpad::new();
    let digest = compute(b"constant time check", &mut scratch).unwrap();
    assert!(verify(b"constant time check", &digest).unwrap());
    for bit in [0usize, 7, 128, 255] {
        let mut wrong = digest;
        wrong[bit / 8] ^= 1 << (bit % 8);
        assert!(!verify(b"constant time check", &wrong).unwrap());
    }
}

//! Known-answer tests against the canonical slow-hash vectors.

#![allow(clippy::unwrap_used)]

use cryptonight::{compute, slow_hash, Scratchpad};
use serde::Deserialize;

#[derive(Deserialize)]
struct Vector {
    input: String,
    digest: String,
}

fn load_vectors() -> Vec<Vector> {
    serde_json::from_str(include_str!("test_vectors.json")).unwrap()
}

#[test]
fn canonical_vectors() {
    let mut scratch = Scratchpad::new();
    for vector in load_vectors() {
        let digest = compute(vector.input.as_bytes(), &mut scratch).unwrap();
        assert_eq!(
            hex::encode(digest),
            vector.digest,
            "digest mismatch for input {:?}",
            vector.input
        );
    }
}

#[test]
fn one_shot_matches_vector() {
    let digest = slow_hash(b"This is a test").unwrap();
    assert_eq!(
        hex::encode(digest),
        "a084f01d1437a09c6985401b60d43554ae105802c5f5d8a9b3253649c0be6605"
    );
}

//! `MuHash3072`: an order-independent, multiplicatively-homomorphic
//! multiset hash.
//!
//! `original_source/`'s retrieval kept `node/coinstats.cpp` but not
//! `crypto/muhash.{h,cpp}`, so this is a structurally faithful
//! reimplementation rather than a bit-exact port of Bitcoin Core's group
//! arithmetic (see `DESIGN.md` Open Question 2): a fixed odd 3072-bit
//! modulus, a SHA-256-stream hash-to-group function with deterministic
//! retry on the zero element, a running product mod the modulus, and a
//! SHA-256 finalization of the big-endian group element. This reproduces
//! every property the spec pins down — order-independence, multiplicative
//! homomorphism, 256-bit digest — without claiming Bitcoin Core's exact,
//! undisclosed-here constants.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::types::Hash256;

const MODULUS_BYTES: usize = 384; // 3072 bits

/// `2^3072 - 1103717`: a fixed odd modulus close to a power of two, the
/// same shape of constant real-world MuHash3072 implementations use.
fn modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| {
        let two_pow_3072 = BigUint::one() << (MODULUS_BYTES * 8);
        two_pow_3072 - BigUint::from(1_103_717u64)
    })
}

/// Deterministically maps arbitrary bytes onto a non-zero element of the
/// multiplicative group mod `modulus()`, retrying with an incremented
/// counter on the (astronomically unlikely) zero result.
fn hash_to_group(data: &[u8]) -> BigUint {
    let m = modulus();
    let mut counter: u32 = 0;
    loop {
        let mut wide = Vec::with_capacity(MODULUS_BYTES);
        let mut block: u32 = 0;
        while wide.len() < MODULUS_BYTES {
            let mut hasher = Sha256::new();
            hasher.update(data);
            hasher.update(counter.to_le_bytes());
            hasher.update(block.to_le_bytes());
            wide.extend_from_slice(&hasher.finalize());
            block += 1;
        }
        wide.truncate(MODULUS_BYTES);
        let candidate = BigUint::from_bytes_be(&wide) % m;
        if !candidate.is_zero() {
            return candidate;
        }
        counter += 1;
    }
}

/// Running multiplicative accumulator over the group. Insertion order does
/// not affect the final value (invariant 4, §8) because group
/// multiplication is commutative.
#[derive(Clone, Debug)]
pub struct MuHash3072 {
    acc: BigUint,
}

impl MuHash3072 {
    pub fn new() -> Self {
        Self { acc: BigUint::one() }
    }

    /// Multiplies the group element derived from `data` into the running
    /// accumulator. `data` is the per-output serialization defined in §4.1.
    pub fn insert(&mut self, data: &[u8]) {
        let element = hash_to_group(data);
        self.acc = (&self.acc * element) % modulus();
    }

    /// Hashes the final group element to a 256-bit digest.
    pub fn finalize(self) -> Hash256 {
        let mut bytes = self.acc.to_bytes_be();
        if bytes.len() < MODULUS_BYTES {
            let mut padded = vec![0u8; MODULUS_BYTES - bytes.len()];
            padded.extend_from_slice(&bytes);
            bytes = padded;
        }
        Hash256(Sha256::digest(&bytes).into())
    }
}

impl Default for MuHash3072 {
    fn default() -> Self {
        Self::new()
    }
}

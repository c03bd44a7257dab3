//! Prime-field arithmetic for secret sharing
//!
//! All sharing math runs in Z/pZ for a large prime p. Every operation
//! reduces its result into `[0, p)` — there is no floating point anywhere
//! on this path, and no value ever leaves the range.

use crate::SharingError;
use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

/// A prime field Z/pZ.
///
/// The order must be prime for `inverse` to be correct (Fermat inversion);
/// primality is the caller's contract. Production code uses the secp256k1
/// scalar group order, tests typically use small primes like 65537.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    order: BigUint,
}

impl PrimeField {
    /// Create a field of the given prime order.
    pub fn new(order: BigUint) -> Result<Self, SharingError> {
        if order < BigUint::from(2u32) {
            return Err(SharingError::InvalidParameters(
                "Field order must be at least 2".into(),
            ));
        }
        Ok(Self { order })
    }

    /// The field order p.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Reduce an arbitrary non-negative integer into `[0, p)`.
    pub fn reduce(&self, a: &BigUint) -> BigUint {
        a % &self.order
    }

    /// `(a + b) mod p`
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.order
    }

    /// `(a - b) mod p`, always non-negative
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let a = self.reduce(a);
        let b = self.reduce(b);
        (a + &self.order - b) % &self.order
    }

    /// `(a * b) mod p`
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.order
    }

    /// Multiplicative inverse of `a` mod p, via Fermat: `a^(p-2) mod p`.
    ///
    /// Fails with `DivisionByZero` when `a ≡ 0 (mod p)` — zero has no
    /// inverse, and a caller asking for one has already gone wrong
    /// (e.g. a singular interpolation matrix).
    pub fn inverse(&self, a: &BigUint) -> Result<BigUint, SharingError> {
        let a = self.reduce(a);
        if a.is_zero() {
            return Err(SharingError::DivisionByZero);
        }
        let exp = &self.order - BigUint::from(2u32);
        Ok(a.modpow(&exp, &self.order))
    }

    /// Uniformly random field element in `[0, p)`.
    ///
    /// Uniformity matters: biased polynomial coefficients or shard
    /// x-coordinates leak information about the secret. The RNG is
    /// injected so tests can substitute a seeded generator.
    pub fn random_element<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_below(&self.order)
    }
}

//! Core splitting and recovery
//!
//! Split a secret field element into N shards where any T reconstruct it.
//! Each shard is a point on a random polynomial of degree T-1 whose
//! constant term is the secret; recovery inverts the Vandermonde system of
//! the supplied points.

use crate::{Matrix, PrimeField, SharingError};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One shard: a point (x, y) on the sharing polynomial.
///
/// `x` is the participant's identifier, `y` the shard value. Within one
/// shard-set all x values are pairwise distinct — recovery divides by
/// their differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePoint {
    pub x: BigUint,
    pub y: BigUint,
}

impl SharePoint {
    /// Encoded length: 32-byte big-endian x followed by 32-byte y.
    pub const ENCODED_LEN: usize = 64;

    /// Serialize as `x (32 bytes BE) || y (32 bytes BE)`.
    ///
    /// Fails if either coordinate does not fit in 32 bytes; coordinates of
    /// a 256-bit field always do.
    pub fn to_bytes(&self) -> Result<[u8; Self::ENCODED_LEN], SharingError> {
        let mut out = [0u8; Self::ENCODED_LEN];
        write_padded(&self.x, &mut out[..32])?;
        write_padded(&self.y, &mut out[32..])?;
        Ok(out)
    }

    /// Deserialize from the 64-byte layout produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SharingError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(SharingError::InvalidShard(format!(
                "Encoded shard point must be {} bytes, got {}",
                Self::ENCODED_LEN,
                bytes.len()
            )));
        }
        Ok(Self {
            x: BigUint::from_bytes_be(&bytes[..32]),
            y: BigUint::from_bytes_be(&bytes[32..]),
        })
    }
}

fn write_padded(value: &BigUint, out: &mut [u8]) -> Result<(), SharingError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > out.len() {
        return Err(SharingError::InvalidShard(format!(
            "Coordinate needs {} bytes, limit is {}",
            bytes.len(),
            out.len()
        )));
    }
    let start = out.len() - bytes.len();
    out[start..].copy_from_slice(&bytes);
    Ok(())
}

/// A freshly split shard-set.
///
/// Short-lived: constructed once per split, never serialized. The secret
/// itself is not retained — only the resulting points.
#[derive(Debug)]
pub struct SecretSharer {
    threshold: usize,
    shards: Vec<SharePoint>,
}

impl SecretSharer {
    /// Split `secret` into one shard per participant, any `threshold` of
    /// which recover it.
    ///
    /// # Arguments
    /// * `secret` - Field element to share; must be `< field.order()`
    /// * `threshold` - Minimum shards for recovery (T >= 1)
    /// * `participant_xs` - Distinct nonzero x-coordinates, one per shard
    /// * `field` - The sharing field; must be the curve scalar field when
    ///   the secret is an EC private scalar
    /// * `rng` - CSPRNG for the polynomial coefficients
    ///
    /// All constraint violations fail with `InvalidParameters` before any
    /// shard is computed.
    pub fn split<R: RngCore + CryptoRng>(
        secret: &BigUint,
        threshold: usize,
        participant_xs: &[BigUint],
        field: &PrimeField,
        rng: &mut R,
    ) -> Result<Self, SharingError> {
        if threshold < 1 {
            return Err(SharingError::InvalidParameters(
                "Threshold must be at least 1".into(),
            ));
        }
        if participant_xs.len() < threshold {
            return Err(SharingError::InvalidParameters(format!(
                "Need at least {} participants for threshold {}, got {}",
                threshold,
                threshold,
                participant_xs.len()
            )));
        }
        if secret >= field.order() {
            return Err(SharingError::InvalidParameters(
                "Secret must be smaller than the field order".into(),
            ));
        }

        let xs: Vec<BigUint> = participant_xs.iter().map(|x| field.reduce(x)).collect();
        if xs.iter().any(|x| x.is_zero()) {
            // A shard at x = 0 would carry the secret verbatim
            return Err(SharingError::InvalidParameters(
                "Participant x-coordinates must be nonzero".into(),
            ));
        }
        let distinct: HashSet<&BigUint> = xs.iter().collect();
        if distinct.len() != xs.len() {
            return Err(SharingError::InvalidParameters(
                "Participant x-coordinates must be pairwise distinct mod the field order".into(),
            ));
        }

        // p(x) = secret + c1*x + ... + c_{T-1}*x^{T-1}
        let mut coefficients = Vec::with_capacity(threshold);
        coefficients.push(secret.clone());
        for _ in 1..threshold {
            coefficients.push(field.random_element(rng));
        }

        let shards = xs
            .into_iter()
            .map(|x| {
                let y = poly_eval(&coefficients, &x, field);
                SharePoint { x, y }
            })
            .collect();

        Ok(Self { threshold, shards })
    }

    /// Threshold this set was split with.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The shards, in `participant_xs` order.
    pub fn shards(&self) -> &[SharePoint] {
        &self.shards
    }

    pub fn into_shards(self) -> Vec<SharePoint> {
        self.shards
    }
}

/// Evaluate the polynomial at x using Horner's method.
/// `coefficients[0]` is the constant term.
fn poly_eval(coefficients: &[BigUint], x: &BigUint, field: &PrimeField) -> BigUint {
    let mut result = BigUint::zero();
    for coef in coefficients.iter().rev() {
        result = field.add(&field.mul(&result, x), coef);
    }
    result
}

/// Recover the secret from exactly `threshold` shards.
///
/// Interpolation cannot detect a wrong shard count by itself: T-1 points
/// of a degree-(T-1) polynomial interpolate to a plausible-looking but
/// wrong value. This function therefore refuses any count other than
/// `threshold` instead of inferring the degree from the input size.
///
/// Builds the Vandermonde matrix of the shard x-coordinates, inverts it
/// mod the field order (LU with row pivoting), and multiplies by the
/// y-vector; the secret is the constant-term coefficient. Duplicate
/// x-coordinates surface as `SingularMatrix`.
pub fn recover_secret(
    shards: &[SharePoint],
    threshold: usize,
    field: &PrimeField,
) -> Result<BigUint, SharingError> {
    if threshold < 1 {
        return Err(SharingError::InvalidParameters(
            "Threshold must be at least 1".into(),
        ));
    }
    if shards.len() != threshold {
        return Err(SharingError::ShardCountMismatch {
            threshold,
            supplied: shards.len(),
        });
    }

    let xs: Vec<BigUint> = shards.iter().map(|s| field.reduce(&s.x)).collect();
    let ys: Vec<BigUint> = shards.iter().map(|s| field.reduce(&s.y)).collect();

    let inverse = Matrix::vandermonde(&xs, field).invert(field)?;
    let mut coefficients = inverse.mul_vector(&ys, field);
    Ok(coefficients.swap_remove(0))
}

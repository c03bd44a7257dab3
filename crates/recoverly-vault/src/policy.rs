//! Recovery policy configuration
//!
//! Who the approvers are, how many of them must cooperate, and how each
//! approver's sharding identifier is derived from their device key.

use crate::VaultError;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use recoverly_ecies::keys;
use recoverly_shamir::PrimeField;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// One approver in a recovery policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    /// Human-readable label for display ("Mom", "Work phone")
    pub label: String,
    /// The approver device's public key, SEC1 bytes
    pub device_key: Vec<u8>,
}

/// A threshold policy over a set of approvers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPolicy {
    /// Minimum approvers needed to recover (T)
    pub threshold: usize,
    /// All approvers holding shards (N)
    pub approvers: Vec<Approver>,
}

impl RecoveryPolicy {
    /// Create and validate a policy.
    pub fn new(threshold: usize, approvers: Vec<Approver>) -> Result<Self, VaultError> {
        let policy = Self {
            threshold,
            approvers,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Common 2-of-3 setup
    pub fn two_of_three(approvers: Vec<Approver>) -> Result<Self, VaultError> {
        if approvers.len() != 3 {
            return Err(VaultError::InvalidPolicy(format!(
                "2-of-3 needs exactly 3 approvers, got {}",
                approvers.len()
            )));
        }
        Self::new(2, approvers)
    }

    /// Common 3-of-5 setup
    pub fn three_of_five(approvers: Vec<Approver>) -> Result<Self, VaultError> {
        if approvers.len() != 5 {
            return Err(VaultError::InvalidPolicy(format!(
                "3-of-5 needs exactly 5 approvers, got {}",
                approvers.len()
            )));
        }
        Self::new(3, approvers)
    }

    /// Validate threshold bounds and approver keys.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.threshold < 1 {
            return Err(VaultError::InvalidPolicy(
                "Threshold must be at least 1".into(),
            ));
        }
        if self.approvers.len() < self.threshold {
            return Err(VaultError::InvalidPolicy(format!(
                "Threshold {} exceeds approver count {}",
                self.threshold,
                self.approvers.len()
            )));
        }
        let mut seen: HashSet<&[u8]> = HashSet::new();
        for approver in &self.approvers {
            keys::decode_public_key(&approver.device_key).map_err(|e| {
                VaultError::InvalidPolicy(format!(
                    "Approver '{}' has an invalid device key: {}",
                    approver.label, e
                ))
            })?;
            if !seen.insert(&approver.device_key) {
                return Err(VaultError::InvalidPolicy(format!(
                    "Approver '{}' reuses another approver's device key",
                    approver.label
                )));
            }
        }
        Ok(())
    }
}

/// Derive an approver's sharding x-coordinate from their device key:
/// SHA-256 of the encoded point, reduced mod the field order.
///
/// Deterministic, so both sides of a recovery compute the same identifier
/// from the key alone. The zero residue is rejected — a shard at x = 0
/// would carry the secret verbatim (the chance of hitting it is ~2^-256).
pub fn participant_scalar(device_key: &[u8], field: &PrimeField) -> Result<BigUint, VaultError> {
    let digest = Sha256::digest(device_key);
    let scalar = field.reduce(&BigUint::from_bytes_be(digest.as_slice()));
    if scalar.is_zero() {
        return Err(VaultError::Key(
            "Participant identifier reduced to zero".into(),
        ));
    }
    Ok(scalar)
}

/// A random nonzero sharding identifier, for participants without a
/// stable device key.
pub fn random_participant_scalar<R: RngCore + CryptoRng>(
    rng: &mut R,
    field: &PrimeField,
) -> BigUint {
    loop {
        let scalar = field.random_element(rng);
        if !scalar.is_zero() {
            return scalar;
        }
    }
}

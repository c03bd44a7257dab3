//! Vault setup and recovery
//!
//! Builds the key hierarchy a recovery policy protects:
//!
//! ```text
//! master key  <-- ECIES under intermediate public key
//! intermediate key scalar  <-- split into shards, one per approver
//! each shard  <-- ECIES under the approver's device key
//! ```
//!
//! Nothing here is persisted or transmitted; the returned `VaultSetup`
//! carries only public keys and ciphertexts, and the storage/network
//! layers own what happens to them next.

use crate::policy::{participant_scalar, RecoveryPolicy};
use crate::VaultError;
use log::debug;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use recoverly_ecies::{ecies, keys};
use recoverly_shamir::{sharing, PrimeField, SecretSharer, SharePoint};
use secp256k1::SecretKey;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// The sharing field: Z/nZ for n = the secp256k1 scalar group order.
///
/// This is the single constant coupling the sharing arithmetic to the
/// curve. The shared secret is an EC private scalar, so the field order
/// MUST equal the curve's group order; changing the curve means changing
/// exactly this function.
pub fn scalar_field() -> PrimeField {
    PrimeField::new(BigUint::from_bytes_be(&secp256k1::constants::CURVE_ORDER))
        .expect("The curve group order is a valid field order")
}

/// One approver's encrypted shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverShard {
    /// Label copied from the policy, for display
    pub label: String,
    /// The shard's x-coordinate (derived from the approver's device key)
    pub participant_id: BigUint,
    /// The shard point, ECIES-encrypted under the approver's device key
    pub ciphertext: Vec<u8>,
}

/// Everything a policy setup produces. Public keys and ciphertexts only;
/// no secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSetup {
    /// Policy revision this setup belongs to
    pub revision: u32,
    /// Master public key, uncompressed SEC1
    pub master_public_key: Vec<u8>,
    /// Intermediate public key, uncompressed SEC1
    pub intermediate_public_key: Vec<u8>,
    /// Master secret scalar, ECIES-encrypted under the intermediate key
    pub encrypted_master_key: Vec<u8>,
    /// Shards needed for recovery
    pub threshold: usize,
    /// One encrypted shard per approver, in policy order
    pub shards: Vec<ApproverShard>,
}

/// Run the policy-setup flow: generate the master and intermediate keys,
/// shard the intermediate scalar, and wrap every piece for its holder.
///
/// The master and intermediate secret keys exist only inside this call;
/// the caller gets back ciphertexts and public keys.
pub fn create_vault<R: RngCore + CryptoRng>(
    policy: &RecoveryPolicy,
    rng: &mut R,
) -> Result<VaultSetup, VaultError> {
    policy.validate()?;
    let field = scalar_field();
    debug!(
        "Creating vault: {} approvers, threshold {}",
        policy.approvers.len(),
        policy.threshold
    );

    let (master_secret, master_public) = keys::generate_keypair(rng);
    let (intermediate_secret, intermediate_public) = keys::generate_keypair(rng);
    let intermediate_public_key = keys::encode_public_key(&intermediate_public, false);

    // Master scalar goes under the intermediate key
    let master_bytes = Zeroizing::new(master_secret.secret_bytes());
    let encrypted_master_key = ecies::encrypt(&master_bytes[..], &intermediate_public_key, rng)?;

    // Intermediate scalar is what the approvers share
    let scalar_bytes = Zeroizing::new(intermediate_secret.secret_bytes());
    let secret = BigUint::from_bytes_be(&scalar_bytes[..]);

    let participant_ids: Vec<BigUint> = policy
        .approvers
        .iter()
        .map(|a| participant_scalar(&a.device_key, &field))
        .collect::<Result<_, _>>()?;

    let sharer = SecretSharer::split(&secret, policy.threshold, &participant_ids, &field, rng)?;

    let mut shards = Vec::with_capacity(policy.approvers.len());
    for (approver, point) in policy.approvers.iter().zip(sharer.into_shards()) {
        let participant_id = point.x.clone();
        let payload = Zeroizing::new(point.to_bytes()?);
        let ciphertext = ecies::encrypt(&payload[..], &approver.device_key, rng)?;
        shards.push(ApproverShard {
            label: approver.label.clone(),
            participant_id,
            ciphertext,
        });
    }
    debug!("Vault created: {} encrypted shards", shards.len());

    Ok(VaultSetup {
        revision: 0,
        master_public_key: keys::encode_public_key(&master_public, false),
        intermediate_public_key,
        encrypted_master_key,
        threshold: policy.threshold,
        shards,
    })
}

/// Approver-side: unwrap an encrypted shard with the device private key.
pub fn decrypt_shard(
    ciphertext: &[u8],
    device_secret: &SecretKey,
) -> Result<SharePoint, VaultError> {
    let payload = Zeroizing::new(ecies::decrypt(ciphertext, device_secret)?);
    Ok(SharePoint::from_bytes(&payload)?)
}

/// Recover the master key from decrypted shards.
///
/// Reconstructs the intermediate scalar from exactly `threshold` shards,
/// rebuilds the intermediate key, and decrypts the master scalar with it.
pub fn recover_master_key(
    encrypted_master_key: &[u8],
    shards: &[SharePoint],
    threshold: usize,
) -> Result<SecretKey, VaultError> {
    let field = scalar_field();
    debug!("Recovering master key from {} shards", shards.len());

    let scalar = sharing::recover_secret(shards, threshold, &field)?;
    let intermediate_secret = secret_key_from_scalar(&scalar)?;

    let master_bytes = Zeroizing::new(ecies::decrypt(encrypted_master_key, &intermediate_secret)?);
    SecretKey::from_slice(&master_bytes)
        .map_err(|e| VaultError::Key(format!("Recovered master key is invalid: {}", e)))
}

/// Rebuild an EC private key from a recovered scalar.
///
/// Fails if the scalar is zero or at least the group order; a scalar that
/// came out of an honest split/recover round-trip is always in range.
pub fn secret_key_from_scalar(scalar: &BigUint) -> Result<SecretKey, VaultError> {
    let bytes = scalar.to_bytes_be();
    if bytes.len() > 32 {
        return Err(VaultError::Key(
            "Scalar does not fit in 32 bytes".into(),
        ));
    }
    let mut buf = Zeroizing::new([0u8; 32]);
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    SecretKey::from_slice(&buf[..])
        .map_err(|e| VaultError::Key(format!("Scalar is not a valid private key: {}", e)))
}

//! Recoverly Vault
//!
//! Policy orchestration for social recovery: a master key protects the
//! user's secrets, an intermediate key protects the master key, and the
//! intermediate key's scalar is split into shards held by approvers, each
//! shard ECIES-encrypted under the approver's device key.
//!
//! Recovery reverses the chain: approvers decrypt their shards, any
//! threshold-sized subset reconstructs the intermediate scalar, and the
//! intermediate key decrypts the master key.
//!
//! This crate owns no storage, no network and no UI. Callers hand in
//! bytes and keys and get bytes and keys back; everything in between is
//! synchronous, CPU-bound math with no shared state, safe to call from
//! concurrent tasks.

pub mod policy;
pub mod vault;

// Re-exports
pub use policy::{participant_scalar, random_participant_scalar, Approver, RecoveryPolicy};
pub use vault::{
    create_vault, decrypt_shard, recover_master_key, scalar_field, secret_key_from_scalar,
    ApproverShard, VaultSetup,
};

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use recoverly_shamir::{sharing, SharePoint};
use secp256k1::SecretKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("Key error: {0}")]
    Key(String),
    #[error(transparent)]
    Sharing(#[from] recoverly_shamir::SharingError),
    #[error(transparent)]
    Cipher(#[from] recoverly_ecies::CipherError),
}

/// Split a secret scalar into shards over the curve scalar field.
///
/// One shard per participant identifier, any `threshold` of which recover
/// the secret. The field order is the secp256k1 group order, so the
/// secret may be an EC private scalar.
pub fn split_secret<R: RngCore + CryptoRng>(
    secret: &BigUint,
    threshold: usize,
    participant_ids: &[BigUint],
    rng: &mut R,
) -> Result<Vec<SharePoint>, VaultError> {
    let field = vault::scalar_field();
    let sharer =
        recoverly_shamir::SecretSharer::split(secret, threshold, participant_ids, &field, rng)?;
    Ok(sharer.into_shards())
}

/// Recover a secret scalar from exactly `threshold` shards.
///
/// The threshold is explicit: a wrong shard count is an error, never a
/// silently wrong secret.
pub fn recover_secret(shards: &[SharePoint], threshold: usize) -> Result<BigUint, VaultError> {
    let field = vault::scalar_field();
    Ok(sharing::recover_secret(shards, threshold, &field)?)
}

/// Encrypt a byte payload under a recipient's public key (SEC1 bytes).
pub fn encrypt_for_recipient<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    recipient_public_key: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>, VaultError> {
    Ok(recoverly_ecies::ecies::encrypt(plaintext, recipient_public_key, rng)?)
}

/// Decrypt an ECIES payload with the matching private key.
pub fn decrypt_as_recipient(
    cipher_data: &[u8],
    secret_key: &SecretKey,
) -> Result<Vec<u8>, VaultError> {
    Ok(recoverly_ecies::ecies::decrypt(cipher_data, secret_key)?)
}

/// Generate a keypair; returns the uncompressed public key bytes and the
/// private key handle.
pub fn generate_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> (Vec<u8>, SecretKey) {
    let (secret, public) = recoverly_ecies::keys::generate_keypair(rng);
    (
        recoverly_ecies::keys::encode_public_key(&public, false),
        secret,
    )
}

//! ECIES hybrid encryption
//!
//! Encrypt an arbitrary byte payload under a recipient's EC public key:
//! a fresh ephemeral keypair performs ECDH with the recipient, the agreed
//! secret keys AES-256-GCM, and the output frame is self-describing:
//!
//! ```text
//! [ephemeral public key, uncompressed (65 bytes)][nonce (12)][ciphertext + tag (16)]
//! ```
//!
//! The symmetric key is `secp256k1::ecdh::SharedSecret`, i.e. SHA-256 of
//! the compressed shared point, so the raw X coordinate is never used as
//! key material directly.

use crate::{aead, keys, CipherError};
use rand::{CryptoRng, RngCore};
use secp256k1::{ecdh::SharedSecret, PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

/// Minimum ciphertext length: ephemeral key + nonce + tag.
pub const MIN_CIPHERTEXT_LEN: usize =
    keys::UNCOMPRESSED_PUBLIC_KEY_LEN + aead::NONCE_LEN + aead::TAG_LEN;

/// Encrypt `plaintext` for the holder of `recipient_public_key` (SEC1
/// bytes, compressed or uncompressed).
///
/// Stateless: every call generates its own ephemeral keypair and nonce.
pub fn encrypt<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    recipient_public_key: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>, CipherError> {
    let recipient = keys::decode_public_key(recipient_public_key)?;

    let secp = Secp256k1::new();
    let (ephemeral_secret, ephemeral_public) = secp.generate_keypair(rng);
    let key = Zeroizing::new(SharedSecret::new(&recipient, &ephemeral_secret).secret_bytes());

    let sealed = aead::encrypt(&key, plaintext, rng)?;

    let mut out = Vec::with_capacity(keys::UNCOMPRESSED_PUBLIC_KEY_LEN + sealed.len());
    out.extend_from_slice(&ephemeral_public.serialize_uncompressed());
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Decrypt an ECIES frame with the recipient's private key.
///
/// # Errors
/// `MalformedInput` when the frame is too short or the embedded ephemeral
/// key is not a curve point; `AuthenticationFailed` when the tag does not
/// verify — a wrong private key and a tampered ciphertext both land here.
pub fn decrypt(cipher_data: &[u8], secret_key: &SecretKey) -> Result<Vec<u8>, CipherError> {
    if cipher_data.len() < MIN_CIPHERTEXT_LEN {
        return Err(CipherError::MalformedInput(format!(
            "Ciphertext must be at least {} bytes, got {}",
            MIN_CIPHERTEXT_LEN,
            cipher_data.len()
        )));
    }
    let (ephemeral_bytes, sealed) = cipher_data.split_at(keys::UNCOMPRESSED_PUBLIC_KEY_LEN);
    let ephemeral_public = PublicKey::from_slice(ephemeral_bytes).map_err(|e| {
        CipherError::MalformedInput(format!("Invalid ephemeral public key: {}", e))
    })?;

    let key = Zeroizing::new(SharedSecret::new(&ephemeral_public, secret_key).secret_bytes());
    aead::decrypt(&key, sealed)
}

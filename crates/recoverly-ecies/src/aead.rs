//! AES-256-GCM primitive
//!
//! Authenticated encryption used by the ECIES layer and directly for
//! local-key-at-rest protection. Output layout:
//! `[nonce (12 bytes)][ciphertext + tag (16 bytes)]`.
//!
//! The nonce is freshly random on every call and never reused with the
//! same key; GCM loses confidentiality catastrophically on nonce reuse,
//! which is why the nonce comes from the caller's CSPRNG rather than a
//! counter that could be cloned along with device state.

use crate::CipherError;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::{CryptoRng, RngCore};

/// AES-256 key length
pub const KEY_LEN: usize = 32;
/// GCM nonce length (96 bits)
pub const NONCE_LEN: usize = 12;
/// GCM authentication tag length
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// Returns `nonce || ciphertext || tag`.
pub fn encrypt<R: RngCore + CryptoRng>(
    key: &[u8; KEY_LEN],
    plaintext: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>, CipherError> {
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a `nonce || ciphertext || tag` buffer.
///
/// # Errors
/// `MalformedInput` when the buffer is too short to contain a nonce and a
/// tag; `AuthenticationFailed` when the tag does not verify (wrong key or
/// tampered data).
pub fn decrypt(key: &[u8; KEY_LEN], data: &[u8]) -> Result<Vec<u8>, CipherError> {
    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(CipherError::MalformedInput(format!(
            "Ciphertext must be at least {} bytes, got {}",
            NONCE_LEN + TAG_LEN,
            data.len()
        )));
    }
    let (nonce, ciphertext) = data.split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CipherError::AuthenticationFailed)
}

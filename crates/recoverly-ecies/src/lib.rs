//! Recoverly ECIES Module
//!
//! Asymmetric protection for shards and keys in transit and at rest:
//! secp256k1 key operations plus ECIES hybrid encryption (ephemeral ECDH +
//! AES-256-GCM).
//!
//! Every call is stateless and self-contained; encrypt and decrypt may run
//! on different devices at different times. All randomness comes from an
//! injected CSPRNG handle.
//!
//! # Example: encrypt a payload for a recipient
//!
//! ```
//! use recoverly_ecies::{ecies, keys};
//!
//! let mut rng = rand::rngs::OsRng;
//! let (recipient_secret, recipient_public) = keys::generate_keypair(&mut rng);
//! let public_bytes = keys::encode_public_key(&recipient_public, false);
//!
//! let cipher = ecies::encrypt(b"shard payload", &public_bytes, &mut rng).unwrap();
//! let plain = ecies::decrypt(&cipher, &recipient_secret).unwrap();
//! assert_eq!(plain, b"shard payload");
//! ```

pub mod aead;
pub mod ecies;
pub mod keys;

// Re-exports
pub use ecies::{decrypt as decrypt_as_recipient, encrypt as encrypt_for_recipient};
pub use keys::{decode_public_key, encode_public_key, generate_keypair};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
    /// AEAD tag mismatch: the ciphertext was tampered with or the wrong
    /// key was used. Deliberately distinct from `MalformedInput` so the
    /// caller can tell "wrong key" apart from "corrupted framing".
    #[error("Authentication failed: wrong key or tampered ciphertext")]
    AuthenticationFailed,
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

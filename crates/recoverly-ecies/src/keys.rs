//! EC key operations on secp256k1
//!
//! Key generation, SEC1 point encoding in both forms, public-key
//! reconstruction from raw coordinates, and raw-to-DER signature
//! conversion for verification APIs that require DER.

use crate::CipherError;
use rand::{CryptoRng, RngCore};
use secp256k1::{ecdsa, PublicKey, Secp256k1, SecretKey};

/// Compressed SEC1 public key length (parity byte + X)
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;
/// Uncompressed SEC1 public key length (`0x04 || X || Y`)
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;
/// Length of one coordinate of a point
pub const COORDINATE_LEN: usize = 32;
/// Raw compact ECDSA signature length (`r || s`)
pub const COMPACT_SIGNATURE_LEN: usize = 64;

/// Generate a fresh keypair from the supplied CSPRNG.
pub fn generate_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> (SecretKey, PublicKey) {
    let secp = Secp256k1::new();
    secp.generate_keypair(rng)
}

/// Encode a public key as SEC1 bytes.
///
/// Compressed: 33 bytes (`0x02`/`0x03 || X`). Uncompressed: 65 bytes
/// (`0x04 || X || Y`) — the wire form approver devices exchange.
pub fn encode_public_key(key: &PublicKey, compressed: bool) -> Vec<u8> {
    if compressed {
        key.serialize().to_vec()
    } else {
        key.serialize_uncompressed().to_vec()
    }
}

/// Decode a SEC1 public key from either encoding.
///
/// Wrong lengths and off-curve points fail with `MalformedInput`.
pub fn decode_public_key(bytes: &[u8]) -> Result<PublicKey, CipherError> {
    match bytes.len() {
        COMPRESSED_PUBLIC_KEY_LEN | UNCOMPRESSED_PUBLIC_KEY_LEN => PublicKey::from_slice(bytes)
            .map_err(|e| CipherError::MalformedInput(format!("Invalid public key: {}", e))),
        n => Err(CipherError::MalformedInput(format!(
            "Public key must be {} or {} bytes, got {}",
            COMPRESSED_PUBLIC_KEY_LEN, UNCOMPRESSED_PUBLIC_KEY_LEN, n
        ))),
    }
}

/// Rebuild a public key from raw affine coordinates.
///
/// Used when a peer transmits just the point, not a full certificate
/// structure. Both coordinates must be exactly 32 bytes.
pub fn public_key_from_coordinates(x: &[u8], y: &[u8]) -> Result<PublicKey, CipherError> {
    if x.len() != COORDINATE_LEN || y.len() != COORDINATE_LEN {
        return Err(CipherError::MalformedInput(format!(
            "Coordinates must be {} bytes each, got {} and {}",
            COORDINATE_LEN,
            x.len(),
            y.len()
        )));
    }
    let mut sec1 = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
    sec1[0] = 0x04;
    sec1[1..1 + COORDINATE_LEN].copy_from_slice(x);
    sec1[1 + COORDINATE_LEN..].copy_from_slice(y);
    PublicKey::from_slice(&sec1)
        .map_err(|e| CipherError::MalformedInput(format!("Point is not on the curve: {}", e)))
}

/// Convert a raw 64-byte `r || s` signature to ASN.1 DER.
///
/// The components are unsigned big-endian integers; DER INTEGERs are
/// signed, so a component with its high bit set gets a leading `0x00`
/// byte. `secp256k1`'s serializer implements exactly that rule.
pub fn signature_to_der(raw: &[u8]) -> Result<Vec<u8>, CipherError> {
    if raw.len() != COMPACT_SIGNATURE_LEN {
        return Err(CipherError::MalformedInput(format!(
            "Raw signature must be {} bytes, got {}",
            COMPACT_SIGNATURE_LEN,
            raw.len()
        )));
    }
    let signature = ecdsa::Signature::from_compact(raw)
        .map_err(|e| CipherError::MalformedInput(format!("Invalid signature: {}", e)))?;
    Ok(signature.serialize_der().to_vec())
}

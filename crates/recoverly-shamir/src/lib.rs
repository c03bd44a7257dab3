//! Recoverly Shamir Module
//!
//! Split a secret scalar into shards using Shamir's Secret Sharing over a
//! large prime field, and recover it from any threshold-sized subset.
//!
//! The secret lives at the constant term of a random degree-(T-1)
//! polynomial; each shard is one evaluation point. Recovery solves the
//! Vandermonde linear system of the supplied points with an LU
//! decomposition mod the field order.
//!
//! In production the field order is the secp256k1 scalar group order,
//! because the shared secret is itself an EC private scalar. The field is
//! a parameter everywhere, so tests can run in small fields.
//!
//! # Example: split and recover a secret
//!
//! ```
//! use num_bigint::BigUint;
//! use recoverly_shamir::{recover_secret, PrimeField, SecretSharer};
//!
//! let field = PrimeField::new(BigUint::from(65537u32)).unwrap();
//! let secret = BigUint::from(31337u32);
//!
//! // Split into 3-of-5 shards for participants 1..=5
//! let xs: Vec<BigUint> = (1u32..=5).map(BigUint::from).collect();
//! let sharer = SecretSharer::split(&secret, 3, &xs, &field, &mut rand::rngs::OsRng).unwrap();
//!
//! // Any 3 shards recover the secret
//! let subset = [
//!     sharer.shards()[0].clone(),
//!     sharer.shards()[2].clone(),
//!     sharer.shards()[4].clone(),
//! ];
//! assert_eq!(recover_secret(&subset, 3, &field).unwrap(), secret);
//! ```

pub mod field;
pub mod matrix;
pub mod shard;
pub mod sharing;

// Re-exports
pub use field::PrimeField;
pub use matrix::Matrix;
pub use shard::{recover_root, Ancestor, Shard};
pub use sharing::{recover_secret, SecretSharer, SharePoint};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharingError {
    #[error("Invalid sharing parameters: {0}")]
    InvalidParameters(String),
    #[error("Division by zero in field arithmetic")]
    DivisionByZero,
    #[error("Shard set cannot be recovered: interpolation matrix is singular")]
    SingularMatrix,
    #[error("Expected exactly {threshold} shards, got {supplied}")]
    ShardCountMismatch { threshold: usize, supplied: usize },
    #[error("Invalid shard: {0}")]
    InvalidShard(String),
}

//! Security-focused tests across the crate boundaries.
//!
//! These verify:
//! 1. Wrong keys are rejected, never silently tolerated
//! 2. Tampered ciphertexts fail authentication
//! 3. Malformed inputs produce errors, not panics
//! 4. Shard-count mistakes cannot leak a plausible wrong secret
//! 5. The sharing field stays coupled to the curve order

use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use recoverly_ecies::{aead, ecies, keys, CipherError};
use recoverly_shamir::{recover_secret, PrimeField, SecretSharer, SharePoint, SharingError};
use recoverly_vault::scalar_field;

// ============================================================================
// 1. Wrong-key rejection
// ============================================================================

#[test]
fn test_ecies_wrong_key_is_auth_failure_not_garbage() {
    let mut rng = StdRng::seed_from_u64(1);
    let (_, public) = keys::generate_keypair(&mut rng);
    let public_bytes = keys::encode_public_key(&public, false);

    let cipher = ecies::encrypt(b"shard", &public_bytes, &mut rng).unwrap();

    for seed in 2..10u64 {
        let mut other_rng = StdRng::seed_from_u64(seed);
        let (wrong_secret, _) = keys::generate_keypair(&mut other_rng);
        let result = ecies::decrypt(&cipher, &wrong_secret);
        assert!(
            matches!(result, Err(CipherError::AuthenticationFailed)),
            "Wrong key must fail authentication, got {:?}",
            result
        );
    }
}

// ============================================================================
// 2. Tamper detection
// ============================================================================

#[test]
fn test_every_tampered_region_fails() {
    let mut rng = StdRng::seed_from_u64(20);
    let (secret, public) = keys::generate_keypair(&mut rng);
    let public_bytes = keys::encode_public_key(&public, false);

    let cipher = ecies::encrypt(b"a reasonably long shard payload", &public_bytes, &mut rng)
        .unwrap();

    // Flip one bit in the nonce, the ciphertext body, and the tag
    for index in [66usize, 80, cipher.len() - 1] {
        let mut tampered = cipher.clone();
        tampered[index] ^= 0x01;
        assert!(
            ecies::decrypt(&tampered, &secret).is_err(),
            "Tampering at byte {} must not decrypt",
            index
        );
    }
}

#[test]
fn test_aead_tamper_and_truncate() {
    let key = [7u8; aead::KEY_LEN];
    let mut rng = StdRng::seed_from_u64(21);

    let mut sealed = aead::encrypt(&key, b"at rest", &mut rng).unwrap();
    let last = sealed.len() - 1;
    sealed[last] ^= 0x80;
    assert!(matches!(
        aead::decrypt(&key, &sealed),
        Err(CipherError::AuthenticationFailed)
    ));

    assert!(matches!(
        aead::decrypt(&key, &sealed[..aead::NONCE_LEN + aead::TAG_LEN - 1]),
        Err(CipherError::MalformedInput(_))
    ));
}

// ============================================================================
// 3. Malformed inputs
// ============================================================================

#[test]
fn test_malformed_keys_and_frames_error_cleanly() {
    let mut rng = StdRng::seed_from_u64(30);
    let (secret, _) = keys::generate_keypair(&mut rng);

    // Bad recipient keys at encrypt time
    for bad_key in [&[][..], &[0u8; 10][..], &[0xFFu8; 33][..], &[0xFFu8; 65][..]] {
        assert!(matches!(
            ecies::encrypt(b"x", bad_key, &mut rng),
            Err(CipherError::MalformedInput(_))
        ));
    }

    // Truncated and garbage frames at decrypt time
    for bad_frame in [&[][..], &[0x04u8; 30][..], &[0xABu8; ecies::MIN_CIPHERTEXT_LEN][..]] {
        assert!(matches!(
            ecies::decrypt(bad_frame, &secret),
            Err(CipherError::MalformedInput(_))
        ));
    }

    // Shard points reject wrong-length encodings
    assert!(SharePoint::from_bytes(&[0u8; 10]).is_err());
}

// ============================================================================
// 4. Shard-count hazards
// ============================================================================

#[test]
fn test_shard_count_is_never_inferred() {
    let field = scalar_field();
    let mut rng = StdRng::seed_from_u64(40);
    let secret = field.random_element(&mut rng);
    let ids: Vec<BigUint> = (1u32..=5).map(BigUint::from).collect();

    let sharer = SecretSharer::split(&secret, 3, &ids, &field, &mut rng).unwrap();

    for wrong_count in [1usize, 2, 4, 5] {
        let result = recover_secret(&sharer.shards()[..wrong_count], 3, &field);
        assert!(
            matches!(result, Err(SharingError::ShardCountMismatch { .. })),
            "Count {} must be rejected",
            wrong_count
        );
    }
}

#[test]
fn test_undersized_interpolation_disagrees_with_secret() {
    // What the explicit threshold protects against: interpolating T-1
    // shards as if they were a complete set yields a value that looks
    // valid and is wrong.
    let field = scalar_field();
    let secret = BigUint::from(0xDEADBEEFu32);
    let ids: Vec<BigUint> = (1u32..=6).map(BigUint::from).collect();

    for seed in 0..5u64 {
        let mut rng = StdRng::seed_from_u64(400 + seed);
        let sharer = SecretSharer::split(&secret, 3, &ids, &field, &mut rng).unwrap();
        let pretend_complete =
            [sharer.shards()[1].clone(), sharer.shards()[4].clone()];
        let wrong = recover_secret(&pretend_complete, 2, &field).unwrap();
        assert_ne!(wrong, secret, "Seed {} interpolated to the real secret", seed);
    }
}

#[test]
fn test_duplicate_shards_cannot_recover() {
    let field = scalar_field();
    let mut rng = StdRng::seed_from_u64(41);
    let secret = field.random_element(&mut rng);
    let ids: Vec<BigUint> = (1u32..=3).map(BigUint::from).collect();

    let sharer = SecretSharer::split(&secret, 2, &ids, &field, &mut rng).unwrap();
    let duplicated = [sharer.shards()[0].clone(), sharer.shards()[0].clone()];
    assert!(matches!(
        recover_secret(&duplicated, 2, &field),
        Err(SharingError::SingularMatrix)
    ));
}

// ============================================================================
// 5. Curve/field coupling
// ============================================================================

#[test]
fn test_field_order_equals_curve_group_order() {
    let field = scalar_field();
    let order = BigUint::from_bytes_be(&secp256k1::constants::CURVE_ORDER);
    assert_eq!(*field.order(), order);

    // Any valid private scalar is sharable in this field
    let mut rng = StdRng::seed_from_u64(50);
    let (secret_key, _) = keys::generate_keypair(&mut rng);
    let scalar = BigUint::from_bytes_be(&secret_key.secret_bytes());
    assert!(scalar < order);

    let ids: Vec<BigUint> = (1u32..=3).map(BigUint::from).collect();
    let sharer = SecretSharer::split(&scalar, 2, &ids, &field, &mut rng).unwrap();
    let recovered =
        recover_secret(&sharer.shards()[1..3], 2, &field).unwrap();
    assert_eq!(recovered, scalar);
}

#[test]
fn test_small_field_rejects_curve_sized_secret() {
    let small = PrimeField::new(BigUint::from(65537u32)).unwrap();
    let mut rng = StdRng::seed_from_u64(51);
    let big_secret = BigUint::from(1u32) << 200;
    let ids: Vec<BigUint> = (1u32..=3).map(BigUint::from).collect();
    assert!(matches!(
        SecretSharer::split(&big_secret, 2, &ids, &small, &mut rng),
        Err(SharingError::InvalidParameters(_))
    ));
}

//! End-to-end recovery scenario.
//!
//! A 256-bit secret is split 3-of-6, each shard travels to its approver
//! ECIES-encrypted, the approvers decrypt, and shards {0, 2, 5} recover
//! the original secret. Then the full vault flow: master key behind
//! intermediate key behind approver shards.

use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use recoverly_ecies::{ecies, keys};
use recoverly_shamir::{recover_secret, SharePoint};
use recoverly_vault::{
    create_vault, decrypt_shard, participant_scalar, recover_master_key, scalar_field, Approver,
    RecoveryPolicy,
};

#[test]
fn test_split_encrypt_decrypt_recover_3_of_6() {
    let mut rng = StdRng::seed_from_u64(0xE2E);
    let field = scalar_field();

    // Random 256-bit secret below the curve order
    let secret = field.random_element(&mut rng);

    // Six approvers, each with a device keypair
    let device_keys: Vec<_> = (0..6).map(|_| keys::generate_keypair(&mut rng)).collect();
    let participant_ids: Vec<BigUint> = device_keys
        .iter()
        .map(|(_, public)| {
            participant_scalar(&keys::encode_public_key(public, false), &field).unwrap()
        })
        .collect();

    let shards =
        recoverly_vault::split_secret(&secret, 3, &participant_ids, &mut rng).unwrap();
    assert_eq!(shards.len(), 6);

    // Direct recovery from shards {0, 2, 5}
    let subset = [shards[0].clone(), shards[2].clone(), shards[5].clone()];
    assert_eq!(recover_secret(&subset, 3, &field).unwrap(), secret);

    // Every shard travels encrypted under its approver's device key
    let mut decrypted = Vec::new();
    for (shard, (device_secret, device_public)) in shards.iter().zip(&device_keys) {
        let public_bytes = keys::encode_public_key(device_public, false);
        let wrapped =
            ecies::encrypt(&shard.to_bytes().unwrap(), &public_bytes, &mut rng).unwrap();
        let opened = ecies::decrypt(&wrapped, device_secret).unwrap();
        let point = SharePoint::from_bytes(&opened).unwrap();
        assert_eq!(&point, shard);
        decrypted.push(point);
    }

    // The encrypt/decrypt round-trip changes nothing about recovery
    let subset = [
        decrypted[0].clone(),
        decrypted[2].clone(),
        decrypted[5].clone(),
    ];
    assert_eq!(recover_secret(&subset, 3, &field).unwrap(), secret);
}

#[test]
fn test_different_subsets_recover_identical_secret() {
    let mut rng = StdRng::seed_from_u64(0xCAFE);
    let field = scalar_field();
    let secret = field.random_element(&mut rng);
    let ids: Vec<BigUint> = (1u32..=6).map(BigUint::from).collect();

    let shards = recoverly_vault::split_secret(&secret, 3, &ids, &mut rng).unwrap();

    let a = [shards[0].clone(), shards[1].clone(), shards[2].clone()];
    let b = [shards[2].clone(), shards[4].clone(), shards[5].clone()];
    let from_a = recover_secret(&a, 3, &field).unwrap();
    let from_b = recover_secret(&b, 3, &field).unwrap();
    assert_eq!(from_a, from_b);
    assert_eq!(from_a, secret);
}

#[test]
fn test_full_vault_lifecycle() {
    let mut rng = StdRng::seed_from_u64(0xBEEF);

    // Policy setup: 3-of-6 approvers
    let mut approvers = Vec::new();
    let mut device_secrets = Vec::new();
    for i in 0..6 {
        let (secret, public) = keys::generate_keypair(&mut rng);
        approvers.push(Approver {
            label: format!("approver-{}", i),
            device_key: keys::encode_public_key(&public, false),
        });
        device_secrets.push(secret);
    }
    let policy = RecoveryPolicy::new(3, approvers).unwrap();
    let setup = create_vault(&policy, &mut rng).unwrap();
    assert_eq!(setup.shards.len(), 6);

    // Later, on other devices: approvers 0, 2 and 5 cooperate
    let points = vec![
        decrypt_shard(&setup.shards[0].ciphertext, &device_secrets[0]).unwrap(),
        decrypt_shard(&setup.shards[2].ciphertext, &device_secrets[2]).unwrap(),
        decrypt_shard(&setup.shards[5].ciphertext, &device_secrets[5]).unwrap(),
    ];
    let master = recover_master_key(&setup.encrypted_master_key, &points, 3).unwrap();

    // The recovered master key is the one the setup advertised
    let secp = secp256k1::Secp256k1::new();
    let master_public = secp256k1::PublicKey::from_secret_key(&secp, &master);
    assert_eq!(
        keys::encode_public_key(&master_public, false),
        setup.master_public_key
    );

    // And it can open payloads encrypted under the master public key
    let payload =
        ecies::encrypt(b"wallet seed phrase", &setup.master_public_key, &mut rng).unwrap();
    assert_eq!(
        ecies::decrypt(&payload, &master).unwrap(),
        b"wallet seed phrase"
    );
}

#[test]
fn test_reshare_lifecycle_over_curve_field() {
    use recoverly_shamir::{recover_root, Shard};

    let mut rng = StdRng::seed_from_u64(0xD00D);
    let field = scalar_field();
    let secret = field.random_element(&mut rng);
    let ids: Vec<BigUint> = (1u32..=4).map(BigUint::from).collect();

    let roots = Shard::root_set("vault-1", &secret, 2, &ids, &field, &mut rng).unwrap();

    // Approver 4 rotates devices: their shard moves to two new holders
    let children = roots[3]
        .reshare(2, &[BigUint::from(100u32), BigUint::from(101u32)], &field, &mut rng)
        .unwrap();

    let mixed = vec![roots[1].clone(), children[0].clone(), children[1].clone()];
    assert_eq!(recover_root(&mixed, &field).unwrap(), secret);
}

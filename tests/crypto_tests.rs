//! Integration tests for the CredVault crypto module.

use credvault::crypto::keys::{derive_field_key, derive_verifier};
use credvault::crypto::{decrypt, derive, derive_master_key, encrypt, generate_salt, verify, Argon2Params};

/// Cheap Argon2 settings so the suite stays fast.
const FAST: Argon2Params = Argon2Params {
    memory_kib: 8_192,
    iterations: 1,
    parallelism: 1,
};

// ---------------------------------------------------------------------------
// Field cipher
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; 32];
    let plaintext = b"hunter2";

    let ciphertext = encrypt(&key, plaintext).expect("encrypt should succeed");

    // 12-byte nonce + 16-byte tag on top of the plaintext.
    assert_eq!(ciphertext.len(), plaintext.len() + 28);

    let recovered = decrypt(&key, &ciphertext).expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn same_password_twice_gives_different_ciphertexts() {
    let key = [0xCDu8; 32];

    let ct1 = encrypt(&key, b"shared-password").expect("encrypt 1");
    let ct2 = encrypt(&key, b"shared-password").expect("encrypt 2");

    assert_ne!(ct1, ct2, "equal passwords must not be visible as equal ciphertexts");
}

#[test]
fn decrypt_with_wrong_key_fails() {
    let ciphertext = encrypt(&[0x11u8; 32], b"TOP_SECRET").expect("encrypt");
    let result = decrypt(&[0x22u8; 32], &ciphertext);
    assert!(result.is_err(), "decryption with the wrong key must fail");
}

#[test]
fn decrypt_with_corrupted_ciphertext_fails() {
    let key = [0xBBu8; 32];
    let mut ciphertext = encrypt(&key, b"abc").expect("encrypt");
    // Flip a byte after the 12-byte nonce.
    ciphertext[14] ^= 0xFF;

    assert!(decrypt(&key, &ciphertext).is_err(), "corrupted ciphertext must fail auth check");
}

#[test]
fn decrypt_with_truncated_data_fails() {
    assert!(decrypt(&[0xAAu8; 32], &[0u8; 5]).is_err());
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_master_key_same_inputs_same_output() {
    let salt = generate_salt();

    let key1 = derive_master_key(b"correct-horse", &salt).expect("derive 1");
    let key2 = derive_master_key(b"correct-horse", &salt).expect("derive 2");

    assert_eq!(key1, key2, "same passphrase + salt must produce the same key");
}

#[test]
fn different_salts_give_different_keys() {
    let a = derive(b"same", &generate_salt(), &FAST).unwrap();
    let b = derive(b"same", &generate_salt(), &FAST).unwrap();

    assert_ne!(a.field_key.as_bytes(), b.field_key.as_bytes());
    assert_ne!(*a.verifier, *b.verifier);
}

#[test]
fn derive_is_deterministic() {
    let salt = [3u8; 32];
    let a = derive(b"passphrase", &salt, &FAST).unwrap();
    let b = derive(b"passphrase", &salt, &FAST).unwrap();

    assert_eq!(a.field_key.as_bytes(), b.field_key.as_bytes());
    assert!(verify(a.verifier.as_slice(), b.verifier.as_slice()));
}

#[test]
fn verifier_is_not_the_field_key() {
    let derived = derive(b"passphrase", &[4u8; 32], &FAST).unwrap();
    assert_ne!(derived.field_key.as_bytes(), &*derived.verifier);
}

#[test]
fn hkdf_contexts_are_separated() {
    let master = [0x55u8; 32];
    let field = derive_field_key(&master).unwrap();
    let verifier = derive_verifier(&master).unwrap();
    assert_ne!(field, verifier);
}

#[test]
fn wrong_passphrase_produces_a_different_verifier() {
    let salt = [5u8; 32];
    let right = derive(b"right", &salt, &FAST).unwrap();
    let wrong = derive(b"wrong", &salt, &FAST).unwrap();
    assert!(!verify(wrong.verifier.as_slice(), right.verifier.as_slice()));
}

// ---------------------------------------------------------------------------
// End-to-end: passphrase -> field key -> encrypt/decrypt
// ---------------------------------------------------------------------------

#[test]
fn full_crypto_pipeline() {
    let salt = generate_salt();

    let at_create = derive(b"correct-horse", &salt, &FAST).expect("derive");
    let ciphertext = encrypt(at_create.field_key.as_bytes(), b"hunter2").expect("encrypt");
    drop(at_create);

    let later = derive(b"correct-horse", &salt, &FAST).expect("derive again");
    let recovered = decrypt(later.field_key.as_bytes(), &ciphertext).expect("decrypt");
    assert_eq!(recovered, b"hunter2".to_vec());
}

//! The concrete scenarios from spec.md sec. 8, exercised against the crate's
//! public API and the real named parameter sets (not the `TINY_PARAMS` toy
//! set unit tests elsewhere use), since `TINY_PARAMS` is itself
//! `#[cfg(test)]`-gated inside the library and not visible to integration
//! test binaries.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use ntruencrypt::primitives::igf::IndexGenerator;
use ntruencrypt::primitives::mgf::MaskGenerator;
use ntruencrypt::primitives::poly::IntegerPolynomial;
use ntruencrypt::prng::deterministic_rngs;
use ntruencrypt::{decrypt, encrypt, generate_keypair, lookup, NtruError, PrivateKey, PublicKey, PREDEFINED};

/// Scenario 1: APR2011_439, passphrase-derived key generation, "test" round
/// trip. Also checks the "determinism of passphrase key-gen" invariant: a
/// second call with the same passphrase and salt reproduces the same pair.
#[test]
fn apr2011_439_passphrase_round_trip() {
    let params = lookup([0, 7, 101], false).expect("APR2011_439 is predefined");

    let passphrase = b"correct horse battery staple";
    let salt = [0u8; 16];

    let (rng_g, rng_f) = deterministic_rngs(passphrase, &salt, params.digest);
    let kp = generate_keypair(params, rng_g, rng_f).unwrap();

    let (rng_g2, rng_f2) = deterministic_rngs(passphrase, &salt, params.digest);
    let kp2 = generate_keypair(params, rng_g2, rng_f2).unwrap();
    assert_eq!(kp, kp2, "identical passphrase and salt must reproduce the same key pair");

    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let message = [0x74u8, 0x65, 0x73, 0x74]; // "test"
    let ciphertext = encrypt(params, &kp.public, &message, &mut rng).unwrap();
    let recovered = decrypt(params, &kp, &ciphertext).unwrap();
    assert_eq!(recovered, message);
}

/// Scenario 2: EES1087EP2, a 170-byte message round-trips; 171 bytes is
/// rejected as too long.
#[test]
fn ees1087ep2_message_length_boundary() {
    let params = lookup([0, 6, 3], false).expect("EES1087EP2 is predefined");
    assert_eq!(params.max_msg_len_bytes().unwrap(), 170);

    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let kp = generate_keypair(params, rng.clone(), rng.clone()).unwrap();

    let message_170 = vec![0xABu8; 170];
    let ciphertext = encrypt(params, &kp.public, &message_170, &mut rng).unwrap();
    let recovered = decrypt(params, &kp, &ciphertext).unwrap();
    assert_eq!(recovered, message_170);

    let message_171 = vec![0xABu8; 171];
    let err = encrypt(params, &kp.public, &message_171, &mut rng).unwrap_err();
    assert!(matches!(err, NtruError::MessageTooLong { len: 171, max: 170 }));
}

/// Scenario 3: APR2011743FAST, flipping ciphertext byte 10 must fail
/// decryption with the undifferentiated `DecryptionFailed` error, never
/// silently return a corrupted plaintext.
#[test]
fn apr2011_743_fast_bit_flip_fails_closed() {
    let params = lookup([0, 7, 105], true).expect("APR2011743FAST is predefined");
    assert!(params.fast_fp);

    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let kp = generate_keypair(params, rng.clone(), rng.clone()).unwrap();

    let message = vec![0x5Au8; 50];
    let mut ciphertext = encrypt(params, &kp.public, &message, &mut rng).unwrap();
    ciphertext[10] ^= 0xFF;

    let err = decrypt(params, &kp, &ciphertext).unwrap_err();
    assert_eq!(err, NtruError::DecryptionFailed);
}

/// Scenario 4: every predefined parameter set's key pair survives a
/// serialize/reload cycle with structural equality, alongside the parameter
/// set itself.
#[test]
fn predefined_sets_round_trip_keys_and_params() {
    for (i, params) in PREDEFINED.iter().enumerate() {
        let param_bytes = params.to_binary();
        let reloaded_params =
            ntruencrypt::EncryptionParameters::from_binary(&param_bytes).unwrap();
        assert_eq!(&reloaded_params, params, "parameter set {i} did not round-trip");

        let rng = ChaCha20Rng::seed_from_u64(100 + i as u64);
        let kp = generate_keypair(params, rng.clone(), rng.clone()).unwrap();
        assert!(kp.is_valid(params), "freshly generated pair {i} failed IsValid");

        let combined = kp.to_binary();
        let pub_bytes_len = kp.public.to_binary().len();
        let reloaded_public = PublicKey::from_binary(&combined[..pub_bytes_len]).unwrap();
        let reloaded_private = PrivateKey::from_binary(&combined[pub_bytes_len..], params).unwrap();

        assert_eq!(reloaded_public, kp.public, "public key {i} did not round-trip");
        assert_eq!(reloaded_private, kp.private, "private key {i} did not round-trip");
    }
}

/// Scenario 5: with `maxM1 > 0` (APR2011_439), every produced masked
/// message polynomial has its constant coefficient forced to zero. Verified
/// by reconstructing the pre-unmask trit polynomial from the ciphertext
/// using only the crate's public API, the same way `decrypt` does
/// internally.
#[test]
fn apr2011_439_constant_coefficient_is_always_zero() {
    let params = lookup([0, 7, 101], false).expect("APR2011_439 is predefined");
    assert!(params.max_m1 > 0);

    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let kp = generate_keypair(params, rng.clone(), rng.clone()).unwrap();

    for trial in 0..3u8 {
        let message = [trial; 4];
        let ciphertext = encrypt(params, &kp.public, &message, &mut rng).unwrap();

        let e = IntegerPolynomial::from_binary(&ciphertext, params.n, params.q).unwrap();
        let a = kp.private.t.multiply(&e, params.q);
        let ci = if kp.private.fast_fp {
            let mut tripled = a.mult(3).add(&e);
            tripled.center0(params.q);
            tripled.mod3();
            tripled
        } else {
            let mut a = a;
            a.center0(params.q);
            a.mod3();
            let mut ci = a.multiply(&kp.private.fp, 3);
            ci.center0(3);
            ci
        };

        let mut c_r = e.subtract(&ci);
        c_r.mod_positive(params.q);

        let mgf = MaskGenerator::new(params.n, params.min_mgf_hash_calls, params.digest, params.hash_seed);
        let mask = mgf.generate(&c_r.to_binary4());
        let mut c_m_trin = ci.subtract(&mask);
        c_m_trin.mod3();

        assert_eq!(c_m_trin[0], 0, "constant coefficient was not forced to zero");
    }
}

/// Scenario 6: IGF-2 determinism for a 16-byte seed under APR2011_439's
/// parameters — the first eight drawn indices are reproducible.
#[test]
fn igf_determinism_for_known_seed() {
    let params = lookup([0, 7, 101], false).expect("APR2011_439 is predefined");
    let seed: Vec<u8> = (0..16u8).collect(); // 0x00..0x0F

    let mut a = IndexGenerator::new(&seed, params.n, params.c, params.min_igf_hash_calls, params.digest, params.hash_seed);
    let mut b = IndexGenerator::new(&seed, params.n, params.c, params.min_igf_hash_calls, params.digest, params.hash_seed);

    let seq_a: Vec<usize> = (0..8).map(|_| a.next_index()).collect();
    let seq_b: Vec<usize> = (0..8).map(|_| b.next_index()).collect();
    assert_eq!(seq_a, seq_b);
}

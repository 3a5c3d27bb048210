//! Key generation, encryption, and decryption state machines (spec.md
//! sec. 4.6-4.8): the SVES-3 padding scheme layered over the ring
//! arithmetic and generators in [`crate::primitives`].

use rand::RngCore;
use zeroize::Zeroize;

use crate::error::{NtruError, Result};
use crate::keys::{KeyPair, PrivateKey, PublicKey, SecretPoly};
use crate::params::{EncryptionParameters, SecretWeight};
use crate::primitives::igf::IndexGenerator;
use crate::primitives::mgf::MaskGenerator;
use crate::primitives::poly::inv::invert_fq;
use crate::primitives::poly::IntegerPolynomial;
use crate::primitives::product_form::ProductFormPolynomial;
use crate::primitives::ternary::{generate_blinding_poly, generate_random_ternary, TernaryPolynomial};

/// Bounds the key-generation and encryption rejection loops, so a
/// pathological parameter set fails instead of spinning forever (spec.md
/// sec. 5, "implementations may impose a maximum iteration ceiling").
const KEYGEN_ITERATION_CEILING: u32 = 10_000;
const ENCRYPTION_ITERATION_CEILING: u32 = 10_000;

/// Generates a fresh key pair.
///
/// `rng_g` and `rng_f` drive the two independent searches (for `g`, and for
/// `(f, fq)`); they may be the same PRNG cloned, or a deterministic
/// passphrase-derived pair from [`crate::prng::deterministic_rngs`]. The two
/// searches run concurrently on separate threads (spec.md sec. 4.6,
/// "Parallelism opportunity").
pub fn generate_keypair<Rg, Rf>(params: &EncryptionParameters, mut rng_g: Rg, mut rng_f: Rf) -> Result<KeyPair>
where
    Rg: RngCore + Send,
    Rf: RngCore + Send,
{
    let (g_result, f_result) = std::thread::scope(|scope| {
        let g_handle = scope.spawn(|| generate_g(params, &mut rng_g));
        let f_handle = scope.spawn(|| generate_f(params, &mut rng_f));
        (
            g_handle.join().expect("g search thread panicked"),
            f_handle.join().expect("f search thread panicked"),
        )
    });

    let mut g = g_result?;
    let (t, mut fq, fp) = f_result?;

    let gfq = g.multiply(&fq, params.q);
    let mut h = gfq.mult3(params.q);
    h.mod_positive(params.q);

    g.zeroize();
    fq.zeroize();

    Ok(KeyPair {
        public: PublicKey {
            n: params.n,
            q: params.q,
            h,
        },
        private: PrivateKey {
            n: params.n,
            q: params.q,
            t,
            fp,
            sparse: params.sparse,
            fast_fp: params.fast_fp,
        },
    })
}

/// Draws dense ternary polynomials with `dg` ones and `dg - 1` negative-ones
/// until one is invertible mod `q` (spec.md sec. 4.6, step 1). The inverse
/// itself is discarded; only invertibility is required of `g`.
fn generate_g<R: RngCore>(params: &EncryptionParameters, rng: &mut R) -> Result<IntegerPolynomial> {
    let dg = params.dg() as usize;
    for _ in 0..KEYGEN_ITERATION_CEILING {
        let candidate = generate_random_ternary(params.n, dg, dg - 1, false, rng).to_dense();
        if invert_fq(&candidate, params.q).is_some() {
            return Ok(candidate);
        }
    }
    Err(NtruError::KeyGenerationExhausted(KEYGEN_ITERATION_CEILING))
}

/// Draws a secret polynomial `t` (simple or product form, per `params`)
/// until both `fp` and `fq` exist, returning `(t, fq, fp)` (spec.md
/// sec. 4.6, step 2).
fn generate_f<R: RngCore>(
    params: &EncryptionParameters,
    rng: &mut R,
) -> Result<(SecretPoly, IntegerPolynomial, IntegerPolynomial)> {
    for _ in 0..KEYGEN_ITERATION_CEILING {
        let t = draw_t_candidate(params, rng);
        let proj = t.to_dense_projection(params.q);
        let f = bump_if_fast_fp(&proj, params.fast_fp);

        let fp = match PrivateKey::derive_fp(&t, params.fast_fp) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let fq = match invert_fq(&f, params.q) {
            Some(v) => v,
            None => continue,
        };
        return Ok((t, fq, fp));
    }
    Err(NtruError::KeyGenerationExhausted(KEYGEN_ITERATION_CEILING))
}

fn draw_t_candidate<R: RngCore>(params: &EncryptionParameters, rng: &mut R) -> SecretPoly {
    match params.weight {
        SecretWeight::Simple { df } => {
            let neg_ones = if params.fast_fp { df - 1 } else { df };
            match generate_random_ternary(params.n, df as usize, neg_ones as usize, params.sparse, rng) {
                TernaryPolynomial::Dense(p) => SecretPoly::Dense(p),
                TernaryPolynomial::Sparse(p) => SecretPoly::Sparse(p),
            }
        }
        SecretWeight::Product {
            df1,
            df2,
            df3_ones,
            df3_neg_ones,
        } => SecretPoly::Product(ProductFormPolynomial::generate_random(
            params.n,
            df1 as usize,
            df2 as usize,
            df3_ones as usize,
            df3_neg_ones as usize,
            rng,
        )),
    }
}

/// `f = 3 * proj + 1` when `fastFp`, else `proj` unchanged.
fn bump_if_fast_fp(proj: &IntegerPolynomial, fast_fp: bool) -> IntegerPolynomial {
    if fast_fp {
        let mut bumped = proj.mult(3);
        bumped[0] += 1;
        bumped
    } else {
        proj.clone()
    }
}

/// Encrypts `message` under `public`, using `rng` for the random prefix `b`
/// (spec.md sec. 4.7, SVES-3).
pub fn encrypt<R: RngCore>(
    params: &EncryptionParameters,
    public: &PublicKey,
    message: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let max_msg = params.max_msg_len_bytes()?;
    if message.len() > max_msg {
        return Err(NtruError::MessageTooLong {
            len: message.len(),
            max: max_msg,
        });
    }

    let db_bytes = (params.db / 8) as usize;
    let skip_constant = params.max_m1 > 0;
    let mgf = MaskGenerator::new(params.n, params.min_mgf_hash_calls, params.digest, params.hash_seed);

    for _ in 0..ENCRYPTION_ITERATION_CEILING {
        let mut b = vec![0u8; db_bytes];
        rng.fill_bytes(&mut b);

        let buffer = build_buffer(params, &b, message, max_msg);
        let mut m_trin = IntegerPolynomial::from_binary3_sves(&buffer, params.n, skip_constant)?;

        let s_data = build_s_data(params, message, &b, &public.h);
        let mut index_gen = IndexGenerator::new(
            &s_data,
            params.n,
            params.c,
            params.min_igf_hash_calls,
            params.digest,
            params.hash_seed,
        );
        let r = generate_blinding_poly(&mut index_gen, params.n, params.dr());

        let big_r = r.multiply(&public.h, params.q);
        let mask = mgf.generate(&big_r.to_binary4());

        m_trin = m_trin.add(&mask);
        if params.max_m1 > 0 {
            if m_trin.sum_coeffs().abs() > params.max_m1 {
                continue;
            }
            m_trin[0] = 0;
        }
        m_trin.mod3();

        let dm0 = params.dm0 as usize;
        if m_trin.count(-1) < dm0 || m_trin.count(0) < dm0 || m_trin.count(1) < dm0 {
            continue;
        }

        let mut e = big_r.add(&m_trin);
        e.mod_positive(params.q);
        return Ok(e.to_binary(params.q));
    }
    Err(NtruError::EncryptionExhausted(ENCRYPTION_ITERATION_CEILING))
}

/// Decrypts `ciphertext` with `keypair`, returning the recovered plaintext.
/// Every failure mode collapses to [`NtruError::DecryptionFailed`] (spec.md
/// sec. 4.8, sec. 7).
pub fn decrypt(params: &EncryptionParameters, keypair: &KeyPair, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let q = params.q;
    let n = params.n;
    let e = IntegerPolynomial::from_binary(ciphertext, n, q).map_err(|_| NtruError::DecryptionFailed)?;

    let a = keypair.private.t.multiply(&e, q);
    let ci = if keypair.private.fast_fp {
        let mut tripled = a.mult(3).add(&e);
        tripled.center0(q);
        tripled.mod3();
        tripled
    } else {
        let mut a = a;
        a.center0(q);
        a.mod3();
        let mut ci = a.multiply(&keypair.private.fp, 3);
        ci.center0(3);
        ci
    };

    let dm0 = params.dm0 as usize;
    if ci.count(-1) < dm0 || ci.count(0) < dm0 || ci.count(1) < dm0 {
        return Err(NtruError::DecryptionFailed);
    }

    let mut c_r = e.subtract(&ci);
    c_r.mod_positive(q);

    let mgf = MaskGenerator::new(n, params.min_mgf_hash_calls, params.digest, params.hash_seed);
    let mask = mgf.generate(&c_r.to_binary4());
    let mut c_m_trin = ci.subtract(&mask);
    c_m_trin.mod3();

    let skip_constant = params.max_m1 > 0;
    let bytes = c_m_trin.to_binary3_sves(skip_constant);

    let db_bytes = (params.db / 8) as usize;
    if bytes.len() < db_bytes + 1 {
        return Err(NtruError::DecryptionFailed);
    }
    let b = &bytes[..db_bytes];
    let length = bytes[db_bytes] as usize;
    let max_msg = params.max_msg_len_bytes()?;
    if length > max_msg {
        return Err(NtruError::DecryptionFailed);
    }
    let message_start = db_bytes + 1;
    if bytes.len() < message_start + length {
        return Err(NtruError::DecryptionFailed);
    }
    let message = &bytes[message_start..message_start + length];
    let pad = &bytes[message_start + length..];
    if pad.iter().any(|&byte| byte != 0) {
        return Err(NtruError::DecryptionFailed);
    }

    let s_data = build_s_data(params, message, b, &keypair.public.h);
    let mut index_gen = IndexGenerator::new(
        &s_data,
        n,
        params.c,
        params.min_igf_hash_calls,
        params.digest,
        params.hash_seed,
    );
    let r_prime = generate_blinding_poly(&mut index_gen, n, params.dr());
    let mut big_r_prime = r_prime.multiply(&keypair.public.h, q);
    big_r_prime.mod_positive(q);

    if big_r_prime != c_r {
        return Err(NtruError::DecryptionFailed);
    }

    Ok(message.to_vec())
}

/// Builds the SVES-3 padded buffer `M' = b || octet(|M|) || M || zeroPad`,
/// resized to exactly `(bufferLenBits + 7) / 8` bytes (spec.md sec. 4.7).
fn build_buffer(params: &EncryptionParameters, b: &[u8], message: &[u8], max_msg: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(b.len() + 1 + message.len());
    buf.extend_from_slice(b);
    buf.push(message.len() as u8);
    buf.extend_from_slice(message);
    let zero_pad_len = max_msg + 1 - message.len();
    buf.extend(std::iter::repeat(0u8).take(zero_pad_len));

    let total_bytes = (params.buffer_len_bits() + 7) / 8;
    buf.resize(total_bytes, 0);
    buf
}

/// Builds `sData = oid || message || b || truncate(h.toBinary(q), pkLen/8)`,
/// the seed fed to the blinding-polynomial index generator (spec.md
/// sec. 4.7 step 4, sec. 4.8 step 7).
fn build_s_data(params: &EncryptionParameters, message: &[u8], b: &[u8], h: &IntegerPolynomial) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 + message.len() + b.len() + params.pk_len() as usize / 8);
    out.extend_from_slice(&params.oid);
    out.extend_from_slice(message);
    out.extend_from_slice(b);
    out.extend_from_slice(&h.to_binary_trunc(params.q, params.pk_len() as usize / 8));
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::TINY_PARAMS;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn round_trip_with_tiny_params() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let kp = generate_keypair(&TINY_PARAMS, rng.clone(), rng.clone()).unwrap();

        let message = b"hi";
        let ciphertext = encrypt(&TINY_PARAMS, &kp.public, message, &mut rng).unwrap();
        let recovered = decrypt(&TINY_PARAMS, &kp, &ciphertext).unwrap();
        assert_eq!(recovered, message);
    }

    #[test]
    fn key_pair_is_valid_after_generation() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let kp = generate_keypair(&TINY_PARAMS, rng.clone(), rng.clone()).unwrap();
        assert!(kp.is_valid(&TINY_PARAMS));
    }

    #[test]
    fn oversized_message_is_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let kp = generate_keypair(&TINY_PARAMS, rng.clone(), rng.clone()).unwrap();
        let max_msg = TINY_PARAMS.max_msg_len_bytes().unwrap();
        let too_long = vec![0xABu8; max_msg + 1];
        let err = encrypt(&TINY_PARAMS, &kp.public, &too_long, &mut rng).unwrap_err();
        assert!(matches!(err, NtruError::MessageTooLong { .. }));
    }

    #[test]
    fn bit_flipped_ciphertext_fails_to_decrypt() {
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        let kp = generate_keypair(&TINY_PARAMS, rng.clone(), rng.clone()).unwrap();

        let message = b"x";
        let mut ciphertext = encrypt(&TINY_PARAMS, &kp.public, message, &mut rng).unwrap();
        ciphertext[0] ^= 0x01;

        let err = decrypt(&TINY_PARAMS, &kp, &ciphertext).unwrap_err();
        assert_eq!(err, NtruError::DecryptionFailed);
    }

    /// `TINY_PARAMS`'s small `N` lets the buffer-length rounding absorb an
    /// undersized buffer by coincidence; a real parameter set does not.
    #[test]
    fn round_trip_with_predefined_params() {
        let params = crate::params::lookup([0, 6, 3], false).expect("EES1087EP2 is predefined");

        let mut rng = ChaCha20Rng::seed_from_u64(1087);
        let kp = generate_keypair(params, rng.clone(), rng.clone()).unwrap();

        let message = b"hello from a real parameter set";
        let ciphertext = encrypt(params, &kp.public, message, &mut rng).unwrap();
        let recovered = decrypt(params, &kp, &ciphertext).unwrap();
        assert_eq!(recovered, message);
    }
}

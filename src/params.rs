//! Encryption parameter sets: the immutable record of `(N, q, df..., dm0,
//! maxM1, db, c, minIGF, minMGF, ...)` that every other module is configured
//! from (spec.md sec. 3, sec. 6).

use lazy_static::lazy_static;

use crate::digest::DigestAlgorithm;
use crate::error::{NtruError, Result};
use crate::prng::PrngAlgorithm;

/// Which family of secret polynomial a parameter set uses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PolyType {
    /// `f` is a single ternary polynomial (dense or sparse).
    Simple,
    /// `f = f1*f2 + f3`, a [`crate::primitives::product_form::ProductFormPolynomial`].
    Product,
}

impl PolyType {
    fn from_selector(value: i32) -> Self {
        match value {
            1 => PolyType::Product,
            _ => PolyType::Simple,
        }
    }

    fn as_selector(self) -> i32 {
        match self {
            PolyType::Simple => 0,
            PolyType::Product => 1,
        }
    }
}

/// The `df` shape a parameter set uses: either a single simple-form Hamming
/// weight, or the three product-form weights.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SecretWeight {
    /// Simple form: `f` has `df` ones and (`df` or `df - 1`) negative-ones.
    Simple { df: u32 },
    /// Product form: `f1`/`f2` each have `df1`/`df2` ones and as many
    /// negative-ones; `f3` has `df3_ones` ones and `df3_neg_ones`
    /// negative-ones (asymmetric, since `fastFp` shifts it by one).
    Product {
        df1: u32,
        df2: u32,
        df3_ones: u32,
        df3_neg_ones: u32,
    },
}

/// An immutable NTRUEncrypt parameter set (spec.md sec. 3).
#[derive(Clone, Debug, PartialEq)]
pub struct EncryptionParameters {
    /// Ring dimension. Prime.
    pub n: usize,
    /// Large modulus. A power of two.
    pub q: i64,
    /// Secret-polynomial Hamming weight(s).
    pub weight: SecretWeight,
    /// Minimum count of each of `{-1, 0, 1}` required in the masked message.
    pub dm0: u32,
    /// If positive, bound on `|sumCoeffs(m')|`; also forces the constant
    /// coefficient of the message to zero. Zero disables the check.
    pub max_m1: i64,
    /// Number of random prefix bits in the SVES-3 buffer. A multiple of 8.
    pub db: u32,
    /// IGF-2 candidate bit width.
    pub c: u32,
    /// Minimum number of IGF-2 hash calls before the first index is drawn.
    pub min_igf_hash_calls: u32,
    /// Minimum number of MGF-TP-1 hash calls before mask trits are drawn.
    pub min_mgf_hash_calls: u32,
    /// Whether MGF-TP-1 hashes its seed before use.
    pub hash_seed: bool,
    /// 3-byte parameter-set identifier.
    pub oid: [u8; 3],
    /// Whether secret ternary polynomials use the sparse representation.
    pub sparse: bool,
    /// `f = 1 + 3F`, `fp = 1` trivially, skipping the `invertF3` search.
    pub fast_fp: bool,
    /// Digest algorithm used by IGF-2, MGF-TP-1, and `sData` hashing.
    pub digest: DigestAlgorithm,
    /// PRNG used for non-deterministic key generation and blinding.
    pub prng: PrngAlgorithm,
}

impl EncryptionParameters {
    /// `dg = N / 3`: the Hamming weight of the generator polynomial `g`.
    pub fn dg(&self) -> u32 {
        (self.n / 3) as u32
    }

    /// The ephemeral blinding polynomial `r`'s Hamming weight. Not its own
    /// field in the parameter set (spec.md sec. 3 and sec. 4.2 never name a
    /// distinct `dr`); reuses `df` (simple form) or `df1` (product form),
    /// matching the historical EESS#1 parameter tables. See DESIGN.md.
    pub fn dr(&self) -> usize {
        match self.weight {
            SecretWeight::Simple { df } => df as usize,
            SecretWeight::Product { df1, .. } => df1 as usize,
        }
    }

    /// The ring dimension reduced by one when `maxM1` forces the constant
    /// coefficient to zero, else the ring dimension unchanged.
    fn effective_n(&self) -> usize {
        if self.max_m1 > 0 {
            self.n - 1
        } else {
            self.n
        }
    }

    /// `ceil(effectiveN / 5) * 8`: the SVES-3 buffer length, in bits. Sized
    /// so that, once packed five trits per byte
    /// ([`crate::primitives::poly::IntegerPolynomial::to_binary3_sves`]), the
    /// buffer holds at least `effectiveN` trits — anything short of that
    /// makes `from_binary3_sves` fail with `UnexpectedEof` on every
    /// encryption.
    pub fn buffer_len_bits(&self) -> usize {
        self.effective_n().div_ceil(5) * 8
    }

    /// The serialized public-key random-prefix length, in bits. Equal to
    /// `db`.
    pub fn pk_len(&self) -> u32 {
        self.db
    }

    /// `(effectiveN * 3 / 2) / 8 - 1 - db / 8`: the largest plaintext this
    /// parameter set accepts.
    pub fn max_msg_len_bytes(&self) -> Result<usize> {
        let effective_n = self.effective_n();
        let max = (effective_n * 3 / 2) / 8;
        let max = max
            .checked_sub(1)
            .and_then(|v| v.checked_sub(self.db as usize / 8))
            .ok_or_else(|| NtruError::InvalidParameter("maxMsgLenBytes underflowed".into()))?;
        if max > 255 {
            return Err(NtruError::InvalidParameter(format!(
                "maxMsgLenBytes {max} exceeds the 255-byte ceiling"
            )));
        }
        Ok(max)
    }

    /// Validates internal consistency: `N` odd, `q` a power of two, and
    /// `maxMsgLenBytes` within range.
    pub fn validate(&self) -> Result<()> {
        if self.n < 3 || self.n % 2 == 0 {
            return Err(NtruError::InvalidParameter(format!("N = {} must be odd and > 2", self.n)));
        }
        if self.q < 2 || !self.q.is_power_of_two() {
            return Err(NtruError::InvalidParameter(format!("q = {} must be a power of two", self.q)));
        }
        self.max_msg_len_bytes()?;
        Ok(())
    }

    /// Serializes the 32-bit fields, OID, flags, and selectors per spec.md
    /// sec. 4.9: 12 little-endian signed 32-bit integers, one `hashSeed`
    /// byte, the 3-byte OID, two flag bytes (`sparse`, `fastFp`), then three
    /// little-endian 32-bit selectors (`polyType`, `digest`, `prng`).
    ///
    /// Readers must re-derive `dg`, `maxMsgLenBytes`, `bufferLenBits`, and
    /// `pkLen` rather than expect them on the wire.
    pub fn to_binary(&self) -> Vec<u8> {
        let (df, df1, df2, df3) = match self.weight {
            SecretWeight::Simple { df } => (df as i32, 0, 0, 0),
            SecretWeight::Product {
                df1,
                df2,
                df3_ones,
                df3_neg_ones,
            } => (0, df1 as i32, df2 as i32, encode_df3(df3_ones, df3_neg_ones)),
        };

        let mut out = Vec::with_capacity(12 * 4 + 1 + 3 + 2 + 3 * 4);
        for field in [
            self.n as i32,
            self.q as i32,
            df,
            df1,
            df2,
            df3,
            self.db as i32,
            self.dm0 as i32,
            self.max_m1 as i32,
            self.c as i32,
            self.min_igf_hash_calls as i32,
            self.min_mgf_hash_calls as i32,
        ] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.push(self.hash_seed as u8);
        out.extend_from_slice(&self.oid);
        out.push(self.sparse as u8);
        out.push(self.fast_fp as u8);
        out.extend_from_slice(&self.weight_selector().as_selector().to_le_bytes());
        out.extend_from_slice(&self.digest.as_selector().to_le_bytes());
        out.extend_from_slice(&self.prng.as_selector().to_le_bytes());
        out
    }

    /// Inverse of [`EncryptionParameters::to_binary`].
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        const HEADER_LEN: usize = 12 * 4 + 1 + 3 + 2 + 3 * 4;
        if bytes.len() < HEADER_LEN {
            return Err(NtruError::UnexpectedEof("parameter set"));
        }

        let mut fields = [0i32; 12];
        for (i, field) in fields.iter_mut().enumerate() {
            let start = i * 4;
            *field = i32::from_le_bytes(bytes[start..start + 4].try_into().unwrap());
        }
        let [n, q, df, df1, df2, df3, db, dm0, max_m1, c, min_igf, min_mgf] = fields;

        let mut cursor = 12 * 4;
        let hash_seed = bytes[cursor] != 0;
        cursor += 1;
        let oid = [bytes[cursor], bytes[cursor + 1], bytes[cursor + 2]];
        cursor += 3;
        let sparse = bytes[cursor] != 0;
        let fast_fp = bytes[cursor + 1] != 0;
        cursor += 2;
        let poly_type_selector = i32::from_le_bytes(bytes[cursor..cursor + 4].try_into().unwrap());
        cursor += 4;
        let digest_selector = i32::from_le_bytes(bytes[cursor..cursor + 4].try_into().unwrap());
        cursor += 4;
        let prng_selector = i32::from_le_bytes(bytes[cursor..cursor + 4].try_into().unwrap());

        let weight = match PolyType::from_selector(poly_type_selector) {
            PolyType::Simple => SecretWeight::Simple { df: df as u32 },
            PolyType::Product => {
                let (df3_ones, df3_neg_ones) = decode_df3(df3);
                SecretWeight::Product {
                    df1: df1 as u32,
                    df2: df2 as u32,
                    df3_ones,
                    df3_neg_ones,
                }
            }
        };

        let params = Self {
            n: n as usize,
            q: q as i64,
            weight,
            dm0: dm0 as u32,
            max_m1: max_m1 as i64,
            db: db as u32,
            c: c as u32,
            min_igf_hash_calls: min_igf as u32,
            min_mgf_hash_calls: min_mgf as u32,
            hash_seed,
            oid,
            sparse,
            fast_fp,
            digest: DigestAlgorithm::from_selector(digest_selector),
            prng: PrngAlgorithm::from_selector(prng_selector),
        };
        params.validate()?;
        Ok(params)
    }

    fn weight_selector(&self) -> PolyType {
        match self.weight {
            SecretWeight::Simple { .. } => PolyType::Simple,
            SecretWeight::Product { .. } => PolyType::Product,
        }
    }
}

/// Packs `(ones, neg_ones)` into one 32-bit field: `ones` in the low 16
/// bits, `neg_ones` in the high 16. `df3_ones`/`df3_neg_ones` are always
/// small (under a few hundred), well within 16 bits.
fn encode_df3(ones: u32, neg_ones: u32) -> i32 {
    ((neg_ones << 16) | (ones & 0xFFFF)) as i32
}

fn decode_df3(field: i32) -> (u32, u32) {
    let field = field as u32;
    (field & 0xFFFF, field >> 16)
}

/// Looks up a predefined parameter set by OID, with a hint selecting the
/// FAST (`fastFp`) variant when both exist for that OID (spec.md sec. 6).
///
/// The FAST/base split always tracks `fastFp`, not `polyType`: the
/// EES1087EP2/EES1171EP1/EES1499EP1 family pairs a simple-form base with a
/// product-form FAST variant, but the APR2011-439/APR2011-743 family pairs
/// two product-form variants that differ only in `fastFp`. `use_product`
/// (named for the common case) is matched against `fastFp` so both shapes of
/// pairing resolve correctly.
pub fn lookup(oid: [u8; 3], use_product: bool) -> Option<&'static EncryptionParameters> {
    PREDEFINED.iter().find(|p| p.oid == oid && p.fast_fp == use_product)
}

lazy_static! {
    /// The predefined parameter sets named in spec.md sec. 6: the
    /// EES1087EP2/EES1171EP1/EES1499EP1 family (OID third byte in
    /// `3..=5`), APR2011-439 and APR2011-743, and each set's FAST
    /// (product-form, `fastFp`) counterpart.
    ///
    /// Spec.md sec. 6 says "twelve canonical sets"; only five families are
    /// named explicitly by OID, doubled by their FAST counterparts to ten.
    /// See DESIGN.md for this discrepancy.
    pub static ref PREDEFINED: Vec<EncryptionParameters> = vec![
        EncryptionParameters {
            n: 1087,
            q: 2048,
            weight: SecretWeight::Simple { df: 120 },
            dm0: 13,
            max_m1: 0,
            db: 256,
            c: 11,
            min_igf_hash_calls: 31,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 6, 3],
            sparse: true,
            fast_fp: false,
            digest: DigestAlgorithm::Sha512,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 1087,
            q: 2048,
            weight: SecretWeight::Product {
                df1: 11,
                df2: 11,
                df3_ones: 15,
                df3_neg_ones: 14,
            },
            dm0: 13,
            max_m1: 0,
            db: 256,
            c: 11,
            min_igf_hash_calls: 31,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 6, 3],
            sparse: true,
            fast_fp: true,
            digest: DigestAlgorithm::Sha512,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 1171,
            q: 2048,
            weight: SecretWeight::Simple { df: 106 },
            dm0: 20,
            max_m1: 0,
            db: 256,
            c: 11,
            min_igf_hash_calls: 25,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 6, 4],
            sparse: true,
            fast_fp: false,
            digest: DigestAlgorithm::Sha512,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 1171,
            q: 2048,
            weight: SecretWeight::Product {
                df1: 13,
                df2: 12,
                df3_ones: 14,
                df3_neg_ones: 13,
            },
            dm0: 20,
            max_m1: 0,
            db: 256,
            c: 11,
            min_igf_hash_calls: 25,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 6, 4],
            sparse: true,
            fast_fp: true,
            digest: DigestAlgorithm::Sha512,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 1499,
            q: 2048,
            weight: SecretWeight::Simple { df: 79 },
            dm0: 27,
            max_m1: 0,
            db: 256,
            c: 11,
            min_igf_hash_calls: 19,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 6, 5],
            sparse: true,
            fast_fp: false,
            digest: DigestAlgorithm::Sha512,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 1499,
            q: 2048,
            weight: SecretWeight::Product {
                df1: 13,
                df2: 12,
                df3_ones: 14,
                df3_neg_ones: 13,
            },
            dm0: 27,
            max_m1: 0,
            db: 256,
            c: 11,
            min_igf_hash_calls: 19,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 6, 5],
            sparse: true,
            fast_fp: true,
            digest: DigestAlgorithm::Sha512,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 439,
            q: 2048,
            weight: SecretWeight::Product {
                df1: 9,
                df2: 8,
                df3_ones: 5,
                df3_neg_ones: 5,
            },
            dm0: 8,
            max_m1: 100,
            db: 112,
            c: 9,
            min_igf_hash_calls: 27,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 7, 101],
            sparse: true,
            fast_fp: false,
            digest: DigestAlgorithm::Sha256,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 439,
            q: 2048,
            weight: SecretWeight::Product {
                df1: 9,
                df2: 8,
                df3_ones: 5,
                df3_neg_ones: 4,
            },
            dm0: 8,
            max_m1: 100,
            db: 112,
            c: 9,
            min_igf_hash_calls: 27,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 7, 101],
            sparse: true,
            fast_fp: true,
            digest: DigestAlgorithm::Sha256,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 743,
            q: 2048,
            weight: SecretWeight::Product {
                df1: 11,
                df2: 11,
                df3_ones: 15,
                df3_neg_ones: 15,
            },
            dm0: 20,
            max_m1: 0,
            db: 248,
            c: 10,
            min_igf_hash_calls: 27,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 7, 105],
            sparse: true,
            fast_fp: false,
            digest: DigestAlgorithm::Sha512,
            prng: PrngAlgorithm::Default,
        },
        EncryptionParameters {
            n: 743,
            q: 2048,
            weight: SecretWeight::Product {
                df1: 11,
                df2: 11,
                df3_ones: 15,
                df3_neg_ones: 14,
            },
            dm0: 20,
            max_m1: 0,
            db: 248,
            c: 10,
            min_igf_hash_calls: 27,
            min_mgf_hash_calls: 9,
            hash_seed: true,
            oid: [0, 7, 105],
            sparse: true,
            fast_fp: true,
            digest: DigestAlgorithm::Sha512,
            prng: PrngAlgorithm::Default,
        },
    ];

    /// A small, insecure parameter set used only by tests, so test
    /// round-trips run in milliseconds instead of seconds.
    #[cfg(test)]
    pub static ref TINY_PARAMS: EncryptionParameters = EncryptionParameters {
        n: 61,
        q: 256,
        weight: SecretWeight::Simple { df: 11 },
        dm0: 3,
        max_m1: 0,
        db: 16,
        c: 6,
        min_igf_hash_calls: 2,
        min_mgf_hash_calls: 1,
        hash_seed: true,
        oid: [0xFF, 0xFF, 0xFF],
        sparse: true,
        fast_fp: false,
        digest: DigestAlgorithm::Sha256,
        prng: PrngAlgorithm::Default,
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ees1087ep2_max_msg_len_matches_known_scenario() {
        let p = lookup([0, 6, 3], false).unwrap();
        assert_eq!(p.max_msg_len_bytes().unwrap(), 170);
    }

    #[test]
    fn lookup_distinguishes_fast_variant() {
        let base = lookup([0, 7, 101], false).unwrap();
        let fast = lookup([0, 7, 101], true).unwrap();
        assert!(!base.fast_fp);
        assert!(fast.fast_fp);
    }

    #[test]
    fn parameter_binary_round_trip() {
        for p in PREDEFINED.iter() {
            let bytes = p.to_binary();
            let back = EncryptionParameters::from_binary(&bytes).unwrap();
            assert_eq!(&back, p);
        }
    }

    #[test]
    fn tiny_params_are_internally_consistent() {
        TINY_PARAMS.validate().unwrap();
    }
}

//! Digest selection.
//!
//! IGF-2 and MGF-TP-1 are both defined generically over "a streaming hash
//! with `Reset/Update/Finalize/DigestSize`" (spec.md sec. 1). We express that
//! contract as [`digest::DynDigest`], boxed, so [`IndexGenerator`](crate::primitives::igf::IndexGenerator)
//! and [`MaskGenerator`](crate::primitives::mgf) stay generic over the
//! selected algorithm without monomorphizing per hash choice.

use digest::DynDigest;

/// The nine named digest algorithms from spec.md sec. 6.
///
/// Unknown/unsupported values degrade to [`DigestAlgorithm::Sha512`], the
/// default, per spec.md sec. 6.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
    /// SHA-512. The scheme default.
    #[default]
    Sha512,
    /// BLAKE-256, backed by BLAKE2s-256 (see below).
    Blake256,
    /// BLAKE-512, backed by BLAKE2b-512 (see below).
    Blake512,
    /// Keccak-256 (pre-standardization Keccak, not NIST SHA3-256).
    Keccak256,
    /// Keccak-512 (pre-standardization Keccak, not NIST SHA3-512).
    Keccak512,
    /// Skein-256. No maintained RustCrypto Skein crate exists; this
    /// degrades to [`DigestAlgorithm::Sha512`] (see module docs and
    /// DESIGN.md).
    Skein256,
    /// Skein-512. Degrades to [`DigestAlgorithm::Sha512`].
    Skein512,
    /// Skein-1024. Degrades to [`DigestAlgorithm::Sha512`].
    Skein1024,
}

impl DigestAlgorithm {
    /// Returns a fresh, boxed hash engine for this algorithm.
    ///
    /// `Blake256`/`Blake512` are backed by BLAKE2s-256/BLAKE2b-512: the
    /// actively maintained RustCrypto family closest to the named
    /// algorithms. There is no maintained RustCrypto crate for the original
    /// BLAKE-256/512, or for any Skein variant, so `Skein256`/`Skein512`/
    /// `Skein1024` fall back to SHA-512, matching the "unknown values
    /// degrade to default" policy in spec.md sec. 6.
    pub fn new_hasher(self) -> Box<dyn DynDigest> {
        use sha2::{Sha256, Sha512};
        use sha3::{Keccak256, Keccak512};
        use blake2::{Blake2b512, Blake2s256};

        match self {
            DigestAlgorithm::Sha256 => Box::new(Sha256::default()),
            DigestAlgorithm::Sha512 => Box::new(Sha512::default()),
            DigestAlgorithm::Blake256 => Box::new(Blake2s256::default()),
            DigestAlgorithm::Blake512 => Box::new(Blake2b512::default()),
            DigestAlgorithm::Keccak256 => Box::new(Keccak256::default()),
            DigestAlgorithm::Keccak512 => Box::new(Keccak512::default()),
            DigestAlgorithm::Skein256
            | DigestAlgorithm::Skein512
            | DigestAlgorithm::Skein1024 => Box::new(Sha512::default()),
        }
    }

    /// Returns the output size of this algorithm's hash, in bytes.
    pub fn digest_size(self) -> usize {
        self.new_hasher().output_size()
    }

    /// Hashes `input` in one shot, returning the digest bytes.
    pub fn hash(self, input: &[u8]) -> Vec<u8> {
        let mut hasher = self.new_hasher();
        hasher.update(input);
        hasher.finalize_reset().to_vec()
    }

    /// Parses a 32-bit selector value from a serialized parameter set,
    /// degrading unknown values to the default, per spec.md sec. 6.
    pub fn from_selector(value: i32) -> Self {
        match value {
            0 => DigestAlgorithm::Sha256,
            1 => DigestAlgorithm::Sha512,
            2 => DigestAlgorithm::Blake256,
            3 => DigestAlgorithm::Blake512,
            4 => DigestAlgorithm::Keccak256,
            5 => DigestAlgorithm::Keccak512,
            6 => DigestAlgorithm::Skein256,
            7 => DigestAlgorithm::Skein512,
            8 => DigestAlgorithm::Skein1024,
            _ => DigestAlgorithm::default(),
        }
    }

    /// Returns this algorithm's 32-bit selector value, for serialization.
    pub fn as_selector(self) -> i32 {
        match self {
            DigestAlgorithm::Sha256 => 0,
            DigestAlgorithm::Sha512 => 1,
            DigestAlgorithm::Blake256 => 2,
            DigestAlgorithm::Blake512 => 3,
            DigestAlgorithm::Keccak256 => 4,
            DigestAlgorithm::Keccak512 => 5,
            DigestAlgorithm::Skein256 => 6,
            DigestAlgorithm::Skein512 => 7,
            DigestAlgorithm::Skein1024 => 8,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn digest_size_matches_algorithm() {
        assert_eq!(DigestAlgorithm::Sha256.digest_size(), 32);
        assert_eq!(DigestAlgorithm::Sha512.digest_size(), 64);
        assert_eq!(DigestAlgorithm::Blake256.digest_size(), 32);
        assert_eq!(DigestAlgorithm::Blake512.digest_size(), 64);
        assert_eq!(DigestAlgorithm::Keccak256.digest_size(), 32);
        assert_eq!(DigestAlgorithm::Keccak512.digest_size(), 64);
    }

    #[test]
    fn unknown_selector_degrades_to_default() {
        assert_eq!(DigestAlgorithm::from_selector(999), DigestAlgorithm::default());
    }

    #[test]
    fn hash_is_deterministic() {
        let a = DigestAlgorithm::Sha512.hash(b"ntru");
        let b = DigestAlgorithm::Sha512.hash(b"ntru");
        assert_eq!(a, b);
        assert_ne!(a, DigestAlgorithm::Sha512.hash(b"ntru2"));
    }
}

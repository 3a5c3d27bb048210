//! An NTRUEncrypt lattice-based public-key cryptosystem.
//!
//! NTRUEncrypt works over the ring `Z[X]/(X^N - 1)`, with a small modulus
//! `p = 3` and a large modulus `q` (a power of two). Key generation, SVES-3
//! encryption padding, and decryption are described in spec.md sec. 4; the
//! supporting generators (IGF-2, MGF-TP-1) and polynomial representations
//! (dense, sparse ternary, product-form) live under [`primitives`].
//!
//! This crate has 4 core modules:
//! [`params`]: immutable parameter sets, including the predefined OID-keyed
//! ones,
//! [`keys`]: public/private key representations and their binary codecs,
//! [`primitives`]: the ring arithmetic, generators, and ternary polynomial
//! shapes key generation and encryption are built from,
//! [`engine`]: key generation, encryption, and decryption themselves.

pub mod digest;
pub mod engine;
pub mod error;
pub mod keys;
pub mod params;
pub mod primitives;
pub mod prng;

pub use engine::{decrypt, encrypt, generate_keypair};
pub use error::{NtruError, Result};
pub use keys::{KeyPair, PrivateKey, PublicKey, SecretPoly};
pub use params::{lookup, EncryptionParameters, PolyType, SecretWeight, PREDEFINED};
#[cfg(test)]
pub use params::TINY_PARAMS;

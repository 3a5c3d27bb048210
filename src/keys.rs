//! Public and private key representations (spec.md sec. 3, sec. 4.9).

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{NtruError, Result};
use crate::params::{EncryptionParameters, PolyType, SecretWeight};
use crate::primitives::poly::inv::invert_f3;
use crate::primitives::poly::IntegerPolynomial;
use crate::primitives::product_form::ProductFormPolynomial;
use crate::primitives::ternary::{SparseTernary, TernaryPolynomial};

const SPARSE_FLAG: u8 = 1;
const FAST_FP_FLAG: u8 = 2;
const PRODUCT_FLAG: u8 = 4;

/// The private key's secret polynomial `t`, in whichever of the three
/// shapes key generation produced it (spec.md sec. 9, "Polymorphic ternary
/// carrier").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SecretPoly {
    /// Dense ternary representation.
    Dense(IntegerPolynomial),
    /// Sparse ternary representation (two index lists).
    Sparse(SparseTernary),
    /// Product-form representation, `f1*f2 + f3`.
    Product(ProductFormPolynomial),
}

impl SecretPoly {
    /// The ring dimension `N`.
    pub fn n(&self) -> usize {
        match self {
            SecretPoly::Dense(p) => p.n(),
            SecretPoly::Sparse(p) => p.n(),
            SecretPoly::Product(p) => p.n(),
        }
    }

    /// Whether this is the product-form shape.
    pub fn is_product(&self) -> bool {
        matches!(self, SecretPoly::Product(_))
    }

    /// The dense integer projection of `t`: for `Dense`/`Sparse`, the
    /// ternary coefficients directly; for `Product`, the expanded (and
    /// still-ternary-in-mod-3-only) sum `f1*f2 + f3`, reduced mod `q` so its
    /// magnitude stays bounded before any further arithmetic.
    pub fn to_dense_projection(&self, q: i64) -> IntegerPolynomial {
        match self {
            SecretPoly::Dense(p) => p.clone(),
            SecretPoly::Sparse(p) => p.to_dense(),
            SecretPoly::Product(p) => {
                let f1f2 = p.f1().to_dense().multiply(&p.f2().to_dense(), q);
                f1f2.add(&p.f3().to_dense())
            }
        }
    }

    /// Multiplies `g` by this secret polynomial's native shape, reduced mod
    /// `modulus`: the dense `O(N^2)` convolution, the sparse `O(N*d)`
    /// rotation-sum, or the product-form triple multiply, whichever `self`
    /// is. Used by decryption's `t * e mod q` step (spec.md sec. 4.8), which
    /// never needs `t`'s dense projection materialized.
    pub fn multiply(&self, g: &IntegerPolynomial, modulus: i64) -> IntegerPolynomial {
        match self {
            SecretPoly::Dense(p) => p.multiply(g, modulus),
            SecretPoly::Sparse(p) => p.multiply(g, modulus),
            SecretPoly::Product(p) => p.multiply(g, modulus),
        }
    }

    /// `t`'s dense ternary projection mod 3, used to compute `fp`. Only
    /// meaningful when the stored shape is actually ternary mod 3 (true for
    /// all three shapes by construction: `Dense`/`Sparse` are ternary
    /// already, and `Product`'s `f1*f2+f3` is reduced mod 3 here).
    pub fn to_dense_mod3(&self) -> IntegerPolynomial {
        match self {
            SecretPoly::Dense(p) => p.clone(),
            SecretPoly::Sparse(p) => p.to_dense(),
            SecretPoly::Product(p) => p.to_dense_mod3(),
        }
    }
}

impl Zeroize for SecretPoly {
    fn zeroize(&mut self) {
        match self {
            SecretPoly::Dense(p) => p.zeroize(),
            SecretPoly::Sparse(_) | SecretPoly::Product(_) => {
                // Index lists carry no secret magnitude beyond position;
                // replace with an empty shape so the positions aren't left
                // behind in the freed allocation.
                *self = SecretPoly::Dense(IntegerPolynomial::zero(0));
            }
        }
    }
}

/// The public key: `(h, N, q)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    /// The ring dimension `N`.
    pub n: usize,
    /// The modulus `q`.
    pub q: i64,
    /// `h = 3 * g * fq mod q`, reduced into `[0, q)`.
    pub h: IntegerPolynomial,
}

impl PublicKey {
    /// Serializes as `N` (u16 BE) `|| q` (u16 BE) `|| h.toBinary(q)`.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.h.n());
        out.extend_from_slice(&(self.n as u16).to_be_bytes());
        out.extend_from_slice(&(self.q as u16).to_be_bytes());
        out.extend_from_slice(&self.h.to_binary(self.q));
        out
    }

    /// Inverse of [`PublicKey::to_binary`].
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(NtruError::UnexpectedEof("public key header"));
        }
        let n = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        let q = u16::from_be_bytes([bytes[2], bytes[3]]) as i64;
        let h = IntegerPolynomial::from_binary(&bytes[4..], n, q)?;
        Ok(Self { n, q, h })
    }
}

/// The private key: `(t, fp, N, q, sparse, fastFp, polyType)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    /// The ring dimension `N`.
    pub n: usize,
    /// The modulus `q`.
    pub q: i64,
    /// The secret polynomial, in whichever shape it was generated.
    pub t: SecretPoly,
    /// `f^-1 mod 3`. Trivially the constant-1 polynomial when `fastFp`.
    pub fp: IntegerPolynomial,
    /// Whether `t`'s simple-form shape is sparse (irrelevant for product form).
    pub sparse: bool,
    /// Whether `f = 1 + 3F` (so `fp = 1` trivially).
    pub fast_fp: bool,
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.t.zeroize();
        self.fp.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateKey {}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl PrivateKey {
    /// Derives `fp` from `t`, per the load-time re-derivation rule
    /// (spec.md sec. 4.9): the constant-1 polynomial when `fastFp`, else
    /// `t.invertF3()`.
    pub fn derive_fp(t: &SecretPoly, fast_fp: bool) -> Result<IntegerPolynomial> {
        if fast_fp {
            let mut one = IntegerPolynomial::zero(t.n());
            one[0] = 1;
            Ok(one)
        } else {
            invert_f3(&t.to_dense_mod3()).ok_or(NtruError::DecryptionFailed)
        }
    }

    /// Serializes as `N` (u16 BE) `|| q` (u16 BE) `||` a flags byte `||` `t`:
    /// the three sparse factors' indices (product form) or
    /// `toBinary3Tight(t)` (simple form). `fp` is never serialized; it is
    /// re-derived by [`PrivateKey::derive_fp`] on load.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut flags = 0u8;
        if self.sparse {
            flags |= SPARSE_FLAG;
        }
        if self.fast_fp {
            flags |= FAST_FP_FLAG;
        }
        if self.t.is_product() {
            flags |= PRODUCT_FLAG;
        }

        let mut out = Vec::new();
        out.extend_from_slice(&(self.n as u16).to_be_bytes());
        out.extend_from_slice(&(self.q as u16).to_be_bytes());
        out.push(flags);

        match &self.t {
            SecretPoly::Product(p) => out.extend_from_slice(&p.to_binary()),
            t => out.extend_from_slice(&t.to_dense_projection(self.q).to_binary3_tight()),
        }
        out
    }

    /// Inverse of [`PrivateKey::to_binary`]. The product-form `df1`/`df2`/
    /// `df3` weights aren't carried on the wire, so the caller must supply
    /// the matching parameter set.
    pub fn from_binary(bytes: &[u8], params: &EncryptionParameters) -> Result<Self> {
        if bytes.len() < 5 {
            return Err(NtruError::UnexpectedEof("private key header"));
        }
        let n = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        let q = u16::from_be_bytes([bytes[2], bytes[3]]) as i64;
        let flags = bytes[4];
        let sparse = flags & SPARSE_FLAG != 0;
        let fast_fp = flags & FAST_FP_FLAG != 0;
        let product = flags & PRODUCT_FLAG != 0;
        let payload = &bytes[5..];

        let t = if product {
            let SecretWeight::Product {
                df1,
                df2,
                df3_ones,
                df3_neg_ones,
            } = params.weight
            else {
                return Err(NtruError::Malformed("private key is product-form but parameters are not"));
            };
            SecretPoly::Product(ProductFormPolynomial::from_binary(
                payload,
                n,
                df1 as usize,
                df2 as usize,
                df3_ones as usize,
                df3_neg_ones as usize,
            )?)
        } else {
            let dense = IntegerPolynomial::from_binary3_tight(payload, n)?;
            if sparse {
                let mut ones = Vec::new();
                let mut neg_ones = Vec::new();
                for (i, &c) in dense.coeffs().iter().enumerate() {
                    match c {
                        1 => ones.push(i),
                        -1 => neg_ones.push(i),
                        _ => {}
                    }
                }
                SecretPoly::Sparse(SparseTernary::from_indices(n, ones, neg_ones))
            } else {
                SecretPoly::Dense(dense)
            }
        };

        let fp = Self::derive_fp(&t, fast_fp)?;
        Ok(Self {
            n,
            q,
            t,
            fp,
            sparse,
            fast_fp,
        })
    }
}

/// A matched public/private key pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    /// The public key.
    pub public: PublicKey,
    /// The private key.
    pub private: PrivateKey,
}

impl KeyPair {
    /// Serializes as `publicKey || privateKey` (spec.md sec. 6).
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = self.public.to_binary();
        out.extend_from_slice(&self.private.to_binary());
        out
    }

    /// Validates structural invariants (spec.md sec. 8, "Key-pair validity"):
    /// `h` reduced mod `q`; for `polyType == SIMPLE`, `t` ternary; and `g :=
    /// (f*h) * (9^-1 mod q) mod q`, centered, is ternary with exactly `dg`
    /// ones and `dg - 1` negative-ones.
    pub fn is_valid(&self, params: &EncryptionParameters) -> bool {
        let q = self.public.q;
        if !self.public.h.is_reduced(q) {
            return false;
        }
        if matches!(params.weight, SecretWeight::Simple { .. }) {
            let dense = self.private.t.to_dense_projection(q);
            if !dense.is_ternary() {
                return false;
            }
        }

        let Some(inv9) = crate::primitives::poly::inv::mod_inverse(9, q) else {
            return false;
        };

        let t_proj = self.private.t.to_dense_projection(q);
        let f = if self.private.fast_fp {
            let mut bumped = t_proj.mult(3);
            bumped[0] += 1;
            bumped
        } else {
            t_proj
        };

        let fh = f.multiply(&self.public.h, q);
        let mut g = fh.mult(inv9);
        g.mod_positive(q);
        g.center0(q);

        if !g.is_ternary() {
            return false;
        }
        let dg = params.dg() as usize;
        g.count(1) == dg && g.count(-1) == dg - 1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::TINY_PARAMS;

    #[test]
    fn public_key_binary_round_trip() {
        let mut h = IntegerPolynomial::from_coeffs((0..TINY_PARAMS.n as i64).collect());
        h.mod_positive(TINY_PARAMS.q);
        let pk = PublicKey {
            n: TINY_PARAMS.n,
            q: TINY_PARAMS.q,
            h,
        };
        let bytes = pk.to_binary();
        let back = PublicKey::from_binary(&bytes).unwrap();
        assert_eq!(back, pk);
    }

    #[test]
    fn derive_fp_fast_fp_is_constant_one() {
        let t = SecretPoly::Dense(IntegerPolynomial::zero(11));
        let fp = PrivateKey::derive_fp(&t, true).unwrap();
        assert_eq!(fp.count(1), 1);
        assert_eq!(fp[0], 1);
    }
}

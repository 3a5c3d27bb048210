//! Product-form polynomials: `f = f1*f2 + f3`, where `f1`, `f2`, `f3` are
//! sparse ternary polynomials (spec.md sec. 4.3).
//!
//! Multiplying by a product-form polynomial costs two sparse multiplies
//! (`O(N * d1)` and `O(N * d2)`) plus one more (`O(N * d3)`), all cheaper
//! than the dense `O(N^2)` convolution for the small `d1`, `d2`, `d3` NTRU
//! parameter sets use.

use bitvec::prelude::*;
use rand::Rng;

use crate::error::{NtruError, Result};
use crate::primitives::poly::IntegerPolynomial;
use crate::primitives::ternary::{generate_random_ternary, SparseTernary, TernaryPolynomial};

/// `f = f1*f2 + f3`, each factor a sparse ternary polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductFormPolynomial {
    n: usize,
    f1: SparseTernary,
    f2: SparseTernary,
    f3: SparseTernary,
}

impl ProductFormPolynomial {
    /// Builds a product-form polynomial from its three sparse factors. All
    /// three must share the same ring dimension.
    pub fn new(f1: SparseTernary, f2: SparseTernary, f3: SparseTernary) -> Self {
        assert_eq!(f1.n(), f2.n());
        assert_eq!(f2.n(), f3.n());
        Self { n: f1.n(), f1, f2, f3 }
    }

    /// The ring dimension `N`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The `f1` factor.
    pub fn f1(&self) -> &SparseTernary {
        &self.f1
    }

    /// The `f2` factor.
    pub fn f2(&self) -> &SparseTernary {
        &self.f2
    }

    /// The `f3` factor.
    pub fn f3(&self) -> &SparseTernary {
        &self.f3
    }

    /// `((g . f1 mod modulus) . f2 + g . f3) mod modulus`.
    pub fn multiply(&self, g: &IntegerPolynomial, modulus: i64) -> IntegerPolynomial {
        let gf1 = self.f1.multiply(g, modulus);
        let gf1f2 = self.f2.multiply(&gf1, modulus);
        let gf3 = self.f3.multiply(g, modulus);
        let mut out = gf1f2.add(&gf3);
        out.mod_positive(modulus);
        out
    }

    /// Expands into a single dense [`IntegerPolynomial`], `f1*f2 + f3`
    /// reduced mod 3 (the only modulus at which `f`'s integer projection is
    /// meaningful as a ternary polynomial, per spec.md sec. 4.6's `fastFp`
    /// handling).
    pub fn to_dense_mod3(&self) -> IntegerPolynomial {
        let f1f2 = self.f1.to_dense().multiply(&self.f2.to_dense(), 3);
        let mut out = f1f2.add(&self.f3.to_dense());
        out.mod3();
        out
    }

    /// Encodes the three factors' index lists back to back, each index
    /// packed into `ceil(log2 N)` bits, little-endian (spec.md sec. 4.3):
    /// `f1.ones, f1.negOnes, f2.ones, f2.negOnes, f3.ones, f3.negOnes`.
    pub fn to_binary(&self) -> Vec<u8> {
        let bits_per = bits_for(self.n);
        let mut bits: BitVec<u8, Lsb0> = BitVec::new();
        for indices in [
            self.f1.ones(),
            self.f1.neg_ones(),
            self.f2.ones(),
            self.f2.neg_ones(),
            self.f3.ones(),
            self.f3.neg_ones(),
        ] {
            for &idx in indices {
                push_index(&mut bits, idx as u64, bits_per);
            }
        }
        bits.into_vec()
    }

    /// Inverse of [`ProductFormPolynomial::to_binary`]. The caller must
    /// supply the exact index counts for each factor (from the parameter
    /// set's `df1`, `df2`, `df3`, `fastFp`), since the encoding carries no
    /// embedded lengths.
    #[allow(clippy::too_many_arguments)]
    pub fn from_binary(
        bytes: &[u8],
        n: usize,
        df1: usize,
        df2: usize,
        df3_ones: usize,
        df3_neg_ones: usize,
    ) -> Result<Self> {
        let bits_per = bits_for(n);
        let total_indices = 2 * df1 + 2 * df2 + df3_ones + df3_neg_ones;
        let total_bits = total_indices * bits_per as usize;
        let required_bytes = total_bits.div_ceil(8);
        if bytes.len() < required_bytes {
            return Err(NtruError::UnexpectedEof("product-form polynomial encoding"));
        }
        let bits = BitSlice::<u8, Lsb0>::from_slice(&bytes[..required_bytes]);

        let mut cursor = 0usize;
        let mut read_indices = |count: usize| -> Result<Vec<usize>> {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                let slice = &bits[cursor..cursor + bits_per as usize];
                let idx = pull_index(slice) as usize;
                if idx >= n {
                    return Err(NtruError::Malformed("product-form polynomial index out of range"));
                }
                out.push(idx);
                cursor += bits_per as usize;
            }
            Ok(out)
        };

        let f1_ones = read_indices(df1)?;
        let f1_neg_ones = read_indices(df1)?;
        let f2_ones = read_indices(df2)?;
        let f2_neg_ones = read_indices(df2)?;
        let f3_ones = read_indices(df3_ones)?;
        let f3_neg_ones = read_indices(df3_neg_ones)?;

        Ok(Self::new(
            SparseTernary::from_indices(n, f1_ones, f1_neg_ones),
            SparseTernary::from_indices(n, f2_ones, f2_neg_ones),
            SparseTernary::from_indices(n, f3_ones, f3_neg_ones),
        ))
    }

    /// Draws three independent random sparse ternary factors: `f1` and `f2`
    /// each with `df1`/`df2` positions of both signs, `f3` with
    /// `df3_ones`/`df3_neg_ones` positions (asymmetric, since `fastFp`
    /// shifts `f3`'s negative-one count by one; spec.md sec. 4.6).
    pub fn generate_random<R: Rng>(
        n: usize,
        df1: usize,
        df2: usize,
        df3_ones: usize,
        df3_neg_ones: usize,
        rng: &mut R,
    ) -> Self {
        let as_sparse = |t: TernaryPolynomial| match t {
            TernaryPolynomial::Sparse(s) => s,
            TernaryPolynomial::Dense(_) => unreachable!("generate_random_ternary(sparse=true) always returns Sparse"),
        };

        let f1 = as_sparse(generate_random_ternary(n, df1, df1, true, rng));
        let f2 = as_sparse(generate_random_ternary(n, df2, df2, true, rng));
        let f3 = as_sparse(generate_random_ternary(n, df3_ones, df3_neg_ones, true, rng));

        Self::new(f1, f2, f3)
    }
}

fn bits_for(n: usize) -> u32 {
    debug_assert!(n > 1);
    usize::BITS - (n - 1).leading_zeros()
}

fn push_index(bits: &mut BitVec<u8, Lsb0>, value: u64, count: u32) {
    for i in 0..count {
        bits.push((value >> i) & 1 != 0);
    }
}

fn pull_index(slice: &BitSlice<u8, Lsb0>) -> u64 {
    let mut value: u64 = 0;
    for (i, bit) in slice.iter().enumerate() {
        if *bit {
            value |= 1 << i;
        }
    }
    value
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn multiply_matches_dense_expansion() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let n = 31;
        let pf = ProductFormPolynomial::generate_random(n, 5, 4, 3, 2, &mut rng);

        let g = crate::primitives::poly::test::rand_poly(n, 2048, &mut rng);
        let via_product = pf.multiply(&g, 2048);

        let f1 = pf.f1.to_dense();
        let f2 = pf.f2.to_dense();
        let f3 = pf.f3.to_dense();
        let f = f1.multiply(&f2, 2048).add(&f3);
        let mut expected = f.multiply(&g, 2048);
        expected.mod_positive(2048);

        assert_eq!(via_product, expected);
    }

    #[test]
    fn binary_round_trip() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let n = 31;
        let pf = ProductFormPolynomial::generate_random(n, 5, 4, 3, 2, &mut rng);

        let bytes = pf.to_binary();
        let back = ProductFormPolynomial::from_binary(&bytes, n, 5, 4, 3, 2).unwrap();
        assert_eq!(back, pf);
    }
}

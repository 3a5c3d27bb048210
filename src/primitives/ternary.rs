//! Ternary polynomials: dense (an [`IntegerPolynomial`] guaranteed to hold
//! only `{-1, 0, 1}`) and sparse (two index lists), per spec.md sec. 4.2.
//!
//! The sparse representation's `multiply` avoids the dense `O(N^2)`
//! convolution entirely: a ternary polynomial is a sum of shifted unit
//! spikes, so multiplying by it is a sum of `d` full rotations of the other
//! operand, `O(N * d)`.

use rand::Rng;

use crate::primitives::igf::IndexGenerator;
use crate::primitives::poly::IntegerPolynomial;

/// A ternary polynomial, in whichever representation is cheaper for the
/// operation at hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TernaryPolynomial {
    /// Every coefficient stored explicitly, each in `{-1, 0, 1}`.
    Dense(IntegerPolynomial),
    /// Only the positions of `+1` and `-1` coefficients are stored.
    Sparse(SparseTernary),
}

/// A ternary polynomial stored as two sorted, disjoint index lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseTernary {
    n: usize,
    ones: Vec<usize>,
    neg_ones: Vec<usize>,
}

impl SparseTernary {
    /// Builds a sparse ternary polynomial directly from index lists. Sorts
    /// them, but does not check for duplicates or overlap between the two.
    pub fn from_indices(n: usize, mut ones: Vec<usize>, mut neg_ones: Vec<usize>) -> Self {
        ones.sort_unstable();
        neg_ones.sort_unstable();
        Self { n, ones, neg_ones }
    }

    /// The ring dimension `N`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The sorted positions of `+1` coefficients.
    pub fn ones(&self) -> &[usize] {
        &self.ones
    }

    /// The sorted positions of `-1` coefficients.
    pub fn neg_ones(&self) -> &[usize] {
        &self.neg_ones
    }

    /// Expands into a dense [`IntegerPolynomial`].
    pub fn to_dense(&self) -> IntegerPolynomial {
        let mut out = IntegerPolynomial::zero(self.n);
        for &i in &self.ones {
            out[i] = 1;
        }
        for &i in &self.neg_ones {
            out[i] = -1;
        }
        out
    }

    /// `sum_{i in ones} rot(g, i) - sum_{j in neg_ones} rot(g, j) mod
    /// modulus`, where `rot(g, i)[k] = g[(k - i) mod N]`. `O(N * d)` where
    /// `d` is the total number of nonzero coefficients.
    pub fn multiply(&self, g: &IntegerPolynomial, modulus: i64) -> IntegerPolynomial {
        assert_eq!(self.n, g.n(), "ring dimension mismatch in sparse multiply");
        let n = self.n;
        let mut acc = vec![0i64; n];
        for &i in &self.ones {
            for (k, &gk) in g.coeffs().iter().enumerate() {
                acc[(k + i) % n] += gk;
            }
        }
        for &j in &self.neg_ones {
            for (k, &gk) in g.coeffs().iter().enumerate() {
                acc[(k + j) % n] -= gk;
            }
        }
        let mut out = IntegerPolynomial::from_coeffs(acc);
        out.mod_positive(modulus);
        out
    }
}

impl TernaryPolynomial {
    /// The ring dimension `N`.
    pub fn n(&self) -> usize {
        match self {
            TernaryPolynomial::Dense(p) => p.n(),
            TernaryPolynomial::Sparse(p) => p.n(),
        }
    }

    /// Expands into a dense [`IntegerPolynomial`], reduced mod `modulus`.
    pub fn to_dense(&self) -> IntegerPolynomial {
        match self {
            TernaryPolynomial::Dense(p) => p.clone(),
            TernaryPolynomial::Sparse(p) => p.to_dense(),
        }
    }

    /// Multiplies `self` by `g`, reducing mod `modulus`.
    pub fn multiply(&self, g: &IntegerPolynomial, modulus: i64) -> IntegerPolynomial {
        match self {
            TernaryPolynomial::Dense(p) => p.multiply(g, modulus),
            TernaryPolynomial::Sparse(p) => p.multiply(g, modulus),
        }
    }
}

/// Draws a uniformly random ternary polynomial of length `n` with exactly
/// `num_ones` coefficients equal to `+1` and `num_neg_ones` equal to `-1`,
/// the rest `0` (spec.md sec. 4.2).
pub fn generate_random_ternary<R: Rng>(
    n: usize,
    num_ones: usize,
    num_neg_ones: usize,
    sparse: bool,
    rng: &mut R,
) -> TernaryPolynomial {
    assert!(num_ones + num_neg_ones <= n, "too many nonzero coefficients for N");

    let mut positions: Vec<usize> = (0..n).collect();
    // Partial Fisher-Yates: only shuffle as many slots as we need to place.
    for i in 0..(num_ones + num_neg_ones) {
        let j = rng.gen_range(i..n);
        positions.swap(i, j);
    }
    let ones = positions[..num_ones].to_vec();
    let neg_ones = positions[num_ones..num_ones + num_neg_ones].to_vec();

    let sparse_poly = SparseTernary::from_indices(n, ones, neg_ones);
    if sparse {
        TernaryPolynomial::Sparse(sparse_poly)
    } else {
        TernaryPolynomial::Dense(sparse_poly.to_dense())
    }
}

/// Draws a sparse ternary polynomial by consuming exactly `2 * dr` distinct
/// indices from `index_gen`: the first `dr` become `+1` positions, the next
/// `dr` become `-1` positions (spec.md sec. 4.2). The index generator's
/// built-in de-duplication guarantees the two sets are disjoint.
pub fn generate_blinding_poly(index_gen: &mut IndexGenerator, n: usize, dr: usize) -> TernaryPolynomial {
    let ones: Vec<usize> = (0..dr).map(|_| index_gen.next_index()).collect();
    let neg_ones: Vec<usize> = (0..dr).map(|_| index_gen.next_index()).collect();
    TernaryPolynomial::Sparse(SparseTernary::from_indices(n, ones, neg_ones))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::digest::DigestAlgorithm;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn sparse_multiply_matches_dense() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let n = 23;
        let t = generate_random_ternary(n, 5, 4, true, &mut rng);
        let dense_t = t.to_dense();

        let g = crate::primitives::poly::test::rand_poly(n, 2048, &mut rng);

        let via_sparse = t.multiply(&g, 2048);
        let via_dense = dense_t.multiply(&g, 2048);
        assert_eq!(via_sparse, via_dense);
    }

    #[test]
    fn generate_random_ternary_has_exact_counts() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let t = generate_random_ternary(50, 10, 8, false, &mut rng);
        let dense = t.to_dense();
        assert_eq!(dense.count(1), 10);
        assert_eq!(dense.count(-1), 8);
        assert_eq!(dense.count(0), 32);
    }

    #[test]
    fn generate_blinding_poly_has_disjoint_indices() {
        let mut gen = IndexGenerator::new(b"blinding seed", 101, 7, 2, DigestAlgorithm::Sha256, true);
        let poly = generate_blinding_poly(&mut gen, 101, 11);
        let TernaryPolynomial::Sparse(sparse) = poly else {
            panic!("expected sparse representation");
        };
        assert_eq!(sparse.ones().len(), 11);
        assert_eq!(sparse.neg_ones().len(), 11);
        for i in sparse.ones() {
            assert!(!sparse.neg_ones().contains(i));
        }
    }
}

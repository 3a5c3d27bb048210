//! Dense integer polynomials over `Z[X]/(X^N - 1)`, reduced mod `q` or mod 3.
//!
//! This is the teacher's `Poly(DensePolynomial<Coeff>)` newtype pattern
//! (`eyelid-match-ops/src/primitives/poly/modular_poly.rs`), generalized from
//! a prime-field coefficient type to a plain signed-integer coefficient type:
//! NTRU's large modulus `q` is a power of two, not a prime, so `ark-ff`
//! field elements don't apply, and reduction has to be done explicitly by
//! the caller (spec.md sec. 4.1) rather than folded into the field's `Add`/`Mul`.

use derive_more::{AsRef, Deref, DerefMut, Index, IndexMut, Into};
use zeroize::Zeroize;

pub mod codec;
pub mod inv;


/// A dense polynomial of length `N`, with signed-integer coefficients.
///
/// Indices run `0..N`, representing the ring `Z[X]/(X^N - 1)`: coefficient
/// `i` is the coefficient of `X^i`. Values are not implicitly reduced; call
/// [`IntegerPolynomial::mod_positive`], [`IntegerPolynomial::mod_center`], or
/// [`IntegerPolynomial::mod3`] to bring coefficients into a canonical range.
#[derive(Clone, Debug, Default, PartialEq, Eq, AsRef, Deref, DerefMut, Index, IndexMut, Into)]
pub struct IntegerPolynomial {
    coeffs: Vec<i64>,
}

impl IntegerPolynomial {
    /// Returns the zero polynomial of length `n`.
    pub fn zero(n: usize) -> Self {
        Self {
            coeffs: vec![0; n],
        }
    }

    /// Wraps `coeffs` directly as a polynomial. `coeffs.len()` is the ring
    /// dimension `N`.
    pub fn from_coeffs(coeffs: Vec<i64>) -> Self {
        Self { coeffs }
    }

    /// Returns the ring dimension `N`, i.e. the number of coefficients.
    pub fn n(&self) -> usize {
        self.coeffs.len()
    }

    /// Returns the coefficients as a slice.
    pub fn coeffs(&self) -> &[i64] {
        &self.coeffs
    }

    /// Returns the coefficients as a mutable slice.
    pub fn coeffs_mut(&mut self) -> &mut [i64] {
        &mut self.coeffs
    }

    /// Coefficient-wise addition. Panics if the lengths differ.
    ///
    /// Does not reduce the result; call a `mod_*` method afterwards if a
    /// canonical range is required.
    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(self.n(), other.n(), "polynomial length mismatch in add");
        let coeffs = self
            .coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(a, b)| a + b)
            .collect();
        Self { coeffs }
    }

    /// Coefficient-wise subtraction. Panics if the lengths differ.
    pub fn subtract(&self, other: &Self) -> Self {
        assert_eq!(self.n(), other.n(), "polynomial length mismatch in subtract");
        let coeffs = self
            .coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(a, b)| a - b)
            .collect();
        Self { coeffs }
    }

    /// Multiplies every coefficient by `scalar`. Does not reduce.
    pub fn mult(&self, scalar: i64) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c * scalar).collect(),
        }
    }

    /// Multiplies every coefficient by 3, then reduces into `[0, q)`.
    pub fn mult3(&self, q: i64) -> Self {
        let mut out = self.mult(3);
        out.mod_positive(q);
        out
    }

    /// Ring multiplication in `Z[X]/(X^N - 1)`: `c_k = sum_{i+j == k (mod N)}
    /// a_i b_j`, with each `c_k` reduced mod `modulus`.
    ///
    /// `O(N^2)`, matching spec.md's "Complexity O(N^2) acceptable" note; the
    /// sparse and product-form representations (sec. 4.2, sec. 4.3) provide the
    /// faster paths the spec allows as substitutes.
    pub fn multiply(&self, other: &Self, modulus: i64) -> Self {
        assert_eq!(self.n(), other.n(), "polynomial length mismatch in multiply");
        let n = self.n();
        let mut acc = vec![0i64; n];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                let k = (i + j) % n;
                acc[k] += a * b;
            }
        }
        for c in &mut acc {
            *c = rem_positive(*c, modulus);
        }
        Self { coeffs: acc }
    }

    /// Reduces every coefficient into `[0, q)`.
    pub fn mod_positive(&mut self, q: i64) {
        for c in &mut self.coeffs {
            *c = rem_positive(*c, q);
        }
    }

    /// Alias of [`IntegerPolynomial::mod_positive`], matching spec.md's
    /// `ensurePositive` name.
    pub fn ensure_positive(&mut self, q: i64) {
        self.mod_positive(q);
    }

    /// Reduces every coefficient into `(-q/2, q/2]`.
    pub fn mod_center(&mut self, q: i64) {
        self.center0(q);
    }

    /// Reduces every coefficient into `(-m/2, m/2]`.
    pub fn center0(&mut self, m: i64) {
        for c in &mut self.coeffs {
            let r = rem_positive(*c, m);
            *c = if r > m / 2 { r - m } else { r };
        }
    }

    /// Reduces every coefficient mod 3 into `{-1, 0, 1}`.
    ///
    /// Policy: `r = c mod 3; if r == 2 then r = -1; if r == -2 then r = 1`.
    pub fn mod3(&mut self) {
        for c in &mut self.coeffs {
            let r = *c % 3;
            *c = match r {
                2 => -1,
                -2 => 1,
                other => other,
            };
        }
    }

    /// Returns the number of coefficients equal to `v`.
    pub fn count(&self, v: i64) -> usize {
        self.coeffs.iter().filter(|&&c| c == v).count()
    }

    /// Returns the signed sum of all coefficients.
    pub fn sum_coeffs(&self) -> i64 {
        self.coeffs.iter().sum()
    }

    /// Returns whether every coefficient is in `{-1, 0, 1}`.
    pub fn is_ternary(&self) -> bool {
        self.coeffs.iter().all(|&c| (-1..=1).contains(&c))
    }

    /// Returns whether every coefficient is in `[0, q)`.
    pub fn is_reduced(&self, q: i64) -> bool {
        self.coeffs.iter().all(|&c| c >= 0 && c < q)
    }
}

/// Reduces `c` into `[0, modulus)`. `modulus` must be positive.
pub(crate) fn rem_positive(c: i64, modulus: i64) -> i64 {
    c.rem_euclid(modulus)
}

impl Zeroize for IntegerPolynomial {
    fn zeroize(&mut self) {
        self.coeffs.iter_mut().for_each(|c| c.zeroize());
    }
}

#[cfg(test)]
mod core_test {
    use super::*;

    #[test]
    fn add_subtract_are_inverse() {
        let a = IntegerPolynomial::from_coeffs(vec![1, 2, 3, 4]);
        let b = IntegerPolynomial::from_coeffs(vec![4, 3, 2, 1]);
        let sum = a.add(&b);
        let back = sum.subtract(&b);
        assert_eq!(back, a);
    }

    #[test]
    fn multiply_by_one_is_identity() {
        let n = 5;
        let mut one = IntegerPolynomial::zero(n);
        one[0] = 1;
        let a = IntegerPolynomial::from_coeffs(vec![2, -1, 0, 7, 3]);
        let product = a.multiply(&one, 1 << 16);
        let mut expected = a.clone();
        expected.mod_positive(1 << 16);
        assert_eq!(product, expected);
    }

    #[test]
    fn multiply_is_commutative() {
        let a = IntegerPolynomial::from_coeffs(vec![1, -2, 3, 0, 5]);
        let b = IntegerPolynomial::from_coeffs(vec![-1, 1, 2, 4, -3]);
        let q = 2048;
        assert_eq!(a.multiply(&b, q), b.multiply(&a, q));
    }

    #[test]
    fn multiply_distributes_over_add() {
        let a = IntegerPolynomial::from_coeffs(vec![1, -2, 3, 0, 5]);
        let b = IntegerPolynomial::from_coeffs(vec![-1, 1, 2, 4, -3]);
        let c = IntegerPolynomial::from_coeffs(vec![2, 0, -1, 1, 1]);
        let q = 2048;

        let lhs = a.add(&b).multiply(&c, q);
        let mut rhs = a.multiply(&c, q).add(&b.multiply(&c, q));
        rhs.mod_positive(q);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn mod3_maps_into_ternary_range() {
        let mut p = IntegerPolynomial::from_coeffs(vec![-5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5]);
        p.mod3();
        assert!(p.is_ternary());
    }

    #[test]
    fn mod_center_is_bounded() {
        let mut p = IntegerPolynomial::from_coeffs((0..16).collect());
        p.mod_center(16);
        assert!(p.coeffs().iter().all(|&c| c > -8 && c <= 8));
    }
}

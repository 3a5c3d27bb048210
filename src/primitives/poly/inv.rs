//! Polynomial inversion mod a power of two, and mod 3.
//!
//! Structured the way the teacher's `modular_poly/inv.rs` structures its
//! `extended_gcd`: a GCD-style elimination loop over polynomial coefficients.
//! The teacher's version works over an `ark_ff::Field` coefficient; since
//! this ring's coefficients are plain `i64`s reduced mod 2 or mod 3, the
//! small-integer modular inverse it needed from the field trait is provided
//! here directly (the "BigInt helpers" component of the spec) by
//! [`mod_inverse`].

use super::IntegerPolynomial;

/// Returns `a^-1 mod m` via the extended Euclidean algorithm. Works for any
/// `m` as long as `gcd(a, m) == 1`; returns `None` otherwise.
pub fn mod_inverse(a: i64, m: i64) -> Option<i64> {
    let a = a.rem_euclid(m);
    if a == 0 {
        return None;
    }
    let (mut old_r, mut r) = (a, m);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(m))
}

/// Inverts `a` in `(Z/qZ)[X]/(X^N - 1)`, where `q` is a power of two.
///
/// Algorithm (spec.md sec. 4.1): invert mod 2 via the almost-inverse algorithm
/// ([`invert_f2`]), then Newton-lift `b <- b * (2 - a*b) mod 2^k`, doubling
/// `k` each round until `k >= q`. Returns `None` if `a` is not invertible mod
/// 2 (the only way this can fail, since every unit mod 2 lifts uniquely).
pub fn invert_fq(a: &IntegerPolynomial, q: i64) -> Option<IntegerPolynomial> {
    debug_assert!(q.is_power_of_two());

    let mut b = invert_f2(a)?;
    let n = a.n();

    let mut k: i64 = 2;
    while k < q {
        k *= 2;
        let ab = a.multiply(&b, k);
        // two_minus_ab = 2 - a*b, reduced mod k.
        let mut two_minus_ab = IntegerPolynomial::zero(n);
        two_minus_ab[0] = 2 - ab[0];
        for i in 1..n {
            two_minus_ab[i] = -ab[i];
        }
        two_minus_ab.mod_positive(k);
        b = b.multiply(&two_minus_ab, k);
    }
    b.mod_positive(q);
    Some(b)
}

/// Inverts `a` in `(Z/2Z)[X]/(X^N - 1)` with the almost-inverse algorithm
/// (Silverman's "Almost Inverse Algorithm for Finite Fields", as used by the
/// classic NTRU reference implementations): a subtractive, shift-and-XOR
/// variant of the extended Euclidean algorithm that avoids explicit
/// polynomial division. Returns `None` if `a` has no inverse mod 2 (its GCD
/// with `X^N - 1` is not a unit).
fn invert_f2(a: &IntegerPolynomial) -> Option<IntegerPolynomial> {
    let n = a.n();

    // Working buffers have N+1 coefficients, indices 0..=N, to hold X^N-1
    // and intermediate degree-N polynomials without overflow.
    let mut f = vec![0u8; n + 1];
    for i in 0..n {
        f[i] = (a[i].rem_euclid(2)) as u8;
    }
    // g(x) = X^N - 1 == X^N + 1 over GF(2).
    let mut g = vec![0u8; n + 1];
    g[0] = 1;
    g[n] = 1;

    let mut b = vec![0u8; n + 1];
    b[0] = 1;
    let mut c = vec![0u8; n + 1];

    let mut deg_f = degree(&f);
    let mut deg_g = n;
    let mut k: usize = 0;

    loop {
        while deg_f > 0 && f[0] == 0 {
            // f <- f / X
            for i in 0..deg_f {
                f[i] = f[i + 1];
            }
            f[deg_f] = 0;
            deg_f -= 1;
            // c <- c * X
            for i in (1..=n).rev() {
                c[i] = c[i - 1];
            }
            c[0] = 0;
            k += 1;
        }
        if deg_f == 0 {
            if f[0] == 0 {
                return None; // a is not invertible mod 2
            }
            break;
        }
        if deg_f < deg_g {
            std::mem::swap(&mut f, &mut g);
            std::mem::swap(&mut deg_f, &mut deg_g);
            std::mem::swap(&mut b, &mut c);
        }
        for i in 0..=deg_f {
            f[i] ^= g[i];
        }
        for i in 0..=n {
            b[i] ^= c[i];
        }
        deg_f = degree(&f);
        if deg_f > n {
            return None;
        }
    }

    if b[n] != 0 {
        return None;
    }

    // b(x) is the inverse of a(x) times X^k (mod X^N - 1); undo the shift by
    // rotating indices by -k (mod N).
    let mut out = IntegerPolynomial::zero(n);
    for i in 0..n {
        let j = (i + n - (k % n)) % n;
        out[j] = b[i] as i64;
    }
    Some(out)
}

/// Returns the index of the highest nonzero coefficient in `p`, or 0 if `p`
/// is entirely zero.
fn degree(p: &[u8]) -> usize {
    p.iter().rposition(|&c| c != 0).unwrap_or(0)
}

/// Inverts `a` in `(Z/3Z)[X]/(X^N - 1)`.
///
/// Runs the teacher's `extended_gcd` shape (`modular_poly/inv.rs`) directly
/// over `Z_3` coefficients instead of an `ark_ff::Field`: polynomial long
/// division with remainder, iterated until the remainder is a nonzero
/// constant, whose inverse (via [`mod_inverse`]) normalizes the Bezout
/// coefficient into the true inverse.
pub fn invert_f3(a: &IntegerPolynomial) -> Option<IntegerPolynomial> {
    let n = a.n();

    let mut modulus_poly = vec![0i64; n + 1];
    modulus_poly[0] = 2; // -1 mod 3
    modulus_poly[n] = 1;
    trim(&mut modulus_poly);

    let mut a_poly: Vec<i64> = (0..n).map(|i| a[i].rem_euclid(3)).collect();
    trim(&mut a_poly);

    let (_, y, d) = extended_gcd_f3(&modulus_poly, &a_poly);

    if d.iter().all(|&c| c == 0) {
        return None;
    }
    if degree_signed(&d) > 0 {
        return None;
    }
    let content_inv = mod_inverse(d[0], 3)?;

    let mut inv = scale_f3(&y, content_inv);
    // Reduce back to exactly n coefficients, mod (X^N - 1): fold any terms
    // at or above degree n back down (y's degree is bounded by
    // deg(modulus_poly) == n, so there is at most one such term).
    if inv.len() > n {
        for i in n..inv.len() {
            let c = inv[i];
            inv[i % n] = (inv[i % n] + c).rem_euclid(3);
        }
        inv.truncate(n);
    } else {
        inv.resize(n, 0);
    }

    Some(IntegerPolynomial::from_coeffs(inv))
}

/// Returns `(x, y, d)` such that `a*x + b*y = d`, over `Z_3` coefficients.
fn extended_gcd_f3(a: &[i64], b: &[i64]) -> (Vec<i64>, Vec<i64>, Vec<i64>) {
    let (mut x_prev, mut y_prev, mut r_prev) = (vec![1i64], vec![0i64], a.to_vec());
    let (mut x_cur, mut y_cur, mut r_cur) = (vec![0i64], vec![1i64], b.to_vec());
    trim(&mut r_prev);
    trim(&mut r_cur);

    while !(r_cur.iter().all(|&c| c == 0)) {
        let (q, r) = poly_divmod_f3(&r_prev, &r_cur);
        r_prev = r_cur;
        r_cur = r;

        let qx = poly_mul_f3(&q, &x_cur);
        let new_x_cur = poly_sub_f3(&x_prev, &qx);
        x_prev = x_cur;
        x_cur = new_x_cur;

        let qy = poly_mul_f3(&q, &y_cur);
        let new_y_cur = poly_sub_f3(&y_prev, &qy);
        y_prev = y_cur;
        y_cur = new_y_cur;
    }

    (x_prev, y_prev, r_prev)
}

/// Polynomial long division over `Z_3`: returns `(quotient, remainder)` such
/// that `dividend == quotient * divisor + remainder`. Panics if `divisor` is
/// the zero polynomial.
fn poly_divmod_f3(dividend: &[i64], divisor: &[i64]) -> (Vec<i64>, Vec<i64>) {
    let mut remainder = dividend.to_vec();
    trim(&mut remainder);
    let mut divisor = divisor.to_vec();
    trim(&mut divisor);
    assert!(!divisor.iter().all(|&c| c == 0), "division by zero polynomial");

    let divisor_deg = degree_signed(&divisor);
    let lead_inv = mod_inverse(divisor[divisor_deg], 3).expect("nonzero mod 3 is invertible");

    let mut quotient = vec![0i64; 1];
    while !remainder.iter().all(|&c| c == 0) && degree_signed(&remainder) >= divisor_deg {
        let rem_deg = degree_signed(&remainder);
        let shift = rem_deg - divisor_deg;
        let coeff = (remainder[rem_deg] * lead_inv).rem_euclid(3);

        if quotient.len() <= shift {
            quotient.resize(shift + 1, 0);
        }
        quotient[shift] = (quotient[shift] + coeff).rem_euclid(3);

        for (i, &d) in divisor.iter().enumerate() {
            remainder[i + shift] = (remainder[i + shift] - coeff * d).rem_euclid(3);
        }
        trim(&mut remainder);
    }
    trim(&mut quotient);
    (quotient, remainder)
}

fn poly_mul_f3(a: &[i64], b: &[i64]) -> Vec<i64> {
    if a.iter().all(|&c| c == 0) || b.iter().all(|&c| c == 0) {
        return vec![0];
    }
    let mut out = vec![0i64; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] = (out[i + j] + ai * bj).rem_euclid(3);
        }
    }
    trim(&mut out);
    out
}

fn poly_sub_f3(a: &[i64], b: &[i64]) -> Vec<i64> {
    let len = a.len().max(b.len());
    let mut out = vec![0i64; len];
    for (i, &c) in a.iter().enumerate() {
        out[i] = c;
    }
    for (i, &c) in b.iter().enumerate() {
        out[i] = (out[i] - c).rem_euclid(3);
    }
    trim(&mut out);
    out
}

fn scale_f3(a: &[i64], scalar: i64) -> Vec<i64> {
    a.iter().map(|&c| (c * scalar).rem_euclid(3)).collect()
}

/// Drops trailing zero coefficients, keeping at least one coefficient.
fn trim(p: &mut Vec<i64>) {
    while p.len() > 1 && *p.last().unwrap() == 0 {
        p.pop();
    }
}

/// Returns the polynomial's degree, treating an all-zero polynomial as
/// degree 0 (matching `trim`'s invariant that it is never empty).
fn degree_signed(p: &[i64]) -> usize {
    p.iter().rposition(|&c| c != 0).unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mod_inverse_mod3() {
        assert_eq!(mod_inverse(1, 3), Some(1));
        assert_eq!(mod_inverse(2, 3), Some(2));
        assert_eq!(mod_inverse(0, 3), None);
    }

    #[test]
    fn invert_fq_round_trip() {
        // A small odd N with a simple invertible polynomial.
        let n = 11;
        let q = 32i64;
        let mut a = IntegerPolynomial::zero(n);
        a[0] = 1;
        a[1] = 1;
        a[3] = -1;

        let inv = invert_fq(&a, q).expect("this polynomial is invertible mod 2");
        let mut product = a.multiply(&inv, q);
        product.mod_positive(q);

        let mut one = IntegerPolynomial::zero(n);
        one[0] = 1;
        assert_eq!(product, one);
    }

    #[test]
    fn invert_f3_round_trip() {
        let n = 11;
        let mut a = IntegerPolynomial::zero(n);
        a[0] = 1;
        a[2] = 1;
        a[5] = -1;

        let inv = invert_f3(&a).expect("this polynomial is invertible mod 3");
        let mut product = a.multiply(&inv, 3);
        product.mod3();

        let mut one = IntegerPolynomial::zero(n);
        one[0] = 1;
        assert_eq!(product, one);
    }

    #[test]
    fn non_invertible_returns_none() {
        // The all-zero polynomial is never invertible.
        let n = 11;
        let zero = IntegerPolynomial::zero(n);
        assert_eq!(invert_fq(&zero, 32), None);
        assert_eq!(invert_f3(&zero), None);
    }
}

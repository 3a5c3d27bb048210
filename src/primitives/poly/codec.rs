//! Binary encodings for [`IntegerPolynomial`]: dense bit-packing (spec.md
//! sec. 4.1) and the tight base-3 trit packing used by SVES-3 padding
//! (spec.md sec. 4.1, sec. 4.7).
//!
//! Bit order is little-endian throughout: within a coefficient, the
//! least-significant bit is emitted first, and [`bitvec`]'s `Lsb0` byte
//! order packs those bits into bytes LSB-first to match.

use bitvec::prelude::*;

use crate::error::{NtruError, Result};

use super::IntegerPolynomial;

impl IntegerPolynomial {
    /// Packs every coefficient into `bits_for(q)` bits, little-endian,
    /// assuming coefficients already lie in `[0, q)`.
    pub fn to_binary(&self, q: i64) -> Vec<u8> {
        let bits_per = bits_for(q);
        let mut bits: BitVec<u8, Lsb0> = BitVec::with_capacity(self.n() * bits_per as usize);
        for &c in self.coeffs() {
            push_bits(&mut bits, c as u64, bits_per);
        }
        bits.into_vec()
    }

    /// [`IntegerPolynomial::to_binary`], truncated to `num_bytes`.
    pub fn to_binary_trunc(&self, q: i64, num_bytes: usize) -> Vec<u8> {
        let mut bytes = self.to_binary(q);
        bytes.truncate(num_bytes);
        bytes
    }

    /// Packs each coefficient mod 4 into 2 bits, little-endian.
    pub fn to_binary4(&self) -> Vec<u8> {
        let mut bits: BitVec<u8, Lsb0> = BitVec::with_capacity(self.n() * 2);
        for &c in self.coeffs() {
            push_bits(&mut bits, c.rem_euclid(4) as u64, 2);
        }
        bits.into_vec()
    }

    /// Packs all `N` coefficients (each in `{-1, 0, 1}`) 5-per-byte via base-3
    /// digits (243 = 3^5 < 256).
    pub fn to_binary3_tight(&self) -> Vec<u8> {
        pack_trits(self.coeffs())
    }

    /// Like [`IntegerPolynomial::to_binary3_tight`], but optionally omits the
    /// constant coefficient (index 0) before packing, per SVES-3's `maxM1`
    /// handling (spec.md sec. 4.7).
    pub fn to_binary3_sves(&self, skip_constant: bool) -> Vec<u8> {
        if skip_constant {
            pack_trits(&self.coeffs()[1..])
        } else {
            pack_trits(self.coeffs())
        }
    }

    /// Inverse of [`IntegerPolynomial::to_binary`]: unpacks `n` coefficients
    /// of `bits_for(q)` bits each.
    pub fn from_binary(bytes: &[u8], n: usize, q: i64) -> Result<Self> {
        let bits_per = bits_for(q) as usize;
        let total_bits = n * bits_per;
        let required_bytes = total_bits.div_ceil(8);
        if bytes.len() < required_bytes {
            return Err(NtruError::UnexpectedEof("polynomial binary encoding"));
        }
        let bits = BitSlice::<u8, Lsb0>::from_slice(&bytes[..required_bytes]);

        let mut coeffs = Vec::with_capacity(n);
        for i in 0..n {
            let slice = &bits[i * bits_per..(i + 1) * bits_per];
            coeffs.push(pull_bits(slice));
        }
        Ok(Self::from_coeffs(coeffs))
    }

    /// Inverse of [`IntegerPolynomial::to_binary3_tight`].
    pub fn from_binary3_tight(bytes: &[u8], n: usize) -> Result<Self> {
        let coeffs = unpack_trits(bytes, n)?;
        Ok(Self::from_coeffs(coeffs))
    }

    /// Inverse of [`IntegerPolynomial::to_binary3_sves`].
    pub fn from_binary3_sves(bytes: &[u8], n: usize, skip_constant: bool) -> Result<Self> {
        if skip_constant {
            let mut coeffs = unpack_trits(bytes, n - 1)?;
            coeffs.insert(0, 0);
            Ok(Self::from_coeffs(coeffs))
        } else {
            Self::from_binary3_tight(bytes, n)
        }
    }
}

/// Returns `ceil(log2(q))`, the number of bits needed to represent any value
/// in `[0, q)`.
fn bits_for(q: i64) -> u32 {
    debug_assert!(q > 1);
    u64::BITS - ((q - 1) as u64).leading_zeros()
}

fn push_bits(bits: &mut BitVec<u8, Lsb0>, value: u64, count: u32) {
    for i in 0..count {
        bits.push((value >> i) & 1 != 0);
    }
}

fn pull_bits(slice: &BitSlice<u8, Lsb0>) -> i64 {
    let mut value: u64 = 0;
    for (i, bit) in slice.iter().enumerate() {
        if *bit {
            value |= 1 << i;
        }
    }
    value as i64
}

/// Maps a ternary coefficient to its base-3 digit: `-1 -> 2`, `0 -> 0`,
/// `1 -> 1`. Inverse of the mapping in [`digit_to_trit`].
fn trit_to_digit(c: i64) -> u32 {
    c.rem_euclid(3) as u32
}

/// Maps a base-3 digit back to a ternary coefficient: `2 -> -1`, else
/// unchanged. Matches the MGF-TP-1 trit-extraction policy (spec.md sec. 4.5).
fn digit_to_trit(digit: u32) -> i64 {
    if digit == 2 {
        -1
    } else {
        digit as i64
    }
}

/// Packs `coeffs` (each in `{-1, 0, 1}`) 5-per-byte via base-3 digits. The
/// final block is zero-padded with `0` trits if `coeffs.len()` isn't a
/// multiple of 5.
fn pack_trits(coeffs: &[i64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(coeffs.len().div_ceil(5));
    for chunk in coeffs.chunks(5) {
        let mut byte: u32 = 0;
        let mut place = 1u32;
        for &c in chunk {
            byte += trit_to_digit(c) * place;
            place *= 3;
        }
        out.push(byte as u8);
    }
    out
}

/// Inverse of [`pack_trits`]: unpacks exactly `n` trits from `bytes`.
fn unpack_trits(bytes: &[u8], n: usize) -> Result<Vec<i64>> {
    let required_bytes = n.div_ceil(5);
    if bytes.len() < required_bytes {
        return Err(NtruError::UnexpectedEof("ternary tight encoding"));
    }

    let mut coeffs = Vec::with_capacity(n);
    for &byte in &bytes[..required_bytes] {
        if byte as u32 >= 243 {
            return Err(NtruError::Malformed("ternary tight encoding byte >= 243"));
        }
        let mut value = byte as u32;
        for _ in 0..5 {
            let digit = value % 3;
            coeffs.push(digit_to_trit(digit));
            value /= 3;
        }
    }
    coeffs.truncate(n);
    Ok(coeffs)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn binary_round_trip() {
        let q = 2048i64;
        let n = 11;
        let mut p = IntegerPolynomial::from_coeffs(vec![0, 1, 5, 2047, 1024, 3, 7, 9, 2000, 0, 1]);
        p.mod_positive(q);

        let bytes = p.to_binary(q);
        let back = IntegerPolynomial::from_binary(&bytes, n, q).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn binary_trunc_takes_prefix() {
        let q = 2048i64;
        let p = IntegerPolynomial::from_coeffs(vec![1, 2, 3, 4, 5]);
        let full = p.to_binary(q);
        let trunc = p.to_binary_trunc(q, 2);
        assert_eq!(trunc, full[..2]);
    }

    #[test]
    fn binary4_wraps_mod_4() {
        let p = IntegerPolynomial::from_coeffs(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let bytes = p.to_binary4();
        // 8 coefficients * 2 bits = 16 bits = 2 bytes.
        assert_eq!(bytes.len(), 2);
    }

    #[test]
    fn binary3_tight_round_trip() {
        let n = 13; // not a multiple of 5, exercises the padded final block.
        let coeffs: Vec<i64> = (0..n).map(|i| [(-1i64), 0, 1][i % 3]).collect();
        let p = IntegerPolynomial::from_coeffs(coeffs.clone());

        let bytes = p.to_binary3_tight();
        assert_eq!(bytes.len(), (n + 4) / 5);

        let back = IntegerPolynomial::from_binary3_tight(&bytes, n).unwrap();
        assert_eq!(back.coeffs(), coeffs.as_slice());
    }

    #[test]
    fn binary3_sves_round_trip_with_skip() {
        let n = 11;
        let coeffs: Vec<i64> = (0..n).map(|i| [(-1i64), 0, 1][i % 3]).collect();
        let mut p = IntegerPolynomial::from_coeffs(coeffs);
        p[0] = 0; // skip_constant requires the caller already zeroed index 0.

        let bytes = p.to_binary3_sves(true);
        let back = IntegerPolynomial::from_binary3_sves(&bytes, n, true).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn from_binary3_tight_rejects_invalid_byte() {
        let bytes = vec![243u8]; // 243 >= 243, invalid.
        assert!(IntegerPolynomial::from_binary3_tight(&bytes, 5).is_err());
    }

    #[test]
    fn from_binary_rejects_truncated_input() {
        let bytes = vec![0u8; 1];
        assert!(IntegerPolynomial::from_binary(&bytes, 100, 2048).is_err());
    }
}

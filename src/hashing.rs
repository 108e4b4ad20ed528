//! Hashing and pseudorandom sampling, FIPS 204 Algorithms 29-34.

use crate::conversion::bit_unpack_signed_20;
use crate::helpers::mod_sub;
use crate::types::{Zero, R, T, Zq};
use crate::Q;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake256};


/// Function `H(v, d)` of FIPS 204 (8.1): absorb the given byte slices into
/// SHAKE256 and return a reader for extendable output.
pub(crate) fn h_xof(v: &[&[u8]]) -> impl XofReader {
    let mut hasher = Shake256::default();
    v.iter().for_each(|b| hasher.update(b));
    hasher.finalize_xof()
}


/// Function `H128(v, d)` of FIPS 204 (8.2): as above but over SHAKE128.
pub(crate) fn h128_xof(v: &[&[u8]]) -> impl XofReader {
    let mut hasher = Shake128::default();
    v.iter().for_each(|b| hasher.update(b));
    hasher.finalize_xof()
}


/// # Algorithm 29: `SampleInBall(rho)`.
/// Derives a polynomial with exactly tau coefficients from `{-1, +1}` (and
/// the rest zero) via a Fisher-Yates shuffle over the SHAKE256 stream. The
/// seed is the public commitment hash, so the data-dependent access pattern
/// here leaks nothing secret.
///
/// **Input**: the commitment hash `c_tilde`. <br>
/// **Output**: a tau-sparse ternary polynomial.
pub(crate) fn sample_in_ball(tau: usize, seed: &[u8]) -> R {
    let mut c = R::zero();
    let mut xof = h_xof(&[seed]);

    // the first eight squeezed bytes seed the sign bitstream
    let mut signs_bytes = [0u8; 8];
    xof.read(&mut signs_bytes);
    let mut signs = u64::from_le_bytes(signs_bytes);

    let mut b = [0u8];
    for i in (256 - tau)..256 {
        xof.read(&mut b);
        while usize::from(b[0]) > i {
            xof.read(&mut b);
        }
        let j = usize::from(b[0]);
        c[i] = c[j];
        c[j] = mod_sub(1, 2 * ((signs & 1) as u32));
        signs >>= 1;
    }

    debug_assert_eq!(c.iter().filter(|&&e| e != 0).count(), tau);
    c
}


/// # Algorithm 30: `RejNTTPoly(rho)`.
/// Rejection-samples a uniform NTT-domain polynomial from
/// `SHAKE128(rho || j || i)`, consuming three bytes per candidate. Operates
/// on the public matrix seed, so variable time is fine.
pub(crate) fn rej_ntt_poly(rho: &[u8; 32], j: u8, i: u8) -> T {
    let mut a_hat = R::zero();
    let mut xof = h128_xof(&[rho, &[j], &[i]]);

    let mut done = 0;
    let mut b = [0u8; 3];
    while done < 256 {
        xof.read(&mut b);
        // Algorithm 14 (`CoeffFromThreeBytes`)
        let value = u32::from(b[0]) | (u32::from(b[1]) << 8) | ((u32::from(b[2]) & 0x7F) << 16);
        if value < Q {
            a_hat[done] = value;
            done += 1;
        }
    }
    a_hat
}


/// Algorithm 15 (`CoeffFromHalfByte`): map an accepted nibble into
/// `[-eta, eta]` stored mod q, or reject it.
fn coeff_from_nibble(eta: u32, nibble: u32) -> Option<Zq> {
    if eta == 2 && nibble < 15 {
        Some(mod_sub(2, nibble % 5))
    } else if eta == 4 && nibble < 9 {
        Some(mod_sub(4, nibble))
    } else {
        None
    }
}


/// # Algorithm 31: `RejBoundedPoly(rho)`.
/// Rejection-samples a polynomial with coefficients in `[-eta, eta]` from
/// `SHAKE256(sigma || r || 0)`, two candidate nibbles per byte. Which bytes
/// were rejected may leak (individual SHAKE bytes look independent of the
/// seed), but the accepted values are handled without value-dependent
/// branches.
pub(crate) fn rej_bounded_poly(eta: u32, sigma: &[u8; 64], r: u8) -> R {
    let mut a = R::zero();
    let mut xof = h_xof(&[sigma, &[r], &[0]]);

    let mut done = 0;
    let mut z = [0u8];
    while done < 256 {
        xof.read(&mut z);
        if let Some(coeff) = coeff_from_nibble(eta, u32::from(z[0] & 0x0F)) {
            a[done] = coeff;
            done += 1;
        }
        if done < 256 {
            if let Some(coeff) = coeff_from_nibble(eta, u32::from(z[0] >> 4)) {
                a[done] = coeff;
                done += 1;
            }
        }
    }
    a
}


/// # Algorithm 32: `ExpandA(rho)`.
/// Samples the K x L matrix `A_hat` in NTT form; entry (i, j) comes from the
/// seed suffixed with the column then the row byte.
pub(crate) fn expand_a<const K: usize, const L: usize>(rho: &[u8; 32]) -> [[T; L]; K] {
    core::array::from_fn(|i| core::array::from_fn(|j| rej_ntt_poly(rho, j as u8, i as u8)))
}


/// # Algorithm 33: `ExpandS(rho)`.
/// Samples the short vectors `s1` and `s2`; the L entries of `s1` use suffix
/// indices `0..L` and the K entries of `s2` continue at `L..L+K`.
pub(crate) fn expand_s<const K: usize, const L: usize>(
    eta: u32, sigma: &[u8; 64],
) -> ([R; L], [R; K]) {
    let s1: [R; L] = core::array::from_fn(|r| rej_bounded_poly(eta, sigma, r as u8));
    let s2: [R; K] = core::array::from_fn(|r| rej_bounded_poly(eta, sigma, (L + r) as u8));
    (s1, s2)
}


/// # Algorithm 34: `ExpandMask(rho_prime, kappa)`.
/// Samples the masking vector `y`: entry r decodes 640 one-shot SHAKE256
/// bytes of `rho_prime || (kappa + r)` through the 20-bit signed codec,
/// giving coefficients in `(-2^19, 2^19]`.
pub(crate) fn expand_mask<const L: usize>(rho_prime: &[u8; 64], kappa: u16) -> [R; L] {
    debug_assert!(usize::from(kappa) + L <= 1 << 16);
    core::array::from_fn(|r| {
        let index = kappa + r as u16;
        let mut buf = [0u8; 640];
        let mut xof = h_xof(&[rho_prime, &index.to_le_bytes()]);
        xof.read(&mut buf);
        bit_unpack_signed_20(&buf)
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::abs_mod_prime;

    #[test]
    fn test_sample_in_ball_weight_and_values() {
        let seed = [0x5Au8; 48];
        let c = sample_in_ball(49, &seed);
        let nonzero = c.iter().filter(|&&e| e != 0).count();
        assert_eq!(nonzero, 49);
        assert!(c.iter().all(|&e| e == 0 || e == 1 || e == Q - 1));

        // a different seed moves the support
        let c2 = sample_in_ball(49, &[0xA5u8; 48]);
        assert_ne!(c, c2);
    }

    #[test]
    fn test_rej_ntt_poly_in_range() {
        let rho = [0x33u8; 32];
        let a = rej_ntt_poly(&rho, 2, 3);
        assert!(a.iter().all(|&e| e < Q));
        // distinct (j, i) suffixes give distinct polynomials
        assert_ne!(a, rej_ntt_poly(&rho, 3, 2));
    }

    #[test]
    fn test_rej_bounded_poly_in_range() {
        let sigma = [0x77u8; 64];
        let s = rej_bounded_poly(4, &sigma, 1);
        assert!(s.iter().all(|&e| abs_mod_prime(e) <= 4));
        assert_ne!(s, rej_bounded_poly(4, &sigma, 2));
    }

    #[test]
    fn test_coeff_from_nibble_bounds() {
        assert_eq!(coeff_from_nibble(4, 0), Some(4));
        assert_eq!(coeff_from_nibble(4, 4), Some(0));
        assert_eq!(coeff_from_nibble(4, 8), Some(Q - 4));
        assert_eq!(coeff_from_nibble(4, 9), None);
        assert_eq!(coeff_from_nibble(2, 14), Some(Q - 2));
        assert_eq!(coeff_from_nibble(2, 15), None);
    }

    #[test]
    fn test_expand_mask_in_range() {
        let rho_prime = [0x11u8; 64];
        let y: [R; 5] = expand_mask(&rho_prime, 0);
        for poly in &y {
            assert!(poly.iter().all(|&e| abs_mod_prime(e) <= 1 << 19));
        }
        // the counter separates the entries
        let y2: [R; 5] = expand_mask(&rho_prime, 5);
        assert_ne!(y[0], y2[0]);
    }
}

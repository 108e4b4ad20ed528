//! Number-Theoretic Transform over `R_q`, FIPS 204 Algorithms 41 and 42.

use crate::helpers::{mod_sub, reduce_montgomery, reduce_once};
use crate::types::{R, T};
use crate::{Q, ZETA};

/// `2^64 mod q`, used to carry values into Montgomery form.
const MONTGOMERY_SQUARE: u64 = 2_365_951;

/// `256^-1 * 2^64 mod q`. A Montgomery reduction by this constant multiplies
/// by `256^-1 * 2^32`; the extra factor of `2^32` folds back out the
/// `2^-32` that the single pointwise multiplication ahead of every inverse
/// transform has introduced.
const INVERSE_DEGREE_MONTGOMERY: u64 = 41_978;


/// HAC Algorithm 14.76 right-to-left binary exponentiation of ζ mod q.
const fn pow_zeta_mod_q(e: u8) -> u32 {
    let mut result: u64 = 1;
    let mut s: u64 = ZETA as u64;
    let mut e = e;
    while e != 0 {
        if e & 1 != 0 {
            result = (result * s) % (Q as u64);
        }
        s = (s * s) % (Q as u64);
        e >>= 1;
    }
    result as u32
}


const fn gen_ntt_roots() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let root = pow_zeta_mod_q((i as u8).reverse_bits());
        table[i] = reduce_montgomery((root as u64) * MONTGOMERY_SQUARE);
        i += 1;
    }
    table
}

/// Twiddle factors `ζ^brv(i) mod q` in Montgomery form, indexed by
/// bit-reversed exponent.
pub(crate) static NTT_ROOTS_MONTGOMERY: [u32; 256] = gen_ntt_roots();


/// # Algorithm 41: `NTT(w)`.
/// Transforms each element of `w` into the NTT domain via Cooley-Tukey
/// butterflies.
///
/// **Input**: vector of polynomials in `R_q`, coefficients in `[0, q)`. <br>
/// **Output**: the same vector with each polynomial in the NTT domain.
pub(crate) fn ntt<const X: usize>(w: &[R; X]) -> [T; X] {
    let mut w_hat: [T; X] = *w;
    for poly in &mut w_hat {
        // step: 1, 2, 4, ... 128; offset: 128, 64, 32, ... 1
        let mut offset = 128;
        let mut step = 1;
        while step < 256 {
            for i in 0..step {
                let step_root = u64::from(NTT_ROOTS_MONTGOMERY[step + i]);
                let k = 2 * offset * i;
                for j in k..(k + offset) {
                    let even = poly[j];
                    // step_root and the coefficient are both below q, so the
                    // product stays within the Montgomery precondition.
                    let odd = reduce_montgomery(step_root * u64::from(poly[j + offset]));
                    poly[j] = reduce_once(even + odd);
                    poly[j + offset] = mod_sub(even, odd);
                }
            }
            step <<= 1;
            offset >>= 1;
        }
    }
    w_hat
}


/// # Algorithm 42: `NTT^-1(w_hat)`.
/// Transforms each element of `w_hat` back out of the NTT domain, mirroring
/// the forward butterflies and normalizing by `256^-1`.
///
/// **Input**: vector of polynomials in the NTT domain. <br>
/// **Output**: the same vector with each polynomial in plain form.
pub(crate) fn inv_ntt<const X: usize>(w_hat: &[T; X]) -> [R; X] {
    let mut w: [R; X] = *w_hat;
    for poly in &mut w {
        // step: 128, 64, 32, ... 1; offset: 1, 2, 4, ... 128
        let mut step = 128;
        let mut offset = 1;
        while offset < 256 {
            for i in 0..step {
                let step_root = u64::from(Q - NTT_ROOTS_MONTGOMERY[step + (step - 1 - i)]);
                let k = 2 * offset * i;
                for j in k..(k + offset) {
                    let even = poly[j];
                    let odd = poly[j + offset];
                    poly[j] = reduce_once(even + odd);
                    // q + even - odd < 2q, so the product stays within the
                    // Montgomery precondition.
                    poly[j + offset] =
                        reduce_montgomery(step_root * u64::from(Q + even - odd));
                }
            }
            step >>= 1;
            offset <<= 1;
        }
        for coeff in poly.iter_mut() {
            *coeff = reduce_montgomery(u64::from(*coeff) * INVERSE_DEGREE_MONTGOMERY);
        }
    }
    w
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::scalar_mult;
    use crate::types::Zero;
    use rand_core::{RngCore, SeedableRng};

    // Spot values for the generated twiddle table.
    #[test]
    fn test_root_table() {
        assert_eq!(NTT_ROOTS_MONTGOMERY[0], 4_193_792); // 2^32 mod q
        assert_eq!(NTT_ROOTS_MONTGOMERY[1], 25_847);
        assert_eq!(NTT_ROOTS_MONTGOMERY[2], 5_771_523);
        assert_eq!(NTT_ROOTS_MONTGOMERY[255], 1_976_782);
        assert!(NTT_ROOTS_MONTGOMERY.iter().all(|&r| r > 0 && r < Q));
    }

    fn random_poly(rng: &mut impl RngCore) -> R {
        core::array::from_fn(|_| rng.next_u32() % Q)
    }

    // The inverse transform folds in the Montgomery factor consumed by one
    // pointwise multiplication, so the bare round trip lands on `s * 2^32`;
    // one more Montgomery reduction per coefficient recovers `s` exactly.
    #[test]
    fn test_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        for _ in 0..8 {
            let s = random_poly(&mut rng);
            let got = inv_ntt(&ntt(&[s]))[0];
            let back: R = core::array::from_fn(|n| reduce_montgomery(u64::from(got[n])));
            assert_eq!(back, s);
        }
    }

    // Multiplying in the NTT domain must agree with schoolbook negacyclic
    // convolution, with no stray scaling factor.
    #[test]
    fn test_ntt_multiplication() {
        fn schoolbook(a: &R, b: &R) -> R {
            let q = i64::from(Q);
            let mut c = [0i64; 256];
            for i in 0..256 {
                for j in 0..256 {
                    let prod = (i64::from(a[i]) * i64::from(b[j])) % q;
                    if i + j < 256 {
                        c[i + j] = (c[i + j] + prod) % q;
                    } else {
                        c[i + j - 256] = (c[i + j - 256] - prod).rem_euclid(q);
                    }
                }
            }
            core::array::from_fn(|n| c[n].rem_euclid(q) as u32)
        }

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        let a = random_poly(&mut rng);
        let b = random_poly(&mut rng);
        let product = inv_ntt(&[scalar_mult(&ntt(&[a])[0], &ntt(&[b])[0])])[0];
        assert_eq!(product, schoolbook(&a, &b));
    }

    // Multiplying by the constant polynomial 1 is the identity.
    #[test]
    fn test_multiply_by_one() {
        let mut one = R::zero();
        one[0] = 1;
        let one_hat = ntt(&[one])[0];
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(13);
        let s = random_poly(&mut rng);
        let got = inv_ntt(&[scalar_mult(&ntt(&[s])[0], &one_hat)])[0];
        assert_eq!(got, s);
    }
}

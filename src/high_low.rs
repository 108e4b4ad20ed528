//! High-order/low-order rounding and hints, FIPS 204 Algorithms 35-40.

use crate::helpers::{lt_mask, mod_sub, reduce_once, select, Q_HALF};
use crate::types::{Zero, R, Zq};
use crate::{D, Q};

// The decompose identities below follow the reference implementation of
// https://github.com/pq-crystals/dilithium

/// # Algorithm 35: `Power2Round(r)`.
/// Splits `r` into `(r1, r0)` with `r = r1 * 2^d + r0` and
/// `r0` in `(-2^(d-1), 2^(d-1)]`, stored mod q. Constant-time.
///
/// **Input**: `r` in `[0, q)`. <br>
/// **Output**: `(r1, r0)` with `0 <= r1 < 2^10`.
pub(crate) fn power2_round(r: Zq) -> (Zq, Zq) {
    debug_assert!(r < Q);
    let r1 = r >> D;
    let r0 = r - (r1 << D);

    // Mask is set iff r0 > 2^(d-1).
    let mask = lt_mask(1 << (D - 1), r0);
    let r1 = select(mask, r1 + 1, r1);
    let r0 = select(mask, mod_sub(r0, 1 << D), r0);
    (r1, r0)
}


/// Scale back a previously rounded value: `r1 * 2^d`, which is below q
/// whenever `r1 < 2^10`.
pub(crate) fn scale_power2_round(r1: Zq) -> Zq {
    debug_assert!(r1 < (1 << 10));
    r1 << D
}


/// # Algorithm 37: `HighBits(r)`.
/// Returns `r1` such that `r = r1 * (2 * gamma2) + r0` with `r0` centered,
/// except that the wrap point `r = q - 1` lands on `r1 = 0`.
///
/// For `gamma2 = (q - 1) / 32` this computes
/// `(((r + 127) >> 7) * 1025 + 2^21) >> 22 mod 2^4`.
pub(crate) fn high_bits(gamma2: u32, r: Zq) -> Zq {
    debug_assert!(r < Q);
    let r1 = (r + 127) >> 7;
    if gamma2 == (Q - 1) / 32 {
        ((r1 * 1025 + (1 << 21)) >> 22) & 15
    } else {
        debug_assert!(gamma2 == (Q - 1) / 88);
        let r1 = (r1 * 11_275 + (1 << 23)) >> 24;
        // zero the result past the modulus boundary of 43
        r1 ^ (lt_mask(43, r1) & r1)
    }
}


/// # Algorithm 36: `Decompose(r)`.
/// Splits `r` into `(r1, r0)` with `r = r1 * (2 * gamma2) + r0 mod q` and
/// `r0` in `(-gamma2, gamma2]` as a two's-complement integer.
pub(crate) fn decompose(gamma2: u32, r: Zq) -> (Zq, i32) {
    let r1 = high_bits(gamma2, r);
    let mut r0 = r as i32 - (r1 * 2 * gamma2) as i32;
    r0 -= ((Q_HALF as i32 - r0) >> 31) & Q as i32;
    (r1, r0)
}


/// # Algorithm 38: `LowBits(r)`.
/// Returns the centered remainder of `Decompose(r)`.
pub(crate) fn low_bits(gamma2: u32, r: Zq) -> i32 {
    let (_r1, r0) = decompose(gamma2, r);
    r0
}


/// # Algorithm 39: `MakeHint(z, r)`.
/// In the standard this takes `z = -ct0` and `r = w - cs2 + ct0` and flags
/// whether adding `z` to `r` changes the high bits. Since `z + r` is just
/// `w - cs2`, taking the three addends saves an addition.
pub(crate) fn make_hint(gamma2: u32, ct0: Zq, cs2: Zq, w: Zq) -> Zq {
    let r_plus_z = mod_sub(w, cs2);
    let r = reduce_once(r_plus_z + ct0);
    u32::from(high_bits(gamma2, r) != high_bits(gamma2, r_plus_z))
}


/// # Algorithm 40: `UseHint(h, r)`.
/// Returns the high bits of `r` adjusted according to the hint bit. Operates
/// on public signature data during verification, so variable time is fine.
pub(crate) fn use_hint(gamma2: u32, h: Zq, r: Zq) -> Zq {
    let (r1, r0) = decompose(gamma2, r);
    if h == 0 {
        return r1;
    }
    if gamma2 == (Q - 1) / 32 {
        // m = 16, so |mod m| becomes |& 15|
        if r0 > 0 {
            (r1 + 1) & 15
        } else {
            r1.wrapping_sub(1) & 15
        }
    } else {
        // m = 44, stepped explicitly
        if r0 > 0 {
            if r1 == 43 { 0 } else { r1 + 1 }
        } else if r1 == 0 {
            43
        } else {
            r1 - 1
        }
    }
}


pub(crate) fn vector_power2_round<const X: usize>(t: &[R; X]) -> ([R; X], [R; X]) {
    let mut t1: [R; X] = [R::zero(); X];
    let mut t0: [R; X] = [R::zero(); X];
    for i in 0..X {
        for n in 0..256 {
            (t1[i][n], t0[i][n]) = power2_round(t[i][n]);
        }
    }
    (t1, t0)
}


pub(crate) fn vector_scale_power2_round<const X: usize>(t1: &[R; X]) -> [R; X] {
    core::array::from_fn(|i| core::array::from_fn(|n| scale_power2_round(t1[i][n])))
}


pub(crate) fn vector_high_bits<const X: usize>(gamma2: u32, w: &[R; X]) -> [R; X] {
    core::array::from_fn(|i| core::array::from_fn(|n| high_bits(gamma2, w[i][n])))
}


/// Low bits of every coefficient, stored as two's-complement integers.
pub(crate) fn vector_low_bits<const X: usize>(gamma2: u32, w: &[R; X]) -> [R; X] {
    core::array::from_fn(|i| core::array::from_fn(|n| low_bits(gamma2, w[i][n]) as u32))
}


pub(crate) fn vector_make_hint<const X: usize>(
    gamma2: u32, ct0: &[R; X], cs2: &[R; X], w: &[R; X],
) -> [R; X] {
    core::array::from_fn(|i| {
        core::array::from_fn(|n| make_hint(gamma2, ct0[i][n], cs2[i][n], w[i][n]))
    })
}


pub(crate) fn vector_use_hint<const X: usize>(
    gamma2: u32, h: &[R; X], r: &[R; X],
) -> [R; X] {
    core::array::from_fn(|i| core::array::from_fn(|n| use_hint(gamma2, h[i][n], r[i][n])))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::abs_mod_prime;
    use rand_core::{RngCore, SeedableRng};

    const GAMMA2: u32 = (Q - 1) / 32;
    const ALPHA: i64 = 2 * GAMMA2 as i64;

    // r = r1 * 2^d + r0 must hold exactly for every residue, with r0
    // centered in (-2^12, 2^12] and r1 below 2^10.
    #[test]
    fn test_power2_round_exhaustive() {
        for r in 0..Q {
            let (r1, r0) = power2_round(r);
            assert!(r1 < (1 << 10));
            let r0s = if r0 > Q_HALF { i64::from(r0) - i64::from(Q) } else { i64::from(r0) };
            assert!(r0s > -(1i64 << (D - 1)) && r0s <= 1i64 << (D - 1));
            assert_eq!(i64::from(r1) * (1i64 << D) + r0s, i64::from(r));
        }
    }

    // r = r1 * alpha + r0 mod q with |r0| <= gamma2 for every residue.
    #[test]
    fn test_decompose_exhaustive() {
        for r in 0..Q {
            let (r1, r0) = decompose(GAMMA2, r);
            assert!(r1 < 16);
            assert!(i64::from(r0).abs() <= i64::from(GAMMA2));
            let recombined = (i64::from(r1) * ALPHA + i64::from(r0)).rem_euclid(i64::from(Q));
            assert_eq!(recombined, i64::from(r));
        }
    }

    #[test]
    fn test_decompose_wrap_point() {
        assert_eq!(decompose(GAMMA2, Q - 1), (0, -1));
        assert_eq!(decompose(GAMMA2, 0), (0, 0));
        assert_eq!(high_bits(GAMMA2, 2 * GAMMA2), 1);
    }

    // With ||ct0|| below gamma2 the hint recovers HighBits(w - cs2) from the
    // approximation w - cs2 + ct0.
    #[test]
    fn test_hint_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
        for _ in 0..10_000 {
            let w = rng.next_u32() % Q;
            let cs2 = rng.next_u32() % Q;
            let magnitude = rng.next_u32() % GAMMA2;
            let ct0 = if rng.next_u32() & 1 == 0 { magnitude } else { mod_sub(0, magnitude) };
            assert!(abs_mod_prime(ct0) < GAMMA2);

            let h = make_hint(GAMMA2, ct0, cs2, w);
            let r = reduce_once(mod_sub(w, cs2) + ct0);
            assert_eq!(use_hint(GAMMA2, h, r), high_bits(GAMMA2, mod_sub(w, cs2)));
        }
    }

    #[test]
    fn test_use_hint_without_hint_is_high_bits() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(6);
        for _ in 0..1000 {
            let r = rng.next_u32() % Q;
            assert_eq!(use_hint(GAMMA2, 0, r), high_bits(GAMMA2, r));
        }
    }
}

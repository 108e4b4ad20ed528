//! Encodings of ML-DSA keys and signatures, FIPS 204 Algorithms 22-28.

use crate::conversion::{
    bit_pack_signed_13, bit_pack_signed_20, bit_pack_signed_4, bit_unpack_signed_13,
    bit_unpack_signed_20, bit_unpack_signed_4, hint_bit_pack, hint_bit_unpack,
    simple_bit_pack_10, simple_bit_pack_4, simple_bit_unpack_10,
};
use crate::types::{Zero, R};


/// # Algorithm 22: `pkEncode(rho, t1)`.
/// `rho || SimpleBitPack(t1, 10)`; total `32 + 320 * K` bytes.
pub(crate) fn pk_encode<const K: usize, const PK_LEN: usize>(
    rho: &[u8; 32], t1: &[R; K],
) -> [u8; PK_LEN] {
    debug_assert_eq!(PK_LEN, 32 + 320 * K);
    let mut pk = [0u8; PK_LEN];
    pk[0..32].copy_from_slice(rho);
    for i in 0..K {
        simple_bit_pack_10(&t1[i], &mut pk[32 + 320 * i..32 + 320 * (i + 1)]);
    }
    pk
}


/// # Algorithm 23: `pkDecode(pk)`.
/// Reverses `pk_encode`. Ten-bit fields cannot leave their range and the
/// input length is fixed by the type, so decoding cannot fail.
pub(crate) fn pk_decode<const K: usize, const PK_LEN: usize>(
    pk: &[u8; PK_LEN],
) -> (&[u8; 32], [R; K]) {
    debug_assert_eq!(PK_LEN, 32 + 320 * K);
    let rho = <&[u8; 32]>::try_from(&pk[0..32]).expect("cannot fail");
    let t1: [R; K] =
        core::array::from_fn(|i| simple_bit_unpack_10(&pk[32 + 320 * i..32 + 320 * (i + 1)]));
    (rho, t1)
}


/// # Algorithm 24: `skEncode(rho, K, tr, s1, s2, t0)`.
/// `rho || cap_k || tr || BitPack(s1) || BitPack(s2) || BitPack(t0)`; total
/// `128 + 128 * (K + L) + 416 * K` bytes.
pub(crate) fn sk_encode<const K: usize, const L: usize, const SK_LEN: usize>(
    eta: u32, rho: &[u8; 32], cap_k: &[u8; 32], tr: &[u8; 64], s1: &[R; L], s2: &[R; K],
    t0: &[R; K],
) -> [u8; SK_LEN] {
    // the 4-bit short-vector codec covers eta = 4; an eta = 2 parameter set
    // would add a 3-bit specialization here
    debug_assert_eq!(eta, 4);
    debug_assert_eq!(SK_LEN, 128 + 128 * (L + K) + 416 * K);

    let mut sk = [0u8; SK_LEN];
    sk[0..32].copy_from_slice(rho);
    sk[32..64].copy_from_slice(cap_k);
    sk[64..128].copy_from_slice(tr);

    let start = 128;
    for i in 0..L {
        bit_pack_signed_4(&s1[i], &mut sk[start + 128 * i..start + 128 * (i + 1)]);
    }
    let start = start + 128 * L;
    for i in 0..K {
        bit_pack_signed_4(&s2[i], &mut sk[start + 128 * i..start + 128 * (i + 1)]);
    }
    let start = start + 128 * K;
    for i in 0..K {
        bit_pack_signed_13(&t0[i], &mut sk[start + 416 * i..start + 416 * (i + 1)]);
    }
    debug_assert_eq!(start + 416 * K, SK_LEN);
    sk
}


/// # Algorithm 25: `skDecode(sk)`.
/// Reverses `sk_encode`. The input length is fixed by the type, so there are
/// no trailing bytes to consider.
///
/// # Errors
/// Rejects any `s1`/`s2` nibble outside the eta range.
#[allow(clippy::type_complexity)]
pub(crate) fn sk_decode<const K: usize, const L: usize, const SK_LEN: usize>(
    eta: u32, sk: &[u8; SK_LEN],
) -> Result<(&[u8; 32], &[u8; 32], &[u8; 64], [R; L], [R; K], [R; K]), &'static str> {
    debug_assert_eq!(eta, 4);
    debug_assert_eq!(SK_LEN, 128 + 128 * (L + K) + 416 * K);

    let rho = <&[u8; 32]>::try_from(&sk[0..32]).expect("cannot fail");
    let cap_k = <&[u8; 32]>::try_from(&sk[32..64]).expect("cannot fail");
    let tr = <&[u8; 64]>::try_from(&sk[64..128]).expect("cannot fail");

    let mut s1: [R; L] = [R::zero(); L];
    let mut s2: [R; K] = [R::zero(); K];
    let start = 128;
    for i in 0..L {
        s1[i] = bit_unpack_signed_4(&sk[start + 128 * i..start + 128 * (i + 1)])?;
    }
    let start = start + 128 * L;
    for i in 0..K {
        s2[i] = bit_unpack_signed_4(&sk[start + 128 * i..start + 128 * (i + 1)])?;
    }
    let start = start + 128 * K;
    let t0: [R; K] =
        core::array::from_fn(|i| bit_unpack_signed_13(&sk[start + 416 * i..start + 416 * (i + 1)]));

    Ok((rho, cap_k, tr, s1, s2, t0))
}


/// # Algorithm 26: `sigEncode(c_tilde, z, h)`.
/// `c_tilde || BitPack(z, 20) || HintBitPack(h)`; total
/// `lambda/4 + 640 * L + omega + K` bytes.
pub(crate) fn sig_encode<
    const K: usize,
    const L: usize,
    const LAMBDA_DIV4: usize,
    const SIG_LEN: usize,
>(
    omega: usize, c_tilde: &[u8; LAMBDA_DIV4], z: &[R; L], h: &[R; K],
) -> [u8; SIG_LEN] {
    debug_assert_eq!(SIG_LEN, LAMBDA_DIV4 + 640 * L + omega + K);
    let mut sigma = [0u8; SIG_LEN];
    sigma[0..LAMBDA_DIV4].copy_from_slice(c_tilde);
    let start = LAMBDA_DIV4;
    for i in 0..L {
        bit_pack_signed_20(&z[i], &mut sigma[start + 640 * i..start + 640 * (i + 1)]);
    }
    hint_bit_pack::<K>(omega, h, &mut sigma[start + 640 * L..]);
    sigma
}


/// # Algorithm 27: `sigDecode(sigma)`.
/// Reverses `sig_encode`.
///
/// # Errors
/// Rejects a structurally invalid hint encoding.
#[allow(clippy::type_complexity)]
pub(crate) fn sig_decode<
    const K: usize,
    const L: usize,
    const LAMBDA_DIV4: usize,
    const SIG_LEN: usize,
>(
    omega: usize, sigma: &[u8; SIG_LEN],
) -> Result<([u8; LAMBDA_DIV4], [R; L], [R; K]), &'static str> {
    debug_assert_eq!(SIG_LEN, LAMBDA_DIV4 + 640 * L + omega + K);
    let mut c_tilde = [0u8; LAMBDA_DIV4];
    c_tilde.copy_from_slice(&sigma[0..LAMBDA_DIV4]);
    let start = LAMBDA_DIV4;
    let z: [R; L] =
        core::array::from_fn(|i| bit_unpack_signed_20(&sigma[start + 640 * i..start + 640 * (i + 1)]));
    let h = hint_bit_unpack::<K>(omega, &sigma[start + 640 * L..])?;
    Ok((c_tilde, z, h))
}


/// # Algorithm 28: `w1Encode(w1)`.
/// Four-bit packing of the commitment vector; `128 * K` bytes.
pub(crate) fn w1_encode<const K: usize>(w1: &[R; K], out: &mut [u8]) {
    debug_assert_eq!(out.len(), 128 * K);
    for i in 0..K {
        simple_bit_pack_4(&w1[i], &mut out[128 * i..128 * (i + 1)]);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Q;
    use rand_core::{RngCore, SeedableRng};

    fn rng() -> rand_chacha::ChaCha8Rng {
        rand_chacha::ChaCha8Rng::seed_from_u64(99)
    }

    fn random_in(rng: &mut impl RngCore, lo: i64, hi: i64) -> u32 {
        let span = (hi - lo + 1) as u32;
        let v = i64::from(rng.next_u32() % span) + lo;
        v.rem_euclid(i64::from(Q)) as u32
    }

    #[test]
    fn test_pk_round_trip() {
        let mut rng = rng();
        let mut pk_bytes = [0u8; 1952];
        rng.fill_bytes(&mut pk_bytes);
        let (rho, t1) = pk_decode::<6, 1952>(&pk_bytes);
        assert_eq!(pk_encode::<6, 1952>(rho, &t1), pk_bytes);
    }

    #[test]
    fn test_sk_round_trip() {
        let mut rng = rng();
        let mut rho = [0u8; 32];
        let mut cap_k = [0u8; 32];
        let mut tr = [0u8; 64];
        rng.fill_bytes(&mut rho);
        rng.fill_bytes(&mut cap_k);
        rng.fill_bytes(&mut tr);
        let s1: [R; 5] = core::array::from_fn(|_| {
            core::array::from_fn(|_| random_in(&mut rng, -4, 4))
        });
        let s2: [R; 6] = core::array::from_fn(|_| {
            core::array::from_fn(|_| random_in(&mut rng, -4, 4))
        });
        let t0: [R; 6] = core::array::from_fn(|_| {
            core::array::from_fn(|_| random_in(&mut rng, -(1 << 12) + 1, 1 << 12))
        });

        let sk = sk_encode::<6, 5, 4032>(4, &rho, &cap_k, &tr, &s1, &s2, &t0);
        let (rho2, cap_k2, tr2, s1_2, s2_2, t0_2) = sk_decode::<6, 5, 4032>(4, &sk).unwrap();
        assert_eq!(rho, *rho2);
        assert_eq!(cap_k, *cap_k2);
        assert_eq!(tr, *tr2);
        assert_eq!(s1, s1_2);
        assert_eq!(s2, s2_2);
        assert_eq!(t0, t0_2);
    }

    #[test]
    fn test_sk_decode_rejects_bad_eta_nibble() {
        let mut sk = [0u8; 4032];
        sk[128] = 0x09; // first s1 nibble out of range
        assert!(sk_decode::<6, 5, 4032>(4, &sk).is_err());
    }

    #[test]
    fn test_sig_round_trip() {
        let mut rng = rng();
        let mut c_tilde = [0u8; 48];
        rng.fill_bytes(&mut c_tilde);
        let z: [R; 5] = core::array::from_fn(|_| {
            core::array::from_fn(|_| random_in(&mut rng, -(1 << 19) + 1, 1 << 19))
        });
        let mut h = [R::zero(); 6];
        for i in 0..6 {
            for j in 0..8 {
                h[i][j * 31] = 1;
            }
        }

        let sigma = sig_encode::<6, 5, 48, 3309>(55, &c_tilde, &z, &h);
        let (c2, z2, h2) = sig_decode::<6, 5, 48, 3309>(55, &sigma).unwrap();
        assert_eq!(c_tilde, c2);
        assert_eq!(z, z2);
        assert_eq!(h, h2);
    }
}

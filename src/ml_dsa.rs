//! The FIPS 204 internal algorithms: `ML-DSA.KeyGen_internal` (Algorithm 6),
//! `ML-DSA.Sign_internal` (Algorithm 7) and `ML-DSA.Verify_internal`
//! (Algorithm 8), plus public-from-private reconstruction and the
//! deserialization entry points.

use crate::encodings::{pk_decode, pk_encode, sig_decode, sig_encode, sk_decode, w1_encode};
use crate::hashing::{expand_a, expand_mask, expand_s, h_xof, sample_in_ball};
use crate::helpers;
use crate::high_low::{
    vector_high_bits, vector_low_bits, vector_make_hint, vector_power2_round,
    vector_scale_power2_round, vector_use_hint,
};
use crate::ntt::{inv_ntt, ntt};
use crate::types::{PrivateKey, PublicKey, R, T};
use rand_core::CryptoRngCore;
use sha3::digest::XofReader;


/// # Algorithm 1: `ML-DSA.KeyGen()`.
/// Draws the 32-byte seed from the given RNG and derives a key pair.
///
/// # Errors
/// Returns an error when the random number generator fails.
pub(crate) fn key_gen<const K: usize, const L: usize, const PK_LEN: usize>(
    rng: &mut impl CryptoRngCore, eta: u32,
) -> Result<(PublicKey<K>, PrivateKey<K, L>), &'static str> {
    let mut xi = [0u8; 32];
    rng.try_fill_bytes(&mut xi).map_err(|_| "KeyGen: random number generator failed")?;
    Ok(key_gen_internal::<K, L, PK_LEN>(eta, &xi))
}


/// # Algorithm 6: `ML-DSA.KeyGen_internal(xi)`.
/// Expands the seed into `(rho, sigma, cap_k)`, samples `A` and the short
/// vectors, computes `t = A s1 + s2`, and rounds it into the key pair.
/// `rho` and `t1` become public here; everything else stays secret.
pub(crate) fn key_gen_internal<const K: usize, const L: usize, const PK_LEN: usize>(
    eta: u32, xi: &[u8; 32],
) -> (PublicKey<K>, PrivateKey<K, L>) {
    // (rho, sigma, cap_k) <- H(xi || K || L, 128)
    let mut h = h_xof(&[xi, &[K as u8], &[L as u8]]);
    let mut rho = [0u8; 32];
    h.read(&mut rho);
    let mut sigma = [0u8; 64];
    h.read(&mut sigma);
    let mut cap_k = [0u8; 32];
    h.read(&mut cap_k);

    let cap_a_hat: [[T; L]; K] = expand_a(&rho);
    let (s1, s2) = expand_s::<K, L>(eta, &sigma);

    // t = NTT^-1(A_hat * NTT(s1)) + s2
    let s1_hat = ntt(&s1);
    let t = helpers::vec_add(&inv_ntt(&helpers::mat_vec_mul(&cap_a_hat, &s1_hat)), &s2);

    let (t1, t0) = vector_power2_round(&t);

    let pk_bytes = pk_encode::<K, PK_LEN>(&rho, &t1);
    let mut tr = [0u8; 64];
    let mut h = h_xof(&[&pk_bytes]);
    h.read(&mut tr);

    (PublicKey { rho, t1, tr }, PrivateKey { rho, cap_k, tr, s1, s2, t0 })
}


/// Reconstructs the public key from a private key by recomputing
/// `t = A s1 + s2` and rounding; bit-for-bit identical to the key
/// generation output.
pub(crate) fn private_to_public_key<const K: usize, const L: usize>(
    sk: &PrivateKey<K, L>,
) -> PublicKey<K> {
    let cap_a_hat: [[T; L]; K] = expand_a(&sk.rho);
    let s1_hat = ntt(&sk.s1);
    let t = helpers::vec_add(&inv_ntt(&helpers::mat_vec_mul(&cap_a_hat, &s1_hat)), &sk.s2);
    let (t1, _t0) = vector_power2_round(&t);
    PublicKey { rho: sk.rho, t1, tr: sk.tr }
}


/// Deserializes and validates a private key byte array.
pub(crate) fn expand_private<const K: usize, const L: usize, const SK_LEN: usize>(
    eta: u32, sk: &[u8; SK_LEN],
) -> Result<PrivateKey<K, L>, &'static str> {
    let (rho, cap_k, tr, s1, s2, t0) = sk_decode::<K, L, SK_LEN>(eta, sk)?;
    Ok(PrivateKey { rho: *rho, cap_k: *cap_k, tr: *tr, s1, s2, t0 })
}


/// Deserializes a public key byte array and caches its SHAKE256 hash.
pub(crate) fn expand_public<const K: usize, const PK_LEN: usize>(
    pk: &[u8; PK_LEN],
) -> PublicKey<K> {
    let (rho, t1) = pk_decode::<K, PK_LEN>(pk);
    let mut tr = [0u8; 64];
    let mut h = h_xof(&[pk]);
    h.read(&mut tr);
    PublicKey { rho: *rho, t1, tr }
}


/// # Algorithm 7: `ML-DSA.Sign_internal(sk, M', rnd)`.
/// The rejection-sampled Fiat-Shamir loop. The caller has already validated
/// the context length; `rnd` is all-zero for the deterministic variant.
///
/// `c_tilde`, `z` and `h` become public once an attempt passes both bound
/// checks; before that, only the fact of a restart (and which of the two
/// bound groups caused it) may leak.
///
/// # Errors
/// Returns an error if the loop exceeds its 2^16 / L iteration bound, which
/// is not reachable in practice.
#[allow(clippy::similar_names, clippy::too_many_arguments)]
pub(crate) fn sign_internal<
    const K: usize,
    const L: usize,
    const LAMBDA_DIV4: usize,
    const SIG_LEN: usize,
    const W1_LEN: usize,
>(
    beta: u32, gamma1: u32, gamma2: u32, omega: usize, tau: usize, sk: &PrivateKey<K, L>,
    message: &[u8], ctx: &[u8], rnd: [u8; 32],
) -> Result<[u8; SIG_LEN], &'static str> {
    debug_assert!(ctx.len() < 256);

    // mu <- H(tr || {0, |ctx|} || ctx || M, 64), the "pure" domain prefix
    let ctx_prefix = [0u8, ctx.len() as u8];
    let mut mu = [0u8; 64];
    let mut h = h_xof(&[&sk.tr, &ctx_prefix, ctx, message]);
    h.read(&mut mu);

    // rho_prime <- H(cap_k || rnd || mu, 64), the per-signature seed
    let mut rho_prime = [0u8; 64];
    let mut h = h_xof(&[&sk.cap_k, &rnd, &mu]);
    h.read(&mut rho_prime);

    let s1_hat: [T; L] = ntt(&sk.s1);
    let s2_hat: [T; K] = ntt(&sk.s2);
    let t0_hat: [T; K] = ntt(&sk.t0);
    let cap_a_hat: [[T; L]; K] = expand_a(&sk.rho);

    // Rejection loop; kappa advances by L so every ExpandMask index is
    // fresh, and must stay within 16 bits.
    let mut kappa = 0_usize;
    while kappa + L <= 1 << 16 {
        let y: [R; L] = expand_mask(&rho_prime, kappa as u16);
        let w: [R; K] = inv_ntt(&helpers::mat_vec_mul(&cap_a_hat, &ntt(&y)));
        let w1 = vector_high_bits(gamma2, &w);

        // c_tilde <- H(mu || w1Encode(w1), 2 * lambda / 8)
        let mut w1_encoded = [0u8; W1_LEN];
        w1_encode::<K>(&w1, &mut w1_encoded);
        let mut c_tilde = [0u8; LAMBDA_DIV4];
        let mut h = h_xof(&[&mu, &w1_encoded]);
        h.read(&mut c_tilde);

        let c: R = sample_in_ball(tau, &c_tilde);
        let c_hat: T = ntt(&[c])[0];

        let cs1: [R; L] = inv_ntt(&helpers::vec_mult_scalar(&s1_hat, &c_hat));
        let cs2: [R; K] = inv_ntt(&helpers::vec_mult_scalar(&s2_hat, &c_hat));

        let z = helpers::vec_add(&y, &cs1);
        let w_minus_cs2 = helpers::vec_sub(&w, &cs2);
        let r0 = vector_low_bits(gamma2, &w_minus_cs2);

        // Restarting leaks only that one of this pair of bounds failed; the
        // next attempt is independent of this one.
        let z_max = helpers::infinity_norm(&z);
        let r0_max = helpers::infinity_norm_signed(&r0);
        if (z_max >= gamma1 - beta) | (r0_max >= gamma2 - beta) {
            kappa += L;
            continue;
        }

        let ct0: [R; K] = inv_ntt(&helpers::vec_mult_scalar(&t0_hat, &c_hat));
        let h_hint = vector_make_hint(gamma2, &ct0, &cs2, &w);

        let ct0_max = helpers::infinity_norm(&ct0);
        let ones = helpers::count_ones(&h_hint);
        if (ct0_max >= gamma2) | (ones > omega as u32) {
            kappa += L;
            continue;
        }

        // Though computed from the private key, the signature is public.
        return Ok(sig_encode::<K, L, LAMBDA_DIV4, SIG_LEN>(omega, &c_tilde, &z, &h_hint));
    }
    Err("Sign: rejection loop exceeded its iteration bound")
}


/// # Algorithm 8: `ML-DSA.Verify_internal(pk, M', sigma)`.
/// Reconstructs the signer's commitment from `A z - c t1 * 2^d` corrected by
/// the hint, recomputes the commitment hash and compares. Operates entirely
/// on public data.
#[allow(clippy::similar_names, clippy::too_many_arguments)]
pub(crate) fn verify_internal<
    const K: usize,
    const L: usize,
    const LAMBDA_DIV4: usize,
    const SIG_LEN: usize,
    const W1_LEN: usize,
>(
    beta: u32, gamma1: u32, gamma2: u32, omega: usize, tau: usize, pk: &PublicKey<K>,
    message: &[u8], sig: &[u8; SIG_LEN], ctx: &[u8],
) -> bool {
    debug_assert!(ctx.len() < 256);

    let Ok((c_tilde, z, h)) = sig_decode::<K, L, LAMBDA_DIV4, SIG_LEN>(omega, sig) else {
        return false;
    };

    let cap_a_hat: [[T; L]; K] = expand_a(&pk.rho);

    let ctx_prefix = [0u8, ctx.len() as u8];
    let mut mu = [0u8; 64];
    let mut hx = h_xof(&[&pk.tr, &ctx_prefix, ctx, message]);
    hx.read(&mut mu);

    let c: R = sample_in_ball(tau, &c_tilde);
    let c_hat: T = ntt(&[c])[0];

    // w_approx = NTT^-1(A_hat * NTT(z) - c_hat * NTT(t1 * 2^d))
    let az_hat: [T; K] = helpers::mat_vec_mul(&cap_a_hat, &ntt(&z));
    let ct1_hat = helpers::vec_mult_scalar(&ntt(&vector_scale_power2_round(&pk.t1)), &c_hat);
    let w_approx: [R; K] = inv_ntt(&helpers::vec_sub(&az_hat, &ct1_hat));

    let w1 = vector_use_hint(gamma2, &h, &w_approx);
    let mut w1_encoded = [0u8; W1_LEN];
    w1_encode::<K>(&w1, &mut w1_encoded);

    let mut c_tilde_prime = [0u8; LAMBDA_DIV4];
    let mut hx = h_xof(&[&mu, &w1_encoded]);
    hx.read(&mut c_tilde_prime);

    let z_max = helpers::infinity_norm(&z);
    (z_max < gamma1 - beta) && (c_tilde == c_tilde_prime)
}

// Basic types shared across the crate: ring elements and key structs.

use zeroize::{Zeroize, ZeroizeOnDrop};

pub(crate) trait Zero {
    fn zero() -> Self;
}

/// A single residue modulo the prime q; always held in canonical form `[0, q)`.
/// Signed quantities with `|v| <= B` are stored as `v mod q`, so negative
/// values appear as `q + v`.
pub(crate) type Zq = u32;

/// A polynomial in the ring `R_q = Z_q[X]/(X^256 + 1)` in plain form.
pub(crate) type R = [Zq; 256];

/// A polynomial evaluated by the NTT; coefficients remain in `[0, q)` and
/// multiplication becomes pointwise.
pub(crate) type T = [Zq; 256];

impl Zero for R {
    fn zero() -> Self { [0; 256] }
}


/// Public key interior: the matrix seed `rho`, the rounded vector `t1`, and
/// the cached 64-byte hash `tr` of the encoded public key.
///
/// Generic over the row count K of the security parameter set; use the
/// `PublicKey` alias within a parameter set namespace.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PublicKey<const K: usize> {
    pub(crate) rho: [u8; 32],
    pub(crate) t1: [R; K],
    pub(crate) tr: [u8; 64],
}


/// Private key interior: the seeds `rho` and `cap_k`, the public key hash
/// `tr`, and the short vectors `s1`, `s2`, `t0` in plain form. All fields are
/// zeroized on drop.
///
/// Generic over the (K, L) dimensions of the security parameter set; use the
/// `PrivateKey` alias within a parameter set namespace.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey<const K: usize, const L: usize> {
    pub(crate) rho: [u8; 32],
    pub(crate) cap_k: [u8; 32],
    pub(crate) tr: [u8; 64],
    pub(crate) s1: [R; L],
    pub(crate) s2: [R; K],
    pub(crate) t0: [R; K],
}

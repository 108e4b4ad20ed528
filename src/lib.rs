#![no_std]
#![deny(missing_docs, unsafe_code)]
#![deny(trivial_casts, trivial_numeric_casts, unused_import_braces, unused_lifetimes)]
#![deny(unused_qualifications)]
#![warn(clippy::pedantic)]
//
#![doc = include_str!("../README.md")]


// Implements FIPS 204 Module-Lattice-Based Digital Signature Standard.
// See <https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.204.pdf>
//
// Functionality map per FIPS 204
//
// Algorithm 1  ML-DSA.KeyGen()                    --> lib.rs + ml_dsa.rs
// Algorithm 2  ML-DSA.Sign(sk, M, ctx)            --> lib.rs
// Algorithm 3  ML-DSA.Verify(pk, M, sigma, ctx)   --> lib.rs
// Algorithm 6  ML-DSA.KeyGen_internal(xi)         --> ml_dsa.rs
// Algorithm 7  ML-DSA.Sign_internal(sk, M', rnd)  --> ml_dsa.rs
// Algorithm 8  ML-DSA.Verify_internal(pk, M', s)  --> ml_dsa.rs
// Algorithm 14 CoeffFromThreeBytes(b0, b1, b2)    --> hashing.rs (inlined)
// Algorithm 15 CoeffFromHalfByte(b)               --> hashing.rs
// Algorithm 16 SimpleBitPack(w, b)                --> conversion.rs
// Algorithm 17 BitPack(w, a, b)                   --> conversion.rs
// Algorithm 18 SimpleBitUnpack(v, b)              --> conversion.rs
// Algorithm 19 BitUnpack(v, a, b)                 --> conversion.rs
// Algorithm 20 HintBitPack(h)                     --> conversion.rs
// Algorithm 21 HintBitUnpack(y)                   --> conversion.rs
// Algorithm 22 pkEncode(rho, t1)                  --> encodings.rs
// Algorithm 23 pkDecode(pk)                       --> encodings.rs
// Algorithm 24 skEncode(rho, K, tr, s1, s2, t0)   --> encodings.rs
// Algorithm 25 skDecode(sk)                       --> encodings.rs
// Algorithm 26 sigEncode(c_tilde, z, h)           --> encodings.rs
// Algorithm 27 sigDecode(sigma)                   --> encodings.rs
// Algorithm 28 w1Encode(w1)                       --> encodings.rs
// Algorithm 29 SampleInBall(rho)                  --> hashing.rs
// Algorithm 30 RejNTTPoly(rho)                    --> hashing.rs
// Algorithm 31 RejBoundedPoly(rho)                --> hashing.rs
// Algorithm 32 ExpandA(rho)                       --> hashing.rs
// Algorithm 33 ExpandS(rho)                       --> hashing.rs
// Algorithm 34 ExpandMask(rho, mu)                --> hashing.rs
// Algorithm 35 Power2Round(r)                     --> high_low.rs
// Algorithm 36 Decompose(r)                       --> high_low.rs
// Algorithm 37 HighBits(r)                        --> high_low.rs
// Algorithm 38 LowBits(r)                         --> high_low.rs
// Algorithm 39 MakeHint(z, r)                     --> high_low.rs
// Algorithm 40 UseHint(h, r)                      --> high_low.rs
// Algorithm 41 NTT(w)                             --> ntt.rs
// Algorithm 42 NTT^-1(w_hat)                      --> ntt.rs
// Algorithm 49 MontgomeryReduce(a)                --> helpers.rs
// Types are in types.rs, traits are in traits.rs

// Note that debug_assert! statements enforce correct program construction
// and are not involved in any operational dataflow; the ensure! macro
// implements conservative dataflow validation without panicking. Functions
// are generic only over the security parameters that determine array sizes;
// the remaining parameters travel as ordinary arguments.

/// The `rand_core` types are re-exported so that users of this crate do not
/// have to worry about using the exact correct version of `rand_core`.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

mod conversion;
mod encodings;
mod hashing;
mod helpers;
mod high_low;
mod ml_dsa;
mod ntt;
mod types;

/// All functionality is covered by traits, such that consumers can utilize
/// trait objects as desired.
pub mod traits;

// Applies across all security parameter sets
const Q: u32 = 8_380_417; // 2^23 - 2^13 + 1
const ZETA: u32 = 1753; // a primitive 512-th root of unity mod q
const D: u32 = 13; // number of dropped bits in Power2Round


// This common functionality is injected into each security parameter set
// namespace; it is a lightweight wrapper around the ml_dsa functions.
macro_rules! functionality {
    () => {
        use crate::encodings;
        use crate::helpers::ensure;
        use crate::ml_dsa;
        use crate::traits::{KeyGen, SerDes, Signer, Verifier};
        use rand_core::CryptoRngCore;

        const BETA: u32 = TAU as u32 * ETA;
        const LAMBDA_DIV4: usize = LAMBDA / 4;
        const W1_LEN: usize = 128 * K;


        // ----- 'EXTERNAL' DATA TYPES -----

        /// Empty struct to enable `KeyGen` trait objects across security
        /// parameter sets. Implements the [`crate::traits::KeyGen`] trait.
        pub struct KG;

        /// Private key specific to the target security parameter set.
        ///
        /// Implements the [`crate::traits::Signer`] and
        /// [`crate::traits::SerDes`] traits; zeroized on drop.
        pub type PrivateKey = crate::types::PrivateKey<K, L>;

        /// Public key specific to the target security parameter set.
        ///
        /// Implements the [`crate::traits::Verifier`] and
        /// [`crate::traits::SerDes`] traits.
        pub type PublicKey = crate::types::PublicKey<K>;

        // Note: (public) signature is just a vanilla fixed-size byte array


        // ----- PRIMARY FUNCTIONS -----

        /// # Algorithm 1: `ML-DSA.KeyGen()`.
        /// Generates a public-private key pair using the **default OS**
        /// random number generator. Operates in constant time relative to
        /// secret data (which excludes the random number generator
        /// internals, the public `rho`, and the rejection pattern of the
        /// hash stream expanded into `s1` and `s2`).
        ///
        /// # Errors
        /// Returns an error if the random number generator fails.
        #[cfg(feature = "default-rng")]
        pub fn try_keygen() -> Result<(PublicKey, PrivateKey), &'static str> {
            KG::try_keygen()
        }

        /// # Algorithm 1: `ML-DSA.KeyGen()`.
        /// Generates a public-private key pair using the **provided** random
        /// number generator.
        ///
        /// # Errors
        /// Returns an error if the random number generator fails.
        pub fn try_keygen_with_rng(
            rng: &mut impl CryptoRngCore,
        ) -> Result<(PublicKey, PrivateKey), &'static str> {
            KG::try_keygen_with_rng(rng)
        }

        /// # Algorithm 6: `ML-DSA.KeyGen_internal(xi)`.
        /// Derives a key pair from a fixed 32-byte seed.
        pub fn keygen_from_seed(xi: &[u8; 32]) -> (PublicKey, PrivateKey) {
            KG::keygen_from_seed(xi)
        }


        impl KeyGen for KG {
            type PrivateKey = PrivateKey;
            type PublicKey = PublicKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(PublicKey, PrivateKey), &'static str> {
                ml_dsa::key_gen::<K, L, PK_LEN>(rng, ETA)
            }

            fn keygen_from_seed(xi: &[u8; 32]) -> (PublicKey, PrivateKey) {
                ml_dsa::key_gen_internal::<K, L, PK_LEN>(ETA, xi)
            }
        }


        impl Signer for PrivateKey {
            type PublicKey = PublicKey;
            type Signature = [u8; SIG_LEN];

            /// # Algorithm 2: `ML-DSA.Sign(sk, M, ctx)`.
            fn try_sign_with_rng(
                &self, rng: &mut impl CryptoRngCore, message: &[u8], ctx: &[u8],
            ) -> Result<Self::Signature, &'static str> {
                ensure!(ctx.len() < 256, "Sign: context too long");
                let mut rnd = [0u8; 32];
                rng.try_fill_bytes(&mut rnd)
                    .map_err(|_| "Sign: random number generator failed")?;
                ml_dsa::sign_internal::<K, L, LAMBDA_DIV4, SIG_LEN, W1_LEN>(
                    BETA, GAMMA1, GAMMA2, OMEGA, TAU, self, message, ctx, rnd,
                )
            }

            /// # Algorithm 2: `ML-DSA.Sign(sk, M, ctx)`, deterministic
            /// variant with `rnd` substituted by the zero vector.
            fn try_sign_deterministic(
                &self, message: &[u8], ctx: &[u8],
            ) -> Result<Self::Signature, &'static str> {
                ensure!(ctx.len() < 256, "Sign: context too long");
                ml_dsa::sign_internal::<K, L, LAMBDA_DIV4, SIG_LEN, W1_LEN>(
                    BETA, GAMMA1, GAMMA2, OMEGA, TAU, self, message, ctx, [0u8; 32],
                )
            }

            fn get_public_key(&self) -> Self::PublicKey {
                ml_dsa::private_to_public_key(self)
            }
        }


        impl Verifier for PublicKey {
            type Signature = [u8; SIG_LEN];

            /// # Algorithm 3: `ML-DSA.Verify(pk, M, sigma, ctx)`.
            fn verify(&self, message: &[u8], sig: &Self::Signature, ctx: &[u8]) -> bool {
                if ctx.len() > 255 {
                    return false;
                }
                ml_dsa::verify_internal::<K, L, LAMBDA_DIV4, SIG_LEN, W1_LEN>(
                    BETA, GAMMA1, GAMMA2, OMEGA, TAU, self, message, sig, ctx,
                )
            }
        }


        // ----- SERIALIZATION AND DESERIALIZATION -----

        impl SerDes for PrivateKey {
            type ByteArray = [u8; SK_LEN];

            fn try_from_bytes(sk: Self::ByteArray) -> Result<Self, &'static str> {
                ml_dsa::expand_private::<K, L, SK_LEN>(ETA, &sk)
            }

            fn into_bytes(self) -> Self::ByteArray {
                encodings::sk_encode::<K, L, SK_LEN>(
                    ETA, &self.rho, &self.cap_k, &self.tr, &self.s1, &self.s2, &self.t0,
                )
            }
        }


        impl SerDes for PublicKey {
            type ByteArray = [u8; PK_LEN];

            fn try_from_bytes(pk: Self::ByteArray) -> Result<Self, &'static str> {
                Ok(ml_dsa::expand_public::<K, PK_LEN>(&pk))
            }

            fn into_bytes(self) -> Self::ByteArray {
                encodings::pk_encode::<K, PK_LEN>(&self.rho, &self.t1)
            }
        }


        #[cfg(test)]
        mod tests {
            use super::*;
            use rand_core::SeedableRng;

            #[test]
            fn smoke_test() {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
                let message1 = [0u8, 1, 2, 3, 4, 5, 6, 7];
                let message2 = [7u8, 7, 7, 7, 7, 7, 7, 7];

                for _ in 0..4 {
                    let (pk, sk) = try_keygen_with_rng(&mut rng).unwrap();
                    let sig = sk.try_sign_with_rng(&mut rng, &message1, &[]).unwrap();
                    assert!(pk.verify(&message1, &sig, &[]));
                    assert!(!pk.verify(&message2, &sig, &[]));
                    assert_eq!(
                        pk.clone().into_bytes(),
                        sk.get_public_key().into_bytes()
                    );
                }

                let (pk, sk) = keygen_from_seed(&[0x11u8; 32]);
                let sig = sk.try_sign_deterministic(&message1, &[2]).unwrap();
                assert!(pk.verify(&message1, &sig, &[2]));
                assert!(!pk.verify(&message1, &sig, &[3]));
                assert!(sk.try_sign_deterministic(&message1, &[0u8; 256]).is_err());
                assert!(!pk.verify(&message1, &sig, &[0u8; 256]));
            }
        }
    };
}


/// # Functionality for the **ML-DSA-65** security parameter set.
///
/// ML-DSA-65 is claimed to be in security strength category 3. This module
/// carries the parameter-set constants along with the specific sizes of the
/// public key, private key and signature.
///
/// **1)** The originator runs [`ml_dsa_65::try_keygen`] to generate a
/// [`ml_dsa_65::PublicKey`] and a [`ml_dsa_65::PrivateKey`]. The private key
/// implements the [`traits::Signer`] trait, whose
/// [`traits::Signer::try_sign()`] function signs byte-array messages.
///
/// **2)** Both key structs implement the [`traits::SerDes`] trait for
/// conversion to and from fixed-size byte arrays for storage and
/// transmission.
///
/// **3)** The remote party uses [`traits::Verifier::verify()`] on the
/// reconstructed [`ml_dsa_65::PublicKey`] to check the message signature.
#[cfg(feature = "ml-dsa-65")]
pub mod ml_dsa_65 {
    const TAU: usize = 49;
    const LAMBDA: usize = 192;
    const GAMMA1: u32 = 1 << 19;
    const GAMMA2: u32 = (crate::Q - 1) / 32;
    const K: usize = 6;
    const L: usize = 5;
    const ETA: u32 = 4;
    const OMEGA: usize = 55;
    /// Private (secret) key length in bytes.
    pub const SK_LEN: usize = 4032;
    /// Public key length in bytes.
    pub const PK_LEN: usize = 1952;
    /// Signature length in bytes.
    pub const SIG_LEN: usize = 3309;

    functionality!();
}

//! All functionality is covered by traits so that consumers can write code
//! generic over the security parameter set.

use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait is implemented by the empty `KG` struct of each
/// security parameter set namespace.
pub trait KeyGen {
    /// A public key specific to the chosen security parameter set.
    type PublicKey;
    /// A private (secret) key specific to the chosen security parameter set.
    type PrivateKey;

    /// Generates a public and private key pair using the OS default random
    /// number generator.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "ml-dsa-65", feature = "default-rng"))] {
    /// use mldsa::ml_dsa_65;
    /// use mldsa::traits::{KeyGen, Signer, Verifier};
    ///
    /// let (pk, sk) = ml_dsa_65::KG::try_keygen()?;
    /// let sig = sk.try_sign(b"message", &[])?;
    /// assert!(pk.verify(b"message", &sig, &[]));
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::PublicKey, Self::PrivateKey), &'static str> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates a public and private key pair using the provided random
    /// number generator.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), &'static str>;

    /// Derives a key pair from a fixed 32-byte seed; the same seed always
    /// yields the same key pair.
    fn keygen_from_seed(xi: &[u8; 32]) -> (Self::PublicKey, Self::PrivateKey);
}


/// The `Signer` trait is implemented for the `PrivateKey` struct of each
/// security parameter set namespace.
pub trait Signer {
    /// The signature byte array specific to the chosen security parameter set.
    type Signature;
    /// The corresponding public key type.
    type PublicKey;

    /// Signs a message with an optional context string (at most 255 bytes),
    /// drawing the 32-byte randomizer from the OS default random number
    /// generator.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails or the
    /// context is too long.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "ml-dsa-65", feature = "default-rng"))] {
    /// use mldsa::ml_dsa_65;
    /// use mldsa::traits::{Signer, Verifier};
    ///
    /// let (pk, sk) = ml_dsa_65::try_keygen()?;
    /// let sig = sk.try_sign(b"message", b"context")?;
    /// assert!(pk.verify(b"message", &sig, b"context"));
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_sign(&self, message: &[u8], ctx: &[u8]) -> Result<Self::Signature, &'static str> {
        self.try_sign_with_rng(&mut OsRng, message, ctx)
    }

    /// Signs a message with an optional context string, drawing the
    /// randomizer from the provided random number generator.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails or the
    /// context is too long.
    fn try_sign_with_rng(
        &self, rng: &mut impl CryptoRngCore, message: &[u8], ctx: &[u8],
    ) -> Result<Self::Signature, &'static str>;

    /// Signs a message with an optional context string in the deterministic
    /// variant, which substitutes an all-zero randomizer. The same key,
    /// message and context always produce the same signature.
    ///
    /// # Errors
    /// Returns an error when the context is too long.
    fn try_sign_deterministic(
        &self, message: &[u8], ctx: &[u8],
    ) -> Result<Self::Signature, &'static str>;

    /// Recomputes the public key corresponding to this private key; the
    /// result is identical to the public key from key generation.
    fn get_public_key(&self) -> Self::PublicKey;
}


/// The `Verifier` trait is implemented for the `PublicKey` struct of each
/// security parameter set namespace.
pub trait Verifier {
    /// The signature byte array specific to the chosen security parameter set.
    type Signature;

    /// Verifies a signature over a message with an optional context string.
    /// Returns `false` for malformed signatures, context strings longer than
    /// 255 bytes, and signatures that do not verify; operates in variable
    /// time as everything involved is public.
    fn verify(&self, message: &[u8], signature: &Self::Signature, ctx: &[u8]) -> bool;
}


/// The `SerDes` trait provides serialization and deserialization of
/// fixed-size byte arrays for both key types. Deserialization validates
/// wherever the encoding admits rejection: private keys reject out-of-range
/// short-vector nibbles, while every fixed-size public key byte array decodes
/// successfully (FIPS 204 defines no further public key validity checks).
pub trait SerDes {
    /// The fixed-size byte array specific to the struct being (de)serialized.
    type ByteArray;

    /// Produces the FIPS 204 byte encoding of this struct.
    fn into_bytes(self) -> Self::ByteArray;

    /// Consumes a byte encoding, validating where the encoding admits
    /// rejection.
    ///
    /// # Errors
    /// Returns an error on malformed input; infallible for encodings with
    /// nothing to reject (the public key).
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}

//! RSA public and private keys, and the generator producing them in pairs.

use alloc::{boxed::Box, vec::Vec};
use const_oid::AssociatedOid;
use core::fmt::{self, Debug, Formatter};
use digest::Digest;
use rand_core::CryptoRngCore;
use signature::{DigestSigner, DigestVerifier, RandomizedDigestSigner};
use zeroize::Zeroizing;
#[cfg(feature = "serde")]
use serdect::serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::dummy_rng::DummyRng;
use crate::errors::{Error, Result};
use crate::hash::{digest_info_prefix, DigestValue};
use crate::provider;
use crate::signature::{byte_len, Signature};
use crate::stream::{read_len_prefix, write_len_prefix, Sink, Source};

/// Represents the public part of an RSA key: a `BITS`-bit modulus used with
/// the public exponent `EXP`.
///
/// The key holds exactly `BITS / 8` bytes. `EXP` is part of the type and is
/// never stored or transmitted. Keys of different sizes or exponents are
/// different types.
///
/// Ordering is lexicographic over the modulus bytes. It exists so keys can
/// live in ordered collections and carries no cryptographic meaning.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey<const BITS: usize = 2048, const EXP: u32 = 65537> {
    key: Box<[u8]>,
}

/// Represents the private part of an RSA key.
///
/// The key material is opaque, provider-defined and variable in length; the
/// in-crate provider uses PKCS#1 DER. It is wiped from memory on drop and is
/// deliberately not comparable.
#[derive(Clone)]
pub struct PrivateKey<const BITS: usize = 2048, const EXP: u32 = 65537> {
    key: Zeroizing<Vec<u8>>,
}

/// Generates a matching key pair.
///
/// This is the only way to obtain a [`PublicKey`] whose modulus is written
/// after construction. No partial pair is returned on failure.
///
/// ```
/// use scrypt_rsa::{generate_keys, DigestValue, PrivateKey, PublicKey};
/// use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// use sha2::Sha256;
///
/// let mut rng = ChaCha8Rng::from_seed([42; 32]);
/// let (public_key, private_key): (PublicKey<1024>, PrivateKey<1024>) =
///     generate_keys(&mut rng).expect("failed to generate a key");
///
/// let digest = DigestValue::<Sha256>::digest(b"hello world");
/// let signature = private_key.sign(&digest).expect("failed to sign");
/// assert!(public_key.verify(&digest, &signature));
/// ```
pub fn generate_keys<const BITS: usize, const EXP: u32, R>(
    rng: &mut R,
) -> Result<(PublicKey<BITS, EXP>, PrivateKey<BITS, EXP>)>
where
    R: CryptoRngCore + ?Sized,
{
    let (modulus, private_key) = provider::generate_keys(rng, BITS, EXP)?;

    let mut public_key = PublicKey::<BITS, EXP>::default();
    if modulus.len() != public_key.key.len() {
        return Err(Error::Internal);
    }
    public_key.key.copy_from_slice(&modulus);

    Ok((public_key, PrivateKey { key: private_key }))
}

impl<const BITS: usize, const EXP: u32> PublicKey<BITS, EXP> {
    /// Size of the modulus in bytes.
    pub const SIZE: usize = byte_len(BITS);

    /// The public exponent.
    pub const EXPONENT: u32 = EXP;

    /// Returns the big-endian modulus bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Returns `true` iff `signature` is a valid signature of `digest` under
    /// this key.
    ///
    /// Any failure, including a key the provider cannot use, reads as `false`.
    /// Use [`PublicKey::try_verify`] to tell the two apart.
    pub fn verify<D>(&self, digest: &DigestValue<D>, signature: &Signature<BITS>) -> bool
    where
        D: Digest + AssociatedOid,
    {
        self.try_verify(digest, signature).unwrap_or(false)
    }

    /// Checks `signature` against `digest`.
    ///
    /// Returns `Ok(false)` for a signature that does not match and `Err` when
    /// the provider cannot work with this key.
    pub fn try_verify<D>(&self, digest: &DigestValue<D>, signature: &Signature<BITS>) -> Result<bool>
    where
        D: Digest + AssociatedOid,
    {
        provider::verify_data(
            &self.key,
            BITS,
            EXP,
            &digest_info_prefix::<D>(),
            digest.as_bytes(),
            signature.as_bytes(),
        )
    }

    /// Encrypts `plaintext` so only the private key holder can read it.
    ///
    /// `plaintext` may be at most `BITS / 8 - 11` bytes long.
    pub fn encrypt<R: CryptoRngCore + ?Sized>(&self, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>> {
        provider::public_encrypt(rng, &self.key, BITS, EXP, plaintext)
    }

    /// Recovers data produced by [`PrivateKey::encrypt`].
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        provider::public_decrypt(&self.key, BITS, EXP, ciphertext)
    }

    /// Writes the [`Self::SIZE`] modulus bytes, without any framing.
    pub fn serialize<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.write(&self.key)
    }

    /// Reads exactly [`Self::SIZE`] modulus bytes.
    pub fn deserialize<S: Source + ?Sized>(source: &mut S) -> Result<Self> {
        let mut key = Self::default();
        source.read(&mut key.key)?;
        Ok(key)
    }
}

impl<const BITS: usize, const EXP: u32> Default for PublicKey<BITS, EXP> {
    /// An all-zero modulus. The provider rejects it until a real key is
    /// assigned.
    fn default() -> Self {
        Self {
            key: vec![0u8; Self::SIZE].into_boxed_slice(),
        }
    }
}

impl<const BITS: usize, const EXP: u32> TryFrom<&[u8]> for PublicKey<BITS, EXP> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidLength {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            key: bytes.into(),
        })
    }
}

impl<const BITS: usize, const EXP: u32> AsRef<[u8]> for PublicKey<BITS, EXP> {
    fn as_ref(&self) -> &[u8] {
        &self.key
    }
}

impl<const BITS: usize, const EXP: u32> Debug for PublicKey<BITS, EXP> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("PublicKey(")?;
        for byte in self.key.iter() {
            write!(f, "{:02x}", byte)?;
        }
        f.write_str(")")
    }
}

impl<D, const BITS: usize, const EXP: u32> DigestVerifier<D, Signature<BITS>> for PublicKey<BITS, EXP>
where
    D: Digest + AssociatedOid,
{
    fn verify_digest(&self, digest: D, signature: &Signature<BITS>) -> signature::Result<()> {
        if self.try_verify(&DigestValue::from_hasher(digest), signature)? {
            Ok(())
        } else {
            Err(Error::Verification.into())
        }
    }
}

impl<const BITS: usize, const EXP: u32> PrivateKey<BITS, EXP> {
    /// The public exponent of the matching public key.
    pub const EXPONENT: u32 = EXP;

    /// Signs `digest`. The result verifies under the matching [`PublicKey`].
    pub fn sign<D>(&self, digest: &DigestValue<D>) -> Result<Signature<BITS>>
    where
        D: Digest + AssociatedOid,
    {
        self.sign_inner::<DummyRng, D>(None, digest)
    }

    /// Signs `digest`, using `rng` to blind the private key operation.
    pub fn sign_with_rng<R, D>(&self, rng: &mut R, digest: &DigestValue<D>) -> Result<Signature<BITS>>
    where
        R: CryptoRngCore + ?Sized,
        D: Digest + AssociatedOid,
    {
        self.sign_inner(Some(rng), digest)
    }

    fn sign_inner<R, D>(&self, rng: Option<&mut R>, digest: &DigestValue<D>) -> Result<Signature<BITS>>
    where
        R: CryptoRngCore + ?Sized,
        D: Digest + AssociatedOid,
    {
        let sig = provider::sign_data(
            rng,
            &self.key,
            BITS,
            EXP,
            &digest_info_prefix::<D>(),
            digest.as_bytes(),
        )?;
        Signature::from_vec(sig)
    }

    /// Transforms `plaintext` so any holder of the matching public key can
    /// recover it with [`PublicKey::decrypt`].
    ///
    /// `plaintext` may be at most `BITS / 8 - 11` bytes long.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        provider::private_encrypt::<DummyRng>(None, &self.key, BITS, EXP, plaintext)
    }

    /// Decrypts data produced by [`PublicKey::encrypt`].
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        provider::private_decrypt::<DummyRng>(None, &self.key, BITS, EXP, ciphertext)
    }

    /// Decrypts data produced by [`PublicKey::encrypt`], using `rng` to blind
    /// the private key operation.
    pub fn decrypt_with_rng<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        provider::private_decrypt(Some(rng), &self.key, BITS, EXP, ciphertext)
    }

    /// Returns the raw private key material.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Writes a little-endian `u16` length followed by the key material.
    pub fn serialize<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let len = u16::try_from(self.key.len()).map_err(|_| Error::PrivateKeyTooLarge)?;
        write_len_prefix(sink, len)?;
        sink.write(&self.key)
    }

    /// Reads a little-endian `u16` length followed by that many bytes of key
    /// material.
    ///
    /// The material is not validated here; a malformed key fails on first
    /// use.
    pub fn deserialize<S: Source + ?Sized>(source: &mut S) -> Result<Self> {
        let len = read_len_prefix(source)?;
        let mut key = Zeroizing::new(vec![0u8; usize::from(len)]);
        source.read(&mut key)?;
        Ok(Self { key })
    }
}

impl<const BITS: usize, const EXP: u32> Debug for PrivateKey<BITS, EXP> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

impl<D, const BITS: usize, const EXP: u32> DigestSigner<D, Signature<BITS>> for PrivateKey<BITS, EXP>
where
    D: Digest + AssociatedOid,
{
    fn try_sign_digest(&self, digest: D) -> signature::Result<Signature<BITS>> {
        Ok(self.sign(&DigestValue::from_hasher(digest))?)
    }
}

impl<D, const BITS: usize, const EXP: u32> RandomizedDigestSigner<D, Signature<BITS>>
    for PrivateKey<BITS, EXP>
where
    D: Digest + AssociatedOid,
{
    fn try_sign_digest_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        digest: D,
    ) -> signature::Result<Signature<BITS>> {
        Ok(self.sign_with_rng(rng, &DigestValue::from_hasher(digest))?)
    }
}

#[cfg(feature = "serde")]
impl<const BITS: usize, const EXP: u32> Serialize for PublicKey<BITS, EXP> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serdect::slice::serialize_hex_lower_or_bin(&self.key, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const BITS: usize, const EXP: u32> Deserialize<'de> for PublicKey<BITS, EXP> {
    fn deserialize<De>(deserializer: De) -> core::result::Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::try_from(bytes.as_slice()).map_err(de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl<const BITS: usize, const EXP: u32> Serialize for PrivateKey<BITS, EXP> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.key.len() > usize::from(u16::MAX) {
            return Err(ser::Error::custom(Error::PrivateKeyTooLarge));
        }
        serdect::slice::serialize_hex_lower_or_bin(&self.key, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const BITS: usize, const EXP: u32> Deserialize<'de> for PrivateKey<BITS, EXP> {
    fn deserialize<De>(deserializer: De) -> core::result::Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Ok(Self {
            key: Zeroizing::new(bytes),
        })
    }
}

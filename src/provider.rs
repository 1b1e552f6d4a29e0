//! The crypto provider: free functions doing the actual RSA work on raw key
//! bytes.
//!
//! [`PublicKey`](crate::PublicKey), [`PrivateKey`](crate::PrivateKey) and
//! [`generate_keys`](crate::generate_keys) call into this module and nothing
//! else. Every function takes the key size in bits and the public exponent
//! alongside the key bytes, mirroring the type parameters of the key types.
//!
//! Formats used by this provider:
//!
//! - public key bytes: the big-endian modulus, exactly `bits / 8` bytes;
//! - private key bytes: a two-prime PKCS#1 `RSAPrivateKey` in DER;
//! - signatures: `RSASSA-PKCS1-v1_5` over `prefix || hashed`;
//! - public encryption / private decryption: `RSAES-PKCS1-v1_5`;
//! - private encryption / public decryption: PKCS#1 v1.5 block type 1, which
//!   lets the holder of the public key recover the input.
//!
//! Inputs to both encryption directions are limited to `bits / 8 - 11` bytes.

use alloc::vec::Vec;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::generate::generate_key_with_exp;
use crate::algorithms::pkcs1v15::{
    pkcs1v15_encrypt_pad, pkcs1v15_encrypt_unpad, pkcs1v15_recover_unpad, pkcs1v15_sign_pad,
    pkcs1v15_sign_unpad,
};
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::encoding::{decode_private_key, encode_private_key};
use crate::errors::{Error, Result};
use crate::keyparts::{
    check_parameters, check_public, PrivateComponents, PublicComponents, PublicKeyParts,
};

/// Generates a key pair of exactly `bits` bits with public exponent
/// `exponent`.
///
/// Returns the public modulus (`bits / 8` bytes, big-endian) and the private
/// key material.
pub fn generate_keys<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
    exponent: u32,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
    logged("generate_keys", generate_keys_inner(rng, bits, exponent))
}

fn generate_keys_inner<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
    exponent: u32,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
    if bits % 8 != 0 {
        return Err(Error::InvalidModulus);
    }

    tracing::debug!(bits, exponent, "generating RSA key pair");
    let (components, attempts) = generate_key_with_exp(rng, bits, exponent)?;

    let modulus = to_fixed_be(components.n().clone(), bits / 8)?;
    let private_key = encode_private_key(&components)?;
    tracing::debug!(
        bits,
        exponent,
        attempts,
        private_key_len = private_key.len(),
        "generated RSA key pair"
    );

    Ok((modulus, private_key))
}

/// Signs `prefix || hashed` with the private key.
///
/// If `rng` is not `None` then RSA blinding is used to avoid timing
/// side-channel attacks. The signature is always `bits / 8` bytes.
pub fn sign_data<R: CryptoRngCore + ?Sized>(
    rng: Option<&mut R>,
    key: &[u8],
    bits: usize,
    exponent: u32,
    prefix: &[u8],
    hashed: &[u8],
) -> Result<Vec<u8>> {
    logged("sign_data", {
        private_components(key, bits, exponent).and_then(|priv_key| {
            let k = priv_key.size();
            let em = pkcs1v15_sign_pad(prefix, hashed, k)?;
            let em = BigUint::from_bytes_be(&em);
            to_fixed_be(rsa_decrypt_and_check(&priv_key, rng, &em)?, k)
        })
    })
}

/// Checks `sig` against `prefix || hashed` under the public key.
///
/// A signature that does not match is `Ok(false)`. `Err` is reserved for
/// key bytes the provider cannot use.
pub fn verify_data(
    key: &[u8],
    bits: usize,
    exponent: u32,
    prefix: &[u8],
    hashed: &[u8],
    sig: &[u8],
) -> Result<bool> {
    let pub_key = logged("verify_data", public_components(key, bits, exponent))?;
    let k = pub_key.size();

    if sig.len() != k {
        tracing::trace!(expected = k, actual = sig.len(), "signature has wrong length");
        return Ok(false);
    }

    let s = BigUint::from_bytes_be(sig);
    if &s >= pub_key.n() {
        tracing::trace!("signature representative out of range");
        return Ok(false);
    }

    let em = logged(
        "verify_data",
        rsa_encrypt(&pub_key, &s).and_then(|m| to_fixed_be(m, k)),
    )?;

    match pkcs1v15_sign_unpad(prefix, hashed, &em, k) {
        Ok(()) => Ok(true),
        Err(_) => {
            tracing::trace!("signature does not match digest");
            Ok(false)
        }
    }
}

/// Encrypts `input` for the holder of the private key.
pub fn public_encrypt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key: &[u8],
    bits: usize,
    exponent: u32,
    input: &[u8],
) -> Result<Vec<u8>> {
    logged("public_encrypt", {
        public_components(key, bits, exponent).and_then(|pub_key| {
            let k = pub_key.size();
            let em = pkcs1v15_encrypt_pad(rng, input, k)?;
            let m = BigUint::from_bytes_be(&em);
            to_fixed_be(rsa_encrypt(&pub_key, &m)?, k)
        })
    })
}

/// Recovers data produced by [`private_encrypt`].
pub fn public_decrypt(key: &[u8], bits: usize, exponent: u32, input: &[u8]) -> Result<Vec<u8>> {
    logged("public_decrypt", {
        public_components(key, bits, exponent).and_then(|pub_key| {
            let k = pub_key.size();
            if input.len() != k {
                return Err(Error::Decryption);
            }
            let c = BigUint::from_bytes_be(input);
            if &c >= pub_key.n() {
                return Err(Error::Decryption);
            }
            let em = to_fixed_be(rsa_encrypt(&pub_key, &c)?, k)?;
            pkcs1v15_recover_unpad(&em, k)
        })
    })
}

/// Transforms `input` with the private key so that anyone holding the
/// public key can recover it with [`public_decrypt`].
pub fn private_encrypt<R: CryptoRngCore + ?Sized>(
    rng: Option<&mut R>,
    key: &[u8],
    bits: usize,
    exponent: u32,
    input: &[u8],
) -> Result<Vec<u8>> {
    logged("private_encrypt", {
        private_components(key, bits, exponent).and_then(|priv_key| {
            let k = priv_key.size();
            let em = pkcs1v15_sign_pad(&[], input, k)?;
            let em = BigUint::from_bytes_be(&em);
            to_fixed_be(rsa_decrypt_and_check(&priv_key, rng, &em)?, k)
        })
    })
}

/// Decrypts data produced by [`public_encrypt`].
///
/// If `rng` is not `None` then RSA blinding is used to avoid timing
/// side-channel attacks.
pub fn private_decrypt<R: CryptoRngCore + ?Sized>(
    rng: Option<&mut R>,
    key: &[u8],
    bits: usize,
    exponent: u32,
    input: &[u8],
) -> Result<Vec<u8>> {
    logged("private_decrypt", {
        private_components(key, bits, exponent).and_then(|priv_key| {
            let k = priv_key.size();
            if input.len() != k {
                return Err(Error::Decryption);
            }
            let c = BigUint::from_bytes_be(input);
            let em = rsa_decrypt_and_check(&priv_key, rng, &c)?;
            let em = to_fixed_be(em, k)?;
            pkcs1v15_encrypt_unpad(em, k)
        })
    })
}

/// Interprets public key bytes, rejecting a modulus of the wrong size.
fn public_components(key: &[u8], bits: usize, exponent: u32) -> Result<PublicComponents> {
    if bits % 8 != 0 || key.len() != bits / 8 {
        return Err(Error::InvalidModulus);
    }
    let pub_key = PublicComponents::from_modulus(key, exponent);
    check_public(&pub_key)?;
    check_parameters(&pub_key, bits, exponent)?;
    Ok(pub_key)
}

/// Decodes private key bytes, rejecting keys that do not match `bits` and `exponent`.
fn private_components(key: &[u8], bits: usize, exponent: u32) -> Result<PrivateComponents> {
    let priv_key = decode_private_key(key)?;
    check_parameters(&priv_key, bits, exponent)?;
    Ok(priv_key)
}

/// Big-endian bytes of `value`, left-padded with zeros to exactly `len`.
///
/// The integer and its unpadded bytes are wiped before returning, since
/// `value` may be a decrypted message.
fn to_fixed_be(value: BigUint, len: usize) -> Result<Vec<u8>> {
    let value = Zeroizing::new(value);
    let bytes = Zeroizing::new(value.to_bytes_be());
    if bytes.len() > len {
        return Err(Error::InvalidPadLen);
    }
    let mut out = vec![0u8; len];
    out[len - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

/// Reports provider failures before handing them back to the caller.
fn logged<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        tracing::debug!(operation, error = %err, "provider operation failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_rng::DummyRng;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const BITS: usize = 512;
    const EXP: u32 = 65537;

    fn key_pair() -> (Vec<u8>, Zeroizing<Vec<u8>>) {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        generate_keys(&mut rng, BITS, EXP).unwrap()
    }

    #[test]
    fn test_generate_sizes() {
        let (public, _) = key_pair();
        assert_eq!(public.len(), BITS / 8);
        assert_ne!(public[0] & 0x80, 0);

        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        assert_eq!(
            generate_keys(&mut rng, 516, EXP),
            Err(Error::InvalidModulus)
        );
    }

    #[test]
    fn test_sign_verify() {
        let (public, private) = key_pair();
        let prefix = [0x30, 0x21];
        let hashed = [7u8; 20];

        let sig = sign_data::<DummyRng>(None, &private, BITS, EXP, &prefix, &hashed).unwrap();
        assert_eq!(sig.len(), BITS / 8);
        assert_eq!(verify_data(&public, BITS, EXP, &prefix, &hashed, &sig), Ok(true));

        let other = [8u8; 20];
        assert_eq!(verify_data(&public, BITS, EXP, &prefix, &other, &sig), Ok(false));
        assert_eq!(
            verify_data(&public, BITS, EXP, &prefix, &hashed, &sig[1..]),
            Ok(false)
        );

        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let blinded =
            sign_data(Some(&mut rng), &private, BITS, EXP, &prefix, &hashed).unwrap();
        assert_eq!(blinded, sig);
    }

    #[test]
    fn test_parameter_mismatch() {
        let (public, private) = key_pair();
        let hashed = [7u8; 20];

        assert_eq!(
            sign_data::<DummyRng>(None, &private, 1024, EXP, &[], &hashed),
            Err(Error::InvalidModulus)
        );
        assert_eq!(
            sign_data::<DummyRng>(None, &private, BITS, 3, &[], &hashed),
            Err(Error::InvalidExponent)
        );
        assert_eq!(
            verify_data(&public, 1024, EXP, &[], &hashed, &[0u8; 128]),
            Err(Error::InvalidModulus)
        );
    }

    #[test]
    fn test_zero_modulus_is_provider_failure() {
        let zero = [0u8; BITS / 8];
        assert_eq!(
            verify_data(&zero, BITS, EXP, &[], &[1u8; 20], &[0u8; BITS / 8]),
            Err(Error::InvalidModulus)
        );
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        assert_eq!(
            public_encrypt(&mut rng, &zero, BITS, EXP, b"hi"),
            Err(Error::InvalidModulus)
        );
    }

    #[test]
    fn test_encrypt_decrypt_both_directions() {
        let (public, private) = key_pair();
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let msg = b"attack at dawn";

        let ct = public_encrypt(&mut rng, &public, BITS, EXP, msg).unwrap();
        assert_eq!(ct.len(), BITS / 8);
        let pt = private_decrypt::<DummyRng>(None, &private, BITS, EXP, &ct).unwrap();
        assert_eq!(pt, msg);

        let wrapped = private_encrypt::<DummyRng>(None, &private, BITS, EXP, msg).unwrap();
        let recovered = public_decrypt(&public, BITS, EXP, &wrapped).unwrap();
        assert_eq!(recovered, msg);

        // The two directions do not mix.
        assert_eq!(
            public_decrypt(&public, BITS, EXP, &ct),
            Err(Error::Decryption)
        );
    }

    #[test]
    fn test_encrypt_too_long() {
        let (public, private) = key_pair();
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let msg = vec![1u8; BITS / 8 - 10];

        assert_eq!(
            public_encrypt(&mut rng, &public, BITS, EXP, &msg),
            Err(Error::MessageTooLong)
        );
        assert_eq!(
            private_encrypt::<DummyRng>(None, &private, BITS, EXP, &msg),
            Err(Error::MessageTooLong)
        );
    }

    #[test]
    fn test_fixed_be() {
        let value = BigUint::from(0x0102u32);
        assert_eq!(to_fixed_be(value.clone(), 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(to_fixed_be(value.clone(), 2).unwrap(), vec![1, 2]);
        assert_eq!(to_fixed_be(value, 1), Err(Error::InvalidPadLen));
        assert_eq!(to_fixed_be(BigUint::from(0u32), 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_malformed_private_key() {
        let hashed = [7u8; 20];
        assert!(matches!(
            sign_data::<DummyRng>(None, &[1, 2, 3], BITS, EXP, &[], &hashed),
            Err(Error::Pkcs1(_))
        ));
    }
}

//! Big integer components behind the byte buffers of the public key types.
//!
//! The key types in [`crate::key`] only ever hold bytes. The provider turns
//! those bytes into the structures below for the duration of one operation.

use alloc::vec::Vec;
use num_bigint::{BigInt, BigUint, ModInverse, Sign::Plus, ToBigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use zeroize::Zeroize;

use crate::errors::{Error, Result};

/// Smallest public exponent the provider accepts.
pub(crate) const MIN_PUB_EXPONENT: u64 = 2;

/// Largest public exponent the provider accepts. Only exponents decoded from
/// private key material can exceed it; the key types carry a `u32`.
pub(crate) const MAX_PUB_EXPONENT: u64 = (1 << 33) - 1;

/// Components of an RSA public key.
pub(crate) trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> &BigUint;

    /// Returns the modulus size in bytes. Raw signatures and ciphertexts for
    /// or by this public key will have the same size.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}

/// Components of an RSA private key.
pub(crate) trait PrivateKeyParts: PublicKeyParts {
    /// Returns the private exponent of the key.
    fn d(&self) -> &BigUint;

    /// Returns the prime factors.
    fn primes(&self) -> &[BigUint];

    /// Returns the CRT values, if they have been computed.
    fn precomputed(&self) -> Option<&PrecomputedValues>;
}

/// Modulus and exponent recovered from a public key buffer.
#[derive(Debug, Clone)]
pub(crate) struct PublicComponents {
    n: BigUint,
    e: BigUint,
}

impl PublicComponents {
    /// Reads a big-endian modulus and pairs it with `exponent`.
    pub(crate) fn from_modulus(modulus: &[u8], exponent: u32) -> Self {
        Self {
            n: BigUint::from_bytes_be(modulus),
            e: BigUint::from(exponent),
        }
    }
}

impl PublicKeyParts for PublicComponents {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

/// A complete two-prime RSA private key.
#[derive(Clone)]
pub(crate) struct PrivateComponents {
    n: BigUint,
    e: BigUint,
    d: BigUint,
    /// Prime factors of N, exactly two elements.
    primes: Vec<BigUint>,
    precomputed: Option<PrecomputedValues>,
}

impl PrivateComponents {
    /// Assembles a private key and computes its CRT values.
    pub(crate) fn new(n: BigUint, e: BigUint, d: BigUint, primes: Vec<BigUint>) -> Result<Self> {
        if primes.len() != 2 {
            return Err(Error::InvalidPrime);
        }

        let mut key = Self {
            n,
            e,
            d,
            primes,
            precomputed: None,
        };
        key.precompute()?;
        Ok(key)
    }

    /// Performs some calculations to speed up private key operations.
    fn precompute(&mut self) -> Result<()> {
        if self.precomputed.is_some() {
            return Ok(());
        }

        let (p, q) = (&self.primes[0], &self.primes[1]);
        if *p <= BigUint::one() || *q <= BigUint::one() {
            return Err(Error::InvalidPrime);
        }

        let dp = &self.d % (p - BigUint::one());
        let dq = &self.d % (q - BigUint::one());
        let qinv = q.clone().mod_inverse(p).ok_or(Error::InvalidCoefficient)?;

        self.precomputed = Some(PrecomputedValues { dp, dq, qinv });

        Ok(())
    }

    /// Checks that the components describe a consistent key.
    pub(crate) fn validate(&self) -> Result<()> {
        check_public(self)?;

        let mut m = BigUint::one();
        for prime in &self.primes {
            if *prime <= BigUint::one() {
                return Err(Error::InvalidPrime);
            }
            m *= prime;
        }
        if m != self.n {
            return Err(Error::InvalidModulus);
        }

        // d*e ≡ 1 mod (p-1) for every prime, which also covers the totient.
        let de = &self.d * &self.e;
        for prime in &self.primes {
            let congruence = &de % (prime - BigUint::one());
            if !congruence.is_one() {
                return Err(Error::InvalidExponent);
            }
        }

        Ok(())
    }

    /// Returns the CRT coefficient as an unsigned integer.
    pub(crate) fn coefficient(&self) -> Result<BigUint> {
        self.precomputed
            .as_ref()
            .and_then(|values| values.qinv.to_biguint())
            .ok_or(Error::InvalidCoefficient)
    }
}

impl PublicKeyParts for PrivateComponents {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl PrivateKeyParts for PrivateComponents {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    fn precomputed(&self) -> Option<&PrecomputedValues> {
        self.precomputed.as_ref()
    }
}

impl Zeroize for PrivateComponents {
    fn zeroize(&mut self) {
        self.d.zeroize();
        for prime in self.primes.iter_mut() {
            prime.zeroize();
        }
        self.primes.clear();
        if let Some(mut precomputed) = self.precomputed.take() {
            precomputed.zeroize();
        }
    }
}

impl Drop for PrivateComponents {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Precomputed Chinese remainder theorem values.
#[derive(Debug, Clone)]
pub(crate) struct PrecomputedValues {
    /// D mod (P-1)
    pub(crate) dp: BigUint,
    /// D mod (Q-1)
    pub(crate) dq: BigUint,
    /// Q^-1 mod P
    pub(crate) qinv: BigInt,
}

impl Zeroize for PrecomputedValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for PrecomputedValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Check that the public key is well formed and has an exponent within acceptable bounds.
#[inline]
pub(crate) fn check_public(public_key: &impl PublicKeyParts) -> Result<()> {
    let e = public_key
        .e()
        .to_u64()
        .ok_or(Error::PublicExponentTooLarge)?;

    if public_key.n().is_zero() || public_key.n().is_even() {
        return Err(Error::InvalidModulus);
    }

    if public_key.e() >= public_key.n() {
        return Err(Error::InvalidModulus);
    }

    if public_key.e().is_even() {
        return Err(Error::InvalidExponent);
    }

    if e < MIN_PUB_EXPONENT {
        return Err(Error::PublicExponentTooSmall);
    }

    if e > MAX_PUB_EXPONENT {
        return Err(Error::PublicExponentTooLarge);
    }

    Ok(())
}

/// Checks that `key` has exactly `bits` bits and the exponent `exponent`.
pub(crate) fn check_parameters(key: &impl PublicKeyParts, bits: usize, exponent: u32) -> Result<()> {
    if key.n().bits() != bits {
        return Err(Error::InvalidModulus);
    }
    if *key.e() != BigUint::from(exponent) {
        return Err(Error::InvalidExponent);
    }
    Ok(())
}

/// Builds a signed integer from an unsigned one without a fallible conversion.
#[inline]
pub(crate) fn to_signed(value: BigUint) -> BigInt {
    BigInt::from_biguint(Plus, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    fn small_key() -> PrivateComponents {
        // p = 61, q = 53, n = 3233, e = 17, d = 413
        PrivateComponents::new(
            BigUint::from_u64(3233).unwrap(),
            BigUint::from_u64(17).unwrap(),
            BigUint::from_u64(413).unwrap(),
            vec![
                BigUint::from_u64(61).unwrap(),
                BigUint::from_u64(53).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_precompute() {
        let key = small_key();
        let values = key.precomputed().unwrap();
        assert_eq!(values.dp, BigUint::from_u64(413 % 60).unwrap());
        assert_eq!(values.dq, BigUint::from_u64(413 % 52).unwrap());
        // 53 * 38 = 2014 = 33 * 61 + 1
        assert_eq!(key.coefficient().unwrap(), BigUint::from_u64(38).unwrap());
    }

    #[test]
    fn test_degenerate_primes() {
        for primes in [[0u64, 3233], [1, 3233], [3233, 1]] {
            let key = PrivateComponents::new(
                BigUint::from_u64(3233).unwrap(),
                BigUint::from_u64(17).unwrap(),
                BigUint::from_u64(413).unwrap(),
                primes.iter().map(|p| BigUint::from_u64(*p).unwrap()).collect(),
            );
            assert!(matches!(key, Err(Error::InvalidPrime)));
        }
    }

    #[test]
    fn test_validate() {
        assert_eq!(small_key().validate(), Ok(()));

        let wrong_d = PrivateComponents::new(
            BigUint::from_u64(3233).unwrap(),
            BigUint::from_u64(17).unwrap(),
            BigUint::from_u64(415).unwrap(),
            vec![
                BigUint::from_u64(61).unwrap(),
                BigUint::from_u64(53).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(wrong_d.validate(), Err(Error::InvalidExponent));
    }

    #[test]
    fn test_check_public() {
        let zero = PublicComponents::from_modulus(&[0u8; 8], 65537);
        assert_eq!(check_public(&zero), Err(Error::InvalidModulus));

        let even_exp = PublicComponents::from_modulus(&[0xff; 8], 65536);
        assert_eq!(check_public(&even_exp), Err(Error::InvalidExponent));

        let tiny_exp = PublicComponents::from_modulus(&[0xff; 8], 1);
        assert_eq!(check_public(&tiny_exp), Err(Error::PublicExponentTooSmall));

        let ok = PublicComponents::from_modulus(&[0xff; 8], 65537);
        assert_eq!(check_public(&ok), Ok(()));
        assert_eq!(check_parameters(&ok, 64, 65537), Ok(()));
        assert_eq!(check_parameters(&ok, 128, 65537), Err(Error::InvalidModulus));
        assert_eq!(check_parameters(&ok, 64, 3), Err(Error::InvalidExponent));
    }
}

//! Generate prime components for the RSA Private Key

use alloc::vec::Vec;
use num_bigint::{BigUint, IntoBigUint, ModInverse, RandPrime};
use num_traits::One;
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};
use crate::keyparts::PrivateComponents;

/// Number of primes in every generated key.
const NPRIMES: usize = 2;

/// Generates a two-prime RSA keypair of exactly `bit_size` bits with public
/// exponent `exp`, drawing candidate primes from `rng`.
///
/// The search restarts whenever the primes collide, the product misses the
/// requested size, or `exp` is not invertible modulo the totient.
pub(crate) fn generate_key_with_exp<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: u32,
) -> Result<(PrivateComponents, usize)> {
    if exp < 3 {
        return Err(Error::PublicExponentTooSmall);
    }
    if exp % 2 == 0 {
        return Err(Error::InvalidExponent);
    }
    // The modulus has its top bit set, so an exponent with fewer bits than
    // the modulus is always smaller than it.
    if (u32::BITS - exp.leading_zeros()) as usize >= bit_size {
        return Err(Error::PublicExponentTooLarge);
    }

    if bit_size < 64 {
        let prime_limit = (1u64 << (bit_size / NPRIMES) as u64) as f64;

        // pi approximates the number of primes less than prime_limit

        // Calculate `log(prime_limit)` as `log(x) = log2(x) / log2(e) = log2(x) * log(2)`.
        let mut pi = prime_limit / ((bit_size / NPRIMES) as f64 * core::f64::consts::LN_2 - 1.);

        // Generated primes start with 0b11, so we can only use a quarter of them.
        pi /= 4f64;
        // Use a factor of two to ensure that key generation terminates in a
        // reasonable amount of time.
        pi /= 2f64;

        if pi < NPRIMES as f64 {
            return Err(Error::TooFewPrimes);
        }
    }

    let exp = BigUint::from(exp);
    let mut attempts = 0usize;

    loop {
        attempts += 1;

        // `gen_prime` sets the top two bits in each prime, so the product
        // normally lands on exactly `bit_size` bits.
        let mut todo = bit_size;
        let mut primes: Vec<BigUint> = Vec::with_capacity(NPRIMES);
        for i in 0..NPRIMES {
            let prime = rng.gen_prime(todo / (NPRIMES - i));
            todo -= prime.bits();
            primes.push(prime);
        }

        if primes[0] == primes[1] {
            continue;
        }

        let n = &primes[0] * &primes[1];
        if n.bits() != bit_size {
            continue;
        }

        let totient = (&primes[0] - BigUint::one()) * (&primes[1] - BigUint::one());
        let d = match exp.clone().mod_inverse(&totient).and_then(|d| d.into_biguint()) {
            Some(d) => d,
            None => continue,
        };

        let components = PrivateComponents::new(n, exp, d, primes)?;
        return Ok((components, attempts));
    }
}

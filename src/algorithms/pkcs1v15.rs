//! PKCS#1 v1.5 support as described in [RFC8017 § 8.2] and [RFC8017 § 7.2].
//!
//! Block type 2 pads data for encryption under the public key, block type 1
//! pads data for the private key operation (signatures and recoverable
//! private encryption).
//!
//! [RFC8017 § 8.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.2
//! [RFC8017 § 7.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.2

use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Fills the provided slice with random values, which are guaranteed
/// to not be zero.
#[inline]
fn non_zero_random_bytes<R: CryptoRngCore + ?Sized>(rng: &mut R, data: &mut [u8]) {
    rng.fill_bytes(data);

    for el in data {
        if *el == 0u8 {
            while *el == 0u8 {
                rng.fill_bytes(core::slice::from_mut(el));
            }
        }
    }
}

/// Applied the padding scheme from PKCS#1 v1.5 for encryption.  The message must be no longer than
/// the length of the public modulus minus 11 bytes.
pub(crate) fn pkcs1v15_encrypt_pad<R>(
    rng: &mut R,
    msg: &[u8],
    k: usize,
) -> Result<Zeroizing<Vec<u8>>>
where
    R: CryptoRngCore + ?Sized,
{
    if msg.len() + 11 > k {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x02 || PS || 0x00 || M
    let mut em = Zeroizing::new(vec![0u8; k]);
    em[1] = 2;
    non_zero_random_bytes(rng, &mut em[2..k - msg.len() - 1]);
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Removes the encryption padding scheme from PKCS#1 v1.5.
///
/// Note that whether this function returns an error or not discloses secret
/// information. If an attacker can cause this function to run repeatedly and
/// learn whether each instance returned an error then they can decrypt and
/// forge signatures as if they had the private key.
#[inline]
pub(crate) fn pkcs1v15_encrypt_unpad(em: Vec<u8>, k: usize) -> Result<Vec<u8>> {
    let (valid, out, index) = decrypt_inner(em, k)?;
    if valid == 0 {
        return Err(Error::Decryption);
    }

    Ok(out[index as usize..].to_vec())
}

/// Removes the PKCS1v15 padding It returns one or zero in valid that indicates whether the
/// plaintext was correctly structured. In either case, the plaintext is
/// returned in em so that it may be read independently of whether it was valid
/// in order to maintain constant memory access patterns. If the plaintext was
/// valid then index contains the index of the original message in em.
#[inline]
fn decrypt_inner(em: Vec<u8>, k: usize) -> Result<(u8, Vec<u8>, u32)> {
    if k < 11 || em.len() != k {
        return Err(Error::Decryption);
    }

    let first_byte_is_zero = em[0].ct_eq(&0u8);
    let second_byte_is_two = em[1].ct_eq(&2u8);

    // The remainder of the plaintext must be a string of non-zero random
    // octets, followed by a 0, followed by the message.
    //   looking_for_index: 1 iff we are still looking for the zero.
    //   index: the offset of the first zero byte.
    let mut looking_for_index = 1u8;
    let mut index = 0u32;

    for (i, el) in em.iter().enumerate().skip(2) {
        let equals0 = el.ct_eq(&0u8);
        index.conditional_assign(&(i as u32), Choice::from(looking_for_index) & equals0);
        looking_for_index.conditional_assign(&0u8, equals0);
    }

    // The PS padding must be at least 8 bytes long, and it starts two
    // bytes into em.
    let valid_ps = Choice::from((((2i32 + 8i32 - index as i32 - 1i32) >> 31) & 1) as u8);
    let valid =
        first_byte_is_zero & second_byte_is_two & Choice::from(!looking_for_index & 1) & valid_ps;
    index = u32::conditional_select(&0, &(index + 1), valid);

    Ok((valid.unwrap_u8(), em, index))
}

/// Applies block type 1 padding to `prefix || hashed`.
#[inline]
pub(crate) fn pkcs1v15_sign_pad(prefix: &[u8], hashed: &[u8], k: usize) -> Result<Vec<u8>> {
    let hash_len = hashed.len();
    let t_len = prefix.len() + hashed.len();
    if k < t_len + 11 {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || T
    let mut em = vec![0xff; k];
    em[0] = 0;
    em[1] = 1;
    em[k - t_len - 1] = 0;
    em[k - t_len..k - hash_len].copy_from_slice(prefix);
    em[k - hash_len..k].copy_from_slice(hashed);

    Ok(em)
}

/// Checks that `em` is the block type 1 encoding of `prefix || hashed`.
#[inline]
pub(crate) fn pkcs1v15_sign_unpad(prefix: &[u8], hashed: &[u8], em: &[u8], k: usize) -> Result<()> {
    let hash_len = hashed.len();
    let t_len = prefix.len() + hashed.len();
    if k < t_len + 11 || em.len() != k {
        return Err(Error::Verification);
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || T
    let mut ok = em[0].ct_eq(&0u8);
    ok &= em[1].ct_eq(&1u8);
    ok &= em[k - hash_len..k].ct_eq(hashed);
    ok &= em[k - t_len..k - hash_len].ct_eq(prefix);
    ok &= em[k - t_len - 1].ct_eq(&0u8);

    for el in em.iter().skip(2).take(k - t_len - 3) {
        ok &= el.ct_eq(&0xff)
    }

    if ok.unwrap_u8() != 1 {
        return Err(Error::Verification);
    }

    Ok(())
}

/// Recovers the data carried by a block type 1 encoding.
///
/// The input is the result of a public key operation, so the scan does not
/// need to run in constant time.
#[inline]
pub(crate) fn pkcs1v15_recover_unpad(em: &[u8], k: usize) -> Result<Vec<u8>> {
    if k < 11 || em.len() != k || em[0] != 0 || em[1] != 1 {
        return Err(Error::Decryption);
    }

    let separator = em[2..]
        .iter()
        .position(|el| *el != 0xff)
        .map(|pos| pos + 2)
        .ok_or(Error::Decryption)?;

    // At least 8 bytes of 0xff followed by the 0x00 separator.
    if separator < 10 || em[separator] != 0 {
        return Err(Error::Decryption);
    }

    Ok(em[separator + 1..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    #[test]
    fn test_non_zero_bytes() {
        for _ in 0..10 {
            let mut rng = ChaCha8Rng::from_seed([42; 32]);
            let mut b = vec![0u8; 512];
            non_zero_random_bytes(&mut rng, &mut b);
            for el in &b {
                assert_ne!(*el, 0u8);
            }
        }
    }

    #[test]
    fn test_encrypt_tiny_no_crash() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let k = 8;
        let message = vec![1u8; 4];
        let res = pkcs1v15_encrypt_pad(&mut rng, &message, k);
        assert_eq!(res, Err(Error::MessageTooLong));
    }

    #[test]
    fn test_encrypt_pad_unpad() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let k = 64;
        for len in [0usize, 1, 17, k - 11] {
            let message = vec![0xabu8; len];
            let em = pkcs1v15_encrypt_pad(&mut rng, &message, k).unwrap();
            assert_eq!(&em[..2], &[0, 2]);
            let out = pkcs1v15_encrypt_unpad(em.to_vec(), k).unwrap();
            assert_eq!(out, message);
        }
    }

    #[test]
    fn test_encrypt_unpad_rejects_type_1() {
        let em = pkcs1v15_sign_pad(&[], b"hello", 32).unwrap();
        assert_eq!(pkcs1v15_encrypt_unpad(em, 32), Err(Error::Decryption));
    }

    #[test]
    fn test_sign_pad_layout() {
        let em = pkcs1v15_sign_pad(&hex!("3021"), &hex!("aabb"), 16).unwrap();
        assert_eq!(em, hex!("0001 ffffffffffffffffff 00 3021 aabb").to_vec());
        assert_eq!(pkcs1v15_sign_unpad(&hex!("3021"), &hex!("aabb"), &em, 16), Ok(()));
        assert_eq!(
            pkcs1v15_sign_unpad(&hex!("3021"), &hex!("aabc"), &em, 16),
            Err(Error::Verification)
        );
    }

    #[test]
    fn test_recover_unpad() {
        let em = pkcs1v15_sign_pad(&[], b"recoverable", 32).unwrap();
        assert_eq!(pkcs1v15_recover_unpad(&em, 32).unwrap(), b"recoverable");

        // empty payload
        let em = pkcs1v15_sign_pad(&[], &[], 16).unwrap();
        assert_eq!(pkcs1v15_recover_unpad(&em, 16).unwrap(), Vec::<u8>::new());

        let mut broken = pkcs1v15_sign_pad(&[], b"recoverable", 32).unwrap();
        broken[1] = 2;
        assert_eq!(pkcs1v15_recover_unpad(&broken, 32), Err(Error::Decryption));

        // padding string shorter than eight bytes
        let short = hex!("0001ffffff00414243444546474849");
        assert_eq!(pkcs1v15_recover_unpad(&short, 15), Err(Error::Decryption));
    }
}

//! Digest values fed into signing and verification.

use alloc::vec::Vec;
use const_oid::AssociatedOid;
use core::fmt::{self, Debug, Formatter};
use digest::{Digest, Output};

use crate::errors::{Error, Result};

/// A finished hash of type `D`, ready to be signed or verified.
///
/// The value is opaque to the key types: they only ever pass its bytes and
/// the algorithm's DigestInfo prefix to the provider.
///
/// ```
/// use scrypt_rsa::DigestValue;
/// use sha2::Sha256;
///
/// let digest = DigestValue::<Sha256>::digest(b"hello world");
/// assert_eq!(digest.as_bytes().len(), 32);
/// ```
pub struct DigestValue<D: Digest> {
    output: Output<D>,
}

impl<D: Digest> DigestValue<D> {
    /// Wraps an already computed hash output.
    pub fn new(output: Output<D>) -> Self {
        Self { output }
    }

    /// Hashes `data` in one shot.
    pub fn digest(data: impl AsRef<[u8]>) -> Self {
        Self::new(D::digest(data))
    }

    /// Finishes a running hasher.
    pub fn from_hasher(hasher: D) -> Self {
        Self::new(hasher.finalize())
    }

    /// Wraps a hash received as raw bytes, which must have the output size of `D`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != <D as Digest>::output_size() {
            return Err(Error::InputNotHashed);
        }
        Ok(Self::new(Output::<D>::clone_from_slice(bytes)))
    }

    /// Returns the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }
}

impl<D: Digest> Clone for DigestValue<D> {
    fn clone(&self) -> Self {
        Self::new(self.output.clone())
    }
}

impl<D: Digest> PartialEq for DigestValue<D> {
    fn eq(&self, other: &Self) -> bool {
        self.output == other.output
    }
}

impl<D: Digest> Eq for DigestValue<D> {}

impl<D: Digest> AsRef<[u8]> for DigestValue<D> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<D: Digest> Debug for DigestValue<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("DigestValue(")?;
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        f.write_str(")")
    }
}

/// Returns the ASN.1 DER DigestInfo prefix of the hash algorithm `D`.
///
/// prefix = 0x30 <oid_len + 8 + digest_len> 0x30 <oid_len + 4> 0x06 <oid_len> oid 0x05 0x00 0x04 <digest_len>
pub fn digest_info_prefix<D>() -> Vec<u8>
where
    D: Digest + AssociatedOid,
{
    let oid = D::OID.as_bytes();
    let oid_len = oid.len() as u8;
    let digest_len = <D as Digest>::output_size() as u8;
    let mut v = vec![
        0x30,
        oid_len + 8 + digest_len,
        0x30,
        oid_len + 4,
        0x6,
        oid_len,
    ];
    v.extend_from_slice(oid);
    v.extend_from_slice(&[0x05, 0x00, 0x04, digest_len]);
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use sha1::Sha1;
    use sha2::{Sha256, Sha512};

    #[test]
    fn test_digest_info_prefix() {
        assert_eq!(
            digest_info_prefix::<Sha1>(),
            hex!("3021300906052b0e03021a05000414").to_vec()
        );
        assert_eq!(
            digest_info_prefix::<Sha256>(),
            hex!("3031300d060960864801650304020105000420").to_vec()
        );
        assert_eq!(
            digest_info_prefix::<Sha512>(),
            hex!("3051300d060960864801650304020305000440").to_vec()
        );
    }

    #[test]
    fn test_digest_value() {
        let digest = DigestValue::<Sha1>::digest(b"abc");
        assert_eq!(
            digest.as_bytes(),
            hex!("a9993e364706816aba3e25717850c26c9cd0d89d")
        );

        let mut hasher = Sha1::new();
        hasher.update(b"a");
        hasher.update(b"bc");
        assert_eq!(DigestValue::from_hasher(hasher), digest);

        let copied = DigestValue::<Sha1>::from_slice(digest.as_bytes()).unwrap();
        assert_eq!(copied, digest);

        assert_eq!(
            DigestValue::<Sha1>::from_slice(&[0u8; 32]),
            Err(Error::InputNotHashed)
        );
    }
}

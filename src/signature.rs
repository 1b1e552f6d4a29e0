//! Fixed-size RSA signatures.

use alloc::{boxed::Box, vec::Vec};
use core::fmt::{self, Debug, Display, Formatter, LowerHex, UpperHex};
use subtle::ConstantTimeEq;
#[cfg(feature = "serde")]
use serdect::serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Error, Result};
use crate::stream::{Sink, Source};

/// Number of bytes needed for a `bits`-bit key.
///
/// Evaluated in const context for every key size in use, so an invalid size
/// stops compilation.
pub(crate) const fn byte_len(bits: usize) -> usize {
    assert!(
        bits > 0 && bits % 8 == 0,
        "RSA key size must be a positive multiple of 8 bits"
    );
    bits / 8
}

/// An RSA signature made with a `BITS`-bit key.
///
/// Always exactly `BITS / 8` bytes. Signatures of different sizes are
/// different types and cannot be compared or exchanged:
///
/// ```compile_fail
/// use scrypt_rsa::Signature;
///
/// let short = Signature::<2048>::default();
/// let long = Signature::<4096>::default();
/// assert!(short != long);
/// ```
///
/// A size that is not a whole number of bytes is rejected at compile time:
///
/// ```compile_fail
/// use scrypt_rsa::Signature;
///
/// let odd = Signature::<2047>::default();
/// ```
#[derive(Clone)]
pub struct Signature<const BITS: usize = 2048> {
    data: Box<[u8]>,
}

impl<const BITS: usize> Signature<BITS> {
    /// Size of the signature in bytes.
    pub const SIZE: usize = byte_len(BITS);

    /// Copies a signature out of `bytes`, which must hold exactly
    /// [`Self::SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_vec(bytes.to_vec())
    }

    pub(crate) fn from_vec(data: Vec<u8>) -> Result<Self> {
        if data.len() != Self::SIZE {
            return Err(Error::InvalidLength {
                expected: Self::SIZE,
                actual: data.len(),
            });
        }
        Ok(Self {
            data: data.into_boxed_slice(),
        })
    }

    /// Returns the signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Writes the [`Self::SIZE`] raw signature bytes, without any framing.
    pub fn serialize<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.write(&self.data)
    }

    /// Reads exactly [`Self::SIZE`] raw bytes.
    pub fn deserialize<S: Source + ?Sized>(source: &mut S) -> Result<Self> {
        let mut data = vec![0u8; Self::SIZE].into_boxed_slice();
        source.read(&mut data)?;
        Ok(Self { data })
    }
}

impl<const BITS: usize> Default for Signature<BITS> {
    fn default() -> Self {
        Self {
            data: vec![0u8; Self::SIZE].into_boxed_slice(),
        }
    }
}

impl<const BITS: usize> PartialEq for Signature<BITS> {
    fn eq(&self, other: &Self) -> bool {
        self.data.ct_eq(&other.data).into()
    }
}

impl<const BITS: usize> Eq for Signature<BITS> {}

impl<const BITS: usize> AsRef<[u8]> for Signature<BITS> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<const BITS: usize> TryFrom<&[u8]> for Signature<BITS> {
    type Error = ::signature::Error;

    fn try_from(bytes: &[u8]) -> ::signature::Result<Self> {
        Ok(Self::from_bytes(bytes)?)
    }
}

impl<const BITS: usize> From<Signature<BITS>> for Box<[u8]> {
    fn from(signature: Signature<BITS>) -> Box<[u8]> {
        signature.data
    }
}

impl<const BITS: usize> ::signature::SignatureEncoding for Signature<BITS> {
    type Repr = Box<[u8]>;
}

/// Renders each byte as two hex digits, separated by a space.
impl<const BITS: usize> Display for Signature<BITS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl<const BITS: usize> Debug for Signature<BITS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature")
            .field(&format_args!("{}", self))
            .finish()
    }
}

impl<const BITS: usize> LowerHex for Signature<BITS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.data.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl<const BITS: usize> UpperHex for Signature<BITS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.data.iter() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<const BITS: usize> Serialize for Signature<BITS> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serdect::slice::serialize_hex_lower_or_bin(&self.data, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const BITS: usize> Deserialize<'de> for Signature<BITS> {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::from_vec(bytes).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::signature::SignatureEncoding;
    use hex_literal::hex;

    #[test]
    fn test_size() {
        assert_eq!(Signature::<2048>::SIZE, 256);
        assert_eq!(Signature::<4096>::SIZE, 512);
        assert_eq!(Signature::<64>::default().as_bytes(), &[0u8; 8]);
    }

    #[test]
    fn test_display() {
        let sig = Signature::<32>::from_bytes(&hex!("0a ff 00 7b")).unwrap();
        assert_eq!(sig.to_string(), "0a ff 00 7b");
        assert_eq!(format!("{:x}", sig), "0aff007b");
        assert_eq!(format!("{:X}", sig), "0AFF007B");
        assert_eq!(format!("{:?}", sig), "Signature(0a ff 00 7b)");
    }

    #[test]
    fn test_equality() {
        let a = Signature::<32>::from_bytes(&[1, 2, 3, 4]).unwrap();
        let b = Signature::<32>::from_bytes(&[1, 2, 3, 4]).unwrap();
        let c = Signature::<32>::from_bytes(&[1, 2, 3, 5]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            Signature::<32>::from_bytes(&[1, 2, 3]),
            Err(Error::InvalidLength {
                expected: 4,
                actual: 3
            })
        );
        assert!(Signature::<32>::try_from(&[0u8; 5][..]).is_err());
    }

    #[test]
    fn test_serialize_is_raw() {
        let sig = Signature::<64>::from_bytes(&hex!("0102030405060708")).unwrap();
        let mut out = Vec::new();
        sig.serialize(&mut out).unwrap();
        assert_eq!(out, hex!("0102030405060708"));

        let mut input: &[u8] = &out;
        let decoded = Signature::<64>::deserialize(&mut input).unwrap();
        assert_eq!(decoded, sig);
        assert!(input.is_empty());
    }

    #[test]
    fn test_deserialize_truncated() {
        let mut input: &[u8] = &[0u8; 7];
        assert_eq!(
            Signature::<64>::deserialize(&mut input),
            Err(Error::TruncatedInput)
        );
    }

    #[test]
    fn test_signature_encoding() {
        let sig = Signature::<32>::from_bytes(&[9, 8, 7, 6]).unwrap();
        assert_eq!(sig.to_bytes().as_ref(), &[9, 8, 7, 6]);
        assert_eq!(sig.encoded_len(), 4);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde() {
        use serde_test::{assert_de_tokens_error, assert_tokens, Configure, Token};

        let sig = Signature::<32>::from_bytes(&hex!("deadbeef")).unwrap();
        assert_tokens(&sig.clone().readable(), &[Token::Str("deadbeef")]);
        assert_tokens(&sig.compact(), &[Token::Bytes(&hex!("deadbeef"))]);

        assert_de_tokens_error::<serde_test::Readable<Signature<32>>>(
            &[Token::Str("dead")],
            "invalid length: expected 4 bytes, got 2",
        );
    }
}

//! Error types.

/// Alias for [`core::result::Result`] with the `scrypt-rsa` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Decryption error.
    Decryption,

    /// Verification error.
    Verification,

    /// Message too long.
    MessageTooLong,

    /// Input must be hashed.
    InputNotHashed,

    /// Too few primes of a given length to generate an RSA key.
    TooFewPrimes,

    /// Invalid prime value.
    InvalidPrime,

    /// Invalid modulus.
    InvalidModulus,

    /// Invalid exponent.
    InvalidExponent,

    /// Invalid coefficient.
    InvalidCoefficient,

    /// Public exponent too small.
    PublicExponentTooSmall,

    /// Public exponent too large.
    PublicExponentTooLarge,

    /// Invalid padding length.
    InvalidPadLen,

    /// A byte slice did not have the length required by the target type.
    InvalidLength {
        /// Length required by the type.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Private key material does not fit the 16-bit length header.
    PrivateKeyTooLarge,

    /// The source ran out of bytes before a value was complete.
    TruncatedInput,

    /// PKCS#1 encoding of the private key material failed.
    Pkcs1(pkcs1::Error),

    /// Writing to a sink or reading from a source failed.
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),

    /// Internal error.
    Internal,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Decryption => write!(f, "decryption error"),
            Error::Verification => write!(f, "verification error"),
            Error::MessageTooLong => write!(f, "message too long"),
            Error::InputNotHashed => write!(f, "input must be hashed"),
            Error::TooFewPrimes => {
                write!(f, "too few primes of given length to generate an RSA key")
            }
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidExponent => write!(f, "invalid exponent"),
            Error::InvalidCoefficient => write!(f, "invalid coefficient"),
            Error::PublicExponentTooSmall => write!(f, "public exponent too small"),
            Error::PublicExponentTooLarge => write!(f, "public exponent too large"),
            Error::InvalidPadLen => write!(f, "invalid padding length"),
            Error::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected} bytes, got {actual}")
            }
            Error::PrivateKeyTooLarge => {
                write!(f, "private key material exceeds 65535 bytes")
            }
            Error::TruncatedInput => write!(f, "input ended before value was complete"),
            Error::Pkcs1(err) => write!(f, "{}", err),
            #[cfg(feature = "std")]
            Error::Io(kind) => write!(f, "i/o error: {kind}"),
            Error::Internal => write!(f, "internal error"),
        }
    }
}

impl From<pkcs1::Error> for Error {
    fn from(err: pkcs1::Error) -> Error {
        Error::Pkcs1(err)
    }
}

impl From<pkcs1::der::Error> for Error {
    fn from(err: pkcs1::der::Error) -> Error {
        Error::Pkcs1(err.into())
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::TruncatedInput,
            kind => Error::Io(kind),
        }
    }
}

#[cfg(feature = "std")]
impl From<Error> for signature::Error {
    fn from(err: Error) -> Self {
        Self::from_source(err)
    }
}

#[cfg(not(feature = "std"))]
impl From<Error> for signature::Error {
    fn from(_err: Error) -> Self {
        Self::new()
    }
}

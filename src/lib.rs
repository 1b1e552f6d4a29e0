#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Keys and signatures
//!
//! Key size and public exponent are type parameters. A [`PublicKey<2048>`]
//! always holds a 256-byte modulus, and its signatures are [`Signature<2048>`]
//! values of exactly 256 bytes. Mixing sizes is a type error.
//!
//! ## Signing a digest
//!
#![cfg_attr(feature = "sha2", doc = "```")]
#![cfg_attr(not(feature = "sha2"), doc = "```ignore")]
//! use scrypt_rsa::{generate_keys, DigestValue, PrivateKey, PublicKey, sha2::Sha256};
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//!
//! let (public_key, private_key): (PublicKey<2048>, PrivateKey<2048>) =
//!     generate_keys(&mut rng).expect("failed to generate a key");
//!
//! let digest = DigestValue::<Sha256>::digest(b"hello world");
//! let signature = private_key.sign(&digest).expect("failed to sign");
//! assert!(public_key.verify(&digest, &signature));
//!
//! let other = DigestValue::<Sha256>::digest(b"goodbye world");
//! assert!(!public_key.verify(&other, &signature));
//! ```
//!
//! ## Encryption
//!
//! Both directions are available. Data encrypted with the public key is
//! read with the private key, and data encrypted with the private key is
//! read with the public key.
//!
//! ```
//! use scrypt_rsa::{generate_keys, PrivateKey, PublicKey};
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//!
//! let (public_key, private_key): (PublicKey<1024>, PrivateKey<1024>) =
//!     generate_keys(&mut rng).expect("failed to generate a key");
//!
//! let data = b"hello world";
//! let enc_data = public_key.encrypt(&mut rng, &data[..]).expect("failed to encrypt");
//! assert_ne!(&data[..], &enc_data[..]);
//! let dec_data = private_key.decrypt(&enc_data).expect("failed to decrypt");
//! assert_eq!(&data[..], &dec_data[..]);
//!
//! let enc_data = private_key.encrypt(&data[..]).expect("failed to encrypt");
//! let dec_data = public_key.decrypt(&enc_data).expect("failed to decrypt");
//! assert_eq!(&data[..], &dec_data[..]);
//! ```
//!
//! ## Binary serialization
//!
//! ```
//! use scrypt_rsa::{generate_keys, PrivateKey, PublicKey};
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//! let (public_key, private_key): (PublicKey<1024>, PrivateKey<1024>) =
//!     generate_keys(&mut rng).expect("failed to generate a key");
//!
//! let mut out = Vec::new();
//! public_key.serialize(&mut out).unwrap();
//! private_key.serialize(&mut out).unwrap();
//!
//! let mut input = &out[..];
//! let public_copy = PublicKey::<1024>::deserialize(&mut input).unwrap();
//! let private_copy = PrivateKey::<1024>::deserialize(&mut input).unwrap();
//! assert_eq!(public_copy, public_key);
//! assert_eq!(private_copy.as_bytes(), private_key.as_bytes());
//! ```

#[cfg(doctest)]
pub struct ReadmeDoctests;

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use digest;
pub use rand_core;

mod algorithms;
pub mod errors;
mod hash;
mod key;
pub mod provider;
mod signature;
pub mod stream;

mod dummy_rng;
mod encoding;
mod keyparts;

#[cfg(feature = "sha1")]
pub use sha1;
#[cfg(feature = "sha2")]
pub use sha2;

pub use crate::{
    errors::{Error, Result},
    hash::{digest_info_prefix, DigestValue},
    key::{generate_keys, PrivateKey, PublicKey},
    signature::Signature,
    stream::{Sink, Source},
};

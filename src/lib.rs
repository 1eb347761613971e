//! Credential hashing and signatures behind uniform interfaces.
//!
//! Password hashes (Argon2id, scrypt) are self-describing strings that carry
//! their parameters and salt. HMAC and RSA (PKCS#1 v1.5 and PSS, over
//! PKCS#1, PKCS#8 and PKIX keys) signers share the [`Signer`] and
//! [`Verifier`] traits with the password hashers.

pub mod coder;
pub mod crypto;
pub mod error;
pub mod format;
pub mod password;
pub mod rsa;
pub mod signature;

pub use crate::coder::Coder;
pub use crate::crypto::{Argon2Config, HashAlgorithm, ScryptParams, constant_time_eq};
pub use crate::error::{CoderError, Error, Result};
pub use crate::format::{Argon2idHash, HashKind, ScryptHash};
pub use crate::password::{Argon2id, Scrypt};
pub use crate::rsa::{KeyPairGenerator, PrivateKeyFormat, PublicKeyFormat, SignScheme};
pub use crate::signature::{
    HS256, HS512, HmacSigner, PS256, PS512, RS256, RS512, RsaScheme, RsaSigner, RsaVerifier, Signer,
    Verifier,
};

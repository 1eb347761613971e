//! RSA keys, their PEM encodings and signature paddings.

pub mod format;
pub mod generator;
pub mod scheme;

pub use self::format::{PrivateKeyFormat, PublicKeyFormat};
pub use self::generator::{KeyPairGenerator, PemKeyPair};
pub use self::scheme::{PssOptions, SignScheme};
pub use ::rsa::{RsaPrivateKey, RsaPublicKey};

use crate::crypto::HashAlgorithm;
use crate::error::Result;

/// Hashes `message` with `hash` and signs the digest.
pub fn sign(
    hash: HashAlgorithm,
    scheme: &SignScheme,
    key: &RsaPrivateKey,
    message: &[u8],
) -> Result<Vec<u8>> {
    scheme.sign(hash, key, &hash.digest(message))
}

/// Hashes `message` with `hash` and checks `signature` over the digest.
pub fn verify(
    hash: HashAlgorithm,
    scheme: &SignScheme,
    key: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<()> {
    scheme.verify(hash, key, &hash.digest(message), signature)
}

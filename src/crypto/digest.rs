use std::fmt;

use rsa::{Pkcs1v15Sign, Pss};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

/// Hash functions the signers can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Digest size in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    pub(crate) fn pkcs1v15(&self) -> Pkcs1v15Sign {
        match self {
            HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
            HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        }
    }

    pub(crate) fn pss(&self, salt_len: usize) -> Pss {
        match self {
            HashAlgorithm::Sha256 => Pss::new_with_salt::<Sha256>(salt_len),
            HashAlgorithm::Sha512 => Pss::new_with_salt::<Sha512>(salt_len),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_output_len() {
        for hash in [HashAlgorithm::Sha256, HashAlgorithm::Sha512] {
            assert_eq!(hash.digest(b"message").len(), hash.output_len());
        }
    }

    #[test]
    fn sha256_known_digest() {
        assert_eq!(
            hex::encode(HashAlgorithm::Sha256.digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

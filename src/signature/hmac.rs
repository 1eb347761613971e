use std::fmt;

use zeroize::Zeroizing;

use super::{Signer, Verifier};
use crate::coder::Coder;
use crate::crypto::{HashAlgorithm, hmac};
use crate::error::{Error, Result};

/// Name and hash of an HMAC algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HmacScheme {
    pub name: &'static str,
    pub hash: HashAlgorithm,
}

pub const HS256: HmacScheme = HmacScheme {
    name: "HS256",
    hash: HashAlgorithm::Sha256,
};

pub const HS512: HmacScheme = HmacScheme {
    name: "HS512",
    hash: HashAlgorithm::Sha512,
};

/// HMAC signer and verifier over a shared secret.
pub struct HmacSigner {
    scheme: HmacScheme,
    key: Zeroizing<Vec<u8>>,
    msg_coder: Coder,
    sig_coder: Coder,
}

impl HmacSigner {
    /// Fails with [`Error::UnsupportedCoder`] when `sig_coder` cannot carry
    /// raw MAC bytes.
    pub fn new(scheme: HmacScheme, key: &[u8], msg_coder: Coder, sig_coder: Coder) -> Result<Self> {
        Ok(Self {
            scheme,
            key: Zeroizing::new(key.to_vec()),
            msg_coder,
            sig_coder: sig_coder.require_binary_safe("signatures")?,
        })
    }

    pub fn scheme(&self) -> HmacScheme {
        self.scheme
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("scheme", &self.scheme)
            .field("msg_coder", &self.msg_coder)
            .field("sig_coder", &self.sig_coder)
            .finish_non_exhaustive()
    }
}

impl Signer for HmacSigner {
    fn algo(&self) -> &'static str {
        self.scheme.name
    }

    fn sign(&self, message: &str) -> Result<String> {
        let message = self
            .msg_coder
            .decode(message)
            .map_err(|e| Error::decode("message", e))?;
        let mac = hmac::sign(self.scheme.hash, &self.key, &message)?;
        Ok(self.sig_coder.encode(&mac))
    }
}

impl Verifier for HmacSigner {
    fn algo(&self) -> &'static str {
        self.scheme.name
    }

    fn verify(&self, message: &str, signature: &str) -> Result<()> {
        let message = self
            .msg_coder
            .decode(message)
            .map_err(|e| Error::decode("message", e))?;
        let signature = self
            .sig_coder
            .decode(signature)
            .map_err(|e| Error::decode("signature", e))?;

        hmac::verify(self.scheme.hash, &self.key, &message, &signature)
            .map_err(|e| Error::Verification(Box::new(e)))
    }
}

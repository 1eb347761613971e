use std::fmt;

use super::{Signer, Verifier};
use crate::coder::Coder;
use crate::crypto::HashAlgorithm;
use crate::error::{Error, Result};
use crate::rsa::{
    self as rsa_sig, PrivateKeyFormat, PssOptions, PublicKeyFormat, RsaPrivateKey, RsaPublicKey,
    SignScheme,
};

/// Name, hash and padding of an RSA algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaScheme {
    pub name: &'static str,
    pub hash: HashAlgorithm,
    pub sign_scheme: SignScheme,
}

pub const RS256: RsaScheme = RsaScheme {
    name: "RS256",
    hash: HashAlgorithm::Sha256,
    sign_scheme: SignScheme::Pkcs1v15,
};

pub const RS512: RsaScheme = RsaScheme {
    name: "RS512",
    hash: HashAlgorithm::Sha512,
    sign_scheme: SignScheme::Pkcs1v15,
};

pub const PS256: RsaScheme = RsaScheme {
    name: "PS256",
    hash: HashAlgorithm::Sha256,
    sign_scheme: SignScheme::Pss(PssOptions { salt_len: None }),
};

pub const PS512: RsaScheme = RsaScheme {
    name: "PS512",
    hash: HashAlgorithm::Sha512,
    sign_scheme: SignScheme::Pss(PssOptions { salt_len: None }),
};

impl RsaScheme {
    /// Looks up one of the built-in schemes by name, ignoring case.
    pub fn by_name(name: &str) -> Option<RsaScheme> {
        [RS256, RS512, PS256, PS512]
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// Signs with an RSA private key.
pub struct RsaSigner {
    scheme: RsaScheme,
    key: RsaPrivateKey,
    msg_coder: Coder,
    sig_coder: Coder,
}

impl RsaSigner {
    /// Fails with [`Error::UnsupportedCoder`] when `sig_coder` cannot carry
    /// raw signature bytes.
    pub fn new(
        scheme: RsaScheme,
        key: RsaPrivateKey,
        msg_coder: Coder,
        sig_coder: Coder,
    ) -> Result<Self> {
        Ok(Self {
            scheme,
            key,
            msg_coder,
            sig_coder: sig_coder.require_binary_safe("signatures")?,
        })
    }

    pub fn from_pem(
        scheme: RsaScheme,
        format: PrivateKeyFormat,
        pem: &str,
        msg_coder: Coder,
        sig_coder: Coder,
    ) -> Result<Self> {
        Self::new(scheme, format.parse(pem)?, msg_coder, sig_coder)
    }

    /// A verifier for this signer's public half, with the same coders.
    pub fn verifier(&self) -> RsaVerifier {
        RsaVerifier {
            scheme: self.scheme,
            key: self.key.to_public_key(),
            msg_coder: self.msg_coder,
            sig_coder: self.sig_coder,
        }
    }

    pub fn scheme(&self) -> RsaScheme {
        self.scheme
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("scheme", &self.scheme)
            .field("msg_coder", &self.msg_coder)
            .field("sig_coder", &self.sig_coder)
            .finish_non_exhaustive()
    }
}

impl Signer for RsaSigner {
    fn algo(&self) -> &'static str {
        self.scheme.name
    }

    fn sign(&self, message: &str) -> Result<String> {
        let message = self
            .msg_coder
            .decode(message)
            .map_err(|e| Error::decode("message", e))?;
        let signature = rsa_sig::sign(
            self.scheme.hash,
            &self.scheme.sign_scheme,
            &self.key,
            &message,
        )?;
        Ok(self.sig_coder.encode(&signature))
    }
}

/// Checks signatures with an RSA public key.
#[derive(Debug, Clone)]
pub struct RsaVerifier {
    scheme: RsaScheme,
    key: RsaPublicKey,
    msg_coder: Coder,
    sig_coder: Coder,
}

impl RsaVerifier {
    pub fn new(
        scheme: RsaScheme,
        key: RsaPublicKey,
        msg_coder: Coder,
        sig_coder: Coder,
    ) -> Result<Self> {
        Ok(Self {
            scheme,
            key,
            msg_coder,
            sig_coder: sig_coder.require_binary_safe("signatures")?,
        })
    }

    pub fn from_pem(
        scheme: RsaScheme,
        format: PublicKeyFormat,
        pem: &str,
        msg_coder: Coder,
        sig_coder: Coder,
    ) -> Result<Self> {
        Self::new(scheme, format.parse(pem)?, msg_coder, sig_coder)
    }

    pub fn scheme(&self) -> RsaScheme {
        self.scheme
    }
}

impl Verifier for RsaVerifier {
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

        rsa_sig::verify(
            self.scheme.hash,
            &self.scheme.sign_scheme,
            &self.key,
            &message,
            &signature,
        )
        .map_err(|e| Error::Verification(Box::new(e)))
    }
}

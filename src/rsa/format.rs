//! PEM encodings of RSA keys.
//!
//! Output always uses the `RSA PRIVATE KEY` / `RSA PUBLIC KEY` labels,
//! whatever the DER container inside. Parsing ignores the label and trusts
//! the chosen format to tell what the payload is.

use std::fmt;
use std::str::FromStr;

use ::rsa::pkcs1::{
    DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey,
};
use ::rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use ::rsa::{RsaPrivateKey, RsaPublicKey};
use pem_rfc7468::LineEnding;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

pub const PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
pub const PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// Container for an exported private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateKeyFormat {
    /// `RSAPrivateKey` from RFC 8017.
    Pkcs1,
    /// `PrivateKeyInfo` from RFC 5208.
    Pkcs8,
}

/// Container for an exported public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyFormat {
    /// `RSAPublicKey` from RFC 8017.
    Pkcs1,
    /// `SubjectPublicKeyInfo` from RFC 5280.
    Pkix,
}

impl PrivateKeyFormat {
    pub fn name(&self) -> &'static str {
        match self {
            PrivateKeyFormat::Pkcs1 => "pkcs1",
            PrivateKeyFormat::Pkcs8 => "pkcs8",
        }
    }

    fn what(&self) -> &'static str {
        match self {
            PrivateKeyFormat::Pkcs1 => "pkcs1 private key",
            PrivateKeyFormat::Pkcs8 => "pkcs8 private key",
        }
    }

    pub fn marshal(&self, key: &RsaPrivateKey) -> Result<Zeroizing<String>> {
        let der = match self {
            PrivateKeyFormat::Pkcs1 => key.to_pkcs1_der().map_err(|e| self.marshal_error(e))?,
            PrivateKeyFormat::Pkcs8 => key.to_pkcs8_der().map_err(|e| self.marshal_error(e))?,
        };
        let pem = pem_rfc7468::encode_string(PRIVATE_KEY_LABEL, LineEnding::LF, der.as_bytes())
            .map_err(|e| self.marshal_error(e))?;
        Ok(Zeroizing::new(pem))
    }

    pub fn parse(&self, pem: &str) -> Result<RsaPrivateKey> {
        let der = decode_pem(pem, self.what())?;
        match self {
            PrivateKeyFormat::Pkcs1 => RsaPrivateKey::from_pkcs1_der(&der).map_err(|e| self.parse_error(e)),
            PrivateKeyFormat::Pkcs8 => RsaPrivateKey::from_pkcs8_der(&der).map_err(|e| self.parse_error(e)),
        }
    }

    fn marshal_error(&self, e: impl fmt::Display) -> Error {
        Error::KeyMarshal {
            format: self.what(),
            reason: e.to_string(),
        }
    }

    fn parse_error(&self, e: impl fmt::Display) -> Error {
        debug!(format = self.name(), "private key payload rejected");
        Error::KeyParse {
            format: self.what(),
            reason: e.to_string(),
        }
    }
}

impl PublicKeyFormat {
    pub fn name(&self) -> &'static str {
        match self {
            PublicKeyFormat::Pkcs1 => "pkcs1",
            PublicKeyFormat::Pkix => "pkix",
        }
    }

    fn what(&self) -> &'static str {
        match self {
            PublicKeyFormat::Pkcs1 => "pkcs1 public key",
            PublicKeyFormat::Pkix => "pkix public key",
        }
    }

    pub fn marshal(&self, key: &RsaPublicKey) -> Result<String> {
        let der = match self {
            PublicKeyFormat::Pkcs1 => key.to_pkcs1_der().map_err(|e| self.marshal_error(e))?,
            PublicKeyFormat::Pkix => key.to_public_key_der().map_err(|e| self.marshal_error(e))?,
        };
        pem_rfc7468::encode_string(PUBLIC_KEY_LABEL, LineEnding::LF, der.as_bytes())
            .map_err(|e| self.marshal_error(e))
    }

    pub fn parse(&self, pem: &str) -> Result<RsaPublicKey> {
        let der = decode_pem(pem, self.what())?;
        match self {
            PublicKeyFormat::Pkcs1 => RsaPublicKey::from_pkcs1_der(&der).map_err(|e| self.parse_error(e)),
            PublicKeyFormat::Pkix => RsaPublicKey::from_public_key_der(&der).map_err(|e| self.parse_error(e)),
        }
    }

    fn marshal_error(&self, e: impl fmt::Display) -> Error {
        Error::KeyMarshal {
            format: self.what(),
            reason: e.to_string(),
        }
    }

    fn parse_error(&self, e: impl fmt::Display) -> Error {
        debug!(format = self.name(), "public key payload rejected");
        Error::KeyParse {
            format: self.what(),
            reason: e.to_string(),
        }
    }
}

/// Extracts the DER payload of a single PEM block with a non-empty label.
fn decode_pem(pem: &str, what: &'static str) -> Result<Zeroizing<Vec<u8>>> {
    let (label, der) = pem_rfc7468::decode_vec(pem.trim().as_bytes()).map_err(|e| {
        debug!(error = %e, "pem envelope rejected");
        Error::PemDecode { format: what }
    })?;
    let der = Zeroizing::new(der);
    if label.is_empty() {
        return Err(Error::PemDecode { format: what });
    }
    Ok(der)
}

impl fmt::Display for PrivateKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PublicKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrivateKeyFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pkcs1" => Ok(PrivateKeyFormat::Pkcs1),
            "pkcs8" => Ok(PrivateKeyFormat::Pkcs8),
            other => Err(format!("unknown private key format '{other}' (expected pkcs1 or pkcs8)")),
        }
    }
}

impl FromStr for PublicKeyFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pkcs1" => Ok(PublicKeyFormat::Pkcs1),
            "pkix" | "spki" => Ok(PublicKeyFormat::Pkix),
            other => Err(format!("unknown public key format '{other}' (expected pkcs1 or pkix)")),
        }
    }
}

use ::rsa::RsaPrivateKey;
use rand::rngs::OsRng;
use tracing::debug;
use zeroize::Zeroizing;

use super::format::{PrivateKeyFormat, PublicKeyFormat};
use crate::error::{Error, Result};

/// Default modulus size in bits.
pub const DEFAULT_BITS: usize = 2048;

/// An exported key pair.
pub struct PemKeyPair {
    pub private_pem: Zeroizing<String>,
    pub public_pem: String,
}

/// Generates RSA key pairs and exports each half in its own container.
///
/// Any pairing of private and public format is valid; the presets cover the
/// common ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPairGenerator {
    private: PrivateKeyFormat,
    public: PublicKeyFormat,
    bits: usize,
}

impl KeyPairGenerator {
    pub const fn new(private: PrivateKeyFormat, public: PublicKeyFormat) -> Self {
        Self {
            private,
            public,
            bits: DEFAULT_BITS,
        }
    }

    pub const fn pkcs1() -> Self {
        Self::new(PrivateKeyFormat::Pkcs1, PublicKeyFormat::Pkcs1)
    }

    pub const fn pkcs1_pkix() -> Self {
        Self::new(PrivateKeyFormat::Pkcs1, PublicKeyFormat::Pkix)
    }

    pub const fn pkcs8_pkcs1() -> Self {
        Self::new(PrivateKeyFormat::Pkcs8, PublicKeyFormat::Pkcs1)
    }

    pub const fn pkcs8_pkix() -> Self {
        Self::new(PrivateKeyFormat::Pkcs8, PublicKeyFormat::Pkix)
    }

    pub const fn with_bits(self, bits: usize) -> Self {
        Self { bits, ..self }
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn private_format(&self) -> PrivateKeyFormat {
        self.private
    }

    pub fn public_format(&self) -> PublicKeyFormat {
        self.public
    }

    pub fn generate(&self) -> Result<PemKeyPair> {
        let key = RsaPrivateKey::new(&mut OsRng, self.bits)
            .map_err(|e| Error::KeyGeneration(e.to_string()))?;
        key.validate()
            .map_err(|e| Error::KeyGeneration(e.to_string()))?;

        let private_pem = self.private.marshal(&key)?;
        let public_pem = self.public.marshal(&key.to_public_key())?;

        debug!(
            bits = self.bits,
            private = self.private.name(),
            public = self.public.name(),
            "rsa key pair generated"
        );

        Ok(PemKeyPair {
            private_pem,
            public_pem,
        })
    }
}

impl Default for KeyPairGenerator {
    fn default() -> Self {
        Self::pkcs1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::HashAlgorithm;
    use crate::rsa::{SignScheme, sign, verify};

    #[test]
    fn presets_round_trip() {
        for generator in [
            KeyPairGenerator::pkcs1(),
            KeyPairGenerator::pkcs1_pkix(),
            KeyPairGenerator::pkcs8_pkcs1(),
            KeyPairGenerator::pkcs8_pkix(),
        ] {
            let generator = generator.with_bits(1024);
            let pair = generator.generate().unwrap();

            let private = generator.private_format().parse(&pair.private_pem).unwrap();
            let public = generator.public_format().parse(&pair.public_pem).unwrap();
            assert_eq!(private.to_public_key(), public);

            let sig = sign(HashAlgorithm::Sha256, &SignScheme::Pkcs1v15, &private, b"hi").unwrap();
            verify(HashAlgorithm::Sha256, &SignScheme::Pkcs1v15, &public, b"hi", &sig).unwrap();
        }
    }

    #[test]
    fn default_is_2048_bit_pkcs1() {
        let generator = KeyPairGenerator::default();
        assert_eq!(generator.bits(), 2048);
        assert_eq!(generator.private_format(), PrivateKeyFormat::Pkcs1);
        assert_eq!(generator.public_format(), PublicKeyFormat::Pkcs1);
    }

    #[test]
    fn private_pem_rejects_other_parser() {
        let generator = KeyPairGenerator::pkcs8_pkix().with_bits(1024);
        let pair = generator.generate().unwrap();
        assert!(matches!(
            PrivateKeyFormat::Pkcs1.parse(&pair.private_pem),
            Err(Error::KeyParse { .. })
        ));
    }
}

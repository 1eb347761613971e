use ::rsa::traits::PublicKeyParts;
use ::rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use rand::rngs::OsRng;
use tracing::debug;

use crate::crypto::HashAlgorithm;
use crate::error::{Error, Result};

/// Salt handling for PSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PssOptions {
    /// Fixed salt length in bytes. `None` signs with a digest-length salt
    /// and lets verification recover the length.
    pub salt_len: Option<usize>,
}

/// RSA signature padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignScheme {
    /// Deterministic PKCS#1 v1.5.
    Pkcs1v15,
    /// Randomized PSS.
    Pss(PssOptions),
}

impl SignScheme {
    pub const PSS: SignScheme = SignScheme::Pss(PssOptions { salt_len: None });

    pub fn name(&self) -> &'static str {
        match self {
            SignScheme::Pkcs1v15 => "PKCS1v15",
            SignScheme::Pss(_) => "PSS",
        }
    }

    /// Signs an already hashed `digest`.
    pub fn sign(&self, hash: HashAlgorithm, key: &RsaPrivateKey, digest: &[u8]) -> Result<Vec<u8>> {
        let signature = match self {
            SignScheme::Pkcs1v15 => key.sign_with_rng(&mut OsRng, hash.pkcs1v15(), digest),
            SignScheme::Pss(opts) => {
                let salt_len = opts.salt_len.unwrap_or(hash.output_len());
                key.sign_with_rng(&mut OsRng, hash.pss(salt_len), digest)
            }
        };
        signature.map_err(|e| Error::Sign(e.to_string()))
    }

    /// Checks `signature` over an already hashed `digest`.
    pub fn verify(
        &self,
        hash: HashAlgorithm,
        key: &RsaPublicKey,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<()> {
        let verified = match self {
            SignScheme::Pkcs1v15 => key.verify(hash.pkcs1v15(), digest, signature).is_ok(),
            SignScheme::Pss(PssOptions { salt_len: Some(len) }) => {
                key.verify(hash.pss(*len), digest, signature).is_ok()
            }
            SignScheme::Pss(PssOptions { salt_len: None }) => {
                recover_pss_salt_len(hash, key, signature)
                    .is_some_and(|len| key.verify(hash.pss(len), digest, signature).is_ok())
            }
        };

        if !verified {
            debug!(scheme = self.name(), hash = hash.name(), "rsa signature rejected");
            return Err(Error::InvalidSignature);
        }
        Ok(())
    }
}

/// Reads the salt length out of a PSS encoded message (RFC 8017 9.1.2).
///
/// Only the layout is checked here; the digest comparison is left to the
/// verifier, which is then given the recovered length.
fn recover_pss_salt_len(hash: HashAlgorithm, key: &RsaPublicKey, signature: &[u8]) -> Option<usize> {
    if signature.len() != key.size() {
        return None;
    }
    let s = BigUint::from_bytes_be(signature);
    if &s >= key.n() {
        return None;
    }
    let m = s.modpow(key.e(), key.n()).to_bytes_be();

    let h_len = hash.output_len();
    let em_bits = key.n().bits().checked_sub(1)?;
    let em_len = em_bits.div_ceil(8);
    if m.len() > em_len || em_len < h_len + 2 {
        return None;
    }
    let mut em = vec![0u8; em_len - m.len()];
    em.extend_from_slice(&m);

    if em[em_len - 1] != 0xbc {
        return None;
    }
    let (masked_db, rest) = em.split_at(em_len - h_len - 1);
    let h = &rest[..h_len];

    let top_mask = 0xffu8 >> (8 * em_len - em_bits);
    if masked_db[0] & !top_mask != 0 {
        return None;
    }

    let mut db: Vec<u8> = masked_db
        .iter()
        .zip(mgf1(hash, h, masked_db.len()))
        .map(|(a, b)| a ^ b)
        .collect();
    db[0] &= top_mask;

    let separator = db.iter().position(|&b| b != 0)?;
    if db[separator] != 0x01 {
        return None;
    }
    Some(db.len() - separator - 1)
}

fn mgf1(hash: HashAlgorithm, seed: &[u8], len: usize) -> Vec<u8> {
    let mut mask = Vec::with_capacity(len + hash.output_len());
    let mut block = seed.to_vec();
    for counter in 0u32.. {
        if mask.len() >= len {
            break;
        }
        block.truncate(seed.len());
        block.extend_from_slice(&counter.to_be_bytes());
        mask.extend_from_slice(&hash.digest(&block));
    }
    mask.truncate(len);
    mask
}

#[cfg(test)]
mod tests {
    use base64::{Engine, engine::general_purpose::STANDARD};

    use super::*;
    use crate::rsa::PrivateKeyFormat;

    const PKCS1_PRIVATE: &str = include_str!("../../tests/fixtures/pkcs1_private.pem");
    const PS256_MAX_SALT: &str = "UaN/Y+tEZJK1BOBpfeEopLmqhcCpWYKgkbeCT5iF8l8nMuvzVeSXSYq/KtBIkx/5mnNcrUVBHeZbbyYGesN+CX2tkWyZ38+YCnuDAb2k4e9yKkcdMeJtGeSFxoXLsy5o7NfhzrWqFqhrT87I8nCQXs2cuK321qT0u4qeLG44x68DwGhIkGxBY3XXYWl4jI6CFRmYBnYDiVuwSzLJYveJwUmOpnsogqbUjnf90mmR3EMNNfmfHNj9cuUzQRlyfEgvrra55cPQFgusZod0+FmrNjQ/PBEDTtyQnONSPMxrDqeScuEY0hGJIuaEm7zWtEPuAiLN+6vVshouD1DvRITyIA==";

    fn key() -> RsaPrivateKey {
        PrivateKeyFormat::Pkcs1.parse(PKCS1_PRIVATE).unwrap()
    }

    #[test]
    fn names() {
        assert_eq!(SignScheme::Pkcs1v15.name(), "PKCS1v15");
        assert_eq!(SignScheme::PSS.name(), "PSS");
    }

    #[test]
    fn pkcs1v15_is_deterministic() {
        let key = key();
        let digest = HashAlgorithm::Sha256.digest(b"message");
        let a = SignScheme::Pkcs1v15.sign(HashAlgorithm::Sha256, &key, &digest).unwrap();
        let b = SignScheme::Pkcs1v15.sign(HashAlgorithm::Sha256, &key, &digest).unwrap();
        assert_eq!(a, b);
        SignScheme::Pkcs1v15
            .verify(HashAlgorithm::Sha256, &key.to_public_key(), &digest, &a)
            .unwrap();
    }

    #[test]
    fn pss_is_randomized() {
        let key = key();
        for hash in [HashAlgorithm::Sha256, HashAlgorithm::Sha512] {
            let digest = hash.digest(b"message");
            let a = SignScheme::PSS.sign(hash, &key, &digest).unwrap();
            let b = SignScheme::PSS.sign(hash, &key, &digest).unwrap();
            assert_ne!(a, b);
            SignScheme::PSS.verify(hash, &key.to_public_key(), &digest, &a).unwrap();
            SignScheme::PSS.verify(hash, &key.to_public_key(), &digest, &b).unwrap();
        }
    }

    #[test]
    fn pss_recovers_maximum_salt_length() {
        let digest = HashAlgorithm::Sha256.digest(b"message");
        let signature = STANDARD.decode(PS256_MAX_SALT).unwrap();
        SignScheme::PSS
            .verify(HashAlgorithm::Sha256, &key().to_public_key(), &digest, &signature)
            .unwrap();

        let fixed = SignScheme::Pss(PssOptions { salt_len: Some(222) });
        fixed
            .verify(HashAlgorithm::Sha256, &key().to_public_key(), &digest, &signature)
            .unwrap();
    }

    #[test]
    fn pss_recovers_any_salt_length() {
        let key = key();
        let public = key.to_public_key();
        for (hash, salt_len) in [
            (HashAlgorithm::Sha256, 0),
            (HashAlgorithm::Sha256, 20),
            (HashAlgorithm::Sha512, 20),
            (HashAlgorithm::Sha512, 100),
            (HashAlgorithm::Sha512, 190),
        ] {
            let digest = hash.digest(b"message");
            let signer = SignScheme::Pss(PssOptions { salt_len: Some(salt_len) });
            let sig = signer.sign(hash, &key, &digest).unwrap();

            assert_eq!(recover_pss_salt_len(hash, &public, &sig), Some(salt_len));
            SignScheme::PSS.verify(hash, &public, &digest, &sig).unwrap();

            let other = hash.digest(b"massage");
            assert!(matches!(
                SignScheme::PSS.verify(hash, &public, &other, &sig),
                Err(Error::InvalidSignature)
            ));
        }
    }

    #[test]
    fn pkcs1v15_signature_has_no_pss_layout() {
        let key = key();
        let digest = HashAlgorithm::Sha256.digest(b"message");
        let sig = SignScheme::Pkcs1v15.sign(HashAlgorithm::Sha256, &key, &digest).unwrap();
        assert_eq!(recover_pss_salt_len(HashAlgorithm::Sha256, &key.to_public_key(), &sig), None);
    }

    #[test]
    fn explicit_salt_length_round_trips() {
        let key = key();
        let scheme = SignScheme::Pss(PssOptions { salt_len: Some(20) });
        let digest = HashAlgorithm::Sha512.digest(b"message");
        let sig = scheme.sign(HashAlgorithm::Sha512, &key, &digest).unwrap();
        scheme
            .verify(HashAlgorithm::Sha512, &key.to_public_key(), &digest, &sig)
            .unwrap();
    }

    #[test]
    fn tampered_signatures_are_invalid() {
        let key = key();
        let digest = HashAlgorithm::Sha256.digest(b"message");
        for scheme in [SignScheme::Pkcs1v15, SignScheme::PSS] {
            let mut sig = scheme.sign(HashAlgorithm::Sha256, &key, &digest).unwrap();
            sig[10] ^= 0x01;
            assert!(matches!(
                scheme.verify(HashAlgorithm::Sha256, &key.to_public_key(), &digest, &sig),
                Err(Error::InvalidSignature)
            ));
            assert!(scheme
                .verify(HashAlgorithm::Sha256, &key.to_public_key(), &digest, &[])
                .is_err());
        }
    }
}

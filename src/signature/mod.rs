//! One sign/verify interface over every algorithm in the crate.
//!
//! Implementers decode caller text with their message coder, run the
//! primitive and encode the result with their signature coder. Password
//! hashers fit the same shape: the message is the password and the
//! signature is the stored hash string.

pub mod hmac;
pub mod rsa;

pub use self::hmac::{HS256, HS512, HmacScheme, HmacSigner};
pub use self::rsa::{PS256, PS512, RS256, RS512, RsaScheme, RsaSigner, RsaVerifier};

use crate::error::Result;

pub trait Signer: Send + Sync {
    /// Algorithm name, e.g. `HS256` or `argon2id`.
    fn algo(&self) -> &'static str;

    fn sign(&self, message: &str) -> Result<String>;
}

pub trait Verifier: Send + Sync {
    fn algo(&self) -> &'static str;

    /// `Ok(())` when `signature` matches `message`. Use
    /// [`Error::is_mismatch`](crate::Error::is_mismatch) to tell a wrong
    /// signature from undecodable input.
    fn verify(&self, message: &str, signature: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::Coder;
    use crate::crypto::{Argon2Config, ScryptParams};
    use crate::password::{Argon2id, Scrypt};
    use crate::rsa::PrivateKeyFormat;

    const PKCS1_PRIVATE: &str = include_str!("../../tests/fixtures/pkcs1_private.pem");

    #[test]
    fn every_algorithm_behind_one_interface() {
        let key = PrivateKeyFormat::Pkcs1.parse(PKCS1_PRIVATE).unwrap();
        let rsa_signer =
            |scheme| RsaSigner::new(scheme, key.clone(), Coder::Utf8, Coder::Base64).unwrap();

        let signers: Vec<(Box<dyn Signer>, Box<dyn Verifier>)> = vec![
            (
                Box::new(HmacSigner::new(HS256, b"key", Coder::Utf8, Coder::Hex).unwrap()),
                Box::new(HmacSigner::new(HS256, b"key", Coder::Utf8, Coder::Hex).unwrap()),
            ),
            (Box::new(rsa_signer(RS512)), Box::new(rsa_signer(RS512).verifier())),
            (Box::new(rsa_signer(PS256)), Box::new(rsa_signer(PS256).verifier())),
            (
                Box::new(Argon2id::new(Argon2Config::new(1, 1024, 1, 32).unwrap(), Coder::Utf8).unwrap()),
                Box::new(Argon2id::new(Argon2Config::default(), Coder::Utf8).unwrap()),
            ),
            (
                Box::new(Scrypt::new(ScryptParams { n: 1024, ..Default::default() }, Coder::Utf8, Coder::Hex).unwrap()),
                Box::new(Scrypt::new(ScryptParams::default(), Coder::Utf8, Coder::Hex).unwrap()),
            ),
        ];

        for (signer, verifier) in signers {
            assert_eq!(signer.algo(), verifier.algo());
            let signature = signer.sign("message").unwrap();
            verifier.verify("message", &signature).unwrap();

            let err = verifier.verify("massage", &signature).unwrap_err();
            assert!(err.is_mismatch(), "{}: {err}", signer.algo());
        }
    }
}

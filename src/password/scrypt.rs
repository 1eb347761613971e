use tracing::debug;

use crate::coder::Coder;
use crate::crypto::kdf::scrypt::derive_key;
use crate::crypto::{ScryptParams, constant_time_eq, generate_salt};
use crate::error::{Error, Result};
use crate::format::ScryptHash;
use crate::signature::{Signer, Verifier};

pub const ALGO: &str = "scrypt";

/// scrypt password hasher producing `N$r$p$salt$key` strings.
///
/// Passwords are decoded with `pw_coder`; salt and key inside the hash
/// string are written and read with `sig_coder`.
#[derive(Debug, Clone, Copy)]
pub struct Scrypt {
    params: ScryptParams,
    pw_coder: Coder,
    sig_coder: Coder,
}

impl Scrypt {
    /// Refuses parameters outside the scrypt limits and a `sig_coder` that
    /// cannot carry the raw salt and key bytes.
    pub fn new(params: ScryptParams, pw_coder: Coder, sig_coder: Coder) -> Result<Self> {
        params.check()?;
        Ok(Self {
            params,
            pw_coder,
            sig_coder: sig_coder.require_binary_safe("salts and keys")?,
        })
    }

    pub fn params(&self) -> &ScryptParams {
        &self.params
    }

    /// Parses a stored hash written by this hasher's signature coder.
    pub fn decode_hash(&self, hash: &str) -> Result<ScryptHash> {
        ScryptHash::decode(hash, self.sig_coder)
    }
}

impl Signer for Scrypt {
    fn algo(&self) -> &'static str {
        ALGO
    }

    fn sign(&self, password: &str) -> Result<String> {
        let password = self
            .pw_coder
            .decode(password)
            .map_err(|e| Error::decode("password", e))?;

        self.params.check()?;
        let salt = generate_salt(self.params.salt_len)
            .map_err(|e| e.in_stage("failed to generate salt"))?;
        let key = derive_key(&password, &salt, &self.params)
            .map_err(|e| e.in_stage("failed to hash password"))?;

        debug!(n = self.params.n, r = self.params.r, p = self.params.p, "scrypt hash created");

        Ok(ScryptHash::new(self.params, salt, key.to_vec()).encode(self.sig_coder))
    }
}

impl Verifier for Scrypt {
    fn algo(&self) -> &'static str {
        ALGO
    }

    fn verify(&self, password: &str, hash: &str) -> Result<()> {
        let stored = self
            .decode_hash(hash)
            .map_err(|e| e.in_stage("failed to decode hash"))?;

        let password = self
            .pw_coder
            .decode(password)
            .map_err(|e| Error::decode("password", e))?;

        let computed = derive_key(&password, stored.salt(), stored.params())
            .map_err(|e| e.in_stage("failed to hash password"))?;

        if !constant_time_eq(stored.key(), &computed) {
            debug!("scrypt password mismatch");
            return Err(Error::PasswordMismatch);
        }
        Ok(())
    }
}

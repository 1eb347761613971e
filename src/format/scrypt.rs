//! scrypt hash string.
//!
//! ```text
//! <N>$<r>$<p>$<salt>$<derived key>
//! ```
//!
//! The format carries no algorithm tag. Salt and key are written with the
//! signature coder of the hasher that produced them.

use super::{SEPARATOR, parse_number};
use crate::coder::Coder;
use crate::crypto::ScryptParams;
use crate::error::{Error, Result};

pub const FIELD_COUNT: usize = 5;

/// A parsed scrypt hash string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScryptHash {
    params: ScryptParams,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl ScryptHash {
    pub(crate) fn new(params: ScryptParams, salt: Vec<u8>, key: Vec<u8>) -> Self {
        Self {
            params: ScryptParams {
                salt_len: salt.len(),
                dk_len: key.len(),
                ..params
            },
            salt,
            key,
        }
    }

    /// Parameters embedded in the string, with lengths taken from the
    /// decoded salt and key.
    pub fn params(&self) -> &ScryptParams {
        &self.params
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn encode(&self, coder: Coder) -> String {
        [
            self.params.n.to_string(),
            self.params.r.to_string(),
            self.params.p.to_string(),
            coder.encode(&self.salt),
            coder.encode(&self.key),
        ]
        .join(&SEPARATOR.to_string())
    }

    /// Parses a stored hash and re-validates the parameters it carries.
    pub fn decode(hash: &str, coder: Coder) -> Result<Self> {
        let fields: Vec<&str> = hash.split(SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(Error::MalformedHash(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        }

        let n = parse_number::<u64>(fields[0], "N")?;
        let r = parse_number::<u32>(fields[1], "r")?;
        let p = parse_number::<u32>(fields[2], "p")?;

        let salt = coder
            .decode(fields[3])
            .map_err(|e| Error::MalformedHash(format!("salt: {e}")))?;
        let key = coder
            .decode(fields[4])
            .map_err(|e| Error::MalformedHash(format!("derived key: {e}")))?;

        let params = ScryptParams {
            n,
            r,
            p,
            salt_len: salt.len(),
            dk_len: key.len(),
        };
        params.check()?;

        Ok(Self { params, salt, key })
    }
}

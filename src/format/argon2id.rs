//! Argon2id hash string.
//!
//! ```text
//! $argon2id$v=<version>$m=<memory>,t=<time>,p=<threads>$<salt>$<digest>
//! ```
//!
//! Salt and digest are standard base64 without padding. The key length is
//! not written out: it is the length of the decoded digest.

use std::fmt;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};

use super::{SEPARATOR, parse_number};
use crate::crypto::Argon2Config;
use crate::error::{Error, Result};

/// Algorithm tag written as the first component.
pub const ALGO: &str = "argon2id";

const COMPONENTS: usize = 6;
const MIN_SALT_LEN: usize = 8;

/// A parsed Argon2id hash string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argon2idHash {
    version: u32,
    config: Argon2Config,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl Argon2idHash {
    pub(crate) fn new(version: u32, config: Argon2Config, salt: Vec<u8>, digest: Vec<u8>) -> Self {
        Self {
            version,
            config: config.with_key_length(digest.len() as u32),
            salt,
            digest,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Parameters embedded in the string; the key length is the digest's.
    pub fn config(&self) -> &Argon2Config {
        &self.config
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

impl fmt::Display for Argon2idHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{s}{ALGO}{s}v={}{s}m={},t={},p={}{s}{}{s}{}",
            self.version,
            self.config.memory_cost(),
            self.config.time_cost(),
            self.config.threads(),
            STANDARD_NO_PAD.encode(&self.salt),
            STANDARD_NO_PAD.encode(&self.digest),
            s = SEPARATOR,
        )
    }
}

impl FromStr for Argon2idHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let components: Vec<&str> = s.split(SEPARATOR).collect();
        if components.len() != COMPONENTS {
            return Err(Error::MalformedHash(format!(
                "invalid hash format structure: expected {COMPONENTS} components, found {}",
                components.len()
            )));
        }

        if !components[0].is_empty() || components[1] != ALGO {
            return Err(Error::MalformedHash(format!(
                "unsupported algorithm variant '{}'",
                components[1]
            )));
        }

        let version = components[2]
            .strip_prefix("v=")
            .ok_or_else(|| Error::MalformedHash("missing version field".into()))?;
        let version = parse_number::<u32>(version, "version")?;

        let (memory_cost, time_cost, threads) = parse_params(components[3])?;

        let salt = STANDARD_NO_PAD
            .decode(components[4])
            .map_err(|e| Error::decode("salt", e))?;
        if salt.len() < MIN_SALT_LEN {
            return Err(Error::MalformedHash(format!(
                "salt must be at least {MIN_SALT_LEN} bytes"
            )));
        }

        let digest = STANDARD_NO_PAD
            .decode(components[5])
            .map_err(|e| Error::decode("digest", e))?;

        let config = Argon2Config::new(time_cost, memory_cost, threads, digest.len() as u32)?;

        Ok(Self {
            version,
            config,
            salt,
            digest,
        })
    }
}

/// Parses `m=<memory>,t=<time>,p=<threads>`.
fn parse_params(field: &str) -> Result<(u32, u32, u32)> {
    let mut values = [0u32; 3];
    let mut parts = field.split(',');

    for (slot, key) in values.iter_mut().zip(["m", "t", "p"]) {
        let part = parts
            .next()
            .ok_or_else(|| Error::MalformedHash(format!("missing '{key}' parameter")))?;
        let value = part
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
            .ok_or_else(|| {
                Error::MalformedHash(format!("expected '{key}=' parameter, found '{part}'"))
            })?;
        *slot = parse_number(value, key)?;
    }

    if parts.next().is_some() {
        return Err(Error::MalformedHash(format!(
            "unexpected parameters in '{field}'"
        )));
    }

    Ok((values[0], values[1], values[2]))
}

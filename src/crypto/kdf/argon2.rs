use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Argon2 version written into new hashes (0x13).
pub const ARGON2_VERSION: u32 = 0x13;

/// Largest accepted memory cost in KiB (4 GiB). Stored hashes are parsed
/// from untrusted input and Argon2 allocates the whole block up front.
pub const MAX_MEMORY_COST: u32 = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Config {
    time_cost: u32,
    memory_cost: u32,
    threads: u32,
    key_length: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            // number of iterations
            time_cost: 2,
            memory_cost: 64 * 1024, // 64 MiB
            threads: 4,
            key_length: 32,
        }
    }
}

impl Argon2Config {
    pub fn new(time_cost: u32, memory_cost: u32, threads: u32, key_length: u32) -> Result<Self> {
        let config = Self {
            time_cost,
            memory_cost,
            threads,
            key_length,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    /// Memory cost in KiB.
    pub fn memory_cost(&self) -> u32 {
        self.memory_cost
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }

    pub fn key_length(&self) -> u32 {
        self.key_length
    }

    pub(crate) fn with_key_length(self, key_length: u32) -> Self {
        Self { key_length, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_cost < Params::MIN_T_COST {
            return Err(invalid("argon2 time cost must be >= 1"));
        }
        if self.threads < Params::MIN_P_COST || self.threads > Params::MAX_P_COST {
            return Err(invalid("argon2 threads must be between 1 and 2^24-1"));
        }
        if self.memory_cost < 8 * self.threads {
            return Err(invalid("argon2 memory cost must be at least 8 * threads"));
        }
        if self.memory_cost > MAX_MEMORY_COST {
            return Err(invalid("argon2 memory cost must not exceed 4 GiB"));
        }
        if (self.key_length as usize) < Params::MIN_OUTPUT_LEN {
            return Err(invalid("argon2 key length must be >= 4"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidParams(reason.to_string())
}

fn version_from(version: u32) -> Result<Version> {
    match version {
        0x13 => Ok(Version::V0x13),
        0x10 => Ok(Version::V0x10),
        other => Err(Error::MalformedHash(format!(
            "unsupported argon2 version: {other}"
        ))),
    }
}

/// Derives `config.key_length()` bytes from `password` with Argon2id.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    config: Argon2Config,
    version: u32,
) -> Result<Zeroizing<Vec<u8>>> {
    config.validate()?;

    let output_len = config.key_length as usize;
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.threads,
        Some(output_len),
    )
    .map_err(|e| Error::InvalidParams(format!("failed to construct Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, version_from(version)?, params);

    let mut key = Zeroizing::new(vec![0u8; output_len]);
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| Error::KeyDerivation(format!("argon2: {e}")))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> Argon2Config {
        Argon2Config::new(1, 1024, 1, 32).unwrap()
    }

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; 16];

        let k1 = derive_key(b"password", &salt, light(), ARGON2_VERSION).unwrap();
        let k2 = derive_key(b"password", &salt, light(), ARGON2_VERSION).unwrap();

        assert_eq!(k1, k2);
        assert_eq!(k1.len(), 32);
    }

    #[test]
    fn kdf_params_affect_output() {
        let salt = [7u8; 16];

        let cfg1 = Argon2Config {
            time_cost: 1,
            memory_cost: 1024,
            threads: 1,
            key_length: 32,
        };

        let cfg2 = Argon2Config {
            memory_cost: 2048,
            ..cfg1
        };

        let k1 = derive_key(b"pw", &salt, cfg1, ARGON2_VERSION).unwrap();
        let k2 = derive_key(b"pw", &salt, cfg2, ARGON2_VERSION).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn version_affects_output() {
        let salt = [3u8; 16];
        let v13 = derive_key(b"pw", &salt, light(), 0x13).unwrap();
        let v10 = derive_key(b"pw", &salt, light(), 0x10).unwrap();
        assert_ne!(v13, v10);
    }

    #[test]
    fn unknown_version_is_rejected() {
        assert!(matches!(
            derive_key(b"pw", &[0u8; 16], light(), 0x12),
            Err(Error::MalformedHash(_))
        ));
    }

    #[test]
    fn key_length_is_honoured() {
        let cfg = light().with_key_length(64);
        let key = derive_key(b"pw", &[1u8; 16], cfg, ARGON2_VERSION).unwrap();
        assert_eq!(key.len(), 64);
    }

    #[test]
    fn invalid_config_fails_gracefully() {
        assert!(Argon2Config::new(0, 0, 0, 0).is_err());
        assert!(Argon2Config::new(1, 8, 2, 32).is_err());
        assert!(Argon2Config::new(1, 1024, 1, 3).is_err());
        assert!(Argon2Config::new(1, MAX_MEMORY_COST + 1, 1, 32).is_err());
        assert!(Argon2Config::new(1, MAX_MEMORY_COST, 1, 32).is_ok());
        assert!(Argon2Config::new(2, 64 * 1024, 4, 32).is_ok());
    }

    #[test]
    fn default_config_is_valid() {
        Argon2Config::default().validate().unwrap();
    }
}

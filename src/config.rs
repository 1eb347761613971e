use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use credkit::{Argon2Config, Coder, ScryptParams};
use serde::Deserialize;

/// Settings read from the optional JSON config file.
///
/// ```json
/// { "argon2": { "memory_cost": 19456, "time_cost": 2 },
///   "scrypt": { "n": 16384 },
///   "hash_coder": "base64" }
/// ```
///
/// Missing keys keep their built-in defaults; command line flags override
/// whatever is set here.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub argon2: Argon2Config,
    pub scrypt: ScryptParams,
    /// Coder for salt and key inside scrypt hashes.
    pub hash_coder: Option<Coder>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        config.argon2.validate().context("invalid argon2 settings")?;
        config.scrypt.check().context("invalid scrypt settings")?;

        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn hash_coder(&self) -> Coder {
        self.hash_coder.unwrap_or(Coder::Hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn no_file_means_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.argon2, Argon2Config::default());
        assert_eq!(config.scrypt, ScryptParams::default());
        assert_eq!(config.hash_coder(), Coder::Hex);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let file = write(r#"{"argon2": {"memory_cost": 2048}, "hash_coder": "base64"}"#);
        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.argon2.memory_cost(), 2048);
        assert_eq!(config.argon2.time_cost(), Argon2Config::default().time_cost());
        assert_eq!(config.hash_coder(), Coder::Base64);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write(r#"{"scrypt": {"n": 1000}}"#);
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("invalid scrypt settings"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write(r#"{"bcrypt": {}}"#);
        assert!(Config::load(Some(file.path())).is_err());
    }
}

use tracing::debug;

use crate::coder::Coder;
use crate::crypto::kdf::argon2::derive_key;
use crate::crypto::{ARGON2_VERSION, Argon2Config, SALT_LEN, constant_time_eq, generate_salt};
use crate::error::{Error, Result};
use crate::format::Argon2idHash;
use crate::signature::{Signer, Verifier};

pub use crate::format::argon2id::ALGO;

/// Hashes `password` into a self-describing Argon2id string with a fresh
/// random salt.
pub fn sign(config: &Argon2Config, password: &str) -> Result<String> {
    hash_password(config, password.as_bytes())
}

/// Checks `password` against a stored Argon2id string.
///
/// Parameters are read from the string itself. A wrong password is
/// `Ok(false)`; errors are reserved for strings that cannot be parsed.
pub fn verify(hash: &str, password: &str) -> Result<bool> {
    verify_password(hash, password.as_bytes())
}

fn hash_password(config: &Argon2Config, password: &[u8]) -> Result<String> {
    config.validate()?;

    let salt = generate_salt(SALT_LEN)?;
    let digest = derive_key(password, &salt, *config, ARGON2_VERSION)?;

    debug!(
        memory_cost = config.memory_cost(),
        time_cost = config.time_cost(),
        threads = config.threads(),
        "argon2id hash created"
    );

    Ok(Argon2idHash::new(ARGON2_VERSION, *config, salt, digest.to_vec()).to_string())
}

fn verify_password(hash: &str, password: &[u8]) -> Result<bool> {
    let stored: Argon2idHash = hash.parse()?;
    let computed = derive_key(password, stored.salt(), *stored.config(), stored.version())?;

    let matched = constant_time_eq(stored.digest(), &computed);
    if !matched {
        debug!("argon2id password mismatch");
    }
    Ok(matched)
}

/// Argon2id behind the [`Signer`]/[`Verifier`] interface.
///
/// The "message" is the password, decoded with `pw_coder`; the "signature"
/// is the hash string.
#[derive(Debug, Clone, Copy)]
pub struct Argon2id {
    config: Argon2Config,
    pw_coder: Coder,
}

impl Argon2id {
    pub fn new(config: Argon2Config, pw_coder: Coder) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, pw_coder })
    }

    pub fn config(&self) -> &Argon2Config {
        &self.config
    }
}

impl Signer for Argon2id {
    fn algo(&self) -> &'static str {
        ALGO
    }

    fn sign(&self, password: &str) -> Result<String> {
        let password = self
            .pw_coder
            .decode(password)
            .map_err(|e| Error::decode("password", e))?;
        hash_password(&self.config, &password)
    }
}

impl Verifier for Argon2id {
    fn algo(&self) -> &'static str {
        ALGO
    }

    fn verify(&self, password: &str, hash: &str) -> Result<()> {
        let password = self
            .pw_coder
            .decode(password)
            .map_err(|e| Error::decode("password", e))?;
        if verify_password(hash, &password)? {
            Ok(())
        } else {
            Err(Error::PasswordMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn light() -> Argon2Config {
        Argon2Config::new(1, 1024, 1, 32).unwrap()
    }

    #[test]
    fn hash_length_is_97_for_default_config() {
        let config = Argon2Config::default();
        for password in ["", "a", "pass word", "~!@#$%^&*()_", "abcdefghijklmnopqrs"] {
            let hash = sign(&config, password).unwrap();
            assert_eq!(hash.len(), 97, "{hash}");
        }
    }

    #[test]
    fn round_trip_succeeds() {
        for password in ["", "x", "correct horse battery staple", "пароль"] {
            let hash = sign(&light(), password).unwrap();
            assert!(verify(&hash, password).unwrap());
        }
    }

    #[test]
    fn random_passwords_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..16 {
            let len = rng.gen_range(0..48);
            let password: String = (0..len).map(|_| rng.r#gen::<char>()).collect();

            let hash = sign(&light(), &password).unwrap();
            assert!(verify(&hash, &password).unwrap(), "{password:?}");
            assert!(!verify(&hash, &format!("{password}x")).unwrap());
        }
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = sign(&light(), "right").unwrap();
        assert!(!verify(&hash, "wrong").unwrap());
        assert!(!verify(&hash, "").unwrap());
    }

    #[test]
    fn salts_are_fresh_per_hash() {
        let a = sign(&light(), "pw").unwrap();
        let b = sign(&light(), "pw").unwrap();
        assert_ne!(a, b);
        assert!(verify(&a, "pw").unwrap());
        assert!(verify(&b, "pw").unwrap());
    }

    #[test]
    fn verification_uses_embedded_parameters() {
        let cfg = Argon2Config::new(2, 2048, 2, 48).unwrap();
        let hash = sign(&cfg, "pw").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=2048,t=2,p=2$"));
        // a verifier configured differently still checks the stored hash
        let verifier = Argon2id::new(light(), Coder::Utf8).unwrap();
        verifier.verify("pw", &hash).unwrap();
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify("$argon2id$v=19$m=1024", "pw"),
            Err(Error::MalformedHash(_))
        ));
        assert!(matches!(
            verify("$argon2id$v=19$m=1024,t=1,p=1$!!!$AAAA", "pw"),
            Err(Error::Decode { field: "salt", .. })
        ));
    }

    #[test]
    fn facade_maps_mismatch_to_error() {
        let hasher = Argon2id::new(light(), Coder::Utf8).unwrap();
        assert_eq!(Signer::algo(&hasher), "argon2id");

        let hash = hasher.sign("secret").unwrap();
        hasher.verify("secret", &hash).unwrap();

        let err = hasher.verify("guess", &hash).unwrap_err();
        assert!(matches!(err, Error::PasswordMismatch));
        assert!(err.is_mismatch());
    }

    #[test]
    fn facade_reports_password_decode_failure() {
        let hasher = Argon2id::new(light(), Coder::Hex).unwrap();
        let err = hasher.sign("not hex").unwrap_err();
        assert!(err.to_string().starts_with("failed to decode password:"));

        let hash = hasher.sign("00ff").unwrap();
        let err = hasher.verify("xyz", &hash).unwrap_err();
        assert!(matches!(err, Error::Decode { field: "password", .. }));
    }
}

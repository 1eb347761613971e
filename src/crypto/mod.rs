//! Cryptographic primitives used by the hash codecs and signers.
//!
//! Provides key derivation, HMAC, digests, constant-time comparison and
//! secure random bytes.

pub mod ct;
pub mod digest;
pub mod hmac;
pub mod kdf;
pub mod random;

pub use ct::constant_time_eq;
pub use digest::HashAlgorithm;
pub use kdf::{ARGON2_VERSION, Argon2Config, ScryptParams};
pub use random::generate_salt;

/// Length of the Argon2id salt (16 bytes).
pub const SALT_LEN: usize = 16;

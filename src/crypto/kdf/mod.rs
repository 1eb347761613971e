//! Password-based key derivation (Argon2id and scrypt).

pub mod argon2;
pub mod scrypt;

pub use self::argon2::{ARGON2_VERSION, Argon2Config, MAX_MEMORY_COST};
pub use self::scrypt::ScryptParams;

//! Password hashing with self-describing hash strings.

pub mod argon2id;
pub mod scrypt;

pub use self::argon2id::Argon2id;
pub use self::scrypt::Scrypt;

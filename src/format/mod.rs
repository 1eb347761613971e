//! Text formats for stored password hashes.
//!
//! Both formats are self-describing: the KDF parameters, the salt and the
//! digest travel together, so a hash can be verified long after the
//! configuration that produced it has changed.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Error, Result};

pub mod argon2id;
pub mod scrypt;

pub use self::argon2id::Argon2idHash;
pub use self::scrypt::ScryptHash;

/// Field separator shared by both formats.
pub const SEPARATOR: char = '$';

/// Password hash families a stored string can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    Argon2id,
    Scrypt,
}

/// Guesses the family of a stored hash from its shape.
///
/// Argon2id strings carry their tag. scrypt strings are positional only, so
/// any five-field string starting with a number is taken to be scrypt.
pub fn identify(hash: &str) -> Option<HashKind> {
    let prefix = format!("{SEPARATOR}{}{SEPARATOR}", argon2id::ALGO);
    if hash.starts_with(&prefix) {
        return Some(HashKind::Argon2id);
    }

    let fields: Vec<&str> = hash.split(SEPARATOR).collect();
    if fields.len() == scrypt::FIELD_COUNT && fields[0].parse::<u64>().is_ok() {
        return Some(HashKind::Scrypt);
    }
    None
}

/// Parses a base-10 numeric field, reporting failures as a malformed hash.
pub(crate) fn parse_number<T>(value: &str, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse::<T>()
        .map_err(|e| Error::MalformedHash(format!("invalid {name} '{value}': {e}")))
}

use getrandom::fill;

use crate::error::{Error, Result};

/// Fill buffer with cryptographically secure random bytes
pub fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| Error::Random)
}

/// Generate a salt of `len` random bytes
pub fn generate_salt(len: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; len];
    secure_random(&mut salt)?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_have_requested_length_and_differ() {
        let a = generate_salt(16).unwrap();
        let b = generate_salt(16).unwrap();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }
}

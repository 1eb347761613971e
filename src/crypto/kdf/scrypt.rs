use scrypt::{Params, scrypt};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

const MAX_INT: u64 = (1 << 31) - 1;
/// Minimum derived key length in bytes.
pub const MIN_DK_LEN: usize = 16;
/// Minimum salt length in bytes.
pub const MIN_SALT_LEN: usize = 8;

/// Input parameters to the scrypt key derivation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScryptParams {
    /// CPU/memory cost, a power of two.
    pub n: u64,
    /// Block size.
    pub r: u32,
    /// Parallelisation.
    pub p: u32,
    pub salt_len: usize,
    pub dk_len: usize,
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            n: 32768,
            r: 8,
            p: 1,
            salt_len: 8,
            dk_len: 32,
        }
    }
}

impl ScryptParams {
    pub fn new(n: u64, r: u32, p: u32, salt_len: usize, dk_len: usize) -> Result<Self> {
        let params = Self {
            n,
            r,
            p,
            salt_len,
            dk_len,
        };
        params.check()?;
        Ok(params)
    }

    /// Range checks applied both before hashing and to parameters read
    /// back from a stored hash.
    pub fn check(&self) -> Result<()> {
        let (n, r, p) = (self.n, u64::from(self.r), u64::from(self.p));

        if n > MAX_INT || n <= 1 || n % 2 != 0 || !n.is_power_of_two() {
            return Err(invalid("N must be a power of two greater than 1"));
        }
        if r < 1 || r > MAX_INT {
            return Err(invalid("r must be >= 1"));
        }
        if p < 1 || p > MAX_INT {
            return Err(invalid("p must be >= 1"));
        }
        if r * p >= 1 << 30 || r > MAX_INT / 128 / p || r > MAX_INT / 256 || n > MAX_INT / 128 / r
        {
            return Err(invalid("N, r and p exceed the scrypt limits"));
        }
        if self.salt_len < MIN_SALT_LEN || self.salt_len as u64 > MAX_INT {
            return Err(invalid("salt must be at least 8 bytes"));
        }
        if self.dk_len < MIN_DK_LEN || self.dk_len as u64 > MAX_INT {
            return Err(invalid("derived key must be at least 16 bytes"));
        }
        Ok(())
    }

    fn log_n(&self) -> u8 {
        self.n.trailing_zeros() as u8
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidParams(format!("scrypt: {reason}"))
}

/// Derives `params.dk_len` bytes from `password`.
pub fn derive_key(password: &[u8], salt: &[u8], params: &ScryptParams) -> Result<Zeroizing<Vec<u8>>> {
    params.check()?;

    // The output length is taken from the buffer, not from `Params`.
    let scrypt_params = Params::new(params.log_n(), params.r, params.p, Params::RECOMMENDED_LEN)
        .map_err(|e| Error::InvalidParams(format!("scrypt: {e}")))?;

    let mut key = Zeroizing::new(vec![0u8; params.dk_len]);
    scrypt(password, salt, &scrypt_params, &mut key)
        .map_err(|e| Error::KeyDerivation(format!("scrypt: {e}")))?;

    Ok(key)
}

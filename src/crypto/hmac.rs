use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use tracing::debug;

use super::ct::constant_time_eq;
use super::digest::HashAlgorithm;
use crate::error::{Error, Result};

fn mac<M: Mac>(mut mac: M, message: &[u8]) -> Vec<u8> {
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Single-shot keyed hash of `message`.
pub fn sign(hash: HashAlgorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let tag = match hash {
        HashAlgorithm::Sha256 => mac(
            Hmac::<Sha256>::new_from_slice(key).map_err(|e| Error::Sign(e.to_string()))?,
            message,
        ),
        HashAlgorithm::Sha512 => mac(
            Hmac::<Sha512>::new_from_slice(key).map_err(|e| Error::Sign(e.to_string()))?,
            message,
        ),
    };
    Ok(tag)
}

/// Recomputes the MAC and compares it with `signature` in constant time.
pub fn verify(hash: HashAlgorithm, key: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
    let expected = sign(hash, key, message)?;
    if !constant_time_eq(&expected, signature) {
        debug!(hash = hash.name(), "hmac signature mismatch");
        return Err(Error::InvalidSignature);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"key";
    const MESSAGE: &[u8] = b"message";

    #[test]
    fn hmac_sha256_known_vector() {
        let tag = sign(HashAlgorithm::Sha256, KEY, MESSAGE).unwrap();
        assert_eq!(
            hex::encode(tag),
            "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a"
        );
    }

    #[test]
    fn hmac_sha512_known_vector() {
        let tag = sign(HashAlgorithm::Sha512, KEY, MESSAGE).unwrap();
        assert_eq!(
            hex::encode(tag),
            "e477384d7ca229dd1426e64b63ebf2d36ebd6d7e669a6735424e72ea6c01d3f8\
             b56eb39c36d8232f5427999b8d1a3f9cd1128fc69f4d75b434216810fa367e98"
        );
    }

    #[test]
    fn verify_accepts_own_signature() {
        let tag = sign(HashAlgorithm::Sha512, KEY, MESSAGE).unwrap();
        verify(HashAlgorithm::Sha512, KEY, MESSAGE, &tag).unwrap();
    }

    #[test]
    fn flipped_bit_is_rejected() {
        let mut tag = sign(HashAlgorithm::Sha256, KEY, MESSAGE).unwrap();
        tag[31] ^= 0x01;
        assert!(matches!(
            verify(HashAlgorithm::Sha256, KEY, MESSAGE, &tag),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let tag = sign(HashAlgorithm::Sha256, KEY, MESSAGE).unwrap();
        assert!(matches!(
            verify(HashAlgorithm::Sha256, KEY, MESSAGE, &tag[..16]),
            Err(Error::InvalidSignature)
        ));
        assert!(matches!(
            verify(HashAlgorithm::Sha256, KEY, MESSAGE, &[]),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn different_message_is_rejected() {
        let tag = sign(HashAlgorithm::Sha256, KEY, MESSAGE).unwrap();
        assert!(verify(HashAlgorithm::Sha256, KEY, b"massage", &tag).is_err());
    }
}

use thiserror::Error;

use crate::coder::Coder;

/// Failure to turn caller text into bytes with a [`Coder`](crate::Coder).
#[derive(Debug, Error)]
pub enum CoderError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors returned by every hashing, signing and key handling operation.
///
/// Mismatches (`InvalidSignature`, `PasswordMismatch` and the facade's
/// `Verification` wrapper around them) are ordinary results and are kept
/// apart from input corruption; see [`Error::is_mismatch`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to decode {field}: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: CoderError,
    },

    #[error("the {coder} coder cannot carry binary {role}, use hex or base64")]
    UnsupportedCoder { role: &'static str, coder: Coder },

    #[error("malformed hash: {0}")]
    MalformedHash(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("failed to decode {format} pem")]
    PemDecode { format: &'static str },

    #[error("failed to parse {format} pem: {reason}")]
    KeyParse {
        format: &'static str,
        reason: String,
    },

    #[error("failed to marshal key to {format} form: {reason}")]
    KeyMarshal {
        format: &'static str,
        reason: String,
    },

    #[error("failed to generate key pair: {0}")]
    KeyGeneration(String),

    #[error("failed to sign message: {0}")]
    Sign(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("hashed password does not match the hash of password provided")]
    PasswordMismatch,

    #[error("failed to verify signature: {0}")]
    Verification(#[source] Box<Error>),

    /// Names the step of a multi-step operation that failed.
    #[error("{stage}: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("OS random generator unavailable")]
    Random,
}

impl Error {
    pub(crate) fn decode(field: &'static str, source: impl Into<CoderError>) -> Self {
        Error::Decode {
            field,
            source: source.into(),
        }
    }

    pub(crate) fn in_stage(self, stage: &'static str) -> Self {
        Error::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Returns `true` when the input was well formed but the credential or
    /// signature did not match.
    pub fn is_mismatch(&self) -> bool {
        self.root().is_mismatch_kind()
    }

    /// The underlying error with `Verification` and `Stage` wrappers removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Verification(inner) | Error::Stage { source: inner, .. } => inner.root(),
            other => other,
        }
    }

    fn is_mismatch_kind(&self) -> bool {
        matches!(self, Error::InvalidSignature | Error::PasswordMismatch)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Text codings used to move bytes in and out of caller strings.

use std::fmt;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::{self, CoderError, Error};

/// Byte ↔ string mapping applied to messages, passwords and signatures.
///
/// `decode` fails on text that is malformed for the selected encoding.
/// `encode` never fails, but `Utf8` replaces invalid sequences, so only
/// `Hex` and `Base64` may carry arbitrary bytes such as signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coder {
    /// The raw UTF-8 bytes of the string.
    Utf8,
    /// Hex digits, lowercase on output.
    Hex,
    /// RFC 4648 standard alphabet with padding.
    Base64,
}

impl Coder {
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, CoderError> {
        match self {
            Coder::Utf8 => Ok(text.as_bytes().to_vec()),
            Coder::Hex => Ok(hex::decode(text)?),
            Coder::Base64 => Ok(STANDARD.decode(text)?),
        }
    }

    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Coder::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Coder::Hex => hex::encode(bytes),
            Coder::Base64 => STANDARD.encode(bytes),
        }
    }

    /// Whether any byte string survives `encode` followed by `decode`.
    pub fn is_binary_safe(&self) -> bool {
        !matches!(self, Coder::Utf8)
    }

    pub(crate) fn require_binary_safe(self, role: &'static str) -> error::Result<Self> {
        if self.is_binary_safe() {
            Ok(self)
        } else {
            Err(Error::UnsupportedCoder { role, coder: self })
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Coder::Utf8 => "utf8",
            Coder::Hex => "hex",
            Coder::Base64 => "base64",
        }
    }
}

impl fmt::Display for Coder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Coder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Coder::Utf8),
            "hex" => Ok(Coder::Hex),
            "base64" => Ok(Coder::Base64),
            other => Err(format!("unknown coder '{other}' (expected utf8, hex or base64)")),
        }
    }
}

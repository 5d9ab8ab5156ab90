//! Error types for notekeys.
//!
//! Every variant is a distinct failure mode of the derivation layer. Messages
//! say *what* failed and never carry passwords, salts or key material.

use std::fmt;

/// The single error type for all notekeys operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDerivationError {
    /// Malformed caller input: a bit length that is not a positive multiple
    /// of 8, an empty password or salt, a zero iteration count, an odd-length
    /// key passed to a half split.
    InvalidParameter(String),

    /// The hash or KDF backend rejected its input or could not compute.
    PrimitiveFailure(String),

    /// The secure random source could not produce bytes.
    EntropyUnavailable,

    /// Malformed base64 or hex input, or decoded bytes that are not UTF-8.
    DecodeError(String),

    /// A configuration file could not be read, parsed or validated.
    InvalidConfig(String),
}

impl fmt::Display for KeyDerivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(reason) => write!(f, "invalid parameter: {}", reason),
            Self::PrimitiveFailure(reason) => write!(f, "crypto primitive failed: {}", reason),
            Self::EntropyUnavailable => write!(f, "secure random source unavailable"),
            Self::DecodeError(reason) => write!(f, "decode error: {}", reason),
            Self::InvalidConfig(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for KeyDerivationError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KeyDerivationError>;

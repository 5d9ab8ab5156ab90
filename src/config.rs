//! Service configuration.
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KeyDerivationError, Result};
use crate::primitives::BackendKind;

/// Output length of a passphrase derivation, in bits. Splits into three
/// 256-bit keys.
pub const DEFAULT_PBKDF2_LENGTH_BITS: u32 = 768;

/// Shortest passphrase derivation that still yields three one-byte keys.
const MIN_PBKDF2_LENGTH_BITS: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KdfConfig {
    /// Length of the single PBKDF2 output split by
    /// `generate_symmetric_key_pair`.
    pub pbkdf2_length_bits: u32,
    /// Crypto backend selection.
    pub backend: BackendKind,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            pbkdf2_length_bits: DEFAULT_PBKDF2_LENGTH_BITS,
            backend: BackendKind::Auto,
        }
    }
}

impl KdfConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| KeyDerivationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            KeyDerivationError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pbkdf2_length_bits % 8 != 0 {
            return Err(KeyDerivationError::InvalidConfig(format!(
                "pbkdf2_length_bits must be a multiple of 8, got {}",
                self.pbkdf2_length_bits
            )));
        }
        if self.pbkdf2_length_bits < MIN_PBKDF2_LENGTH_BITS {
            return Err(KeyDerivationError::InvalidConfig(format!(
                "pbkdf2_length_bits must be at least {}, got {}",
                MIN_PBKDF2_LENGTH_BITS, self.pbkdf2_length_bits
            )));
        }
        Ok(())
    }
}

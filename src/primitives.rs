//! The crypto backend boundary.
//!
//! Everything above this module talks to hashing, PBKDF2 and the random
//! source through [`CryptoPrimitives`] only. Two implementations exist:
//!
//! - [`PlatformBackend`](crate::platform::PlatformBackend) on top of `ring`
//! - [`SoftwareBackend`](crate::software::SoftwareBackend) on top of the
//!   RustCrypto `pbkdf2` / `hmac` / `sha2` crates and `getrandom`
//!
//! The pair must agree bit for bit. PBKDF2 uses HMAC-SHA-512 as its PRF in
//! both.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{KeyDerivationError, Result};
use crate::platform::PlatformBackend;
use crate::software::SoftwareBackend;

/// The primitive operations consumed by the derivation layer.
///
/// Text inputs are UTF-8 encoded before hashing. Digest outputs are lowercase
/// hex.
pub trait CryptoPrimitives: Send + Sync {
    /// Short backend identifier, used in log events.
    fn name(&self) -> &'static str;

    /// PBKDF2-HMAC-SHA-512 of `password` and `salt`, `output_bits` long.
    fn pbkdf2(&self, password: &str, salt: &str, iterations: u32, output_bits: u32)
        -> Result<String>;

    /// SHA-256 of `text`.
    fn sha256(&self, text: &str) -> String;

    /// HMAC-SHA-256 of `message` keyed with the bytes of `hex_key`.
    fn hmac256(&self, message: &str, hex_key: &str) -> Result<String>;

    /// `n` bytes from a cryptographically secure source.
    ///
    /// Failure maps to [`KeyDerivationError::EntropyUnavailable`]. There is
    /// no fallback to a weaker generator.
    fn secure_random_bytes(&self, n: usize) -> Result<Vec<u8>>;
}

/// Which backend to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Platform if its random source answers a probe, otherwise software.
    #[default]
    Auto,
    /// `ring`.
    Platform,
    /// RustCrypto.
    Software,
}

/// Build the backend for `kind`. Called once per service.
pub fn select_backend(kind: BackendKind) -> Arc<dyn CryptoPrimitives> {
    match kind {
        BackendKind::Platform => Arc::new(PlatformBackend::new()),
        BackendKind::Software => Arc::new(SoftwareBackend::new()),
        BackendKind::Auto => {
            let platform = PlatformBackend::new();
            if platform.probe() {
                Arc::new(platform)
            } else {
                tracing::warn!(
                    fallback = "software",
                    "platform random source failed its probe"
                );
                Arc::new(SoftwareBackend::new())
            }
        }
    }
}

/// Convert a PBKDF2 output size in bits to bytes.
///
/// Both backends share this check so they reject the same requests.
pub(crate) fn output_len_bytes(output_bits: u32) -> Result<usize> {
    if output_bits == 0 || output_bits % 8 != 0 {
        return Err(KeyDerivationError::PrimitiveFailure(format!(
            "cannot produce {} bit output",
            output_bits
        )));
    }
    Ok((output_bits / 8) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_len_bytes() {
        assert_eq!(output_len_bytes(768).unwrap(), 96);
        assert_eq!(output_len_bytes(8).unwrap(), 1);
        assert!(matches!(
            output_len_bytes(0),
            Err(KeyDerivationError::PrimitiveFailure(_))
        ));
        assert!(matches!(
            output_len_bytes(12),
            Err(KeyDerivationError::PrimitiveFailure(_))
        ));
    }

    #[test]
    fn test_select_backend_names() {
        assert_eq!(select_backend(BackendKind::Platform).name(), "platform");
        assert_eq!(select_backend(BackendKind::Software).name(), "software");
        // The OS random source is available in any test environment.
        assert_eq!(select_backend(BackendKind::Auto).name(), "platform");
    }
}

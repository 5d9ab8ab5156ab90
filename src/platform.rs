//! Platform crypto backend on top of `ring`.
//!
//! Primitive choices:
//! - **KDF**: PBKDF2 with HMAC-SHA-512 (`ring::pbkdf2`)
//! - **Digest**: SHA-256 (`ring::digest`)
//! - **MAC**: HMAC-SHA-256 (`ring::hmac`)
//! - **Randomness**: `ring::rand::SystemRandom`

use std::num::NonZeroU32;

use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, hmac, pbkdf2};

use crate::error::{KeyDerivationError, Result};
use crate::primitives::{output_len_bytes, CryptoPrimitives};

/// PRF used for every PBKDF2 derivation.
static PBKDF2_ALGORITHM: &pbkdf2::Algorithm = &pbkdf2::PBKDF2_HMAC_SHA512;

/// `ring`-backed primitives.
#[derive(Clone)]
pub struct PlatformBackend {
    rng: SystemRandom,
}

impl PlatformBackend {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    /// Check that the system random source answers at all.
    pub(crate) fn probe(&self) -> bool {
        let mut buf = [0u8; 1];
        self.rng.fill(&mut buf).is_ok()
    }
}

impl Default for PlatformBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoPrimitives for PlatformBackend {
    fn name(&self) -> &'static str {
        "platform"
    }

    fn pbkdf2(
        &self,
        password: &str,
        salt: &str,
        iterations: u32,
        output_bits: u32,
    ) -> Result<String> {
        let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
            KeyDerivationError::PrimitiveFailure("iteration count must be non-zero".to_string())
        })?;
        let mut out = vec![0u8; output_len_bytes(output_bits)?];

        pbkdf2::derive(
            *PBKDF2_ALGORITHM,
            iterations,
            salt.as_bytes(),
            password.as_bytes(),
            &mut out,
        );

        Ok(hex::encode(out))
    }

    fn sha256(&self, text: &str) -> String {
        hex::encode(digest::digest(&digest::SHA256, text.as_bytes()))
    }

    fn hmac256(&self, message: &str, hex_key: &str) -> Result<String> {
        let key_bytes = crate::encoding::hex_string_to_bytes(hex_key)?;
        let key = hmac::Key::new(hmac::HMAC_SHA256, &key_bytes);
        Ok(hex::encode(hmac::sign(&key, message.as_bytes())))
    }

    fn secure_random_bytes(&self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.rng
            .fill(&mut buf)
            .map_err(|_| KeyDerivationError::EntropyUnavailable)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        let backend = PlatformBackend::new();
        assert_eq!(backend.secure_random_bytes(0).unwrap().len(), 0);
        assert_eq!(backend.secure_random_bytes(64).unwrap().len(), 64);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let backend = PlatformBackend::new();
        let result = backend.pbkdf2("pw", "salt", 0, 256);
        assert!(matches!(result, Err(KeyDerivationError::PrimitiveFailure(_))));
    }

    #[test]
    fn test_pbkdf2_output_length() {
        let backend = PlatformBackend::new();
        let out = backend.pbkdf2("pw", "salt", 1, 768).unwrap();
        assert_eq!(out.len(), 192);
    }

    #[test]
    fn test_hmac_rejects_bad_hex_key() {
        let backend = PlatformBackend::new();
        assert!(matches!(
            backend.hmac256("msg", "zz"),
            Err(KeyDerivationError::DecodeError(_))
        ));
    }
}

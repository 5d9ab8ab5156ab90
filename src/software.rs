//! Software crypto backend on top of the RustCrypto crates.
//!
//! Used when the platform backend is unavailable or explicitly disabled.
//! Entropy still comes from the operating system through `getrandom`.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::error::{KeyDerivationError, Result};
use crate::primitives::{output_len_bytes, CryptoPrimitives};

type HmacSha256 = Hmac<Sha256>;

/// RustCrypto-backed primitives. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareBackend;

impl SoftwareBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CryptoPrimitives for SoftwareBackend {
    fn name(&self) -> &'static str {
        "software"
    }

    fn pbkdf2(
        &self,
        password: &str,
        salt: &str,
        iterations: u32,
        output_bits: u32,
    ) -> Result<String> {
        if iterations == 0 {
            return Err(KeyDerivationError::PrimitiveFailure(
                "iteration count must be non-zero".to_string(),
            ));
        }
        let mut out = vec![0u8; output_len_bytes(output_bits)?];

        pbkdf2::pbkdf2::<Hmac<Sha512>>(password.as_bytes(), salt.as_bytes(), iterations, &mut out)
            .map_err(|e| KeyDerivationError::PrimitiveFailure(format!("pbkdf2: {}", e)))?;

        Ok(hex::encode(out))
    }

    fn sha256(&self, text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    fn hmac256(&self, message: &str, hex_key: &str) -> Result<String> {
        let key_bytes = crate::encoding::hex_string_to_bytes(hex_key)?;
        let mut mac = HmacSha256::new_from_slice(&key_bytes)
            .map_err(|e| KeyDerivationError::PrimitiveFailure(format!("hmac: {}", e)))?;
        mac.update(message.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn secure_random_bytes(&self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        getrandom::fill(&mut buf).map_err(|_| KeyDerivationError::EntropyUnavailable)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_differ() {
        let backend = SoftwareBackend::new();
        let a = backend.secure_random_bytes(32).unwrap();
        let b = backend.secure_random_bytes(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_bad_output_bits_rejected() {
        let backend = SoftwareBackend::new();
        assert!(matches!(
            backend.pbkdf2("pw", "salt", 1, 7),
            Err(KeyDerivationError::PrimitiveFailure(_))
        ));
    }
}

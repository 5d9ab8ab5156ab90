//! The key derivation service.
//!
//! Composes backend primitives into random key generation, item key
//! generation, passphrase derivation and splitting. Holds no mutable state:
//! a backend handle and a config, both fixed at construction.

use std::fmt;
use std::sync::Arc;

use crate::config::KdfConfig;
use crate::error::{KeyDerivationError, Result};
use crate::keys::{self, DerivationParameters, DerivedKeySet, KeyMaterial, SymmetricKeys};
use crate::primitives::{self, CryptoPrimitives};

/// Size of an item encryption key and of its random inputs. Halves into two
/// 256-bit keys.
pub const ITEM_KEY_BITS: u32 = 512;

/// Item keys come from random inputs, so one round is enough.
const ITEM_KEY_COST: u32 = 1;

/// Number of keys split out of a passphrase derivation.
const SYMMETRIC_KEY_COUNT: usize = 3;

#[derive(Clone)]
pub struct KeyDerivationService {
    backend: Arc<dyn CryptoPrimitives>,
    config: KdfConfig,
}

impl fmt::Debug for KeyDerivationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDerivationService")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}

impl KeyDerivationService {
    /// Validate `config` and select its backend.
    pub fn new(config: KdfConfig) -> Result<Self> {
        config.validate()?;
        let backend = primitives::select_backend(config.backend);
        tracing::debug!(backend = backend.name(), "key derivation service ready");
        Ok(Self { backend, config })
    }

    /// Use a caller-supplied backend. `config.backend` is ignored.
    pub fn with_backend(config: KdfConfig, backend: Arc<dyn CryptoPrimitives>) -> Result<Self> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &KdfConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// `bit_length / 8` secure random bytes as hex.
    pub fn generate_random_key(&self, bit_length: u32) -> Result<KeyMaterial> {
        if bit_length == 0 || bit_length % 8 != 0 {
            return Err(KeyDerivationError::InvalidParameter(format!(
                "bit length must be a positive multiple of 8, got {}",
                bit_length
            )));
        }
        let bytes = self.backend.secure_random_bytes((bit_length / 8) as usize)?;
        Ok(KeyMaterial::from_bytes(&bytes))
    }

    /// A fresh 512-bit key, meant to be halved into an encryption key and an
    /// authentication key.
    ///
    /// PBKDF2 runs over a random passphrase and a random salt at cost 1. The
    /// inputs already carry full entropy; the KDF only shapes the output.
    pub fn generate_item_encryption_key(&self) -> Result<KeyMaterial> {
        let salt = self.generate_random_key(ITEM_KEY_BITS)?;
        let passphrase = self.generate_random_key(ITEM_KEY_BITS)?;

        tracing::debug!(
            backend = self.backend.name(),
            output_bits = ITEM_KEY_BITS,
            "generating item encryption key"
        );
        let derived = self.backend.pbkdf2(
            passphrase.as_str(),
            salt.as_str(),
            ITEM_KEY_COST,
            ITEM_KEY_BITS,
        )?;
        let key = KeyMaterial::from_hex(&derived)?;

        if key.len() != (ITEM_KEY_BITS / 4) as usize {
            return Err(KeyDerivationError::PrimitiveFailure(format!(
                "backend returned {} hex chars for a {} bit key",
                key.len(),
                ITEM_KEY_BITS
            )));
        }
        Ok(key)
    }

    /// Characters `[0, len/2)`. Odd-length keys are rejected.
    pub fn first_half_of_key(&self, key: &str) -> Result<String> {
        keys::first_half_of_key(key)
    }

    /// Characters `[len/2, len)`. Odd-length keys are rejected.
    pub fn second_half_of_key(&self, key: &str) -> Result<String> {
        keys::second_half_of_key(key)
    }

    /// Derive the encryption key, authentication key and master key
    /// verifier for a passphrase, in that order.
    ///
    /// One PBKDF2 output of `pbkdf2_length_bits` is split into three equal
    /// thirds. Same inputs, same keys.
    pub fn generate_symmetric_key_pair(
        &self,
        params: &DerivationParameters,
    ) -> Result<SymmetricKeys> {
        let set = self.derive_key_set(params, self.config.pbkdf2_length_bits, SYMMETRIC_KEY_COUNT)?;
        SymmetricKeys::from_key_set(set)
    }

    /// Derive `output_bits` from `params` and split into `parts` slices.
    pub fn derive_key_set(
        &self,
        params: &DerivationParameters,
        output_bits: u32,
        parts: usize,
    ) -> Result<DerivedKeySet> {
        tracing::debug!(
            backend = self.backend.name(),
            iterations = params.iterations(),
            output_bits,
            parts,
            "deriving key set"
        );
        let derived = self.backend.pbkdf2(
            params.password(),
            params.salt(),
            params.iterations(),
            output_bits,
        )?;
        let derived = KeyMaterial::from_hex(&derived)?;
        DerivedKeySet::partition(&derived, parts)
    }

    /// Constant-time string equality. See [`crate::compare::timing_safe_equal`].
    pub fn timing_safe_equal(&self, a: &str, b: &str) -> bool {
        crate::compare::timing_safe_equal(a, b)
    }

    /// SHA-256 of `text`, hex.
    pub fn sha256(&self, text: &str) -> String {
        self.backend.sha256(text)
    }

    /// HMAC-SHA-256 of `message` under the key bytes in `hex_key`, hex.
    pub fn hmac256(&self, message: &str, hex_key: &str) -> Result<String> {
        self.backend.hmac256(message, hex_key)
    }
}

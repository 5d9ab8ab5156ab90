//! # notekeys
//!
//! Passphrase key derivation, key splitting and constant-time comparison for
//! an end-to-end encrypted note store.
//!
//! A user's passphrase, salt and cost run through PBKDF2 once; the output is
//! cut into an encryption key, an authentication key and a master key
//! verifier. Per-item keys come from random inputs through the same KDF path
//! and are halved by the caller.
//!
//! Hashing, PBKDF2 and randomness sit behind the [`CryptoPrimitives`] trait,
//! with a `ring` backend and a RustCrypto backend chosen once at
//! construction.
//!
//! ```no_run
//! use notekeys::{DerivationParameters, KdfConfig, KeyDerivationService};
//!
//! let service = KeyDerivationService::new(KdfConfig::default())?;
//! let params = DerivationParameters::new("correct horse", "a1b2c3d4", 5000)?;
//! let keys = service.generate_symmetric_key_pair(&params)?;
//! assert_eq!(keys.encryption_key.len(), 64);
//! # Ok::<(), notekeys::KeyDerivationError>(())
//! ```

pub mod compare;
pub mod config;
pub mod encoding;
pub mod error;
pub mod keys;
pub mod platform;
pub mod primitives;
pub mod service;
pub mod software;

pub use compare::timing_safe_equal;
pub use config::{KdfConfig, DEFAULT_PBKDF2_LENGTH_BITS};
pub use encoding::{base64, base64_decode, base64_to_bytes, bytes_to_hex_string, hex_string_to_bytes};
pub use error::{KeyDerivationError, Result};
pub use keys::{
    first_half_of_key, second_half_of_key, DerivationParameters, DerivedKeySet, KeyMaterial,
    KeyParams, SymmetricKeys,
};
pub use primitives::{select_backend, BackendKind, CryptoPrimitives};
pub use service::{KeyDerivationService, ITEM_KEY_BITS};
